use crate::engines::generation::genome::{strictness, Genome};
use crate::error::{CypherError, Result};
use crate::ml::SectorModels;
use crate::types::{Fitness, Sector};

/// Base false-positive rate of a fully strict policy before sector scaling
const BASE_FALSE_POSITIVE_RATE: f64 = 0.15;
const MAX_FALSE_POSITIVE_RATE: f64 = 0.3;

/// Scores genomes for the evolution loop.
///
/// `retrain` lets the evaluator refresh whatever it scores with; fitness of
/// the same genome may change afterwards.
pub trait FitnessEvaluator {
    fn evaluate(&mut self, genomes: &[&Genome]) -> Result<Vec<Fitness>>;
    fn retrain(&mut self, epochs: usize) -> Result<()>;
}

/// Heuristic false-positive estimate: stricter policies flag more benign traffic
pub fn false_positive_rate(genome: &[u8], sector: Sector) -> f64 {
    let sector_rate =
        strictness(genome) * BASE_FALSE_POSITIVE_RATE * sector.false_positive_multiplier();
    sector_rate.min(MAX_FALSE_POSITIVE_RATE)
}

pub fn average_false_positive_rate(genome: &[u8], sectors: &[Sector]) -> f64 {
    if sectors.is_empty() {
        return 0.0;
    }
    sectors
        .iter()
        .map(|&sector| false_positive_rate(genome, sector))
        .sum::<f64>()
        / sectors.len() as f64
}

/// Fitness from the per-sector policy scorers
pub struct PolicyFitnessEvaluator<'a> {
    models: &'a mut SectorModels,
}

impl<'a> PolicyFitnessEvaluator<'a> {
    pub fn new(models: &'a mut SectorModels) -> Self {
        Self { models }
    }
}

impl FitnessEvaluator for PolicyFitnessEvaluator<'_> {
    fn evaluate(&mut self, genomes: &[&Genome]) -> Result<Vec<Fitness>> {
        let sectors = self.models.sectors();
        if sectors.is_empty() {
            return Err(CypherError::Model("No sector models loaded".to_string()));
        }

        let mut score_sums = vec![0.0f64; genomes.len()];
        for model in self.models.iter() {
            let scores = model.score(genomes)?;
            for (sum, score) in score_sums.iter_mut().zip(scores) {
                *sum += score as f64;
            }
        }

        Ok(genomes
            .iter()
            .zip(score_sums)
            .map(|(genome, sum)| {
                let accuracy = sum / sectors.len() as f64 * 100.0;
                Fitness::new(accuracy, average_false_positive_rate(genome, &sectors))
            })
            .collect())
    }

    fn retrain(&mut self, epochs: usize) -> Result<()> {
        self.models.train_all(epochs)
    }
}
