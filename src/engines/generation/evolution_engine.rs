use crate::config::EvolutionConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    adaptive_mutation::adapt_gene_flip_probability,
    diversity::population_diversity,
    genome::{Genome, Individual},
    hall_of_fame::HallOfFame,
    operators::{flip_bit_mutation, random_genome, select_offspring, two_point_crossover},
    progress::{GenerationReport, ProgressCallback},
    stats::{accuracy_summary, EvolutionStats},
};
use crate::error::{CypherError, Result};
use crate::types::{Fitness, Sector};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Result of one evolution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub best_individual: Genome,
    pub fitness: Fitness,
    pub generation: usize,
    pub hall_of_fame: Vec<Genome>,
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    stats: EvolutionStats,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            stats: EvolutionStats::new(),
            rng,
        }
    }

    /// Run the evolution process
    pub fn run(
        &mut self,
        sector: Sector,
        evaluator: &mut dyn FitnessEvaluator,
        callback: &mut dyn ProgressCallback,
    ) -> Result<EvolutionOutcome> {
        log::info!("Starting evolution for sector: {}", sector);

        let mut population = self.initialize_population();
        let mut hall_of_fame = HallOfFame::new(self.config.hall_of_fame_size);
        let mut gene_flip_probability = self.config.adaptive_mutation.normal_rate;
        let mut generation = 0;

        for current in 0..self.config.max_generations {
            generation = current;
            callback.on_generation_start(generation);

            self.evaluate_population(&mut population, evaluator)?;
            hall_of_fame.update(&population);

            let (best_fitness, avg_fitness) = accuracy_summary(&population);
            let genomes: Vec<&Genome> = population.iter().map(|ind| &ind.genome).collect();
            let diversity = population_diversity(&genomes);
            self.stats.record(best_fitness, avg_fitness, diversity);

            callback.on_generation_complete(&GenerationReport {
                sector,
                generation,
                best_fitness,
                avg_fitness,
                diversity,
                population_size: population.len(),
            })?;

            if best_fitness >= self.config.target_fitness {
                log::info!(
                    "Target fitness {}% reached in generation {}",
                    self.config.target_fitness,
                    generation
                );
                break;
            }

            // Check termination
            if generation == self.config.max_generations - 1 {
                break;
            }

            population = self.create_next_generation(&population, gene_flip_probability);

            if generation % self.config.training_interval == 0 {
                log::info!("Training neural networks at generation {}", generation);
                evaluator.retrain(self.config.training_epochs)?;
                callback.on_networks_retrained(generation);
            }

            gene_flip_probability =
                adapt_gene_flip_probability(diversity, &self.config.adaptive_mutation);
        }

        let best = hall_of_fame.best().ok_or_else(|| {
            CypherError::Evolution("Hall of fame is empty after evolution".to_string())
        })?;
        let fitness = evaluator
            .evaluate(&[&best.genome])?
            .into_iter()
            .next()
            .ok_or_else(|| CypherError::Evolution("Evaluator returned no fitness".to_string()))?;

        log::info!(
            "Evolution completed for {}: best fitness {:.2}%, false positive rate {:.3}",
            sector,
            fitness.accuracy,
            fitness.false_positive_rate
        );

        Ok(EvolutionOutcome {
            best_individual: best.genome.clone(),
            fitness,
            generation,
            hall_of_fame: hall_of_fame.genomes(),
        })
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        (0..self.config.population_size)
            .map(|_| Individual::new(random_genome(self.config.genome_length, &mut self.rng)))
            .collect()
    }

    /// Every individual is rescored: network weights may have moved since
    /// the cached fitness was computed.
    fn evaluate_population(
        &mut self,
        population: &mut [Individual],
        evaluator: &mut dyn FitnessEvaluator,
    ) -> Result<()> {
        let genomes: Vec<&Genome> = population.iter().map(|ind| &ind.genome).collect();
        let fitnesses = evaluator.evaluate(&genomes)?;

        if fitnesses.len() != population.len() {
            return Err(CypherError::Evolution(format!(
                "Evaluator returned {} fitness values for {} individuals",
                fitnesses.len(),
                population.len()
            )));
        }

        for (individual, fitness) in population.iter_mut().zip(fitnesses) {
            individual.fitness = Some(fitness);
        }
        Ok(())
    }

    fn create_next_generation(
        &mut self,
        population: &[Individual],
        gene_flip_probability: f64,
    ) -> Vec<Individual> {
        let mut offspring = select_offspring(
            population,
            population.len(),
            self.config.tournament_size,
            &mut self.rng,
        );

        // Crossover on adjacent pairs
        for pair in offspring.chunks_exact_mut(2) {
            if self.rng.gen::<f64>() < self.config.crossover_probability {
                let (first, second) = pair.split_at_mut(1);
                two_point_crossover(&mut first[0].genome, &mut second[0].genome, &mut self.rng);
                first[0].invalidate();
                second[0].invalidate();
            }
        }

        // Mutation
        for mutant in offspring.iter_mut() {
            if self.rng.gen::<f64>() < self.config.mutation_probability {
                flip_bit_mutation(&mut mutant.genome, gene_flip_probability, &mut self.rng);
                mutant.invalidate();
            }
        }

        offspring
    }

    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }
}
