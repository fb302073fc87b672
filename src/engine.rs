use crate::config::AppConfig;
use crate::engines::evaluation::PolicyFitnessEvaluator;
use crate::engines::generation::{EvolutionEngine, EvolutionOutcome, EvolutionStats, ProgressCallback};
use crate::error::Result;
use crate::ml::{
    generate_training_data, neural_architecture_search, ArchitectureSearchOutcome, PolicyScorer,
    SectorModels, TrainBackend, TrainingSet,
};
use crate::types::Sector;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Offset so data generation and evolution draw from different streams
const DATA_SEED_OFFSET: u64 = 0x5eed;

/// Owns everything that outlives a single command: sector models, the
/// evolution engine and its accumulated statistics.
pub struct CypherEngine {
    config: AppConfig,
    sector_models: SectorModels,
    evolution: EvolutionEngine,
    rng: StdRng,
}

impl CypherEngine {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(DATA_SEED_OFFSET)),
            None => StdRng::from_entropy(),
        };
        let sector_models = SectorModels::new(&config.network, &mut rng);
        let evolution = EvolutionEngine::new(config.evolution.clone());

        log::info!("Cypher AI genetic engine initialized");
        Ok(Self {
            config,
            sector_models,
            evolution,
            rng,
        })
    }

    /// Evolve a population scored by all sector networks.
    pub fn run_evolution(
        &mut self,
        sector: Sector,
        callback: &mut dyn ProgressCallback,
    ) -> Result<EvolutionOutcome> {
        let mut evaluator = PolicyFitnessEvaluator::new(&mut self.sector_models);
        self.evolution.run(sector, &mut evaluator, callback)
    }

    pub fn neural_architecture_search(&mut self, sector: Sector) -> Result<ArchitectureSearchOutcome> {
        let (outcome, candidates) = neural_architecture_search(
            &mut self.sector_models,
            sector,
            &self.config.architecture_search,
            &mut self.rng,
        )?;

        for candidate in &candidates {
            log::info!(
                "   {} candidate {:?}: {:.3} accuracy",
                sector,
                candidate.architecture,
                candidate.accuracy
            );
        }
        Ok(outcome)
    }

    /// Blend sector scorers with parameters trained by an external peer.
    pub fn federated_average(&mut self, updates: &[(Sector, PolicyScorer<TrainBackend>)]) -> Result<()> {
        self.sector_models.federated_average(updates)
    }

    /// A fresh synthetic set; the sector's fixed training set is not replaced.
    pub fn generate_training_data(&mut self, sector: Sector) -> TrainingSet {
        generate_training_data(
            sector,
            self.config.network.samples_per_sector,
            self.config.network.input_size,
            &mut self.rng,
        )
    }

    pub fn sector_models(&self) -> &SectorModels {
        &self.sector_models
    }

    pub fn stats(&self) -> &EvolutionStats {
        self.evolution.stats()
    }
}
