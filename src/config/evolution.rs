use super::traits::{ensure_probability, ConfigSection};
use crate::error::{CypherError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub max_generations: usize,
    pub target_fitness: f64,
    pub tournament_size: usize,
    pub crossover_probability: f64,
    pub mutation_probability: f64, // Chance an individual is mutated at all
    pub hall_of_fame_size: usize,
    pub training_interval: usize,
    pub training_epochs: usize,
    pub adaptive_mutation: AdaptiveMutationConfig,
    pub seed: Option<u64>,
}

/// Per-gene flip probability schedule driven by population diversity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveMutationConfig {
    pub low_diversity_threshold: f64,
    pub high_diversity_threshold: f64,
    pub low_diversity_rate: f64,
    pub high_diversity_rate: f64,
    pub normal_rate: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            genome_length: 64,
            max_generations: 1000,
            target_fitness: 99.2,
            tournament_size: 3,
            crossover_probability: 0.8,
            mutation_probability: 0.1,
            hall_of_fame_size: 10,
            training_interval: 10,
            training_epochs: 10,
            adaptive_mutation: AdaptiveMutationConfig::default(),
            seed: None,
        }
    }
}

impl Default for AdaptiveMutationConfig {
    fn default() -> Self {
        Self {
            low_diversity_threshold: 0.1,
            high_diversity_threshold: 0.5,
            low_diversity_rate: 0.15,
            high_diversity_rate: 0.05,
            normal_rate: 0.1,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(CypherError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.genome_length == 0 {
            return Err(CypherError::Configuration(
                "Genome length must be positive".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(CypherError::Configuration(
                "Generation budget must be positive".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(CypherError::Configuration(
                "Tournament size must be positive".to_string(),
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(CypherError::Configuration(
                "Hall of fame size must be positive".to_string(),
            ));
        }
        if self.training_interval == 0 {
            return Err(CypherError::Configuration(
                "Training interval must be positive".to_string(),
            ));
        }

        let section = Self::section_name();
        ensure_probability(section, "crossover_probability", self.crossover_probability)?;
        ensure_probability(section, "mutation_probability", self.mutation_probability)?;

        let adaptive = &self.adaptive_mutation;
        ensure_probability(section, "adaptive_mutation.low_diversity_rate", adaptive.low_diversity_rate)?;
        ensure_probability(section, "adaptive_mutation.high_diversity_rate", adaptive.high_diversity_rate)?;
        ensure_probability(section, "adaptive_mutation.normal_rate", adaptive.normal_rate)?;
        if adaptive.low_diversity_threshold > adaptive.high_diversity_threshold {
            return Err(CypherError::Configuration(
                "Low diversity threshold must not exceed the high threshold".to_string(),
            ));
        }
        Ok(())
    }
}
