use crate::engines::generation::genome::Individual;
use serde::{Deserialize, Serialize};

/// Append-only per-generation history, kept for the lifetime of the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    pub best_fitness: Vec<f64>,
    pub avg_fitness: Vec<f64>,
    pub diversity: Vec<f64>,
}

impl EvolutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, best_fitness: f64, avg_fitness: f64, diversity: f64) {
        self.best_fitness.push(best_fitness);
        self.avg_fitness.push(avg_fitness);
        self.diversity.push(diversity);
    }

    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Best and mean accuracy (first fitness component) of the evaluated individuals
pub fn accuracy_summary(population: &[Individual]) -> (f64, f64) {
    let accuracies: Vec<f64> = population
        .iter()
        .filter_map(|ind| ind.fitness.map(|f| f.accuracy))
        .collect();

    if accuracies.is_empty() {
        return (0.0, 0.0);
    }

    let best = accuracies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = accuracies.iter().sum::<f64>() / accuracies.len() as f64;
    (best, avg)
}
