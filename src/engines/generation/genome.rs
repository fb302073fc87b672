use crate::types::Fitness;
use serde::{Deserialize, Serialize};

/// Genome representation for policy evolution
///
/// A genome is a fixed-length sequence of binary genes (0 or 1). Each gene
/// toggles one security-policy control; the count of enabled controls is the
/// policy's strictness.
///
/// Crossover swaps contiguous segments and mutation flips single bits, so
/// every genome the operators produce is still a valid policy.
pub type Genome = Vec<u8>;

/// Fraction of genes switched on
pub fn strictness(genome: &[u8]) -> f64 {
    if genome.is_empty() {
        return 0.0;
    }
    let enabled = genome.iter().filter(|&&gene| gene != 0).count();
    enabled as f64 / genome.len() as f64
}

/// A genome together with its (possibly stale) fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: Option<Fitness>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Drop the cached fitness after the genes changed
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}
