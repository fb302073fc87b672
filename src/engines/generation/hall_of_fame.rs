use crate::engines::generation::genome::{Genome, Individual};
use crate::types::Fitness;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A genome archived with the fitness it had when it entered the hall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliteGenome {
    pub genome: Genome,
    pub fitness: Fitness,
}

/// Bounded archive of the best distinct genomes seen, ordered best-first
pub struct HallOfFame {
    members: Vec<EliteGenome>,
    max_size: usize,
    seen_genomes: HashSet<Genome>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            members: Vec::with_capacity(max_size + 1),
            max_size,
            seen_genomes: HashSet::new(),
        }
    }

    /// Offer every evaluated individual of a generation
    pub fn update(&mut self, population: &[Individual]) {
        for individual in population {
            if let Some(fitness) = individual.fitness {
                self.try_add(&individual.genome, fitness);
            }
        }
    }

    /// Attempt to add a genome to the Hall of Fame
    pub fn try_add(&mut self, genome: &Genome, fitness: Fitness) -> bool {
        if self.max_size == 0 || self.seen_genomes.contains(genome) {
            return false; // Duplicate, reject
        }

        // Full and not better than the current worst
        if self.members.len() >= self.max_size {
            match self.members.last() {
                Some(worst) if !fitness.is_better_than(&worst.fitness) => return false,
                _ => {}
            }
        }

        // Insert after members at least as fit to keep the order stable
        let position = self
            .members
            .iter()
            .position(|m| fitness.compare(&m.fitness) == Ordering::Greater)
            .unwrap_or(self.members.len());
        self.members.insert(
            position,
            EliteGenome {
                genome: genome.clone(),
                fitness,
            },
        );
        self.seen_genomes.insert(genome.clone());

        while self.members.len() > self.max_size {
            if let Some(removed) = self.members.pop() {
                self.seen_genomes.remove(&removed.genome);
            }
        }

        true
    }

    pub fn best(&self) -> Option<&EliteGenome> {
        self.members.first()
    }

    pub fn genomes(&self) -> Vec<Genome> {
        self.members.iter().map(|m| m.genome.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
