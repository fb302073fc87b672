use crate::engines::generation::genome::{Genome, Individual};
use crate::types::Fitness;
use rand::Rng;

/// Tournament selection: pick best of K random candidates
///
/// Individuals without a fitness lose every comparison against evaluated ones.
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual {
    let mut best_idx = rng.gen_range(0..population.len());

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if is_fitter(&population[idx].fitness, &population[best_idx].fitness) {
            best_idx = idx;
        }
    }

    &population[best_idx]
}

fn is_fitter(candidate: &Option<Fitness>, incumbent: &Option<Fitness>) -> bool {
    match (candidate, incumbent) {
        (Some(c), Some(i)) => c.is_better_than(i),
        (Some(_), None) => true,
        _ => false,
    }
}

/// Draw `count` clones by repeated tournaments
pub fn select_offspring<R: Rng>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| tournament_selection(population, tournament_size, rng).clone())
        .collect()
}

/// Two-point crossover: swap the segment between two cut points in place
pub fn two_point_crossover<R: Rng>(parent1: &mut Genome, parent2: &mut Genome, rng: &mut R) {
    let size = parent1.len().min(parent2.len());
    if size < 2 {
        return;
    }

    let mut cx1 = rng.gen_range(1..=size);
    let mut cx2 = rng.gen_range(1..size);
    if cx2 >= cx1 {
        cx2 += 1;
    } else {
        std::mem::swap(&mut cx1, &mut cx2);
    }

    parent1[cx1..cx2].swap_with_slice(&mut parent2[cx1..cx2]);
}

/// Bit-flip mutation: each gene flips independently with probability `gene_flip_probability`
pub fn flip_bit_mutation<R: Rng>(genome: &mut Genome, gene_flip_probability: f64, rng: &mut R) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < gene_flip_probability {
            *gene ^= 1;
        }
    }
}

/// Generate random binary genome
pub fn random_genome<R: Rng>(length: usize, rng: &mut R) -> Genome {
    (0..length).map(|_| rng.gen_range(0..=1u8)).collect()
}
