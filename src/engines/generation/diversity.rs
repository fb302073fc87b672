use crate::engines::generation::genome::Genome;

/// Number of positions where two genomes differ
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Mean pairwise Hamming distance normalized by genome length.
///
/// Returns 0.0 for populations smaller than two or zero-length genomes.
pub fn population_diversity(genomes: &[&Genome]) -> f64 {
    if genomes.len() < 2 {
        return 0.0;
    }

    let genome_length = genomes[0].len();
    if genome_length == 0 {
        return 0.0;
    }

    let mut total_distance = 0usize;
    let mut comparisons = 0usize;

    for i in 0..genomes.len() {
        for j in (i + 1)..genomes.len() {
            total_distance += hamming_distance(genomes[i], genomes[j]);
            comparisons += 1;
        }
    }

    (total_distance as f64 / comparisons as f64) / genome_length as f64
}
