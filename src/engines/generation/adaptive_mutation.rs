use crate::config::AdaptiveMutationConfig;

/// Per-gene flip probability for the next generation.
///
/// Low diversity raises the rate to escape convergence, high diversity lowers
/// it to let selection consolidate.
pub fn adapt_gene_flip_probability(diversity: f64, config: &AdaptiveMutationConfig) -> f64 {
    if diversity < config.low_diversity_threshold {
        config.low_diversity_rate
    } else if diversity > config.high_diversity_threshold {
        config.high_diversity_rate
    } else {
        config.normal_rate
    }
}
