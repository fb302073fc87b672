pub mod genome;
pub mod operators;
pub mod hall_of_fame;
pub mod diversity;
pub mod adaptive_mutation;
pub mod stats;
pub mod progress;
pub mod evolution_engine;

pub use genome::{Genome, Individual};
pub use hall_of_fame::{HallOfFame, EliteGenome};
pub use evolution_engine::{EvolutionEngine, EvolutionOutcome};
pub use progress::{
    ChannelProgressCallback, GenerationReport, LogProgressCallback, ProgressCallback,
};
pub use stats::EvolutionStats;
pub use diversity::population_diversity;
pub use adaptive_mutation::adapt_gene_flip_probability;
