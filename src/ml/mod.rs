pub mod network;
pub mod synthetic;
pub mod training;
pub mod sector_models;
pub mod architecture_search;

pub use network::{PolicyScorer, PolicyScorerConfig};
pub use synthetic::{generate_training_data, TrainingSet};
pub use training::{InferenceBackend, TrainBackend};
pub use sector_models::{SectorModel, SectorModels};
pub use architecture_search::{neural_architecture_search, ArchitectureSearchOutcome, CandidateResult};
