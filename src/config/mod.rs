pub mod traits;
pub mod evolution;
pub mod network;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, AdaptiveMutationConfig};
pub use network::{NetworkConfig, ArchitectureSearchConfig};
pub use traits::ConfigSection;
