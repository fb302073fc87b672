pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod ml;
pub mod protocol;
pub mod types;

pub use engine::CypherEngine;
pub use error::{CypherError, Result};
pub use types::{Fitness, Sector};
