use thiserror::Error;

#[derive(Error, Debug)]
pub enum CypherError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    #[error("Evolution error: {0}")]
    Evolution(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CypherError>;
