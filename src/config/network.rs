use super::traits::{ensure_probability, ConfigSection};
use crate::error::{CypherError, Result};
use serde::{Deserialize, Serialize};

/// Shape and training settings for the per-sector policy scorers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub dropout: f64,
    pub learning_rate: f64,
    pub samples_per_sector: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_size: 64,
            hidden_sizes: vec![128, 64, 32],
            dropout: 0.2,
            learning_rate: 0.001,
            samples_per_sector: 1000,
        }
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            return Err(CypherError::Configuration(
                "Network input size must be positive".to_string(),
            ));
        }
        validate_architecture(&self.hidden_sizes)?;
        ensure_probability(Self::section_name(), "dropout", self.dropout)?;
        if self.learning_rate <= 0.0 {
            return Err(CypherError::Configuration(
                "Learning rate must be positive".to_string(),
            ));
        }
        if self.samples_per_sector == 0 {
            return Err(CypherError::Configuration(
                "Samples per sector must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchitectureSearchConfig {
    pub candidates: Vec<Vec<usize>>,
    pub epochs: usize,
}

impl Default for ArchitectureSearchConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                vec![64, 32],
                vec![128, 64, 32],
                vec![256, 128, 64, 32],
                vec![128, 64],
                vec![64, 32, 16],
            ],
            epochs: 20,
        }
    }
}

impl ConfigSection for ArchitectureSearchConfig {
    fn section_name() -> &'static str {
        "architecture_search"
    }

    fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(CypherError::Configuration(
                "Architecture search needs at least one candidate".to_string(),
            ));
        }
        for candidate in &self.candidates {
            validate_architecture(candidate)?;
        }
        Ok(())
    }
}

fn validate_architecture(hidden_sizes: &[usize]) -> Result<()> {
    if hidden_sizes.is_empty() {
        return Err(CypherError::Configuration(
            "Architecture must have at least one hidden layer".to_string(),
        ));
    }
    if hidden_sizes.contains(&0) {
        return Err(CypherError::Configuration(format!(
            "Hidden layer widths must be positive: {:?}",
            hidden_sizes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_menu() {
        let config = ArchitectureSearchConfig::default();
        assert_eq!(config.candidates.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_width_layer() {
        let config = NetworkConfig {
            hidden_sizes: vec![64, 0],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
