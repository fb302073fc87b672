use crate::error::CypherError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Regulatory domain with its own scorer network and training set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sector {
    Ferpa,  // Education records
    Fisma,  // Federal systems
    Cipa,   // School internet filtering
    #[default]
    General,
}

impl Sector {
    pub const ALL: [Sector; 4] = [Sector::Ferpa, Sector::Fisma, Sector::Cipa, Sector::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Ferpa => "FERPA",
            Sector::Fisma => "FISMA",
            Sector::Cipa => "CIPA",
            Sector::General => "GENERAL",
        }
    }

    /// Scales the base false-positive estimate for this sector
    pub fn false_positive_multiplier(&self) -> f64 {
        match self {
            Sector::Ferpa => 0.8,
            Sector::Fisma => 0.6,
            Sector::Cipa => 0.9,
            Sector::General => 0.7,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = CypherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FERPA" => Ok(Sector::Ferpa),
            "FISMA" => Ok(Sector::Fisma),
            "CIPA" => Ok(Sector::Cipa),
            "GENERAL" => Ok(Sector::General),
            other => Err(CypherError::UnknownSector(other.to_string())),
        }
    }
}

/// Two-objective fitness: maximize accuracy, minimize false positives.
///
/// Serialized as a `[accuracy, false_positive_rate]` pair on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Fitness {
    pub accuracy: f64,
    pub false_positive_rate: f64,
}

impl Fitness {
    pub fn new(accuracy: f64, false_positive_rate: f64) -> Self {
        Self {
            accuracy,
            false_positive_rate,
        }
    }

    /// Lexicographic comparison on weighted values (+accuracy, -fp rate).
    /// `Greater` means `self` is the fitter of the two.
    pub fn compare(&self, other: &Fitness) -> Ordering {
        match self.accuracy.partial_cmp(&other.accuracy) {
            Some(Ordering::Equal) | None => other
                .false_positive_rate
                .partial_cmp(&self.false_positive_rate)
                .unwrap_or(Ordering::Equal),
            Some(ordering) => ordering,
        }
    }

    pub fn is_better_than(&self, other: &Fitness) -> bool {
        self.compare(other) == Ordering::Greater
    }
}

impl From<(f64, f64)> for Fitness {
    fn from((accuracy, false_positive_rate): (f64, f64)) -> Self {
        Fitness::new(accuracy, false_positive_rate)
    }
}

impl From<Fitness> for (f64, f64) {
    fn from(fitness: Fitness) -> Self {
        (fitness.accuracy, fitness.false_positive_rate)
    }
}
