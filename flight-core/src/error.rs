//! Error types for flight-core.

use thiserror::Error;

/// A run or body was configured with values the simulation cannot use.
///
/// Nothing is substituted: invalid input is reported, never defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{0} must be finite")]
    NonFinite(&'static str),

    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),

    #[error("max time must be positive, got {0}")]
    NonPositiveMaxTime(f64),
}

/// Error type for preset and scenario loading.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
