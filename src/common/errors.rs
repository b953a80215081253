//! Error types for the calculation engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using our CalculatorError
pub type Result<T> = std::result::Result<T, CalculatorError>;

/// Main error type for calculator operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    /// Odds value is non-numeric, <= 1.0, or outside the accepted range
    #[error("Invalid odds {value}: {reason}")]
    InvalidOdds { value: String, reason: String },

    /// Stake is non-numeric, <= 0, or above the configured maximum
    #[error("Invalid stake {value}: {reason}")]
    InvalidStake { value: String, reason: String },

    /// Fewer than two outcome legs supplied
    #[error("Insufficient legs: {count} supplied, at least {required} required")]
    InsufficientLegs { count: usize, required: usize },

    /// A leg is malformed for a reason other than its odds
    #[error("Invalid leg at index {index}: {reason}")]
    InvalidLeg { index: usize, reason: String },

    /// Probability outside the open interval (0, 1)
    #[error("Invalid probability {value}: {reason}")]
    InvalidProbability { value: String, reason: String },

    /// Calculator options out of range
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// An intermediate or final value overflowed
    #[error("Computation overflow: {0}")]
    ComputationOverflow(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CalculatorError {
    pub fn invalid_odds(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidOdds {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_stake(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidStake {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn overflow(step: impl Into<String>) -> Self {
        Self::ComputationOverflow(step.into())
    }

    /// Classify the error for callers that map kinds to their own messages
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOdds { .. } => ErrorKind::InvalidOdds,
            Self::InvalidStake { .. } => ErrorKind::InvalidStake,
            Self::InsufficientLegs { .. } => ErrorKind::InsufficientLegs,
            Self::InvalidLeg { .. } => ErrorKind::InvalidLeg,
            Self::InvalidProbability { .. } => ErrorKind::InvalidProbability,
            Self::InvalidOptions(_) => ErrorKind::InvalidOptions,
            Self::ComputationOverflow(_) => ErrorKind::ComputationOverflow,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

/// Stable, developer-facing error identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidOdds,
    InvalidStake,
    InsufficientLegs,
    InvalidLeg,
    InvalidProbability,
    InvalidOptions,
    ComputationOverflow,
    Configuration,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidOdds => "InvalidOdds",
            ErrorKind::InvalidStake => "InvalidStake",
            ErrorKind::InsufficientLegs => "InsufficientLegs",
            ErrorKind::InvalidLeg => "InvalidLeg",
            ErrorKind::InvalidProbability => "InvalidProbability",
            ErrorKind::InvalidOptions => "InvalidOptions",
            ErrorKind::ComputationOverflow => "ComputationOverflow",
            ErrorKind::Configuration => "Configuration",
            ErrorKind::Serialization => "Serialization",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<config::ConfigError> for CalculatorError {
    fn from(err: config::ConfigError) -> Self {
        CalculatorError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for CalculatorError {
    fn from(err: serde_json::Error) -> Self {
        CalculatorError::Serialization(err.to_string())
    }
}
