//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::types::CalculatorOptions;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Validation bounds
    #[serde(default)]
    pub limits: Limits,
    /// Default calculator options, passed by value into each calculation
    #[serde(default)]
    pub calculator: CalculatorOptions,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Bounds applied by the input validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Largest decimal odds accepted; anything above is treated as an input error
    #[serde(default = "default_max_odds")]
    pub max_odds: Decimal,
    /// Largest stake accepted
    #[serde(default = "default_max_stake")]
    pub max_stake: Decimal,
    /// Minimum number of legs in an arbitrage set
    #[serde(default = "default_min_legs")]
    pub min_legs: usize,
    /// Largest number of decimal places the formatter will render
    #[serde(default = "default_max_decimal_places")]
    pub max_decimal_places: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_odds: default_max_odds(),
            max_stake: default_max_stake(),
            min_legs: default_min_legs(),
            max_decimal_places: default_max_decimal_places(),
        }
    }
}

fn default_max_odds() -> Decimal {
    dec!(1000)
}

fn default_max_stake() -> Decimal {
    dec!(1000000000)
}

fn default_min_legs() -> usize {
    2
}

fn default_max_decimal_places() -> u32 {
    10
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Maximum number of calculations kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_capacity() -> usize {
    100
}
