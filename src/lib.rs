//! Arbcalc Library
//!
//! Sports-betting arbitrage and expected-value calculations: equal-payout
//! stake distribution across bookmakers, fee/tax adjustment, odds-format
//! conversion and value-bet evaluation.

pub mod calculator;
pub mod common;
pub mod config;

// Re-export commonly used types
pub use common::errors::{CalculatorError, ErrorKind, Result};
pub use common::traits::NumericInput;
pub use common::types::{
    CalculatorInput, CalculatorOptions, CalculatorResult, LegStake, OddsLeg, RoundingMode,
    StakeMode,
};
pub use config::types::{AppConfig, Limits};

// Calculator types
pub use calculator::{
    calculate, format_result, ArbitrageCalculator, CalculationRecord, DisplayResult,
    HistoryStore, InMemoryHistory, OddsFormat, RecalcSequencer, ValidationResult, Validator,
    ValueBet,
};
