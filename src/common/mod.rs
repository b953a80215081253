//! Common module - types, traits and errors shared across the crate

pub mod errors;
pub mod traits;
pub mod types;

pub use errors::{CalculatorError, ErrorKind, Result};
pub use traits::NumericInput;
pub use types::{
    CalculatorInput, CalculatorOptions, CalculatorResult, LegStake, OddsLeg, RoundingMode,
    StakeMode,
};
