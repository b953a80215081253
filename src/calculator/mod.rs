//! Calculator module for arbitrage and value-bet maths
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CalculatorInput (legs + stake mode + options)              │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  Validator                                                  │
//! │    - odds finite, > 1.0, <= max_odds                        │
//! │    - stake finite, > 0, <= max_stake                        │
//! │    - at least two legs, options in range                    │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  compute()                                                  │
//! │    - implied probabilities, equal-payout stakes             │
//! │    - fees / taxes, profit, ROI  (never rounds)              │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  format_result()                                            │
//! │    - rounding mode at decimal_places, display only          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Validator`]: rejects malformed input with a [`ValidationResult`]
//! - [`ArbitrageCalculator`]: validates then computes a [`CalculatorResult`]
//! - [`format_result`]: rounded [`DisplayResult`] for presentation
//! - [`ValueBet`], [`fair_market`]: expected value against a true probability
//! - [`HistoryStore`]: storage seam for saved calculations
//! - [`RecalcSequencer`]: last-write-wins tickets for debounced callers
//!
//! # Example
//!
//! ```
//! use arbcalc::calculator::{format_result, ArbitrageCalculator};
//! use arbcalc::{CalculatorOptions, OddsLeg};
//!
//! let calculator = ArbitrageCalculator::default();
//! let result = calculator
//!     .calculate_total(&[OddsLeg::new("alpha", 2.1), OddsLeg::new("beta", 2.2)], 1000.0)
//!     .unwrap();
//!
//! assert!(result.is_arbitrage);
//! let display = format_result(&result, &CalculatorOptions::default());
//! assert_eq!(display.profit.to_string(), "74.42");
//! ```
//!
//! [`CalculatorResult`]: crate::common::types::CalculatorResult

mod adjustments;
mod engine;
mod formatter;
mod history;
mod odds;
mod sequencer;
mod validation;
mod value;

pub use adjustments::{apply_adjustments, commission_adjusted_odds, Adjustments};

pub use engine::{calculate, compute, implied_probability, total_implied_probability, ArbitrageCalculator};

pub use formatter::{format_result, rounding_tolerance, DisplayLeg, DisplayResult};

pub use history::{BoxedHistoryStore, CalculationRecord, HistoryStore, InMemoryHistory};

pub use odds::{
    american_to_decimal, decimal_to_american, decimal_to_fractional, format_odds, parse_odds,
    Fraction, OddsFormat,
};

pub use sequencer::{Generation, RecalcSequencer};

pub use validation::{
    validate_limits, validate_options, Sizing, ValidLeg, ValidatedInput, ValidationResult,
    Validator, MAX_SCALE, MIN_LEGS,
};

pub use value::{expected_value, fair_market, kelly_fraction, FairMarket, ValueBet};
