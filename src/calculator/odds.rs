//! Odds-format conversion
//!
//! Bookmakers quote prices as decimal (`2.50`), American (`+150` / `-200`)
//! or fractional (`3/2`). The calculator works in decimal odds only, so
//! everything is converted at the edge.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::engine::{checked_add, checked_div, checked_mul, checked_sub};
use crate::common::errors::{CalculatorError, Result};
use crate::common::traits::NumericInput;

/// Price quotation convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    #[default]
    Decimal,
    American,
    Fractional,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsFormat::Decimal => write!(f, "decimal"),
            OddsFormat::American => write!(f, "american"),
            OddsFormat::Fractional => write!(f, "fractional"),
        }
    }
}

impl FromStr for OddsFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "decimal" | "eu" => Ok(OddsFormat::Decimal),
            "american" | "us" | "moneyline" => Ok(OddsFormat::American),
            "fractional" | "uk" => Ok(OddsFormat::Fractional),
            other => Err(format!("unknown odds format '{}'", other)),
        }
    }
}

/// A reduced fraction such as `5/2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parse a quoted price in `format` into decimal odds
///
/// The result is not range-checked; pass it through the validator like any
/// other odds value.
pub fn parse_odds(text: &str, format: OddsFormat) -> Result<Decimal> {
    let trimmed = text.trim();
    match format {
        OddsFormat::Decimal => trimmed
            .to_decimal()
            .ok_or_else(|| CalculatorError::invalid_odds(trimmed, "not a decimal price")),
        OddsFormat::American => {
            let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
            let line = unsigned
                .to_decimal()
                .ok_or_else(|| CalculatorError::invalid_odds(trimmed, "not an American price"))?;
            american_to_decimal(line)
        }
        OddsFormat::Fractional => {
            if matches!(trimmed.to_lowercase().as_str(), "evens" | "evs" | "even") {
                return Ok(dec!(2));
            }
            let (numerator, denominator) = trimmed
                .split_once('/')
                .ok_or_else(|| CalculatorError::invalid_odds(trimmed, "expected n/d"))?;
            let numerator = numerator
                .to_decimal()
                .filter(|n| *n > Decimal::ZERO)
                .ok_or_else(|| CalculatorError::invalid_odds(trimmed, "numerator must be positive"))?;
            let denominator = denominator
                .to_decimal()
                .filter(|d| *d > Decimal::ZERO)
                .ok_or_else(|| {
                    CalculatorError::invalid_odds(trimmed, "denominator must be positive")
                })?;
            checked_div(numerator, denominator, "fractional odds")
                .and_then(|winnings| checked_add(Decimal::ONE, winnings, "fractional odds"))
                .map_err(|_| CalculatorError::invalid_odds(trimmed, "price out of range"))
        }
    }
}

/// `+150 -> 2.5`, `-200 -> 1.5`. Lines strictly between -100 and +100 do not exist.
pub fn american_to_decimal(line: Decimal) -> Result<Decimal> {
    if line.abs() < dec!(100) {
        return Err(CalculatorError::invalid_odds(
            line,
            "American odds must be at least +100 or at most -100",
        ));
    }

    let winnings = if line > Decimal::ZERO {
        checked_div(line, dec!(100), "american odds")
    } else {
        checked_div(dec!(100), line.abs(), "american odds")
    };
    winnings
        .and_then(|w| checked_add(Decimal::ONE, w, "american odds"))
        .map_err(|_| CalculatorError::invalid_odds(line, "price out of range"))
}

/// Decimal odds as an American line, rounded to two places
pub fn decimal_to_american(odds: Decimal) -> Result<Decimal> {
    let winnings = checked_sub(odds, Decimal::ONE, "american line")?;
    if winnings <= Decimal::ZERO {
        return Err(CalculatorError::invalid_odds(odds, "decimal odds must be greater than 1.0"));
    }

    let line = if odds >= dec!(2) {
        checked_mul(winnings, dec!(100), "american line")?
    } else {
        -checked_div(dec!(100), winnings, "american line")?
    };
    Ok(line.round_dp(2))
}

/// Closest fraction to `odds - 1` with a denominator no larger than `max_denominator`
pub fn decimal_to_fractional(odds: Decimal, max_denominator: u64) -> Result<Fraction> {
    let winnings = odds
        .checked_sub(Decimal::ONE)
        .and_then(|w| w.to_f64())
        .filter(|w| *w > 0.0)
        .ok_or_else(|| CalculatorError::invalid_odds(odds, "decimal odds must be greater than 1.0"))?;

    let mut best = Fraction {
        numerator: 1,
        denominator: 1,
    };
    let mut best_error = f64::MAX;

    for denominator in 1..=max_denominator.max(1) {
        let numerator = (winnings * denominator as f64).round().max(1.0);
        let error = (numerator / denominator as f64 - winnings).abs();
        if error < best_error - f64::EPSILON {
            best_error = error;
            best = Fraction {
                numerator: numerator as u64,
                denominator,
            };
        }
        if best_error < 1e-9 {
            break;
        }
    }

    Ok(best)
}

/// Render decimal odds in the requested format
pub fn format_odds(odds: Decimal, format: OddsFormat) -> Result<String> {
    match format {
        OddsFormat::Decimal => Ok(odds.round_dp(3).normalize().to_string()),
        OddsFormat::American => {
            let line = decimal_to_american(odds)?.normalize();
            if line > Decimal::ZERO {
                Ok(format!("+{}", line))
            } else {
                Ok(line.to_string())
            }
        }
        OddsFormat::Fractional => Ok(decimal_to_fractional(odds, 100)?.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_odds("2.50", OddsFormat::Decimal).unwrap(), dec!(2.5));
        assert_eq!(parse_odds("+150", OddsFormat::American).unwrap(), dec!(2.5));
        assert_eq!(parse_odds("-200", OddsFormat::American).unwrap(), dec!(1.5));
        assert_eq!(parse_odds("100", OddsFormat::American).unwrap(), dec!(2));
        assert_eq!(parse_odds("5/2", OddsFormat::Fractional).unwrap(), dec!(3.5));
        assert_eq!(parse_odds("evens", OddsFormat::Fractional).unwrap(), dec!(2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for (text, format) in [
            ("abc", OddsFormat::Decimal),
            ("+50", OddsFormat::American),
            ("-99", OddsFormat::American),
            ("3/0", OddsFormat::Fractional),
            ("3-1", OddsFormat::Fractional),
            ("0/4", OddsFormat::Fractional),
        ] {
            let err = parse_odds(text, format).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::InvalidOdds, "{} as {}", text, format);
        }
    }

    #[test]
    fn test_parse_huge_prices_is_an_error() {
        let max = Decimal::MAX.to_string();
        for (text, format) in [
            (format!("{}/1", max), OddsFormat::Fractional),
            (format!("{}/0.5", max), OddsFormat::Fractional),
        ] {
            let err = parse_odds(&text, format).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::InvalidOdds, "{} as {}", text, format);
        }

        let err = decimal_to_american(Decimal::MIN).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ComputationOverflow);
    }

    #[test]
    fn test_to_american() {
        assert_eq!(decimal_to_american(dec!(2.5)).unwrap(), dec!(150));
        assert_eq!(decimal_to_american(dec!(1.5)).unwrap(), dec!(-200));
        assert_eq!(decimal_to_american(dec!(1.91)).unwrap(), dec!(-109.89));
        assert!(decimal_to_american(dec!(1)).is_err());
    }

    #[test]
    fn test_to_fractional() {
        assert_eq!(
            decimal_to_fractional(dec!(3.5), 100).unwrap(),
            Fraction { numerator: 5, denominator: 2 }
        );
        assert_eq!(
            decimal_to_fractional(dec!(1.8), 100).unwrap(),
            Fraction { numerator: 4, denominator: 5 }
        );
        assert_eq!(decimal_to_fractional(dec!(11), 100).unwrap().to_string(), "10/1");
    }

    #[test]
    fn test_format_odds() {
        assert_eq!(format_odds(dec!(2.5), OddsFormat::American).unwrap(), "+150");
        assert_eq!(format_odds(dec!(1.5), OddsFormat::American).unwrap(), "-200");
        assert_eq!(format_odds(dec!(3.5), OddsFormat::Fractional).unwrap(), "5/2");
        assert_eq!(format_odds(dec!(2.1000), OddsFormat::Decimal).unwrap(), "2.1");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("US".parse::<OddsFormat>(), Ok(OddsFormat::American));
        assert_eq!("fractional".parse::<OddsFormat>(), Ok(OddsFormat::Fractional));
        assert!("asian".parse::<OddsFormat>().is_err());
    }
}
