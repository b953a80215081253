//! Trait definitions for raw numeric input

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Anything a caller may hand the validator as a number
///
/// Form fields arrive as text, programmatic callers pass floats, and chained
/// calculations pass decimals. Implementations return `None` when the value
/// is not a finite number; they never panic.
pub trait NumericInput {
    /// Convert to a decimal, or `None` if not a finite number
    fn to_decimal(&self) -> Option<Decimal>;

    /// Human-readable rendering of the raw value for error messages
    fn describe(&self) -> String;
}

impl NumericInput for f64 {
    fn to_decimal(&self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f64(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl NumericInput for f32 {
    fn to_decimal(&self) -> Option<Decimal> {
        if !self.is_finite() {
            return None;
        }
        Decimal::from_f32(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl NumericInput for Decimal {
    fn to_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl NumericInput for &str {
    fn to_decimal(&self) -> Option<Decimal> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal::from_str(trimmed)
            .ok()
            .or_else(|| Decimal::from_scientific(trimmed).ok())
    }

    fn describe(&self) -> String {
        format!("'{}'", self)
    }
}

impl NumericInput for &String {
    fn to_decimal(&self) -> Option<Decimal> {
        self.as_str().to_decimal()
    }

    fn describe(&self) -> String {
        self.as_str().describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_float_conversion() {
        assert_eq!(2.1_f64.to_decimal(), Some(dec!(2.1)));
        assert_eq!(f64::NAN.to_decimal(), None);
        assert_eq!(f64::INFINITY.to_decimal(), None);
        assert_eq!(f32::NEG_INFINITY.to_decimal(), None);
    }

    #[test]
    fn test_text_conversion() {
        assert_eq!(" 2.50 ".to_decimal(), Some(dec!(2.50)));
        assert_eq!("1e3".to_decimal(), Some(dec!(1000)));
        assert_eq!("".to_decimal(), None);
        assert_eq!("abc".to_decimal(), None);
        assert_eq!("NaN".to_decimal(), None);
        assert_eq!("abc".describe(), "'abc'");
    }
}
