use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{CalculatorError, ErrorKind, Result};
use crate::common::traits::NumericInput;
use crate::common::types::{CalculatorInput, CalculatorOptions, OddsLeg, StakeMode};
use crate::config::types::Limits;

/// Outcome of validating one input
///
/// Validators never panic and never return `Err` directly; callers branch on
/// [`ValidationResult::is_valid`] or convert with [`ValidationResult::into_result`]
/// where `?` is more convenient.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult<T> {
    outcome: std::result::Result<T, CalculatorError>,
}

impl<T> ValidationResult<T> {
    pub fn valid(value: T) -> Self {
        Self { outcome: Ok(value) }
    }

    pub fn invalid(error: CalculatorError) -> Self {
        Self {
            outcome: Err(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The cleaned-up value, present only when valid
    pub fn sanitized_value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&CalculatorError> {
        self.outcome.as_ref().err()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(CalculatorError::kind)
    }

    pub fn into_result(self) -> Result<T> {
        self.outcome
    }
}

impl<T> From<Result<T>> for ValidationResult<T> {
    fn from(outcome: Result<T>) -> Self {
        Self { outcome }
    }
}

/// A leg whose odds passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidLeg {
    pub index: usize,
    pub bookmaker: String,
    pub market: Option<String>,
    pub outcome: Option<String>,
    pub odds: Decimal,
}

/// How the stake is applied once validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    Total(Decimal),
    FixedLeg { index: usize, stake: Decimal },
}

/// Fully validated calculator input
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub legs: Vec<ValidLeg>,
    pub sizing: Sizing,
    pub options: CalculatorOptions,
}

/// An arbitrage needs every outcome covered, and a market has at least two
pub const MIN_LEGS: usize = 2;

/// Largest scale a `Decimal` can carry
pub const MAX_SCALE: u32 = 28;

/// Input validator bound to a set of [`Limits`]
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: Limits,
}

impl Validator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Minimum leg count actually enforced; never below two
    pub fn min_legs(&self) -> usize {
        self.limits.min_legs.max(MIN_LEGS)
    }

    /// Decimal odds must be finite, strictly above 1.0 and no larger than `max_odds`
    pub fn validate_odds(&self, value: impl NumericInput) -> ValidationResult<Decimal> {
        let Some(odds) = value.to_decimal() else {
            return ValidationResult::invalid(CalculatorError::invalid_odds(
                value.describe(),
                "not a finite number",
            ));
        };

        if odds <= Decimal::ONE {
            return ValidationResult::invalid(CalculatorError::invalid_odds(
                value.describe(),
                "decimal odds must be greater than 1.0",
            ));
        }

        if odds > self.limits.max_odds {
            return ValidationResult::invalid(CalculatorError::invalid_odds(
                value.describe(),
                format!("exceeds maximum of {}", self.limits.max_odds),
            ));
        }

        ValidationResult::valid(odds.normalize())
    }

    /// Stakes must be finite, positive and no larger than `max_stake`
    pub fn validate_stake(&self, value: impl NumericInput) -> ValidationResult<Decimal> {
        let Some(stake) = value.to_decimal() else {
            return ValidationResult::invalid(CalculatorError::invalid_stake(
                value.describe(),
                "not a finite number",
            ));
        };

        if stake <= Decimal::ZERO {
            return ValidationResult::invalid(CalculatorError::invalid_stake(
                value.describe(),
                "stake must be greater than zero",
            ));
        }

        if stake > self.limits.max_stake {
            return ValidationResult::invalid(CalculatorError::invalid_stake(
                value.describe(),
                format!("exceeds maximum of {}", self.limits.max_stake),
            ));
        }

        ValidationResult::valid(stake.normalize())
    }

    /// A leg set needs at least [`Validator::min_legs`] legs, each with a bookmaker and valid odds
    pub fn validate_leg_set(&self, legs: &[OddsLeg]) -> ValidationResult<Vec<ValidLeg>> {
        let required = self.min_legs();
        if legs.len() < required {
            return ValidationResult::invalid(CalculatorError::InsufficientLegs {
                count: legs.len(),
                required,
            });
        }

        let mut valid = Vec::with_capacity(legs.len());
        for (index, leg) in legs.iter().enumerate() {
            let bookmaker = leg.bookmaker.trim();
            if bookmaker.is_empty() {
                return ValidationResult::invalid(CalculatorError::InvalidLeg {
                    index,
                    reason: "bookmaker must not be empty".to_string(),
                });
            }

            let odds = match self.validate_odds(leg.odds).into_result() {
                Ok(odds) => odds,
                Err(CalculatorError::InvalidOdds { value, reason }) => {
                    return ValidationResult::invalid(CalculatorError::InvalidOdds {
                        value,
                        reason: format!("leg {} ({}): {}", index, bookmaker, reason),
                    });
                }
                Err(other) => return ValidationResult::invalid(other),
            };

            valid.push(ValidLeg {
                index,
                bookmaker: bookmaker.to_string(),
                market: leg.market.clone(),
                outcome: leg.outcome.clone(),
                odds,
            });
        }

        ValidationResult::valid(valid)
    }

    /// Rates must lie in `0..=1` and precision within `max_decimal_places`
    pub fn validate_options(&self, options: &CalculatorOptions) -> ValidationResult<CalculatorOptions> {
        validate_options(options, &self.limits)
    }

    /// Probabilities must lie strictly between 0 and 1
    pub fn validate_probability(&self, value: impl NumericInput) -> ValidationResult<Decimal> {
        match value.to_decimal() {
            Some(p) if p > Decimal::ZERO && p < Decimal::ONE => ValidationResult::valid(p.normalize()),
            Some(_) => ValidationResult::invalid(CalculatorError::InvalidProbability {
                value: value.describe(),
                reason: "probability must be between 0 and 1 exclusive".to_string(),
            }),
            None => ValidationResult::invalid(CalculatorError::InvalidProbability {
                value: value.describe(),
                reason: "not a finite number".to_string(),
            }),
        }
    }

    /// Validate every part of a calculator input
    pub fn validate_input(&self, input: &CalculatorInput) -> Result<ValidatedInput> {
        let legs = self.validate_leg_set(&input.legs).into_result()?;
        let options = self.validate_options(&input.options).into_result()?;

        let sizing = match input.stake {
            StakeMode::Total { amount } => Sizing::Total(self.validate_stake(amount).into_result()?),
            StakeMode::FixedLeg { index, stake } => {
                if index >= legs.len() {
                    return Err(CalculatorError::InvalidLeg {
                        index,
                        reason: format!("fixed stake refers to a leg outside 0..{}", legs.len()),
                    });
                }
                Sizing::FixedLeg {
                    index,
                    stake: self.validate_stake(stake).into_result()?,
                }
            }
        };

        Ok(ValidatedInput {
            legs,
            sizing,
            options,
        })
    }
}

/// Limits must describe a usable range: `min_legs >= 2`, `max_odds > 1`,
/// `max_stake > 0` and a display precision that fits a `Decimal` with the
/// two extra places used for ratios.
pub fn validate_limits(limits: &Limits) -> ValidationResult<Limits> {
    if limits.min_legs < MIN_LEGS {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "min_legs {} must be at least {}",
            limits.min_legs, MIN_LEGS
        )));
    }
    if limits.max_odds <= Decimal::ONE {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "max_odds {} must be greater than 1",
            limits.max_odds
        )));
    }
    if limits.max_stake <= Decimal::ZERO {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "max_stake {} must be greater than 0",
            limits.max_stake
        )));
    }
    if limits.max_decimal_places > MAX_SCALE - 2 {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "max_decimal_places {} exceeds {}",
            limits.max_decimal_places,
            MAX_SCALE - 2
        )));
    }

    ValidationResult::valid(limits.clone())
}

pub fn validate_options(
    options: &CalculatorOptions,
    limits: &Limits,
) -> ValidationResult<CalculatorOptions> {
    let unit = Decimal::ZERO..=Decimal::ONE;

    if !unit.contains(&options.fee_rate) {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "fee_rate {} must be between 0 and 1",
            options.fee_rate
        )));
    }
    if !unit.contains(&options.tax_rate) {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "tax_rate {} must be between 0 and 1",
            options.tax_rate
        )));
    }
    if options.decimal_places > limits.max_decimal_places {
        return ValidationResult::invalid(CalculatorError::InvalidOptions(format!(
            "decimal_places {} exceeds maximum of {}",
            options.decimal_places, limits.max_decimal_places
        )));
    }

    ValidationResult::valid(options.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn validator() -> Validator {
        Validator::default()
    }

    #[test]
    fn test_odds_accepted() {
        let result = validator().validate_odds(2.1);
        assert!(result.is_valid());
        assert_eq!(result.sanitized_value(), Some(&dec!(2.1)));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_odds_rejected() {
        for raw in [1.0, 0.0, -2.0, f64::NAN, f64::INFINITY, 1000.01] {
            let result = validator().validate_odds(raw);
            assert!(!result.is_valid(), "{} should be rejected", raw);
            assert!(result.sanitized_value().is_none());
            assert_eq!(result.error_kind(), Some(ErrorKind::InvalidOdds));
        }
    }

    #[test]
    fn test_odds_upper_bound_inclusive() {
        assert!(validator().validate_odds(1000.0).is_valid());
        assert!(validator().validate_odds(1.0001).is_valid());
    }

    #[test]
    fn test_odds_from_text() {
        assert_eq!(
            validator().validate_odds("2.50").into_result(),
            Ok(dec!(2.5))
        );
        let result = validator().validate_odds("two");
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidOdds));
    }

    #[test]
    fn test_stake_rules() {
        assert!(validator().validate_stake(100.0).is_valid());
        assert_eq!(validator().validate_stake(0.0).error_kind(), Some(ErrorKind::InvalidStake));
        assert_eq!(validator().validate_stake(-5.0).error_kind(), Some(ErrorKind::InvalidStake));
        assert_eq!(validator().validate_stake(f64::NAN).error_kind(), Some(ErrorKind::InvalidStake));
        assert_eq!(validator().validate_stake(2e9).error_kind(), Some(ErrorKind::InvalidStake));
    }

    #[test]
    fn test_custom_limits() {
        let validator = Validator::new(Limits {
            max_odds: dec!(50),
            max_stake: dec!(500),
            ..Limits::default()
        });
        assert!(!validator.validate_odds(51.0).is_valid());
        assert!(!validator.validate_stake(501.0).is_valid());
        assert!(validator.validate_stake(500.0).is_valid());
    }

    #[test]
    fn test_leg_set_needs_two_legs() {
        let result = validator().validate_leg_set(&[OddsLeg::new("alpha", 2.0)]);
        assert_eq!(
            result.error(),
            Some(&CalculatorError::InsufficientLegs {
                count: 1,
                required: 2
            })
        );
        assert_eq!(
            validator().validate_leg_set(&[]).error_kind(),
            Some(ErrorKind::InsufficientLegs)
        );
    }

    #[test]
    fn test_leg_set_reports_bad_leg() {
        let legs = vec![OddsLeg::new("alpha", 2.0), OddsLeg::new("beta", 0.9)];
        let result = validator().validate_leg_set(&legs);
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidOdds));
        assert!(result.error().unwrap().to_string().contains("leg 1 (beta)"));

        let legs = vec![OddsLeg::new("alpha", 2.0), OddsLeg::new("  ", 2.0)];
        assert_eq!(
            validator().validate_leg_set(&legs).error(),
            Some(&CalculatorError::InvalidLeg {
                index: 1,
                reason: "bookmaker must not be empty".to_string()
            })
        );
    }

    #[test]
    fn test_leg_set_keeps_labels() {
        let legs = vec![
            OddsLeg::new(" alpha ", 2.1).with_outcome("Home").with_market("1X2"),
            OddsLeg::new("beta", 2.2),
        ];
        let valid = validator().validate_leg_set(&legs).into_result().unwrap();
        assert_eq!(valid[0].bookmaker, "alpha");
        assert_eq!(valid[0].outcome.as_deref(), Some("Home"));
        assert_eq!(valid[0].market.as_deref(), Some("1X2"));
        assert_eq!(valid[1].index, 1);
    }

    #[test]
    fn test_options_bounds() {
        let ok = CalculatorOptions::default().with_fees(dec!(0.02)).with_taxes(dec!(1));
        assert!(validator().validate_options(&ok).is_valid());

        let bad_fee = CalculatorOptions::default().with_fees(dec!(1.5));
        assert_eq!(
            validator().validate_options(&bad_fee).error_kind(),
            Some(ErrorKind::InvalidOptions)
        );

        let bad_tax = CalculatorOptions::default().with_taxes(dec!(-0.1));
        assert!(!validator().validate_options(&bad_tax).is_valid());

        let mut too_precise = CalculatorOptions::default();
        too_precise.decimal_places = 11;
        assert!(!validator().validate_options(&too_precise).is_valid());
    }

    #[test]
    fn test_probability_bounds() {
        assert!(validator().validate_probability(0.55).is_valid());
        for raw in [0.0, 1.0, -0.2, f64::NAN] {
            assert_eq!(
                validator().validate_probability(raw).error_kind(),
                Some(ErrorKind::InvalidProbability)
            );
        }
    }

    #[test]
    fn test_min_legs_never_below_two() {
        let validator = Validator::new(Limits {
            min_legs: 1,
            ..Limits::default()
        });
        assert_eq!(validator.min_legs(), 2);
        assert_eq!(
            validator.validate_leg_set(&[OddsLeg::new("solo", 2.5)]).error(),
            Some(&CalculatorError::InsufficientLegs {
                count: 1,
                required: 2
            })
        );

        let validator = Validator::new(Limits {
            min_legs: 0,
            ..Limits::default()
        });
        assert_eq!(
            validator.validate_leg_set(&[]).error_kind(),
            Some(ErrorKind::InsufficientLegs)
        );

        let validator = Validator::new(Limits {
            min_legs: 3,
            ..Limits::default()
        });
        let two = [OddsLeg::new("alpha", 2.0), OddsLeg::new("beta", 2.0)];
        assert!(!validator.validate_leg_set(&two).is_valid());
    }

    #[test]
    fn test_limits_bounds() {
        assert!(validate_limits(&Limits::default()).is_valid());

        for bad in [
            Limits { min_legs: 1, ..Limits::default() },
            Limits { max_odds: dec!(1), ..Limits::default() },
            Limits { max_stake: Decimal::ZERO, ..Limits::default() },
            Limits { max_decimal_places: 27, ..Limits::default() },
        ] {
            assert_eq!(
                validate_limits(&bad).error_kind(),
                Some(ErrorKind::InvalidOptions),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_fixed_leg_index_checked() {
        let input = CalculatorInput::new(
            vec![OddsLeg::new("alpha", 2.0), OddsLeg::new("beta", 2.0)],
            100.0,
        )
        .with_stake_mode(StakeMode::fixed_leg(2, 50.0));

        let err = validator().validate_input(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLeg);
    }
}
