use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument, warn};

use super::adjustments::{apply_adjustments, Adjustments};
use super::validation::{Sizing, ValidLeg, ValidatedInput, Validator};
use crate::common::errors::{CalculatorError, Result};
use crate::common::types::{
    CalculatorInput, CalculatorOptions, CalculatorResult, LegStake, OddsLeg, StakeMode,
};
use crate::config::types::{AppConfig, Limits};

/// Equal-payout arbitrage calculator
///
/// Holds validation limits and the default options used by the convenience
/// entry points. The calculator itself is stateless: every call is an
/// independent pure function of its input.
#[derive(Debug, Clone, Default)]
pub struct ArbitrageCalculator {
    validator: Validator,
    defaults: CalculatorOptions,
}

impl ArbitrageCalculator {
    pub fn new(limits: Limits) -> Self {
        Self {
            validator: Validator::new(limits),
            defaults: CalculatorOptions::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            defaults: config.calculator.clone(),
        }
    }

    pub fn with_default_options(mut self, options: CalculatorOptions) -> Self {
        self.defaults = options;
        self
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn default_options(&self) -> &CalculatorOptions {
        &self.defaults
    }

    /// Validate and compute a full calculator input
    #[instrument(skip(self, input), fields(legs = input.legs.len()))]
    pub fn calculate(&self, input: &CalculatorInput) -> Result<CalculatorResult> {
        let validated = self.validator.validate_input(input)?;
        let result = compute(&validated)?;

        if let Sizing::FixedLeg { .. } = validated.sizing {
            // the derived total has to respect the same ceiling as a supplied one
            self.validator.validate_stake(result.stake).into_result()?;
        }

        Ok(result)
    }

    /// Split `total_stake` across `legs` using the default options
    pub fn calculate_total(&self, legs: &[OddsLeg], total_stake: f64) -> Result<CalculatorResult> {
        let input = CalculatorInput {
            legs: legs.to_vec(),
            stake: StakeMode::total(total_stake),
            options: self.defaults.clone(),
        };
        self.calculate(&input)
    }

    /// Fix the stake on leg `index` and size the rest using the default options
    pub fn calculate_fixed_leg(
        &self,
        legs: &[OddsLeg],
        index: usize,
        stake: f64,
    ) -> Result<CalculatorResult> {
        let input = CalculatorInput {
            legs: legs.to_vec(),
            stake: StakeMode::fixed_leg(index, stake),
            options: self.defaults.clone(),
        };
        self.calculate(&input)
    }
}

/// Validate `input` against `limits` and compute the result
pub fn calculate(input: &CalculatorInput, limits: &Limits) -> Result<CalculatorResult> {
    ArbitrageCalculator::new(limits.clone()).calculate(input)
}

/// Sum of implied probabilities `Σ 1/odds`
pub fn total_implied_probability(legs: &[ValidLeg]) -> Result<Decimal> {
    legs.iter().try_fold(Decimal::ZERO, |acc, leg| {
        checked_add(acc, implied_probability(leg.odds)?, "total implied probability")
    })
}

/// Implied probability `1/odds` of a single decimal price
pub fn implied_probability(odds: Decimal) -> Result<Decimal> {
    checked_div(Decimal::ONE, odds, "implied probability")
}

/// Core computation over validated input. Never rounds.
pub fn compute(input: &ValidatedInput) -> Result<CalculatorResult> {
    let probabilities = input
        .legs
        .iter()
        .map(|leg| implied_probability(leg.odds))
        .collect::<Result<Vec<_>>>()?;
    let total_probability = total_implied_probability(&input.legs)?;

    let (total_stake, gross_payout, stakes) = match input.sizing {
        Sizing::Total(total_stake) => {
            let gross_payout = checked_div(total_stake, total_probability, "guaranteed payout")?;
            let stakes = probabilities
                .iter()
                .map(|p| {
                    let weighted = checked_mul(total_stake, *p, "leg stake")?;
                    checked_div(weighted, total_probability, "leg stake")
                })
                .collect::<Result<Vec<_>>>()?;
            (total_stake, gross_payout, stakes)
        }
        Sizing::FixedLeg { index, stake } => {
            let anchor = input.legs.get(index).ok_or_else(|| CalculatorError::InvalidLeg {
                index,
                reason: format!("fixed stake refers to a leg outside 0..{}", input.legs.len()),
            })?;
            let gross_payout = checked_mul(stake, anchor.odds, "guaranteed payout")?;
            let stakes = input
                .legs
                .iter()
                .zip(&probabilities)
                .map(|(leg, p)| {
                    if leg.index == index {
                        Ok(stake)
                    } else {
                        checked_mul(gross_payout, *p, "leg stake")
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let total_stake = stakes
                .iter()
                .try_fold(Decimal::ZERO, |acc, s| checked_add(acc, *s, "total stake"))?;
            (total_stake, gross_payout, stakes)
        }
    };

    let legs = input
        .legs
        .iter()
        .zip(probabilities)
        .zip(stakes)
        .map(|((leg, implied_probability), stake)| {
            Ok(LegStake {
                index: leg.index,
                bookmaker: leg.bookmaker.clone(),
                market: leg.market.clone(),
                outcome: leg.outcome.clone(),
                odds: leg.odds,
                implied_probability,
                stake,
                payout: checked_mul(stake, leg.odds, "leg payout")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let Adjustments {
        fees,
        taxes,
        net_payout,
    } = apply_adjustments(gross_payout, total_stake, &input.options)?;

    let profit = checked_sub(net_payout, total_stake, "profit")?;
    let roi = checked_div(profit, total_stake, "roi")?;
    let profit_percentage = checked_mul(roi, dec!(100), "profit percentage")?;
    let is_arbitrage = total_probability < Decimal::ONE;

    debug!(
        legs = legs.len(),
        total_implied_probability = %total_probability,
        is_arbitrage,
        profit = %profit,
        "Computed stake distribution"
    );

    Ok(CalculatorResult {
        stake: total_stake,
        payout: net_payout,
        profit,
        profit_percentage,
        roi,
        total_implied_probability: total_probability,
        is_arbitrage,
        gross_payout,
        fees,
        taxes,
        legs,
    })
}

pub(crate) fn checked_add(lhs: Decimal, rhs: Decimal, step: &str) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(step))
}

pub(crate) fn checked_div(lhs: Decimal, rhs: Decimal, step: &str) -> Result<Decimal> {
    lhs.checked_div(rhs).ok_or_else(|| overflow(step))
}

pub(crate) fn checked_mul(lhs: Decimal, rhs: Decimal, step: &str) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(step))
}

pub(crate) fn checked_sub(lhs: Decimal, rhs: Decimal, step: &str) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| overflow(step))
}

fn overflow(step: &str) -> CalculatorError {
    warn!("Decimal overflow while computing {}", step);
    CalculatorError::overflow(step)
}
