//! Expected-value maths for single bets
//!
//! Where the arbitrage calculator needs every outcome of a market, a value
//! bet compares one offered price against an estimate of the true
//! probability, typically the no-vig price of a sharper book.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{checked_add, checked_div, checked_mul, checked_sub, implied_probability};
use super::validation::Validator;
use crate::common::errors::{CalculatorError, Result};
use crate::common::traits::NumericInput;

/// Expected value per unit staked: `p * odds - 1`
pub fn expected_value(odds: Decimal, probability: Decimal) -> Result<Decimal> {
    checked_sub(
        checked_mul(probability, odds, "expected value")?,
        Decimal::ONE,
        "expected value",
    )
}

/// Full-Kelly fraction of bankroll, clamped at zero for negative edges
///
/// `f* = (b * p - q) / b` with `b = odds - 1` and `q = 1 - p`.
pub fn kelly_fraction(odds: Decimal, probability: Decimal) -> Result<Decimal> {
    let b = checked_sub(odds, Decimal::ONE, "kelly fraction")?;
    let q = Decimal::ONE - probability;
    let edge = checked_sub(checked_mul(b, probability, "kelly fraction")?, q, "kelly fraction")?;
    let fraction = checked_div(edge, b, "kelly fraction")?;
    Ok(fraction.max(Decimal::ZERO))
}

/// A market's odds with the bookmaker margin removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairMarket {
    /// Normalised probabilities, summing to 1
    pub probabilities: Vec<Decimal>,
    /// `1 / probability` for each outcome
    pub fair_odds: Vec<Decimal>,
    /// `Σ 1/odds - 1`; negative when the set is an arbitrage
    pub margin: Decimal,
}

/// Remove the margin from a complete market by proportional normalisation
///
/// Every price goes through `validator` first, the same as arbitrage legs.
pub fn fair_market(validator: &Validator, odds: &[Decimal]) -> Result<FairMarket> {
    let required = validator.min_legs();
    if odds.len() < required {
        return Err(CalculatorError::InsufficientLegs {
            count: odds.len(),
            required,
        });
    }

    let implied = odds
        .iter()
        .map(|o| {
            let odds = validator.validate_odds(*o).into_result()?;
            implied_probability(odds)
        })
        .collect::<Result<Vec<_>>>()?;
    let total = implied
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| checked_add(acc, *p, "fair market total"))?;

    let probabilities = implied
        .iter()
        .map(|p| checked_div(*p, total, "fair probability"))
        .collect::<Result<Vec<_>>>()?;
    let fair_odds = probabilities
        .iter()
        .map(|p| checked_div(Decimal::ONE, *p, "fair odds"))
        .collect::<Result<Vec<_>>>()?;

    Ok(FairMarket {
        probabilities,
        fair_odds,
        margin: total - Decimal::ONE,
    })
}

/// Evaluation of a single bet against an estimated true probability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueBet {
    pub odds: Decimal,
    pub probability: Decimal,
    pub stake: Decimal,
    /// Expected return per unit staked
    pub expected_value: Decimal,
    pub edge_percentage: Decimal,
    /// `stake * expected_value`
    pub expected_profit: Decimal,
    /// Break-even price for the estimated probability
    pub fair_odds: Decimal,
    /// Full-Kelly fraction of bankroll (zero when there is no edge)
    pub kelly_fraction: Decimal,
}

impl ValueBet {
    /// Validate the raw inputs and evaluate the bet
    pub fn evaluate(
        validator: &Validator,
        odds: impl NumericInput,
        probability: impl NumericInput,
        stake: impl NumericInput,
    ) -> Result<Self> {
        let odds = validator.validate_odds(odds).into_result()?;
        let probability = validator.validate_probability(probability).into_result()?;
        let stake = validator.validate_stake(stake).into_result()?;

        let expected_value = expected_value(odds, probability)?;
        let bet = Self {
            odds,
            probability,
            stake,
            expected_value,
            edge_percentage: checked_mul(expected_value, dec!(100), "edge percentage")?,
            expected_profit: checked_mul(stake, expected_value, "expected profit")?,
            fair_odds: checked_div(Decimal::ONE, probability, "fair odds")?,
            kelly_fraction: kelly_fraction(odds, probability)?,
        };

        debug!(
            odds = %bet.odds,
            probability = %bet.probability,
            expected_value = %bet.expected_value,
            "Evaluated value bet"
        );
        Ok(bet)
    }

    pub fn is_value(&self) -> bool {
        self.expected_value > Decimal::ZERO
    }

    /// Kelly stake for `bankroll`, scaled by `multiplier` (0.25 for quarter Kelly)
    pub fn kelly_stake(&self, bankroll: Decimal, multiplier: Decimal) -> Result<Decimal> {
        let full = checked_mul(bankroll, self.kelly_fraction, "kelly stake")?;
        Ok(checked_mul(full, multiplier, "kelly stake")?.max(Decimal::ZERO))
    }
}
