use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::validation::MAX_SCALE;
use crate::common::types::{CalculatorOptions, CalculatorResult};

/// Rounded view of one leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLeg {
    pub index: usize,
    pub bookmaker: String,
    pub outcome: Option<String>,
    pub odds: Decimal,
    pub stake: Decimal,
    pub payout: Decimal,
}

/// Rounded view of a [`CalculatorResult`]
///
/// Monetary figures and `profit_percentage` use the configured precision.
/// `roi` and `implied_percentage` keep two extra places so they agree with
/// the percentage column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayResult {
    pub stake: Decimal,
    pub payout: Decimal,
    pub profit: Decimal,
    pub profit_percentage: Decimal,
    pub roi: Decimal,
    pub implied_percentage: Decimal,
    pub is_arbitrage: bool,
    pub fees: Decimal,
    pub taxes: Decimal,
    pub legs: Vec<DisplayLeg>,
}

/// Apply the rounding options to a result for display
///
/// Rounding is the last step and never feeds back into the computation:
/// the borrowed `result` stays unrounded for history or chained use.
pub fn format_result(result: &CalculatorResult, options: &CalculatorOptions) -> DisplayResult {
    let ratio = CalculatorOptions {
        decimal_places: options.decimal_places.saturating_add(2),
        ..options.clone()
    };

    DisplayResult {
        stake: options.round(result.stake),
        payout: options.round(result.payout),
        profit: options.round(result.profit),
        profit_percentage: options.round(result.profit_percentage),
        roi: ratio.round(result.roi),
        implied_percentage: options.round(result.total_implied_probability * dec!(100)),
        is_arbitrage: result.is_arbitrage,
        fees: options.round(result.fees),
        taxes: options.round(result.taxes),
        legs: result
            .legs
            .iter()
            .map(|leg| DisplayLeg {
                index: leg.index,
                bookmaker: leg.bookmaker.clone(),
                outcome: leg.outcome.clone(),
                odds: leg.odds,
                stake: options.round(leg.stake),
                payout: options.round(leg.payout),
            })
            .collect(),
    }
}

/// Largest gap between the rounded leg stakes and the rounded total
///
/// Each leg is off by at most one unit in the last place, so the sum can
/// drift by up to `legs * 10^-decimal_places`.
pub fn rounding_tolerance(options: &CalculatorOptions, legs: usize) -> Decimal {
    Decimal::new(1, options.decimal_places.min(MAX_SCALE)) * Decimal::from(legs.max(1))
}

impl fmt::Display for DisplayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<4} {:<20} {:<16} {:>10} {:>14} {:>14}",
            "#", "Bookmaker", "Outcome", "Odds", "Stake", "Payout"
        )?;
        for leg in &self.legs {
            writeln!(
                f,
                "{:<4} {:<20} {:<16} {:>10} {:>14} {:>14}",
                leg.index,
                leg.bookmaker,
                leg.outcome.as_deref().unwrap_or("-"),
                leg.odds,
                leg.stake,
                leg.payout
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Implied probability: {}%", self.implied_percentage)?;
        writeln!(
            f,
            "Arbitrage:           {}",
            if self.is_arbitrage { "yes" } else { "no" }
        )?;
        writeln!(f, "Total stake:         {}", self.stake)?;
        if !self.fees.is_zero() {
            writeln!(f, "Fees:                {}", self.fees)?;
        }
        if !self.taxes.is_zero() {
            writeln!(f, "Taxes:               {}", self.taxes)?;
        }
        writeln!(f, "Payout:              {}", self.payout)?;
        writeln!(
            f,
            "Profit:              {} ({}%)",
            self.profit, self.profit_percentage
        )
    }
}
