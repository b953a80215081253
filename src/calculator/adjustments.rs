use rust_decimal::Decimal;

use super::engine::{checked_mul, checked_sub};
use crate::common::errors::{CalculatorError, Result};
use crate::common::types::CalculatorOptions;

/// Deductions applied to a guaranteed payout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustments {
    /// `fee_rate * gross_payout` when fees are enabled
    pub fees: Decimal,
    /// `tax_rate * pre-tax profit` when taxes are enabled and that profit is positive
    pub taxes: Decimal,
    /// Gross payout less fees and taxes
    pub net_payout: Decimal,
}

/// Apply fee and tax options to a gross payout
///
/// Fees are charged on the whole payout. Taxes are charged on profit only,
/// after fees, and a loss is never taxed.
pub fn apply_adjustments(
    gross_payout: Decimal,
    total_stake: Decimal,
    options: &CalculatorOptions,
) -> Result<Adjustments> {
    let fees = if options.include_fees {
        checked_mul(options.fee_rate, gross_payout, "fees")?
    } else {
        Decimal::ZERO
    };

    let after_fees = checked_sub(gross_payout, fees, "payout after fees")?;
    let pre_tax_profit = checked_sub(after_fees, total_stake, "pre-tax profit")?;

    let taxes = if options.include_taxes && pre_tax_profit > Decimal::ZERO {
        checked_mul(options.tax_rate, pre_tax_profit, "taxes")?
    } else {
        Decimal::ZERO
    };

    Ok(Adjustments {
        fees,
        taxes,
        net_payout: checked_sub(after_fees, taxes, "net payout")?,
    })
}

/// Effective decimal odds on an exchange that charges `commission` on net winnings
///
/// Only the winnings part of the price is reduced: `1 + (odds - 1) * (1 - commission)`.
pub fn commission_adjusted_odds(odds: Decimal, commission: Decimal) -> Result<Decimal> {
    if commission < Decimal::ZERO || commission >= Decimal::ONE {
        return Err(CalculatorError::InvalidOptions(format!(
            "commission must be in [0, 1), got {}",
            commission
        )));
    }

    let winnings = checked_sub(odds, Decimal::ONE, "commission adjusted odds")?;
    let kept = checked_sub(Decimal::ONE, commission, "commission adjusted odds")?;
    Ok(Decimal::ONE + checked_mul(winnings, kept, "commission adjusted odds")?)
}
