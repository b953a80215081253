//! Value types shared by the validator, calculator and formatter

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One bettable outcome priced by a bookmaker
///
/// `odds` is the raw caller-supplied decimal price. It is only trusted after
/// it has gone through [`crate::calculator::Validator::validate_leg_set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsLeg {
    /// Opaque bookmaker identifier
    pub bookmaker: String,
    /// Decimal odds (a winning stake of 1 returns `odds`)
    pub odds: f64,
    /// Market label, display only
    #[serde(default)]
    pub market: Option<String>,
    /// Outcome label, display only
    #[serde(default)]
    pub outcome: Option<String>,
}

impl OddsLeg {
    pub fn new(bookmaker: impl Into<String>, odds: f64) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            odds,
            market: None,
            outcome: None,
        }
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }
}

/// How the caller sizes the calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeMode {
    /// Split a total stake across every leg
    Total { amount: f64 },
    /// Fix the stake on one leg and size the others around it
    FixedLeg { index: usize, stake: f64 },
}

impl StakeMode {
    pub fn total(amount: f64) -> Self {
        Self::Total { amount }
    }

    pub fn fixed_leg(index: usize, stake: f64) -> Self {
        Self::FixedLeg { index, stake }
    }
}

/// Rounding applied to displayed figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMode {
    /// Half away from zero
    #[default]
    Round,
    /// Toward negative infinity
    Floor,
    /// Toward positive infinity
    Ceil,
}

impl RoundingMode {
    pub fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::Round => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
            RoundingMode::Ceil => RoundingStrategy::ToPositiveInfinity,
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::Round => write!(f, "round"),
            RoundingMode::Floor => write!(f, "floor"),
            RoundingMode::Ceil => write!(f, "ceil"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "round" => Ok(RoundingMode::Round),
            "floor" => Ok(RoundingMode::Floor),
            "ceil" => Ok(RoundingMode::Ceil),
            other => Err(format!("unknown rounding mode '{}'", other)),
        }
    }
}

/// Options that change the computation but not the identity of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorOptions {
    #[serde(default)]
    pub include_taxes: bool,
    /// Tax rate on positive profit (0..=1)
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub include_fees: bool,
    /// Fee rate on gross payout (0..=1)
    #[serde(default)]
    pub fee_rate: Decimal,
    #[serde(default)]
    pub rounding_mode: RoundingMode,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CalculatorOptions {
    fn default() -> Self {
        Self {
            include_taxes: false,
            tax_rate: Decimal::ZERO,
            include_fees: false,
            fee_rate: Decimal::ZERO,
            rounding_mode: RoundingMode::Round,
            decimal_places: default_decimal_places(),
        }
    }
}

impl CalculatorOptions {
    pub fn with_fees(mut self, fee_rate: Decimal) -> Self {
        self.include_fees = true;
        self.fee_rate = fee_rate;
        self
    }

    pub fn with_taxes(mut self, tax_rate: Decimal) -> Self {
        self.include_taxes = true;
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_rounding(mut self, mode: RoundingMode, decimal_places: u32) -> Self {
        self.rounding_mode = mode;
        self.decimal_places = decimal_places;
        self
    }

    /// Round a value the way these options display it
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.decimal_places, self.rounding_mode.strategy())
    }
}

fn default_decimal_places() -> u32 {
    2
}

/// Everything needed for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub legs: Vec<OddsLeg>,
    pub stake: StakeMode,
    #[serde(default)]
    pub options: CalculatorOptions,
}

impl CalculatorInput {
    /// Total-stake input with default options
    pub fn new(legs: Vec<OddsLeg>, total_stake: f64) -> Self {
        Self {
            legs,
            stake: StakeMode::total(total_stake),
            options: CalculatorOptions::default(),
        }
    }

    pub fn with_stake_mode(mut self, stake: StakeMode) -> Self {
        self.stake = stake;
        self
    }

    pub fn with_options(mut self, options: CalculatorOptions) -> Self {
        self.options = options;
        self
    }
}

/// Stake and payout for a single leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegStake {
    pub index: usize,
    pub bookmaker: String,
    pub market: Option<String>,
    pub outcome: Option<String>,
    pub odds: Decimal,
    pub implied_probability: Decimal,
    pub stake: Decimal,
    /// Gross return if this leg wins
    pub payout: Decimal,
}

/// Unrounded output of a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// Total stake across all legs
    pub stake: Decimal,
    /// Net payout after fees and taxes
    pub payout: Decimal,
    pub profit: Decimal,
    pub profit_percentage: Decimal,
    pub roi: Decimal,
    pub total_implied_probability: Decimal,
    /// True when the implied probabilities sum below 1
    pub is_arbitrage: bool,
    /// Payout before fees and taxes, identical for every leg
    pub gross_payout: Decimal,
    pub fees: Decimal,
    pub taxes: Decimal,
    pub legs: Vec<LegStake>,
}

impl CalculatorResult {
    pub fn is_profitable(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Bookmaker margin implied by the odds set (negative for an arbitrage)
    pub fn margin(&self) -> Decimal {
        self.total_implied_probability - Decimal::ONE
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_options() {
        let options = CalculatorOptions::default();
        assert!(!options.include_fees);
        assert!(!options.include_taxes);
        assert_eq!(options.rounding_mode, RoundingMode::Round);
        assert_eq!(options.decimal_places, 2);
    }

    #[test]
    fn test_rounding_modes() {
        let round = CalculatorOptions::default();
        let floor = CalculatorOptions::default().with_rounding(RoundingMode::Floor, 2);
        let ceil = CalculatorOptions::default().with_rounding(RoundingMode::Ceil, 2);

        assert_eq!(round.round(dec!(1.005)), dec!(1.01));
        assert_eq!(round.round(dec!(-1.005)), dec!(-1.01));
        assert_eq!(floor.round(dec!(1.009)), dec!(1.00));
        assert_eq!(floor.round(dec!(-1.001)), dec!(-1.01));
        assert_eq!(ceil.round(dec!(1.001)), dec!(1.01));
        assert_eq!(ceil.round(dec!(-1.009)), dec!(-1.00));
    }

    #[test]
    fn test_rounding_mode_from_str() {
        assert_eq!("Floor".parse::<RoundingMode>(), Ok(RoundingMode::Floor));
        assert_eq!(" ceil ".parse::<RoundingMode>(), Ok(RoundingMode::Ceil));
        assert!("banker".parse::<RoundingMode>().is_err());
    }

    #[test]
    fn test_stake_mode_serde() {
        let json = serde_json::to_string(&StakeMode::total(100.0)).unwrap();
        assert_eq!(json, r#"{"total":{"amount":100.0}}"#);

        let mode: StakeMode = serde_json::from_str(r#"{"fixed_leg":{"index":1,"stake":25.0}}"#).unwrap();
        assert_eq!(mode, StakeMode::fixed_leg(1, 25.0));
    }

    #[test]
    fn test_input_defaults_options_when_missing() {
        let input: CalculatorInput = serde_json::from_str(
            r#"{
                "legs": [
                    {"bookmaker": "alpha", "odds": 2.1},
                    {"bookmaker": "beta", "odds": 2.2, "outcome": "Away"}
                ],
                "stake": {"total": {"amount": 1000.0}}
            }"#,
        )
        .unwrap();

        assert_eq!(input.legs.len(), 2);
        assert_eq!(input.legs[1].outcome.as_deref(), Some("Away"));
        assert_eq!(input.options, CalculatorOptions::default());
    }
}
