//! Common test utilities and fixtures

#![allow(dead_code)]

use arbcalc::{CalculatorInput, OddsLeg};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tolerance for comparisons on unrounded values
pub const EPSILON: Decimal = dec!(0.000000001);

/// Legs with generated bookmaker names
pub fn legs(odds: &[f64]) -> Vec<OddsLeg> {
    odds.iter()
        .enumerate()
        .map(|(i, o)| OddsLeg::new(format!("book{}", i), *o))
        .collect()
}

/// Classic two-way arbitrage: 2.1 vs 2.2
pub fn two_way_arbitrage() -> CalculatorInput {
    CalculatorInput::new(
        vec![
            OddsLeg::new("alpha", 2.1)
                .with_market("Match Winner")
                .with_outcome("Home"),
            OddsLeg::new("beta", 2.2)
                .with_market("Match Winner")
                .with_outcome("Away"),
        ],
        1000.0,
    )
}

/// Three-way football market with a small arbitrage
pub fn three_way_arbitrage() -> CalculatorInput {
    CalculatorInput::new(
        vec![
            OddsLeg::new("alpha", 2.9).with_outcome("Home"),
            OddsLeg::new("beta", 3.9).with_outcome("Draw"),
            OddsLeg::new("gamma", 3.4).with_outcome("Away"),
        ],
        500.0,
    )
}

/// Random odds set of `len` legs in `1.05..20.0`, rounded to two places
pub fn random_odds(rng: &mut impl Rng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| (rng.gen_range(1.05..20.0_f64) * 100.0).round() / 100.0)
        .collect()
}

/// Assert two decimals agree within `EPSILON`
pub fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {} to be within {} of {}",
        actual,
        EPSILON,
        expected
    );
}
