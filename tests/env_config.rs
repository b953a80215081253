//! Flat environment-variable configuration
//!
//! Kept to a single test in its own binary so no other test observes the
//! variables it sets.

use arbcalc::config::load_from_env;
use arbcalc::{ErrorKind, RoundingMode};
use rust_decimal_macros::dec;

#[test]
fn flat_variables_override_defaults() {
    std::env::set_var("ARBCALC_MAX_ODDS", "250");
    std::env::set_var("ARBCALC_FEE_RATE", "0.02");
    std::env::set_var("ARBCALC_ROUNDING", "ceil");
    std::env::set_var("ARBCALC_DECIMAL_PLACES", "3");

    let config = load_from_env().unwrap();
    assert_eq!(config.limits.max_odds, dec!(250));
    assert_eq!(config.limits.max_stake, dec!(1000000000));
    assert!(config.calculator.include_fees);
    assert_eq!(config.calculator.fee_rate, dec!(0.02));
    assert_eq!(config.calculator.rounding_mode, RoundingMode::Ceil);
    assert_eq!(config.calculator.decimal_places, 3);

    std::env::set_var("ARBCALC_TAX_RATE", "1.5");
    let err = load_from_env().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    std::env::set_var("ARBCALC_TAX_RATE", "not-a-number");
    let err = load_from_env().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    for key in [
        "ARBCALC_MAX_ODDS",
        "ARBCALC_FEE_RATE",
        "ARBCALC_TAX_RATE",
        "ARBCALC_ROUNDING",
        "ARBCALC_DECIMAL_PLACES",
    ] {
        std::env::remove_var(key);
    }
}
