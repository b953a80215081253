//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::types::{AppConfig, AppSettings, Limits};
use crate::calculator::{validate_limits, validate_options};
use crate::common::errors::{CalculatorError, Result};
use crate::common::types::{CalculatorOptions, RoundingMode};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with ARBCALC, `__` between sections)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("ARBCALC")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let app_config: AppConfig = config.try_deserialize()?;

    check(&app_config.limits, &app_config.calculator)?;

    Ok(app_config)
}

/// Load configuration from flat environment variables only
///
/// Reads `ARBCALC_MAX_ODDS`, `ARBCALC_MAX_STAKE`, `ARBCALC_FEE_RATE`,
/// `ARBCALC_TAX_RATE`, `ARBCALC_ROUNDING`, `ARBCALC_DECIMAL_PLACES` and
/// `ARBCALC_LOG_LEVEL`.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let defaults = Limits::default();
    let limits = Limits {
        max_odds: env_decimal("ARBCALC_MAX_ODDS")?.unwrap_or(defaults.max_odds),
        max_stake: env_decimal("ARBCALC_MAX_STAKE")?.unwrap_or(defaults.max_stake),
        ..defaults
    };

    let mut calculator = CalculatorOptions::default();
    if let Some(rate) = env_decimal("ARBCALC_FEE_RATE")? {
        calculator = calculator.with_fees(rate);
    }
    if let Some(rate) = env_decimal("ARBCALC_TAX_RATE")? {
        calculator = calculator.with_taxes(rate);
    }
    if let Ok(mode) = std::env::var("ARBCALC_ROUNDING") {
        calculator.rounding_mode =
            RoundingMode::from_str(&mode).map_err(CalculatorError::Configuration)?;
    }
    if let Ok(places) = std::env::var("ARBCALC_DECIMAL_PLACES") {
        calculator.decimal_places = places.trim().parse().map_err(|_| {
            CalculatorError::Configuration(format!(
                "ARBCALC_DECIMAL_PLACES is not an integer: {}",
                places
            ))
        })?;
    }

    let settings = AppSettings {
        log_level: std::env::var("ARBCALC_LOG_LEVEL")
            .unwrap_or_else(|_| AppSettings::default().log_level),
        ..AppSettings::default()
    };

    check(&limits, &calculator)?;

    Ok(AppConfig {
        limits,
        calculator,
        settings,
    })
}

/// Reject limits or default options the calculator cannot honour
fn check(limits: &Limits, calculator: &CalculatorOptions) -> Result<()> {
    validate_limits(limits)
        .into_result()
        .and_then(|limits| validate_options(calculator, &limits).into_result())
        .map(|_| ())
        .map_err(|e| CalculatorError::Configuration(e.to_string()))
}

fn env_decimal(key: &str) -> Result<Option<Decimal>> {
    match std::env::var(key) {
        Ok(raw) => Decimal::from_str(raw.trim()).map(Some).map_err(|e| {
            CalculatorError::Configuration(format!("{} is not a decimal ({}): {}", key, e, raw))
        }),
        Err(_) => Ok(None),
    }
}
