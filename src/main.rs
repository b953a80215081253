//! Arbcalc - Main Entry Point
//!
//! Command-line front end for the arbitrage and expected-value calculator.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use arbcalc::calculator::{
    commission_adjusted_odds, fair_market, format_odds, format_result, parse_odds,
    ArbitrageCalculator, CalculationRecord,
    HistoryStore, InMemoryHistory, OddsFormat, ValueBet,
};
use arbcalc::config::load_config;
use arbcalc::{AppConfig, CalculatorInput, OddsLeg, RoundingMode, StakeMode};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "arbcalc.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a stake across every outcome for a guaranteed payout
    Arb(ArbArgs),
    /// Evaluate a single bet against an estimated probability
    Value(ValueArgs),
    /// Remove the bookmaker margin from a complete market
    Fair(FairArgs),
    /// List calculations saved with `arb --save`
    History(HistoryArgs),
}

#[derive(ClapArgs, Debug)]
struct ArbArgs {
    /// Outcome as BOOKMAKER=ODDS or BOOKMAKER=ODDS@OUTCOME (repeat per leg)
    #[arg(long = "leg", required = true, value_parser = parse_leg_spec)]
    legs: Vec<LegSpec>,

    /// Total stake to split across all legs
    #[arg(long, required_unless_present = "fixed_leg")]
    stake: Option<f64>,

    /// Index of the leg whose stake is fixed
    #[arg(long, requires = "fixed_stake", conflicts_with = "stake")]
    fixed_leg: Option<usize>,

    /// Stake placed on the fixed leg
    #[arg(long, requires = "fixed_leg")]
    fixed_stake: Option<f64>,

    /// Format the leg odds are quoted in
    #[arg(long, default_value = "decimal")]
    format: OddsFormat,

    /// Exchange commission on winnings, applied to every leg's odds (0..1)
    #[arg(long)]
    commission: Option<Decimal>,

    /// Fee rate applied to the payout (0..1)
    #[arg(long)]
    fee_rate: Option<Decimal>,

    /// Tax rate applied to positive profit (0..1)
    #[arg(long)]
    tax_rate: Option<Decimal>,

    /// Rounding mode for displayed figures (round, floor, ceil)
    #[arg(long)]
    rounding: Option<RoundingMode>,

    /// Decimal places for displayed figures
    #[arg(long)]
    decimal_places: Option<u32>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Append the calculation to a JSON history file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Label stored with a saved calculation
    #[arg(long, requires = "save")]
    label: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct ValueArgs {
    /// Offered price
    #[arg(long)]
    odds: String,

    /// Format the prices are quoted in
    #[arg(long, default_value = "decimal")]
    format: OddsFormat,

    /// Estimated probability of the outcome (0..1)
    #[arg(long, required_unless_present = "fair_odds", conflicts_with = "fair_odds")]
    probability: Option<f64>,

    /// Fair (no-vig) price, used instead of --probability
    #[arg(long)]
    fair_odds: Option<String>,

    /// Stake to evaluate
    #[arg(long, default_value_t = 100.0)]
    stake: f64,

    /// Bankroll for a Kelly stake suggestion
    #[arg(long)]
    bankroll: Option<Decimal>,

    /// Fraction of full Kelly to suggest
    #[arg(long, default_value = "0.25")]
    kelly_multiplier: Decimal,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct FairArgs {
    /// Price for each outcome of the market
    #[arg(long = "odds", required = true, num_args = 2..)]
    odds: Vec<String>,

    /// Format the prices are quoted in
    #[arg(long, default_value = "decimal")]
    format: OddsFormat,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct HistoryArgs {
    /// History file written by `arb --save`
    #[arg(long)]
    file: PathBuf,

    /// Print JSON instead of a summary
    #[arg(long)]
    json: bool,
}

/// A leg as typed on the command line, before odds conversion
#[derive(Debug, Clone)]
struct LegSpec {
    bookmaker: String,
    odds: String,
    outcome: Option<String>,
}

fn parse_leg_spec(raw: &str) -> std::result::Result<LegSpec, String> {
    let (bookmaker, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected BOOKMAKER=ODDS[@OUTCOME], got '{}'", raw))?;
    let (odds, outcome) = match rest.split_once('@') {
        Some((odds, outcome)) => (odds, Some(outcome.trim().to_string())),
        None => (rest, None),
    };
    Ok(LegSpec {
        bookmaker: bookmaker.trim().to_string(),
        odds: odds.trim().to_string(),
        outcome,
    })
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;

    // Initialize logging
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Configuration file: {}", args.config);

    match args.command {
        Command::Arb(arb) => run_arb(&config, arb),
        Command::Value(value) => run_value(&config, value),
        Command::Fair(fair) => run_fair(&config, fair),
        Command::History(history) => run_history(&config, history),
    }
}

fn run_arb(config: &AppConfig, args: ArbArgs) -> Result<()> {
    let legs = args
        .legs
        .iter()
        .map(|spec| {
            let mut odds = parse_odds(&spec.odds, args.format)?;
            if let Some(commission) = args.commission {
                odds = commission_adjusted_odds(odds, commission)?;
            }
            let mut leg = OddsLeg::new(&spec.bookmaker, odds.to_f64().unwrap_or(f64::NAN));
            leg.outcome = spec.outcome.clone();
            Ok(leg)
        })
        .collect::<arbcalc::Result<Vec<_>>>()?;

    let stake = match (args.stake, args.fixed_leg, args.fixed_stake) {
        (_, Some(index), Some(stake)) => StakeMode::fixed_leg(index, stake),
        (Some(total), _, _) => StakeMode::total(total),
        _ => bail!("either --stake or --fixed-leg with --fixed-stake is required"),
    };

    let mut options = config.calculator.clone();
    if let Some(rate) = args.fee_rate {
        options = options.with_fees(rate);
    }
    if let Some(rate) = args.tax_rate {
        options = options.with_taxes(rate);
    }
    if let Some(mode) = args.rounding {
        options.rounding_mode = mode;
    }
    if let Some(places) = args.decimal_places {
        options.decimal_places = places;
    }

    let input = CalculatorInput {
        legs,
        stake,
        options,
    };

    let calculator = ArbitrageCalculator::from_config(config);
    let result = calculator.calculate(&input)?;
    let display = format_result(&result, &input.options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&display)?);
    } else {
        print!("{}", display);
    }

    if let Some(path) = args.save {
        let mut record = CalculationRecord::new(input, result);
        if let Some(label) = args.label {
            record = record.with_label(label);
        }

        let mut history = read_history(&path, config.settings.history_capacity)?;
        let id = history.save(record);
        std::fs::write(&path, history.export_json()?)
            .with_context(|| format!("failed to write history file {}", path.display()))?;
        info!("Saved calculation {} to {}", id, path.display());
    }

    Ok(())
}

fn run_value(config: &AppConfig, args: ValueArgs) -> Result<()> {
    let calculator = ArbitrageCalculator::from_config(config);
    let odds = parse_odds(&args.odds, args.format)?;

    let probability = match (args.probability, args.fair_odds) {
        (Some(p), _) => Decimal::try_from(p).context("probability is not a finite number")?,
        (None, Some(fair)) => {
            let fair = calculator
                .validator()
                .validate_odds(parse_odds(&fair, args.format)?)
                .into_result()?;
            Decimal::ONE / fair
        }
        (None, None) => bail!("either --probability or --fair-odds is required"),
    };

    let bet = ValueBet::evaluate(calculator.validator(), odds, probability, args.stake)?;
    let kelly_stake = args
        .bankroll
        .map(|bankroll| bet.kelly_stake(bankroll, args.kelly_multiplier))
        .transpose()?;

    if args.json {
        let mut value = serde_json::to_value(&bet)?;
        if let (Some(stake), Some(map)) = (kelly_stake, value.as_object_mut()) {
            map.insert("kelly_stake".to_string(), serde_json::to_value(stake)?);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let options = &config.calculator;
    println!("Odds:             {}", format_odds(bet.odds, args.format)?);
    println!("Fair odds:        {}", format_odds(bet.fair_odds, args.format)?);
    println!("Probability:      {}%", options.round(bet.probability * Decimal::ONE_HUNDRED));
    println!("Edge:             {}%", options.round(bet.edge_percentage));
    println!("Expected profit:  {}", options.round(bet.expected_profit));
    println!("Value bet:        {}", if bet.is_value() { "yes" } else { "no" });
    if let Some(stake) = kelly_stake {
        println!("Kelly stake:      {}", options.round(stake));
    }

    Ok(())
}

fn run_fair(config: &AppConfig, args: FairArgs) -> Result<()> {
    let calculator = ArbitrageCalculator::from_config(config);
    let odds = args
        .odds
        .iter()
        .map(|text| parse_odds(text, args.format))
        .collect::<arbcalc::Result<Vec<_>>>()?;
    let market = fair_market(calculator.validator(), &odds)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&market)?);
        return Ok(());
    }

    println!("Margin: {}%", (market.margin * Decimal::ONE_HUNDRED).round_dp(2));
    for (i, (offered, fair)) in odds.iter().zip(&market.fair_odds).enumerate() {
        println!(
            "{:<4} offered {:>10}  fair {:>10}  probability {:>7}%",
            i,
            format_odds(*offered, args.format)?,
            format_odds(*fair, args.format)?,
            (market.probabilities[i] * Decimal::ONE_HUNDRED).round_dp(2)
        );
    }

    Ok(())
}

fn run_history(config: &AppConfig, args: HistoryArgs) -> Result<()> {
    let history = read_history(&args.file, config.settings.history_capacity)?;

    if args.json {
        println!("{}", history.export_json()?);
        return Ok(());
    }

    if history.is_empty() {
        println!("No saved calculations");
        return Ok(());
    }

    for record in history.list() {
        println!(
            "{}  {}  {:<20} legs {}  stake {}  profit {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.label.as_deref().unwrap_or("-"),
            record.result.leg_count(),
            record.input.options.round(record.result.stake),
            record.input.options.round(record.result.profit)
        );
    }

    Ok(())
}

fn read_history(path: &Path, capacity: usize) -> Result<InMemoryHistory> {
    if !path.exists() {
        return Ok(InMemoryHistory::new(capacity));
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    Ok(InMemoryHistory::from_json(&json, capacity)?)
}
