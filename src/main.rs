//! fx-hedge-engine CLI
//!
//! Price options, run risk matrices and backtest hedging strategies from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Price a single vanilla option
//! fx-hedge-engine price --kind put --spot 1.10 --strike 1.08 --vol 9 --months 6
//!
//! # Probability-weighted risk matrix from a JSON request
//! fx-hedge-engine matrix --input matrix.json
//!
//! # Backtest a strategy over historical rates, exporting monthly rows
//! fx-hedge-engine backtest --strategy strategy.json --history eurusd.csv --csv out.csv
//!
//! # Generate a synthetic rate history
//! fx-hedge-engine generate --observations 500 --seed 42
//! ```

use fx_hedge_engine::core::component::{OptionKind, StrategyComponent};
use fx_hedge_engine::core::market::ForexParams;
use fx_hedge_engine::hedging::risk_matrix::{RiskMatrixRequest, RiskMatrixResult};
use fx_hedge_engine::history::backtest::{BacktestConfig, BacktestReport};
use fx_hedge_engine::history::export::results_to_csv;
use fx_hedge_engine::history::series::{parse_historical_data, IngestOptions, NumberLocale};
use fx_hedge_engine::pricing::option_pricer::VanillaInputs;
use fx_hedge_engine::simulation::synthetic::{generate_rate_series, MarketSeriesConfig};
use fx_hedge_engine::{generate_risk_matrix, price_option, run_backtest};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-hedge-engine — FX hedging strategy pricing, risk matrix and backtest

USAGE:
    fx-hedge-engine <COMMAND> [OPTIONS]

COMMANDS:
    price       Price a vanilla call or put (Garman-Kohlhagen)
    matrix      Evaluate strategies across probability-weighted price ranges
    backtest    Replay a strategy over historical monthly rates
    generate    Generate a synthetic daily rate history (CSV)
    help        Show this message

OPTIONS (price):
    --kind <call|put>     Option direction (default: call)
    --spot <RATE>         Spot exchange rate (required)
    --strike <RATE>       Absolute strike (required)
    --domestic <PCT>      Domestic rate, percent p.a. (default: 0)
    --foreign <PCT>       Foreign rate, percent p.a. (default: 0)
    --months <N>          Months to maturity (default: 12)
    --vol <PCT>           Volatility, percent (default: 10)

OPTIONS (matrix):
    --input <FILE>        JSON risk matrix request
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (backtest):
    --strategy <FILE>     JSON file with "components" and "config"
    --history <FILE>      Rate history, one "YYYY-MM-DD,price" row per line
    --locale <dot|comma>  Decimal separator of the history prices (default: dot)
    --format <FORMAT>     Output format: text (default) or json
    --csv <FILE>          Also export monthly rows as CSV

OPTIONS (generate):
    --observations <N>    Number of weekday observations (default: 252)
    --start <DATE>        First date, YYYY-MM-DD (default: 2023-01-02)
    --rate <RATE>         Initial rate (default: 1.10)
    --vol <PCT>           Annualized volatility, percent (default: 8)
    --seed <N>            Seed for a reproducible series
    --output <FILE>       Write to file instead of stdout

EXAMPLES:
    fx-hedge-engine price --kind put --spot 1.10 --strike 1.05 --domestic 4 --foreign 2.5 --months 6
    fx-hedge-engine matrix --input matrix.json --format json
    fx-hedge-engine backtest --strategy collar.json --history eurusd.csv --csv results.csv
    fx-hedge-engine generate --observations 750 --seed 7 --output eurusd.csv"#
    );
}

/// JSON schema for the backtest strategy file.
#[derive(serde::Deserialize)]
struct StrategyFile {
    components: Vec<StrategyComponent>,
    #[serde(default)]
    config: BacktestConfig,
}

/// Collect `--flag value` pairs, rejecting anything outside `allowed`.
fn parse_options(args: &[String], allowed: &[&str]) -> Vec<(String, String)> {
    let mut options = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) {
            eprintln!("Unknown option: {}", flag);
            process::exit(1);
        }
        i += 1;
        let value = args.get(i).cloned().unwrap_or_else(|| {
            eprintln!("{} requires a value", flag);
            process::exit(1);
        });
        options.push((flag.to_string(), value));
        i += 1;
    }
    options
}

fn option_value<'a>(options: &'a [(String, String)], flag: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(f, _)| f == flag)
        .map(|(_, v)| v.as_str())
}

fn required<'a>(options: &'a [(String, String)], flag: &str) -> &'a str {
    option_value(options, flag).unwrap_or_else(|| {
        eprintln!("Error: {} is required", flag);
        process::exit(1);
    })
}

fn number<T: std::str::FromStr>(options: &[(String, String)], flag: &str, default: T) -> T {
    match option_value(options, flag) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("{} requires a number, got '{}'", flag, raw);
            process::exit(1);
        }),
    }
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    })
}

fn load_json<T: DeserializeOwned>(path: &str) -> T {
    serde_json::from_str(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON in '{}': {}", path, e);
        process::exit(1);
    })
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_price(args: &[String]) {
    let options = parse_options(
        args,
        &["--kind", "--spot", "--strike", "--domestic", "--foreign", "--months", "--vol"],
    );
    let kind = match option_value(&options, "--kind").unwrap_or("call") {
        "call" => OptionKind::Call,
        "put" => OptionKind::Put,
        other => {
            eprintln!("--kind must be 'call' or 'put', got '{}'", other);
            process::exit(1);
        }
    };
    let spot: f64 = required(&options, "--spot").parse().unwrap_or_else(|_| {
        eprintln!("--spot requires a number");
        process::exit(1);
    });
    let strike: f64 = required(&options, "--strike").parse().unwrap_or_else(|_| {
        eprintln!("--strike requires a number");
        process::exit(1);
    });
    let params = ForexParams::new(
        number(&options, "--domestic", 0.0),
        number(&options, "--foreign", 0.0),
        number(&options, "--months", 12u32),
    );
    let inputs = VanillaInputs {
        spot,
        strike,
        domestic_rate: params.domestic_fraction(),
        foreign_rate: params.foreign_fraction(),
        maturity: params.horizon_years(),
        volatility: number(&options, "--vol", 10.0) / 100.0,
    };

    match price_option(kind, &inputs) {
        Ok(premium) => {
            println!("Premium:      {:.6}", premium);
            println!("Premium (%):  {:.4}%", premium / spot * 100.0);
            println!("Forward rate: {:.6}", params.forward_rate(spot, inputs.maturity));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn print_matrix(request: &RiskMatrixRequest, rows: &[RiskMatrixResult]) {
    println!("=== Risk Matrix (spot {}) ===", request.spot);
    let keys: Vec<String> = request.ranges.iter().map(|r| r.key()).collect();
    println!(
        "{:<24} {:>8} {:>10} {:>12}  {}",
        "Strategy",
        "Cover%",
        "Premium",
        "Exp. P&L",
        keys.join("  ")
    );
    for row in rows {
        let rates: Vec<String> = row
            .effective_rates()
            .iter()
            .map(|r| format!("{:.4}", r))
            .collect();
        println!(
            "{:<24} {:>8.1} {:>10.4} {:>12.4}  {}",
            row.name,
            row.coverage_ratio,
            row.costs.total_premium,
            row.hedging_cost,
            rates.join("  ")
        );
        if row.suppressed_defects > 0 {
            println!(
                "  warning: {} leg values were non-finite and counted as zero",
                row.suppressed_defects
            );
        }
    }
}

fn cmd_matrix(args: &[String]) {
    let options = parse_options(args, &["--input", "--format"]);
    let request: RiskMatrixRequest = load_json(required(&options, "--input"));

    let rows = generate_risk_matrix(&request).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if option_value(&options, "--format") == Some("json") {
        print_json(&rows);
    } else {
        print_matrix(&request, &rows);
    }
}

fn print_backtest(report: &BacktestReport) {
    println!("=== Backtest ===");
    if let Some(vol) = report.historical_volatility {
        println!("Historical volatility: {:.2}%", vol * 100.0);
    }
    println!(
        "{:<8} {:>10} {:>10} {:>14} {:>14} {:>12}",
        "Month", "Real", "Effective", "Hedged", "Unhedged", "P&L"
    );
    for r in &report.results {
        println!(
            "{:<8} {:>10.4} {:>10.4} {:>14.2} {:>14.2} {:>12.2}",
            r.date,
            r.real_rate,
            r.effective_rate,
            r.hedged_revenue,
            r.unhedged_revenue,
            r.pnl_vs_unhedged
        );
    }

    println!("\nYearly Summary:");
    for y in &report.yearly {
        println!(
            "  {}: hedged {:.2}, unhedged {:.2}, P&L {:.2}, premium {:.2}, cost reduction {:.2}%",
            y.year,
            y.summary.hedged_revenue,
            y.summary.unhedged_revenue,
            y.summary.total_pnl,
            y.summary.total_premium,
            y.summary.cost_reduction_percent
        );
    }
    println!(
        "\nTotal: {} months, P&L {:.2}, premium {:.2}",
        report.totals.months, report.totals.total_pnl, report.totals.total_premium
    );
}

fn cmd_backtest(args: &[String]) {
    let options = parse_options(args, &["--strategy", "--history", "--locale", "--format", "--csv"]);
    let strategy: StrategyFile = load_json(required(&options, "--strategy"));

    let locale = match option_value(&options, "--locale").unwrap_or("dot") {
        "dot" => NumberLocale::Dot,
        "comma" => NumberLocale::Comma,
        other => {
            eprintln!("--locale must be 'dot' or 'comma', got '{}'", other);
            process::exit(1);
        }
    };
    let ingest = IngestOptions {
        locale,
        ..Default::default()
    };
    let series = parse_historical_data(&read_file(required(&options, "--history")), &ingest)
        .unwrap_or_else(|e| {
            eprintln!("Error in history file: {}", e);
            process::exit(1);
        });

    let report = run_backtest(&strategy.components, &series, &strategy.config).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    if let Some(path) = option_value(&options, "--csv") {
        let csv = results_to_csv(&report.results).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
        fs::write(path, csv).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Exported {} monthly rows → {}", report.results.len(), path);
    }

    if option_value(&options, "--format") == Some("json") {
        print_json(&report);
    } else {
        print_backtest(&report);
    }
}

fn cmd_generate(args: &[String]) {
    let options = parse_options(
        args,
        &["--observations", "--start", "--rate", "--vol", "--seed", "--output"],
    );
    let defaults = MarketSeriesConfig::default();
    let start_date = match option_value(&options, "--start") {
        None => defaults.start_date,
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
            eprintln!("--start requires a YYYY-MM-DD date, got '{}'", raw);
            process::exit(1);
        }),
    };
    let config = MarketSeriesConfig {
        start_date,
        observations: number(&options, "--observations", defaults.observations),
        initial_rate: number(&options, "--rate", defaults.initial_rate),
        volatility: number(&options, "--vol", defaults.volatility * 100.0) / 100.0,
        seed: option_value(&options, "--seed").map(|_| number(&options, "--seed", 0u64)),
        ..defaults
    };

    let series = generate_rate_series(&config);
    let mut out = String::from("date,price\n");
    for point in series.points() {
        out.push_str(&format!("{},{:.6}\n", point.date, point.price));
    }

    if let Some(path) = option_value(&options, "--output") {
        fs::write(path, &out).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} observations → {}", series.len(), path);
    } else {
        print!("{}", out);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "price" => cmd_price(rest),
        "matrix" => cmd_matrix(rest),
        "backtest" => cmd_backtest(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
