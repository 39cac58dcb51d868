//! Premium Estimator CLI
//!
//! Quotes a single premium, runs an age/period batch grid, or prints a
//! product's rate sheet. Rates come from the built-in tables unless a
//! directory is given with --rates-dir or PREMIUM_RATES_PATH.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use premium_estimator::premium::{batch_calculate, parse_range, BatchReport};
use premium_estimator::{
    format_currency, format_rate, PremiumCalculator, PremiumRequest, PremiumResult, RateSheet,
    RateTables,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "premium-estimator", about = "Estimate insurance premiums from rate tables")]
struct Cli {
    /// Directory holding products.csv, base_rates.csv and loading_rates.csv
    #[arg(long, global = true)]
    rates_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the premium for one set of inputs
    Quote {
        #[arg(long)]
        product: String,
        #[arg(long)]
        gender: String,
        #[arg(long, allow_hyphen_values = true)]
        age: i32,
        #[arg(long, allow_hyphen_values = true)]
        period: i32,
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
    },
    /// Estimate premiums over ranges of entry ages and insurance periods
    Batch {
        #[arg(long)]
        product: String,
        #[arg(long)]
        gender: String,
        /// Entry ages as start-end, e.g. 0-5
        #[arg(long, allow_hyphen_values = true)]
        ages: String,
        /// Insurance periods as start-end, e.g. 10-20
        #[arg(long, allow_hyphen_values = true)]
        periods: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
    },
    /// Print the rate sheet of a product
    Rates {
        #[arg(long)]
        product: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse<'a> {
    request: &'a PremiumRequest,
    result: &'a PremiumResult,
    calculated_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse<'a> {
    report: &'a BatchReport,
    calculated_at: DateTime<Utc>,
}

fn load_tables(rates_dir: Option<PathBuf>) -> Result<RateTables> {
    let dir = rates_dir.or_else(|| env::var("PREMIUM_RATES_PATH").ok().map(PathBuf::from));

    match dir {
        Some(dir) => RateTables::from_csv_path(&dir)
            .with_context(|| format!("loading rate tables from {}", dir.display())),
        None => {
            log::debug!("Using built-in rate tables");
            Ok(RateTables::default_pricing())
        }
    }
}

fn print_result(result: &PremiumResult) {
    match result {
        PremiumResult::Success(b) => {
            println!("Estimated premium");
            println!("  Monthly:        {}", format_currency(b.monthly_premium));
            println!("  Annual:         {}", format_currency(b.annual_premium));
            println!("  Insured amount: {}", format_currency(b.insured_amount));
            println!("  Base rate:      {}", format_rate(b.base_rate));
            println!("  Loading rate:   {}", format_rate(b.loading_rate));
            println!("  Total rate:     {}", format_rate(b.total_rate));
        }
        PremiumResult::Failure { message, .. } => {
            println!("Error: {}", message);
        }
    }
}

fn print_batch(report: &BatchReport) {
    println!(
        "Product {} ({}), insured amount {}",
        report.product_id,
        report.gender,
        format_currency(report.insured_amount)
    );
    println!("{:>4} {:>6} {:>14} {:>14} {:>10}", "Age", "Period", "Monthly", "Annual", "Rate");
    println!("{}", "-".repeat(52));

    for cell in &report.cells {
        match &cell.result {
            PremiumResult::Success(b) => println!(
                "{:>4} {:>6} {:>14} {:>14} {:>10}",
                cell.entry_age,
                cell.insurance_period,
                format_currency(b.monthly_premium),
                format_currency(b.annual_premium),
                format_rate(b.total_rate),
            ),
            PremiumResult::Failure { message, .. } => println!(
                "{:>4} {:>6} {}",
                cell.entry_age, cell.insurance_period, message
            ),
        }
    }

    println!("\n{} succeeded, {} failed", report.successes, report.failures);
}

fn print_sheet(sheet: &RateSheet) {
    match &sheet.product_name {
        Some(name) => println!("Product {}: {}", sheet.product_id, name),
        None => println!("Product {}", sheet.product_id),
    }
    println!("Loading rate: {}", format_rate(sheet.loading_rate));
    println!("{:>6} {:>4} {:>10} {:>10}", "Gender", "Age", "Base", "Total");

    for row in &sheet.rows {
        println!(
            "{:>6} {:>4} {:>10} {:>10}",
            row.gender.code(),
            row.age_key,
            format_rate(row.base_rate),
            format_rate(row.total_rate),
        );
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let tables = load_tables(cli.rates_dir)?;
    let calculator = PremiumCalculator::new(&tables);

    match cli.command {
        Command::Quote { product, gender, age, period, amount } => {
            let request = PremiumRequest::new(product, gender, age, period, amount);
            let result = calculator.calculate(&request);

            if cli.json {
                let response = QuoteResponse {
                    request: &request,
                    result: &result,
                    calculated_at: Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_result(&result);
            }

            Ok(if result.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Batch { product, gender, ages, periods, amount } => {
            let limits = calculator.limits();
            let ages = parse_range(&ages, limits.entry_ages()).context("parsing --ages")?;
            let periods =
                parse_range(&periods, limits.insurance_periods()).context("parsing --periods")?;

            let report = batch_calculate(&calculator, &product, &gender, ages, periods, amount);

            if cli.json {
                let response = BatchResponse {
                    report: &report,
                    calculated_at: Utc::now(),
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_batch(&report);
            }

            Ok(if report.failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Rates { product } => {
            let sheet = tables
                .rate_sheet(&product)
                .with_context(|| format!("unknown product '{}'", product))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&sheet)?);
            } else {
                print_sheet(&sheet);
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
