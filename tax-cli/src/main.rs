use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use tax_core::calculations::PaymentScheduleError;
use tax_core::{PaymentFrequency, TaxEngine};
use tax_cli::app::{SaveOptions, perform_calculation};
use tax_cli::interactive::Session;
use tax_cli::{batch, input, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Income tax, VAT and EFKA social security calculator for Greek freelancers.
///
/// Without `--gross` or `--batch` an interactive session starts.
#[derive(Debug, Parser)]
#[command(name = "freelancer-tax", version)]
struct Cli {
    /// TOML file overriding the built-in 2024 rates.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// CSV bracket table (`upper_bound,rate`); replaces the configured brackets.
    #[arg(long, value_name = "CSV")]
    brackets: Option<PathBuf>,

    /// Gross annual income for a one-shot calculation, e.g. `35,000`.
    #[arg(long, value_name = "AMOUNT", conflicts_with = "batch")]
    gross: Option<String>,

    /// Deductible business expenses for a one-shot calculation.
    #[arg(long, value_name = "AMOUNT", requires = "gross")]
    expenses: Option<String>,

    /// Payment frequency for a one-shot calculation: monthly, quarterly or annual.
    #[arg(long, value_name = "FREQUENCY", requires = "gross")]
    frequency: Option<String>,

    /// CSV file of calculations (`gross_income,deductible_expenses,frequency`).
    #[arg(long, value_name = "CSV")]
    batch: Option<PathBuf>,

    /// Directory where report files are written.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Do not write a report file.
    #[arg(long)]
    no_save: bool,

    /// Log filter: a level (`warn`, `debug`, ...) or an EnvFilter directive.
    /// Overrides `RUST_LOG`.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

// ─── one-shot ────────────────────────────────────────────────────────────────

fn parse_frequency(token: Option<&str>) -> Result<PaymentFrequency> {
    let Some(token) = token else {
        return Ok(PaymentFrequency::Monthly);
    };
    PaymentFrequency::parse(token.trim()).ok_or_else(|| {
        PaymentScheduleError::InvalidFrequency {
            value: token.to_string(),
            valid: &PaymentFrequency::TOKENS,
        }
        .into()
    })
}

fn run_one_shot(
    engine: &TaxEngine,
    cli: &Cli,
    gross: &str,
    save: &SaveOptions,
) -> Result<()> {
    let gross_income = input::gross_income(gross).context("invalid --gross value")?;
    let expenses = match cli.expenses.as_deref() {
        Some(raw) => input::deductible_expenses(raw, gross_income)
            .context("invalid --expenses value")?,
        None => Decimal::ZERO,
    };
    let frequency = parse_frequency(cli.frequency.as_deref())?;

    debug!(%gross_income, %expenses, %frequency, "one-shot calculation");
    let stdout = io::stdout();
    perform_calculation(
        engine,
        gross_income,
        expenses,
        frequency,
        save,
        &mut stdout.lock(),
    )?;
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = tax_data::load_config(cli.config.as_deref(), cli.brackets.as_deref())
        .context("failed to load tax rates")?;
    let engine = TaxEngine::new(config).context("invalid tax configuration")?;

    let save = SaveOptions {
        output_dir: cli.output_dir.clone(),
        enabled: !cli.no_save,
    };

    if let Some(path) = &cli.batch {
        let entries = batch::load_from_file(path)
            .with_context(|| format!("failed to load batch file '{}'", path.display()))?;
        info!(rows = entries.len(), "running batch");
        batch::run(&engine, &entries, &mut io::stdout().lock())?;
        return Ok(());
    }

    if let Some(gross) = &cli.gross {
        return run_one_shot(&engine, &cli, gross, &save);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(&engine, &save, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}
