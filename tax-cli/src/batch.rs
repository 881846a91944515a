//! Batch calculations from a CSV file.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//! Whitespace around values is trimmed.
//!
//! | Column | Required | Type | Notes |
//! |-----------------------|----------|---------|---------------------------------------------|
//! | `gross_income` | yes | decimal | must be > 0 and <= 10,000,000 |
//! | `deductible_expenses` | yes | decimal | must be >= 0 and not exceed `gross_income` |
//! | `frequency` | no | string | `monthly`, `quarterly` or `annual`; empty or missing means monthly |
//!
//! ```csv
//! gross_income,deductible_expenses,frequency
//! 35000,5000,quarterly
//! 12000.50,0,
//! ```
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::calculations::PaymentSchedule;
use tax_core::{PaymentFrequency, TaxEngine};
use tracing::info;

use crate::input::{InputError, check_deductible_expenses, check_gross_income};
use crate::report::format_currency;

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_income: Decimal,
    deductible_expenses: Decimal,
    frequency: Option<String>,
}

/// One validated calculation request from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub gross_income: Decimal,
    pub deductible_expenses: Decimal,
    pub frequency: PaymentFrequency,
}

/// Errors that can occur while loading a batch file.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Bad CSV structure, a missing required column or a non-numeric amount.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("unrecognised frequency '{value}' on row {row}, must be one of: {}", PaymentFrequency::TOKENS.join(", "))]
    InvalidFrequency { value: String, row: usize },

    #[error("row {row}: {source}")]
    InvalidAmount {
        row: usize,
        #[source]
        source: InputError,
    },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<BatchEntry, BatchError> {
    let frequency = match row.frequency.as_deref() {
        None | Some("") => PaymentFrequency::Monthly,
        Some(token) => {
            PaymentFrequency::parse(token).ok_or_else(|| BatchError::InvalidFrequency {
                value: token.to_string(),
                row: row_number,
            })?
        }
    };

    let invalid = |source| BatchError::InvalidAmount {
        row: row_number,
        source,
    };
    let gross_income = check_gross_income(row.gross_income).map_err(invalid)?;
    let deductible_expenses =
        check_deductible_expenses(row.deductible_expenses, gross_income).map_err(invalid)?;

    Ok(BatchEntry {
        row: row_number,
        gross_income,
        deductible_expenses,
        frequency,
    })
}

/// Parses batch CSV text. Rows are returned in file order.
///
/// # Errors
///
/// * [`BatchError::Parse`] if the CSV is structurally invalid or a required
///   field cannot be deserialised.
/// * [`BatchError::InvalidFrequency`] for an unknown frequency token.
/// * [`BatchError::InvalidAmount`] for an amount the prompts would reject.
pub fn load_from_str(input: &str) -> Result<Vec<BatchEntry>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<BatchEntry>, BatchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = load_from_str(&contents)?;
    info!(path = %path.display(), rows = entries.len(), "batch file loaded");
    Ok(entries)
}

/// One-line result for a batch entry.
pub fn summary_line(
    engine: &TaxEngine,
    entry: &BatchEntry,
) -> String {
    let summary = engine.summary(entry.gross_income, entry.deductible_expenses);
    let plan = PaymentSchedule::new(summary.total_taxes, entry.frequency);

    format!(
        "Row {}: gross {} | taxable {} | income tax {} | EFKA {} | total taxes {} | net {} | {} x {} {}",
        entry.row,
        format_currency(summary.gross_income),
        format_currency(summary.taxable_income),
        format_currency(summary.income_tax.total_tax),
        format_currency(summary.social_security.total_contribution),
        format_currency(summary.total_taxes),
        format_currency(summary.net_income),
        plan.number_of_payments,
        format_currency(plan.payment_amount),
        entry.frequency,
    )
}

/// Writes one summary line per entry to `out`.
pub fn run<W: Write>(
    engine: &TaxEngine,
    entries: &[BatchEntry],
    out: &mut W,
) -> std::io::Result<()> {
    for entry in entries {
        writeln!(out, "{}", summary_line(engine, entry))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
gross_income,deductible_expenses
35000,5000
";

    const MULTI_ROW_CSV: &str = "\
gross_income,deductible_expenses,frequency
35000,5000,quarterly
12000.50,0,
60000,10000,Annual
";

    // =========================================================================
    // load_from_str tests
    // =========================================================================

    #[test]
    fn test_missing_frequency_column_defaults_to_monthly() {
        let entries = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(
            entries,
            vec![BatchEntry {
                row: 1,
                gross_income: dec!(35000),
                deductible_expenses: dec!(5000),
                frequency: PaymentFrequency::Monthly,
            }]
        );
    }

    #[test]
    fn test_multi_row_order_and_frequencies() {
        let entries = load_from_str(MULTI_ROW_CSV).expect("should parse");

        let frequencies: Vec<PaymentFrequency> = entries.iter().map(|e| e.frequency).collect();
        assert_eq!(
            frequencies,
            vec![
                PaymentFrequency::Quarterly,
                PaymentFrequency::Monthly,
                PaymentFrequency::Annual,
            ]
        );
        assert_eq!(entries[1].gross_income, dec!(12000.50));
        assert_eq!(entries[2].row, 3);
    }

    #[test]
    fn test_column_order_and_whitespace_do_not_matter() {
        let csv = "\
frequency , deductible_expenses , gross_income
 annual , 100 , 2000
";
        let entries = load_from_str(csv).expect("should parse");

        assert_eq!(entries[0].frequency, PaymentFrequency::Annual);
        assert_eq!(entries[0].gross_income, dec!(2000));
        assert_eq!(entries[0].deductible_expenses, dec!(100));
    }

    #[test]
    fn test_invalid_frequency_reports_row() {
        let csv = "\
gross_income,deductible_expenses,frequency
1000,0,monthly
2000,0,weekly
";
        match load_from_str(csv).unwrap_err() {
            BatchError::InvalidFrequency { value, row } => {
                assert_eq!(value, "weekly");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidFrequency, got {:?}", other),
        }
    }

    #[test]
    fn test_expenses_above_income_rejected() {
        let csv = "gross_income,deductible_expenses\n1000,1500\n";

        let err = load_from_str(csv).unwrap_err();

        assert_eq!(
            err.to_string(),
            "row 1: Deductible expenses (€1,500.00) cannot exceed gross income (€1,000.00)."
        );
    }

    #[test]
    fn test_zero_income_rejected() {
        let csv = "gross_income,deductible_expenses\n0,0\n";

        match load_from_str(csv).unwrap_err() {
            BatchError::InvalidAmount { row, source } => {
                assert_eq!(row, 1);
                assert_eq!(source, InputError::NotPositive { field: "Gross income" });
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column_returns_parse_error() {
        let csv = "gross_income\n1000\n";

        assert!(matches!(load_from_str(csv), Err(BatchError::Parse(_))));
    }

    #[test]
    fn test_header_only_yields_no_entries() {
        let entries = load_from_str("gross_income,deductible_expenses\n").expect("valid");

        assert!(entries.is_empty());
    }

    // =========================================================================
    // run tests
    // =========================================================================

    #[test]
    fn test_run_writes_one_line_per_entry() {
        let entries = load_from_str(MULTI_ROW_CSV).expect("should parse");
        let mut out = Vec::new();

        run(&TaxEngine::default(), &entries, &mut out).expect("in-memory write");

        let text = String::from_utf8(out).expect("utf-8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Row 1: gross €35,000.00 | taxable €30,000.00 | income tax €5,900.00 | \
             EFKA €7,000.00 | total taxes €12,900.00 | net €22,100.00 | 4 x €3,225.00 quarterly"
        );
    }
}
