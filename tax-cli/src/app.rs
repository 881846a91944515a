//! Running a single calculation: compute, print the report, save the record.

use std::io::{self, Write};
use std::path::PathBuf;

use rust_decimal::Decimal;
use tax_core::{PaymentFrequency, TaxEngine};
use tracing::warn;

use crate::report::{REPORT_WIDTH, Report, ReportStyle};

/// Where and whether to save report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    pub output_dir: PathBuf,
    pub enabled: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            enabled: true,
        }
    }
}

/// Calculates, writes the console report to `out`, then saves the file
/// rendering if enabled.
///
/// A failed save is reported to the user and logged; it does not fail the
/// calculation.
pub fn perform_calculation<W: Write>(
    engine: &TaxEngine,
    gross_income: Decimal,
    deductible_expenses: Decimal,
    frequency: PaymentFrequency,
    save: &SaveOptions,
    out: &mut W,
) -> io::Result<Report> {
    let report = Report::calculate(engine, gross_income, deductible_expenses, frequency);

    writeln!(out)?;
    writeln!(out, "{}", report.render(ReportStyle::Console))?;

    if save.enabled {
        match report.save(&save.output_dir) {
            Ok(path) => {
                writeln!(out)?;
                writeln!(out, "✅ Results saved to: {}", path.display())?;
            }
            Err(error) => {
                warn!(dir = %save.output_dir.display(), %error, "could not save report");
                writeln!(out)?;
                writeln!(out, "⚠️  Warning: Could not save results to file.")?;
                writeln!(out, "   Error: {error}")?;
            }
        }
    }

    out.flush()?;
    Ok(report)
}

/// A full-width `=` rule.
pub(crate) fn heavy_rule() -> String {
    "=".repeat(REPORT_WIDTH)
}

/// A full-width `-` rule.
pub(crate) fn light_rule() -> String {
    "-".repeat(REPORT_WIDTH)
}
