//! Plain-text rendering of a completed tax calculation.
//!
//! A [`Report`] is rendered once for the terminal and once for the saved
//! record. Both renderings carry the same figures; only the title and the
//! section rules differ (see [`ReportStyle`]).

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use tax_core::calculations::common::{as_percent, round_half_up};
use tax_core::calculations::{BracketBreakdown, PaymentSchedule, TaxSummary};
use tax_core::{PaymentFrequency, SocialSecurityRates, TaxEngine};
use tracing::{debug, info};

/// Width of every rule line in the report.
pub const REPORT_WIDTH: usize = 70;

const LABEL_WIDTH: usize = 35;
const VALUE_WIDTH: usize = 34;
const BRACKET_LABEL_WIDTH: usize = 30;

/// Formats an amount as euros with thousands separators, e.g. `€1,234.56`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::report::format_currency;
///
/// assert_eq!(format_currency(dec!(1234567.891)), "€1,234,567.89");
/// assert_eq!(format_currency(dec!(0)), "€0.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{}€{}.{cents}", sign_of(rounded), group_thousands(whole))
}

/// Formats an amount as whole euros, e.g. `€10,000,000`.
pub fn format_whole_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    format!("{}€{}", sign_of(rounded), group_thousands(&digits))
}

fn sign_of(rounded: Decimal) -> &'static str {
    if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    }
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a percentage without trailing zeros: `24%`, `13.33%`.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

/// Which rendering of the report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    /// Terminal output, box-drawing section rules.
    Console,
    /// Saved record, ASCII section rules and a longer title.
    File,
}

impl ReportStyle {
    fn title(self) -> &'static str {
        match self {
            Self::Console => "TAX CALCULATION RESULTS",
            Self::File => "GREEK FREELANCER TAX CALCULATION RESULTS",
        }
    }

    fn section_rule(self) -> String {
        let ch = match self {
            Self::Console => '─',
            Self::File => '-',
        };
        std::iter::repeat_n(ch, REPORT_WIDTH).collect()
    }
}

/// A finished calculation: the summary, its payment plan and the rates that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: TaxSummary,
    pub schedule: PaymentSchedule,
    pub social_security_rates: SocialSecurityRates,
    pub generated_at: NaiveDateTime,
}

impl Report {
    /// Runs the engine and splits total taxes (VAT excluded) into installments.
    pub fn calculate(
        engine: &TaxEngine,
        gross_income: Decimal,
        deductible_expenses: Decimal,
        frequency: PaymentFrequency,
    ) -> Self {
        Self::calculate_at(
            engine,
            gross_income,
            deductible_expenses,
            frequency,
            Local::now().naive_local(),
        )
    }

    /// Same as [`Report::calculate`] with a fixed timestamp.
    pub fn calculate_at(
        engine: &TaxEngine,
        gross_income: Decimal,
        deductible_expenses: Decimal,
        frequency: PaymentFrequency,
        generated_at: NaiveDateTime,
    ) -> Self {
        let summary = engine.summary(gross_income, deductible_expenses);
        let schedule = PaymentSchedule::new(summary.total_taxes, frequency);

        debug!(
            total_taxes = %summary.total_taxes,
            frequency = %frequency,
            payment_amount = %schedule.payment_amount,
            "report calculated"
        );

        Self {
            summary,
            schedule,
            social_security_rates: engine.config().social_security.clone(),
            generated_at,
        }
    }

    /// Name of the saved record, `tax_calculation_YYYY-MM-DD_HHMMSS.txt`.
    pub fn file_name(&self) -> String {
        format!(
            "tax_calculation_{}.txt",
            self.generated_at.format("%Y-%m-%d_%H%M%S")
        )
    }

    /// Writes the file rendering into `dir` and returns the path written.
    pub fn save(
        &self,
        dir: &Path,
    ) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render(ReportStyle::File))?;
        info!(path = %path.display(), "report saved");
        Ok(path)
    }

    /// Renders the full report. Lines are joined with `\n`, no trailing newline.
    pub fn render(
        &self,
        style: ReportStyle,
    ) -> String {
        let s = &self.summary;
        let heavy = "=".repeat(REPORT_WIDTH);
        let mut lines: Vec<String> = Vec::new();

        lines.push(heavy.clone());
        lines.push(style.title().to_string());
        lines.push(heavy.clone());
        lines.push(format!(
            "Calculation Date: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        lines.push(heavy.clone());

        section(&mut lines, style, "INPUT PARAMETERS");
        lines.push(row("Gross Annual Income:", format_currency(s.gross_income)));
        lines.push(row(
            "Deductible Business Expenses:",
            format_currency(s.deductible_expenses),
        ));
        lines.push(row("Payment Frequency:", self.schedule.frequency.label()));

        section(&mut lines, style, "INCOME BREAKDOWN");
        lines.push(row("Gross Income:", format_currency(s.gross_income)));
        lines.push(row(
            "Less: Deductible Expenses:",
            format_currency(s.deductible_expenses),
        ));
        lines.push(row("Taxable Income:", format_currency(s.taxable_income)));

        section(&mut lines, style, "INCOME TAX BREAKDOWN BY BRACKET");
        if s.income_tax.bracket_breakdown.is_empty() {
            lines.push("  No income tax (taxable income is zero)".to_string());
        } else {
            for bracket in &s.income_tax.bracket_breakdown {
                push_bracket(&mut lines, bracket);
            }
        }
        lines.push(row(
            "Total Income Tax:",
            format_currency(s.income_tax.total_tax),
        ));
        lines.push(rate_row(
            "Effective Income Tax Rate:",
            s.income_tax.effective_rate,
        ));

        section(&mut lines, style, "VAT AND SOCIAL SECURITY");
        lines.push(row(
            &format!("VAT ({}):", format_percent(s.vat.rate)),
            format_currency(s.vat.vat_amount),
        ));
        lines.push(format!(
            "  {:<LABEL_WIDTH$}",
            "(To be collected from clients)"
        ));
        lines.push(String::new());
        lines.push(row(
            &format!(
                "Social Security (EFKA - {}):",
                format_percent(s.social_security.rate)
            ),
            format_currency(s.social_security.total_contribution),
        ));
        lines.push(format!(
            "  {}",
            row(
                &format!(
                    "Main Insurance ({}):",
                    format_percent(as_percent(self.social_security_rates.main_rate))
                ),
                format_currency(s.social_security.main_insurance),
            )
        ));
        lines.push(format!(
            "  {}",
            row(
                &format!(
                    "Additional Contributions ({}):",
                    format_percent(as_percent(self.social_security_rates.additional_rate))
                ),
                format_currency(s.social_security.additional_contributions),
            )
        ));

        let plan = &self.schedule;
        section(
            &mut lines,
            style,
            &format!(
                "PAYMENT SCHEDULE ({})",
                plan.frequency.as_str().to_uppercase()
            ),
        );
        lines.push(row(
            "Total Annual Tax (excl. VAT):",
            format_currency(plan.annual_total),
        ));
        lines.push(row("Number of Payments:", plan.number_of_payments));
        lines.push(row(
            "Amount per Payment:",
            format_currency(plan.payment_amount),
        ));
        if plan.number_of_payments > 1 {
            lines.push(String::new());
            lines.push("  Payment Schedule:".to_string());
            for payment in &plan.schedule {
                let label = format!("Payment #{}", payment.period_number);
                lines.push(format!(
                    "    {label:<BRACKET_LABEL_WIDTH$} {:>VALUE_WIDTH$}",
                    format_currency(payment.payment_amount)
                ));
            }
        }

        lines.push(String::new());
        lines.push(heavy.clone());
        lines.push("SUMMARY".to_string());
        lines.push(heavy.clone());
        lines.push(row("Gross Income:", format_currency(s.gross_income)));
        lines.push(row(
            "Total Taxes (Income Tax + EFKA):",
            format_currency(s.total_taxes),
        ));
        lines.push(rate_row("Effective Total Tax Rate:", s.effective_total_rate));
        lines.push(row(
            "Net Income (After Taxes):",
            format_currency(s.net_income),
        ));
        lines.push(heavy.clone());
        lines.push(String::new());
        lines.push(format!(
            "Note: VAT of {} should be collected from clients",
            format_currency(s.vat.vat_amount)
        ));
        lines.push("      and remitted to tax authorities separately.".to_string());
        lines.push(heavy);

        lines.join("\n")
    }
}

fn section(
    lines: &mut Vec<String>,
    style: ReportStyle,
    title: &str,
) {
    let rule = style.section_rule();
    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(title.to_string());
    lines.push(rule);
}

fn row(
    label: &str,
    value: impl Display,
) -> String {
    format!("{label:<LABEL_WIDTH$} {value:>VALUE_WIDTH$}")
}

fn rate_row(
    label: &str,
    percent: Decimal,
) -> String {
    let value = format!("{percent:.2}");
    format!("{label:<LABEL_WIDTH$} {value:>width$}%", width = VALUE_WIDTH - 1)
}

fn push_bracket(
    lines: &mut Vec<String>,
    bracket: &BracketBreakdown,
) {
    let lower = format_currency(bracket.lower_bound);
    let range = match bracket.upper_bound {
        Some(upper) => format!("{lower} - {}", format_currency(upper)),
        None => format!("{lower}+"),
    };
    let rate = format_percent(bracket.rate);

    lines.push(format!("  {range:<BRACKET_LABEL_WIDTH$} @ {rate:>4}"));
    lines.push(format!(
        "    {:<BRACKET_LABEL_WIDTH$} {:>BRACKET_LABEL_WIDTH$}",
        "Taxable amount:",
        format_currency(bracket.taxable_amount)
    ));
    lines.push(format!(
        "    {:<BRACKET_LABEL_WIDTH$} {:>BRACKET_LABEL_WIDTH$}",
        "Tax on this bracket:",
        format_currency(bracket.tax_amount)
    ));
    lines.push(String::new());
}
