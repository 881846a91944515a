//! Menu-driven terminal session.
//!
//! The session reads from any [`BufRead`] and writes to any [`Write`], so the
//! whole flow can be driven from memory in tests. End of input at any prompt
//! ends the session cleanly.

use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use tax_core::{PaymentFrequency, TaxEngine};
use tracing::{debug, info};

use crate::app::{SaveOptions, heavy_rule, light_rule, perform_calculation};
use crate::input::{self, InputError};
use crate::report::format_currency;

/// Outcome of a prompt: a value, or end of input.
type Prompted<T> = io::Result<Option<T>>;

pub struct Session<'a, R, W> {
    engine: &'a TaxEngine,
    save: &'a SaveOptions,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        engine: &'a TaxEngine,
        save: &'a SaveOptions,
        input: R,
        output: W,
    ) -> Self {
        Self {
            engine,
            save,
            input,
            output,
        }
    }

    /// Runs the main menu loop until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.header()?;

        loop {
            self.main_menu()?;
            let Some(choice) = self.read_line("Enter your choice (1-2): ")? else {
                self.interrupted()?;
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    if self.new_calculation()?.is_none() {
                        self.cancelled()?;
                        return Ok(());
                    }
                }
                "2" => {
                    writeln!(self.output)?;
                    writeln!(self.output, "{}", heavy_rule())?;
                    writeln!(
                        self.output,
                        "Thank you for using the Greek Freelancer Tax Calculator!"
                    )?;
                    writeln!(self.output, "{}", heavy_rule())?;
                    writeln!(self.output)?;
                    info!("session ended by user");
                    return Ok(());
                }
                _ => writeln!(self.output, "❌ Invalid choice. Please enter 1 or 2.")?,
            }
        }
    }

    /// One pass through the calculation workflow. `None` on end of input.
    fn new_calculation(&mut self) -> Prompted<()> {
        self.banner("NEW TAX CALCULATION")?;

        let Some(gross_income) = self.prompt_gross_income()? else {
            return Ok(None);
        };
        let Some(expenses) = self.prompt_expenses(gross_income)? else {
            return Ok(None);
        };
        let Some(frequency) = self.prompt_frequency()? else {
            return Ok(None);
        };

        match self.confirm(gross_income, expenses, frequency)? {
            Some(true) => {
                self.banner("CALCULATING...")?;
                perform_calculation(
                    self.engine,
                    gross_income,
                    expenses,
                    frequency,
                    self.save,
                    &mut self.output,
                )?;
            }
            Some(false) => {
                writeln!(self.output)?;
                writeln!(
                    self.output,
                    "❌ Calculation cancelled. Returning to main menu."
                )?;
            }
            None => return Ok(None),
        }
        Ok(Some(()))
    }

    fn prompt_gross_income(&mut self) -> Prompted<Decimal> {
        self.section("GROSS ANNUAL INCOME")?;
        writeln!(
            self.output,
            "Enter your total gross annual income (excluding VAT)."
        )?;
        writeln!(self.output, "Example: 50000 for €50,000")?;
        writeln!(self.output, "{}", light_rule())?;

        loop {
            let Some(line) = self.read_line("Gross annual income (€): ")? else {
                return Ok(None);
            };
            match input::gross_income(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => self.reject(&err)?,
            }
        }
    }

    fn prompt_expenses(
        &mut self,
        gross_income: Decimal,
    ) -> Prompted<Decimal> {
        self.section("DEDUCTIBLE BUSINESS EXPENSES")?;
        writeln!(
            self.output,
            "Enter your total deductible business expenses for the year."
        )?;
        writeln!(
            self.output,
            "This includes office rent, equipment, software, etc."
        )?;
        writeln!(
            self.output,
            "Maximum allowed: {}",
            format_currency(gross_income)
        )?;
        writeln!(self.output, "Enter 0 if you have no deductible expenses.")?;
        writeln!(self.output, "{}", light_rule())?;

        loop {
            let Some(line) = self.read_line("Deductible expenses (€): ")? else {
                return Ok(None);
            };
            match input::deductible_expenses(&line, gross_income) {
                Ok(value) => return Ok(Some(value)),
                Err(InputError::Empty) => writeln!(
                    self.output,
                    "❌ Please enter a value (or 0 for no expenses)."
                )?,
                Err(err) => self.reject(&err)?,
            }
        }
    }

    fn prompt_frequency(&mut self) -> Prompted<PaymentFrequency> {
        self.section("SELECT PAYMENT FREQUENCY")?;
        writeln!(self.output, "1. Monthly (12 payments per year)")?;
        writeln!(self.output, "2. Quarterly (4 payments per year)")?;
        writeln!(self.output, "3. Annual (1 payment per year)")?;
        writeln!(self.output, "{}", light_rule())?;

        loop {
            let Some(choice) = self.read_line("Enter your choice (1-3): ")? else {
                return Ok(None);
            };
            let frequency = match choice.as_str() {
                "1" => PaymentFrequency::Monthly,
                "2" => PaymentFrequency::Quarterly,
                "3" => PaymentFrequency::Annual,
                _ => {
                    writeln!(self.output, "❌ Invalid choice. Please enter 1, 2, or 3.")?;
                    continue;
                }
            };
            return Ok(Some(frequency));
        }
    }

    fn confirm(
        &mut self,
        gross_income: Decimal,
        expenses: Decimal,
        frequency: PaymentFrequency,
    ) -> Prompted<bool> {
        self.banner("CONFIRM YOUR INPUTS")?;
        writeln!(
            self.output,
            "Gross Annual Income:       {}",
            format_currency(gross_income)
        )?;
        writeln!(
            self.output,
            "Deductible Expenses:       {}",
            format_currency(expenses)
        )?;
        writeln!(self.output, "Payment Frequency:         {}", frequency.label())?;
        writeln!(self.output, "{}", heavy_rule())?;

        loop {
            let Some(answer) = self.read_line("\nProceed with calculation? (yes/no): ")? else {
                return Ok(None);
            };
            match answer.to_ascii_lowercase().as_str() {
                "yes" | "y" => return Ok(Some(true)),
                "no" | "n" => return Ok(Some(false)),
                _ => writeln!(self.output, "❌ Please enter 'yes' or 'no'.")?,
            }
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` at end of input.
    fn read_line(
        &mut self,
        prompt: &str,
    ) -> Prompted<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            debug!("end of input");
            return Ok(None);
        }
        // Undecodable bytes become U+FFFD, which every prompt rejects.
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim().to_string()))
    }

    fn reject(
        &mut self,
        err: &InputError,
    ) -> io::Result<()> {
        debug!(%err, "input rejected");
        writeln!(self.output, "❌ {err}")
    }

    fn header(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", heavy_rule())?;
        writeln!(self.output, "  GREEK FREELANCER TAX CALCULATOR")?;
        writeln!(self.output, "{}", heavy_rule())
    }

    fn main_menu(&mut self) -> io::Result<()> {
        self.section("MAIN MENU")?;
        writeln!(self.output, "1. New Calculation")?;
        writeln!(self.output, "2. Exit")?;
        writeln!(self.output, "{}", light_rule())
    }

    fn banner(
        &mut self,
        title: &str,
    ) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", heavy_rule())?;
        writeln!(self.output, "{title}")?;
        writeln!(self.output, "{}", heavy_rule())
    }

    fn section(
        &mut self,
        title: &str,
    ) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", light_rule())?;
        writeln!(self.output, "{title}")?;
        writeln!(self.output, "{}", light_rule())
    }

    fn cancelled(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output)?;
        writeln!(self.output, "❌ Input cancelled.")?;
        self.output.flush()
    }

    fn interrupted(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output)?;
        writeln!(self.output, "{}", heavy_rule())?;
        writeln!(self.output, "Application interrupted. Exiting gracefully...")?;
        writeln!(self.output, "{}", heavy_rule())?;
        self.output.flush()
    }

    /// Consumes the session, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run_session(script: &str) -> String {
        run_session_bytes(script.as_bytes())
    }

    fn run_session_bytes(script: &[u8]) -> String {
        let engine = TaxEngine::default();
        let save = SaveOptions {
            enabled: false,
            ..SaveOptions::default()
        };
        let mut session = Session::new(&engine, &save, script, Vec::new());

        session.run().expect("in-memory session");

        String::from_utf8(session.into_output()).expect("utf-8")
    }

    // =========================================================================
    // menu tests
    // =========================================================================

    #[test]
    fn exit_from_main_menu() {
        let text = run_session("2\n");

        assert!(text.contains("  GREEK FREELANCER TAX CALCULATOR"));
        assert!(text.contains("Thank you for using the Greek Freelancer Tax Calculator!"));
    }

    #[test]
    fn invalid_menu_choice_reprompts() {
        let text = run_session("7\n2\n");

        assert_eq!(text.matches("❌ Invalid choice. Please enter 1 or 2.").count(), 1);
        assert_eq!(text.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn end_of_input_at_menu_exits_gracefully() {
        let text = run_session("");

        assert!(text.contains("Application interrupted. Exiting gracefully..."));
    }

    // =========================================================================
    // workflow tests
    // =========================================================================

    #[test]
    fn full_calculation_then_exit() {
        let text = run_session("1\n35,000\n5000\n2\ny\n2\n");

        assert!(text.contains("CONFIRM YOUR INPUTS"));
        assert!(text.contains("Payment Frequency:         Quarterly"));
        assert!(text.contains("PAYMENT SCHEDULE (QUARTERLY)"));
        assert!(text.contains(&format!("{:<35} {:>34}", "Net Income (After Taxes):", "€22,100.00")));
        assert!(text.contains("Thank you for using"));
    }

    #[test]
    fn invalid_entries_reprompt() {
        let text = run_session("1\n\nabc\n-5\n50000\n60000\n\n1000\n9\n3\nmaybe\nno\n2\n");

        assert!(text.contains("❌ Please enter a value."));
        assert!(text.contains("❌ Gross income must be a valid number."));
        assert!(text.contains("❌ Gross income must be greater than zero."));
        assert!(text.contains(
            "❌ Deductible expenses (€60,000.00) cannot exceed gross income (€50,000.00)."
        ));
        assert!(text.contains("❌ Please enter a value (or 0 for no expenses)."));
        assert!(text.contains("❌ Invalid choice. Please enter 1, 2, or 3."));
        assert!(text.contains("❌ Please enter 'yes' or 'no'."));
        assert!(text.contains("❌ Calculation cancelled. Returning to main menu."));
        assert!(!text.contains("TAX CALCULATION RESULTS"));
    }

    #[test]
    fn non_utf8_entry_reprompts() {
        let text = run_session_bytes(b"1\n\xff\xfe\n50000\n0\n1\ny\n2\n");

        assert!(text.contains("❌ Gross income must be a valid number."));
        assert!(text.contains("PAYMENT SCHEDULE (MONTHLY)"));
        assert!(text.contains("Thank you for using"));
    }

    #[test]
    fn end_of_input_mid_workflow_cancels() {
        let text = run_session("1\n40000\n");

        assert!(text.contains("DEDUCTIBLE BUSINESS EXPENSES"));
        assert!(text.contains("❌ Input cancelled."));
        assert!(!text.contains("Application interrupted"));
    }
}
