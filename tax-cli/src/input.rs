//! Parsing and validation of user-entered amounts.
//!
//! Used by the interactive prompts, the one-shot flags and batch rows, so
//! every entry point applies the same rules.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::report::{format_currency, format_whole_currency};

/// Largest amount accepted for income or expenses.
pub const MAX_REALISTIC_AMOUNT: Decimal = dec!(10000000);

/// A rejected amount. The message is shown to the user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a value.")]
    Empty,

    #[error("{field} must be a valid number.")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} must be greater than zero.")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative.")]
    Negative { field: &'static str },

    #[error(
        "Deductible expenses ({}) cannot exceed gross income ({}).",
        format_currency(*expenses),
        format_currency(*gross_income)
    )]
    ExpensesExceedIncome {
        expenses: Decimal,
        gross_income: Decimal,
    },

    #[error(
        "{field} of {} seems unrealistic. Please enter a value less than {}.",
        format_currency(*value),
        format_whole_currency(MAX_REALISTIC_AMOUNT)
    )]
    Unrealistic { field: &'static str, value: Decimal },
}

/// Strips whitespace, a leading euro sign and comma thousands separators.
fn normalize_amount_input(s: &str) -> String {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_prefix('€').unwrap_or(trimmed);
    trimmed.trim().replace(',', "")
}

/// Parses an amount such as `35000`, `35,000.50`, `€ 35,000` or `3.5e4`.
pub fn parse_amount(
    input: &str,
    field: &'static str,
) -> Result<Decimal, InputError> {
    let normalized = normalize_amount_input(input);
    if normalized.is_empty() {
        return Err(InputError::Empty);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| {
            debug!(input = %input, field, "rejected amount: {}", e);
            InputError::NotANumber {
                field,
                input: input.to_string(),
            }
        })
}

pub fn validate_positive(
    value: Decimal,
    field: &'static str,
) -> Result<Decimal, InputError> {
    if value <= Decimal::ZERO {
        return Err(InputError::NotPositive { field });
    }
    Ok(value)
}

pub fn validate_non_negative(
    value: Decimal,
    field: &'static str,
) -> Result<Decimal, InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}

pub fn validate_expenses_against_income(
    expenses: Decimal,
    gross_income: Decimal,
) -> Result<Decimal, InputError> {
    if expenses > gross_income {
        return Err(InputError::ExpensesExceedIncome {
            expenses,
            gross_income,
        });
    }
    Ok(expenses)
}

/// Rejects amounts above [`MAX_REALISTIC_AMOUNT`].
pub fn validate_realistic_amount(
    value: Decimal,
    field: &'static str,
) -> Result<Decimal, InputError> {
    if value > MAX_REALISTIC_AMOUNT {
        return Err(InputError::Unrealistic { field, value });
    }
    Ok(value)
}

/// Checks an already-parsed gross income: positive and realistic.
pub fn check_gross_income(value: Decimal) -> Result<Decimal, InputError> {
    validate_positive(value, "Gross income")
        .and_then(|v| validate_realistic_amount(v, "Gross income"))
}

/// Checks already-parsed expenses: non-negative, within gross income and
/// realistic.
pub fn check_deductible_expenses(
    value: Decimal,
    gross_income: Decimal,
) -> Result<Decimal, InputError> {
    validate_non_negative(value, "Expenses")
        .and_then(|v| validate_expenses_against_income(v, gross_income))
        .and_then(|v| validate_realistic_amount(v, "Expenses"))
}

/// Parses and checks a gross income entry.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_cli::input::{InputError, gross_income};
///
/// assert_eq!(gross_income("€35,000"), Ok(dec!(35000)));
/// assert_eq!(
///     gross_income("0"),
///     Err(InputError::NotPositive { field: "Gross income" })
/// );
/// ```
pub fn gross_income(input: &str) -> Result<Decimal, InputError> {
    check_gross_income(parse_amount(input, "Gross income")?)
}

/// Parses and checks a deductible expenses entry against `gross_income`.
pub fn deductible_expenses(
    input: &str,
    gross_income: Decimal,
) -> Result<Decimal, InputError> {
    check_deductible_expenses(parse_amount(input, "Expenses")?, gross_income)
}
