//! Progressive income tax over a bracket table.
//!
//! Each bracket taxes only the slice of income that falls inside it. With
//! the default 2024 table:
//!
//! | Lower | Upper | Rate |
//! |-------|-------|------|
//! | €0 | €10,000 | 9% |
//! | €10,000 | €20,000 | 22% |
//! | €20,000 | €30,000 | 28% |
//! | €30,000 | €40,000 | 36% |
//! | €40,000 | unbounded | 44% |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxConfig;
//! use tax_core::calculations::IncomeTaxSchedule;
//!
//! let config = TaxConfig::default();
//! let schedule = IncomeTaxSchedule::new(&config.brackets);
//!
//! // €10,000 @ 9% + €5,000 @ 22%
//! let result = schedule.calculate(dec!(15000.00));
//!
//! assert_eq!(result.total_tax, dec!(2000.00));
//! assert_eq!(result.effective_rate, dec!(13.33));
//! assert_eq!(result.bracket_breakdown.len(), 2);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::common::{as_percent, effective_rate, round_half_up};

/// Tax charged within a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketBreakdown {
    /// Income level where this bracket starts (exclusive).
    pub lower_bound: Decimal,

    /// Income level where this bracket ends (inclusive), `None` if unbounded.
    pub upper_bound: Option<Decimal>,

    /// Bracket rate as a percentage, e.g. `22` for 22%.
    pub rate: Decimal,

    /// Portion of taxable income that fell inside this bracket.
    pub taxable_amount: Decimal,

    /// Tax charged on `taxable_amount`.
    pub tax_amount: Decimal,
}

/// Result of the progressive income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    /// Total income tax owed.
    pub total_tax: Decimal,

    /// Total tax as a percentage of taxable income.
    pub effective_rate: Decimal,

    /// Per-bracket detail, lowest bracket first. Brackets the income never
    /// reached are not listed.
    pub bracket_breakdown: Vec<BracketBreakdown>,
}

impl IncomeTaxResult {
    /// Result for zero taxable income: no tax and no brackets.
    pub fn zero() -> Self {
        Self {
            total_tax: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            bracket_breakdown: Vec::new(),
        }
    }
}

/// Calculator for progressive income tax.
///
/// The bracket table must be sorted by upper bound with an unbounded final
/// bracket; [`TaxConfig::validate`](crate::TaxConfig::validate) checks this.
#[derive(Debug, Clone)]
pub struct IncomeTaxSchedule<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> IncomeTaxSchedule<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Calculates income tax on `taxable_income`.
    ///
    /// Tax is accumulated at full precision and rounded once at the end; the
    /// per-bracket amounts in the breakdown are rounded individually for
    /// display.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> IncomeTaxResult {
        if taxable_income <= Decimal::ZERO {
            return IncomeTaxResult::zero();
        }

        let mut total_tax = Decimal::ZERO;
        let mut remaining = taxable_income;
        let mut lower_bound = Decimal::ZERO;
        let mut bracket_breakdown = Vec::new();

        for bracket in self.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }

            let slice = self.taxable_in_bracket(remaining, lower_bound, bracket);
            let tax = slice * bracket.rate;
            total_tax += tax;

            bracket_breakdown.push(BracketBreakdown {
                lower_bound,
                upper_bound: bracket.upper_bound,
                rate: as_percent(bracket.rate),
                taxable_amount: round_half_up(slice),
                tax_amount: round_half_up(tax),
            });

            remaining -= slice;
            if let Some(upper) = bracket.upper_bound {
                lower_bound = upper;
            }
        }

        let result = IncomeTaxResult {
            total_tax: round_half_up(total_tax),
            effective_rate: effective_rate(total_tax, taxable_income),
            bracket_breakdown,
        };

        debug!(
            taxable_income = %taxable_income,
            total_tax = %result.total_tax,
            effective_rate = %result.effective_rate,
            brackets_used = result.bracket_breakdown.len(),
            "income tax calculated"
        );

        result
    }

    /// Portion of `remaining` income that falls inside `bracket`.
    fn taxable_in_bracket(
        &self,
        remaining: Decimal,
        lower_bound: Decimal,
        bracket: &TaxBracket,
    ) -> Decimal {
        match bracket.upper_bound {
            Some(upper) => remaining.min(upper - lower_bound),
            None => remaining,
        }
    }
}
