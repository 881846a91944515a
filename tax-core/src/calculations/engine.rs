//! The tax engine: taxable income, income tax, VAT, social security and the
//! aggregate summary, all driven by one [`TaxConfig`].
//!
//! # Calculation Flow
//!
//! | Step | Value | Base |
//! |------|-------|------|
//! | 1 | Taxable income | gross - expenses, minimum 0 |
//! | 2 | Income tax | taxable income, progressive brackets |
//! | 3 | VAT | gross income |
//! | 4 | Social security | gross income |
//! | 5 | Total taxes | income tax + social security |
//! | 6 | Total obligations | total taxes + VAT |
//! | 7 | Net income | gross - total taxes |
//!
//! VAT is excluded from total taxes and net income because it is collected
//! from clients and passed through to the tax authority.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxEngine;
//!
//! let engine = TaxEngine::default();
//! let summary = engine.summary(dec!(35000.00), dec!(5000.00));
//!
//! assert_eq!(summary.taxable_income, dec!(30000.00));
//! assert_eq!(summary.income_tax.total_tax, dec!(5900.00));
//! assert_eq!(summary.social_security.total_contribution, dec!(7000.00));
//! assert_eq!(summary.total_taxes, dec!(12900.00));
//! assert_eq!(summary.net_income, dec!(22100.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{effective_rate, floor_at_zero, round_half_up};
use crate::calculations::income_tax::{IncomeTaxResult, IncomeTaxSchedule};
use crate::calculations::payment_schedule::{
    PaymentSchedule, PaymentScheduleError, payment_schedule,
};
use crate::calculations::social_security::{SocialSecurityCalculator, SocialSecurityResult};
use crate::calculations::vat::{VatCalculator, VatResult};
use crate::{TaxConfig, TaxConfigError};

/// Calculates taxable income: gross income less deductible expenses, never
/// below zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::taxable_income;
///
/// assert_eq!(taxable_income(dec!(50000), dec!(10000)), dec!(40000.00));
/// assert_eq!(taxable_income(dec!(10000), dec!(15000)), dec!(0.00));
/// ```
pub fn taxable_income(
    gross_income: Decimal,
    deductible_expenses: Decimal,
) -> Decimal {
    round_half_up(floor_at_zero(gross_income - deductible_expenses))
}

/// Complete tax breakdown for one gross income / expenses pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub gross_income: Decimal,
    pub deductible_expenses: Decimal,
    pub taxable_income: Decimal,
    pub income_tax: IncomeTaxResult,
    pub vat: VatResult,
    pub social_security: SocialSecurityResult,

    /// Income tax plus social security. Excludes VAT.
    pub total_taxes: Decimal,

    /// Total taxes plus VAT.
    pub total_obligations: Decimal,

    /// Gross income less total taxes.
    pub net_income: Decimal,

    /// Total taxes as a percentage of gross income.
    pub effective_total_rate: Decimal,
}

/// Stateless calculator over a validated [`TaxConfig`].
#[derive(Debug, Clone)]
pub struct TaxEngine {
    config: TaxConfig,
}

impl Default for TaxEngine {
    /// Engine over the built-in 2024 rates.
    fn default() -> Self {
        Self {
            config: TaxConfig::default(),
        }
    }
}

impl TaxEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxConfigError`] if the bracket table or any rate is invalid.
    pub fn new(config: TaxConfig) -> Result<Self, TaxConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn taxable_income(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
    ) -> Decimal {
        taxable_income(gross_income, deductible_expenses)
    }

    /// Progressive income tax on `taxable_income`.
    pub fn income_tax(
        &self,
        taxable_income: Decimal,
    ) -> IncomeTaxResult {
        IncomeTaxSchedule::new(&self.config.brackets).calculate(taxable_income)
    }

    /// VAT on `gross_income`.
    pub fn vat(
        &self,
        gross_income: Decimal,
    ) -> VatResult {
        VatCalculator::new(self.config.vat_rate).calculate(gross_income)
    }

    /// Social security on `gross_income`.
    pub fn social_security(
        &self,
        gross_income: Decimal,
    ) -> SocialSecurityResult {
        SocialSecurityCalculator::new(self.config.social_security.clone()).calculate(gross_income)
    }

    /// Installment plan for `annual_tax` at the given frequency token.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentScheduleError::InvalidFrequency`] for an unknown token.
    pub fn payment_schedule(
        &self,
        annual_tax: Decimal,
        frequency: &str,
    ) -> Result<PaymentSchedule, PaymentScheduleError> {
        payment_schedule(annual_tax, frequency)
    }

    /// Calculates every tax component and the aggregate totals.
    ///
    /// Zero or negative gross income yields an all-zero summary.
    pub fn summary(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
    ) -> TaxSummary {
        if gross_income <= Decimal::ZERO {
            warn!(
                gross_income = %gross_income,
                "gross income is zero or negative; returning an empty summary"
            );
            return self.zero_summary(gross_income, deductible_expenses);
        }

        if deductible_expenses > gross_income {
            warn!(
                gross_income = %gross_income,
                deductible_expenses = %deductible_expenses,
                "expenses exceed gross income; taxable income is zero"
            );
        }

        let taxable_income = self.taxable_income(gross_income, deductible_expenses);
        let income_tax = self.income_tax(taxable_income);
        let vat = self.vat(gross_income);
        let social_security = self.social_security(gross_income);

        let total_taxes = income_tax.total_tax + social_security.total_contribution;
        let total_obligations = total_taxes + vat.vat_amount;
        let net_income = gross_income - total_taxes;

        let summary = TaxSummary {
            gross_income: round_half_up(gross_income),
            deductible_expenses: round_half_up(deductible_expenses),
            taxable_income,
            income_tax,
            vat,
            social_security,
            total_taxes: round_half_up(total_taxes),
            total_obligations: round_half_up(total_obligations),
            net_income: round_half_up(net_income),
            effective_total_rate: effective_rate(total_taxes, gross_income),
        };

        debug!(
            gross_income = %summary.gross_income,
            taxable_income = %summary.taxable_income,
            total_taxes = %summary.total_taxes,
            net_income = %summary.net_income,
            "tax summary calculated"
        );

        summary
    }

    fn zero_summary(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
    ) -> TaxSummary {
        TaxSummary {
            gross_income: round_half_up(gross_income),
            deductible_expenses: round_half_up(deductible_expenses),
            taxable_income: Decimal::ZERO,
            income_tax: self.income_tax(Decimal::ZERO),
            vat: self.vat(Decimal::ZERO),
            social_security: self.social_security(Decimal::ZERO),
            total_taxes: Decimal::ZERO,
            total_obligations: Decimal::ZERO,
            net_income: Decimal::ZERO,
            effective_total_rate: Decimal::ZERO,
        }
    }
}
