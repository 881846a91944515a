//! Flat-rate value-added tax.
//!
//! VAT is collected from clients on top of the invoiced amount and remitted
//! to the tax authority; it is not part of the freelancer's own tax burden.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{as_percent, round_half_up};

/// VAT owed on a gross (pre-VAT) amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatResult {
    /// VAT to collect from clients and remit.
    pub vat_amount: Decimal,

    /// VAT rate as a percentage.
    pub rate: Decimal,

    /// Gross amount plus VAT, i.e. what clients are invoiced.
    pub total_with_vat: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct VatCalculator {
    rate: Decimal,
}

impl VatCalculator {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::VatCalculator;
    ///
    /// let result = VatCalculator::new(dec!(0.24)).calculate(dec!(10000.00));
    ///
    /// assert_eq!(result.vat_amount, dec!(2400.00));
    /// assert_eq!(result.total_with_vat, dec!(12400.00));
    /// ```
    pub fn calculate(
        &self,
        gross_income: Decimal,
    ) -> VatResult {
        let vat_amount = gross_income * self.rate;

        VatResult {
            vat_amount: round_half_up(vat_amount),
            rate: as_percent(self.rate),
            total_with_vat: round_half_up(gross_income + vat_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> VatCalculator {
        VatCalculator::new(dec!(0.24))
    }

    #[test]
    fn calculate_small_project() {
        let result = calculator().calculate(dec!(1500.00));

        assert_eq!(
            result,
            VatResult {
                vat_amount: dec!(360.00),
                rate: dec!(24),
                total_with_vat: dec!(1860.00),
            }
        );
    }

    #[test]
    fn calculate_annual_income() {
        let result = calculator().calculate(dec!(35000.00));

        assert_eq!(result.vat_amount, dec!(8400.00));
        assert_eq!(result.total_with_vat, dec!(43400.00));
    }

    #[test]
    fn calculate_zero_income() {
        let result = calculator().calculate(dec!(0));

        assert_eq!(result.vat_amount, dec!(0));
        assert_eq!(result.rate, dec!(24));
        assert_eq!(result.total_with_vat, dec!(0));
    }

    #[test]
    fn calculate_rounds_vat_to_cents() {
        let result = calculator().calculate(dec!(100.03));

        // 100.03 * 0.24 = 24.0072
        assert_eq!(result.vat_amount, dec!(24.01));
        assert_eq!(result.total_with_vat, dec!(124.04));
    }

    #[test]
    fn calculate_uses_configured_rate() {
        let result = VatCalculator::new(dec!(0.13)).calculate(dec!(1000.00));

        assert_eq!(result.vat_amount, dec!(130.00));
        assert_eq!(result.rate, dec!(13));
    }
}
