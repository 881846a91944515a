//! EFKA social security contributions for freelancers.
//!
//! Contributions are levied on gross income. Deductible expenses never reduce
//! the contribution base.
//!
//! | Component | Rate (2024) |
//! |-----------|-------------|
//! | Main insurance | 13.33% |
//! | Additional contributions | 6.67% |
//! | Total | 20.00% |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::SocialSecurityRates;
use crate::calculations::common::{as_percent, round_half_up};

/// Social security owed on gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    /// Total contribution, computed directly from the combined rate.
    ///
    /// This can differ by a cent from `main_insurance +
    /// additional_contributions`, since each is rounded on its own.
    pub total_contribution: Decimal,

    pub main_insurance: Decimal,

    pub additional_contributions: Decimal,

    /// Combined rate as a percentage.
    pub rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct SocialSecurityCalculator {
    rates: SocialSecurityRates,
}

impl SocialSecurityCalculator {
    pub fn new(rates: SocialSecurityRates) -> Self {
        Self { rates }
    }

    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::SocialSecurityRates;
    /// use tax_core::calculations::SocialSecurityCalculator;
    ///
    /// let calculator = SocialSecurityCalculator::new(SocialSecurityRates::default());
    /// let result = calculator.calculate(dec!(30000.00));
    ///
    /// assert_eq!(result.total_contribution, dec!(6000.00));
    /// assert_eq!(result.main_insurance, dec!(3999.00));
    /// assert_eq!(result.additional_contributions, dec!(2001.00));
    /// ```
    pub fn calculate(
        &self,
        gross_income: Decimal,
    ) -> SocialSecurityResult {
        let total_rate = self.rates.total_rate();

        SocialSecurityResult {
            total_contribution: round_half_up(gross_income * total_rate),
            main_insurance: round_half_up(gross_income * self.rates.main_rate),
            additional_contributions: round_half_up(gross_income * self.rates.additional_rate),
            rate: as_percent(total_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> SocialSecurityCalculator {
        SocialSecurityCalculator::new(SocialSecurityRates::default())
    }

    #[test]
    fn calculate_splits_main_and_additional() {
        let result = calculator().calculate(dec!(30000.00));

        assert_eq!(
            result,
            SocialSecurityResult {
                total_contribution: dec!(6000.00),
                main_insurance: dec!(3999.00),
                additional_contributions: dec!(2001.00),
                rate: dec!(20),
            }
        );
    }

    #[test]
    fn calculate_is_twenty_percent_of_gross() {
        assert_eq!(calculator().calculate(dec!(15000)).total_contribution, dec!(3000.00));
        assert_eq!(calculator().calculate(dec!(60000)).total_contribution, dec!(12000.00));
        assert_eq!(calculator().calculate(dec!(12000)).total_contribution, dec!(2400.00));
    }

    #[test]
    fn calculate_total_is_not_the_sum_of_rounded_parts() {
        let result = calculator().calculate(dec!(0.0375));

        // main: 0.00499875 -> 0.00, additional: 0.00250125 -> 0.00, total: 0.0075 -> 0.01
        assert_eq!(result.main_insurance + result.additional_contributions, dec!(0.00));
        assert_eq!(result.total_contribution, dec!(0.01));
    }

    #[test]
    fn calculate_zero_income() {
        let result = calculator().calculate(dec!(0));

        assert_eq!(result.total_contribution, dec!(0));
        assert_eq!(result.main_insurance, dec!(0));
        assert_eq!(result.additional_contributions, dec!(0));
        assert_eq!(result.rate, dec!(20));
    }
}
