use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TaxBracket;

/// Errors raised when a [`TaxConfig`] violates the table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxConfigError {
    /// The bracket table has no rows.
    #[error("no tax brackets provided")]
    NoTaxBrackets,

    /// A bracket's upper bound is zero or negative.
    #[error("bracket {index} upper bound must be positive, got {bound}")]
    NonPositiveBound { index: usize, bound: Decimal },

    /// Upper bounds must strictly increase from one bracket to the next.
    #[error("bracket {index} upper bound {bound} does not exceed the previous bound {previous}")]
    NonIncreasingBound {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    /// Only the last bracket may be unbounded.
    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeLast(usize),

    /// The last bracket must be unbounded so every income is covered.
    #[error("last bracket must be unbounded, got upper bound {0}")]
    BoundedLastBracket(Decimal),

    /// A bracket rate lies outside [0, 1].
    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    /// The VAT rate lies outside [0, 1].
    #[error("VAT rate must be between 0 and 1, got {0}")]
    InvalidVatRate(Decimal),

    /// The main social security rate lies outside [0, 1].
    #[error("main insurance rate must be between 0 and 1, got {0}")]
    InvalidMainInsuranceRate(Decimal),

    /// The additional social security rate lies outside [0, 1].
    #[error("additional contribution rate must be between 0 and 1, got {0}")]
    InvalidAdditionalRate(Decimal),

    /// The combined social security rate exceeds 1.
    #[error("combined social security rate must not exceed 1, got {0}")]
    InvalidCombinedRate(Decimal),
}

/// EFKA social security contribution rates, applied to gross income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSecurityRates {
    /// Main insurance contribution, 13.33% for 2024.
    pub main_rate: Decimal,

    /// Healthcare, auxiliary pension and other additional contributions,
    /// 6.67% for 2024.
    pub additional_rate: Decimal,
}

impl SocialSecurityRates {
    pub fn total_rate(&self) -> Decimal {
        self.main_rate + self.additional_rate
    }
}

impl Default for SocialSecurityRates {
    fn default() -> Self {
        Self {
            main_rate: dec!(0.1333),
            additional_rate: dec!(0.0667),
        }
    }
}

/// Rates and bracket table used by the tax engine.
///
/// The [`Default`] value carries the 2024 Greek freelancer rates. Loading a
/// different table (see the `tax-data` crate) changes the engine's behaviour
/// without a code edit.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::TaxConfig;
///
/// let config = TaxConfig::default();
///
/// assert_eq!(config.brackets.len(), 5);
/// assert_eq!(config.vat_rate, dec!(0.24));
/// assert_eq!(config.social_security.total_rate(), dec!(0.2000));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Progressive income tax brackets, ascending by upper bound.
    pub brackets: Vec<TaxBracket>,

    /// Flat VAT rate applied to gross income.
    pub vat_rate: Decimal,

    pub social_security: SocialSecurityRates,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::bounded(dec!(10000.00), dec!(0.09)),
                TaxBracket::bounded(dec!(20000.00), dec!(0.22)),
                TaxBracket::bounded(dec!(30000.00), dec!(0.28)),
                TaxBracket::bounded(dec!(40000.00), dec!(0.36)),
                TaxBracket::unbounded(dec!(0.44)),
            ],
            vat_rate: dec!(0.24),
            social_security: SocialSecurityRates::default(),
        }
    }
}

fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}

impl TaxConfig {
    /// Validates the bracket table and every rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaxConfigError`] if:
    /// - the bracket table is empty
    /// - an upper bound is not positive or does not exceed the previous one
    /// - a bracket other than the last is unbounded, or the last is bounded
    /// - any rate is outside [0, 1], including the combined social security rate
    pub fn validate(&self) -> Result<(), TaxConfigError> {
        if self.brackets.is_empty() {
            return Err(TaxConfigError::NoTaxBrackets);
        }

        let last_index = self.brackets.len() - 1;
        let mut previous = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if !is_fraction(bracket.rate) {
                return Err(TaxConfigError::InvalidBracketRate {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                None if index != last_index => {
                    return Err(TaxConfigError::UnboundedBeforeLast(index));
                }
                None => {}
                Some(bound) if index == last_index => {
                    return Err(TaxConfigError::BoundedLastBracket(bound));
                }
                Some(bound) if bound <= Decimal::ZERO => {
                    return Err(TaxConfigError::NonPositiveBound { index, bound });
                }
                Some(bound) if bound <= previous => {
                    return Err(TaxConfigError::NonIncreasingBound {
                        index,
                        bound,
                        previous,
                    });
                }
                Some(bound) => previous = bound,
            }
        }

        if !is_fraction(self.vat_rate) {
            return Err(TaxConfigError::InvalidVatRate(self.vat_rate));
        }
        if !is_fraction(self.social_security.main_rate) {
            return Err(TaxConfigError::InvalidMainInsuranceRate(
                self.social_security.main_rate,
            ));
        }
        if !is_fraction(self.social_security.additional_rate) {
            return Err(TaxConfigError::InvalidAdditionalRate(
                self.social_security.additional_rate,
            ));
        }
        let combined = self.social_security.total_rate();
        if combined > Decimal::ONE {
            return Err(TaxConfigError::InvalidCombinedRate(combined));
        }

        Ok(())
    }
}
