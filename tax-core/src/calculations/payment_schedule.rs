//! Splitting an annual tax bill into equal installments.
//!
//! Each installment is the annual amount divided by the number of payments,
//! rounded to cents on its own. Installments are not adjusted to reconcile
//! with the annual total, so twelve monthly payments may differ from the
//! annual figure by a few cents.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PaymentFrequency;
use crate::calculations::common::round_half_up;

/// Errors that can occur when building a payment schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentScheduleError {
    /// The frequency token is not one of the supported frequencies.
    #[error("invalid frequency '{value}', must be one of: {}", .valid.join(", "))]
    InvalidFrequency {
        value: String,
        valid: &'static [&'static str],
    },
}

/// A single installment in a payment schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    /// 1-based installment number.
    pub period_number: u32,
    pub payment_amount: Decimal,
}

/// Installment plan for an annual tax amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub annual_total: Decimal,
    pub frequency: PaymentFrequency,
    pub number_of_payments: u32,

    /// Amount due at each installment.
    pub payment_amount: Decimal,

    /// One entry per installment, in payment order.
    pub schedule: Vec<ScheduledPayment>,
}

impl PaymentSchedule {
    /// Builds the schedule for a known frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::PaymentFrequency;
    /// use tax_core::calculations::PaymentSchedule;
    ///
    /// let plan = PaymentSchedule::new(dec!(25900.00), PaymentFrequency::Monthly);
    ///
    /// assert_eq!(plan.number_of_payments, 12);
    /// assert_eq!(plan.payment_amount, dec!(2158.33));
    /// ```
    pub fn new(
        annual_tax: Decimal,
        frequency: PaymentFrequency,
    ) -> Self {
        let number_of_payments = frequency.payments_per_year();
        let payment_amount = round_half_up(annual_tax / Decimal::from(number_of_payments));

        let schedule = (1..=number_of_payments)
            .map(|period_number| ScheduledPayment {
                period_number,
                payment_amount,
            })
            .collect();

        Self {
            annual_total: round_half_up(annual_tax),
            frequency,
            number_of_payments,
            payment_amount,
            schedule,
        }
    }
}

/// Builds a payment schedule from a frequency token such as `"quarterly"`.
///
/// Tokens are matched case-insensitively.
///
/// # Errors
///
/// Returns [`PaymentScheduleError::InvalidFrequency`] when the token is not
/// `monthly`, `quarterly` or `annual`.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::payment_schedule;
///
/// let plan = payment_schedule(dec!(12000.00), "Quarterly").unwrap();
/// assert_eq!(plan.payment_amount, dec!(3000.00));
///
/// assert!(payment_schedule(dec!(1000.00), "bogus").is_err());
/// ```
pub fn payment_schedule(
    annual_tax: Decimal,
    frequency: &str,
) -> Result<PaymentSchedule, PaymentScheduleError> {
    let frequency =
        PaymentFrequency::parse(frequency).ok_or_else(|| PaymentScheduleError::InvalidFrequency {
            value: frequency.to_string(),
            valid: &PaymentFrequency::TOKENS,
        })?;

    Ok(PaymentSchedule::new(annual_tax, frequency))
}
