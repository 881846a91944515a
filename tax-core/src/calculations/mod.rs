//! Tax calculations for freelancers: progressive income tax, VAT, social
//! security contributions, the aggregate summary and payment schedules.

pub mod common;
pub mod engine;
pub mod income_tax;
pub mod payment_schedule;
pub mod social_security;
pub mod vat;

pub use engine::{TaxEngine, TaxSummary, taxable_income};
pub use income_tax::{BracketBreakdown, IncomeTaxResult, IncomeTaxSchedule};
pub use payment_schedule::{
    PaymentSchedule, PaymentScheduleError, ScheduledPayment, payment_schedule,
};
pub use social_security::{SocialSecurityCalculator, SocialSecurityResult};
pub use vat::{VatCalculator, VatResult};
