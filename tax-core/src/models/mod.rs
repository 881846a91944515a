mod payment_frequency;
mod tax_bracket;
mod tax_config;

pub use payment_frequency::PaymentFrequency;
pub use tax_bracket::TaxBracket;
pub use tax_config::{SocialSecurityRates, TaxConfig, TaxConfigError};
