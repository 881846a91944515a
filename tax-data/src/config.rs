//! TOML rate configuration.
//!
//! Any key left out falls back to the built-in 2024 value. Decimal values
//! are best written as strings so they are read exactly:
//!
//! ```toml
//! vat_rate = "0.24"
//!
//! [social_security]
//! main_rate = "0.1333"
//! additional_rate = "0.0667"
//!
//! [[brackets]]
//! upper_bound = "10000"
//! rate = "0.09"
//!
//! [[brackets]]
//! rate = "0.44"
//! ```

use tax_core::TaxConfig;
use tracing::debug;

use crate::RateDataError;

/// Parses a TOML document into a [`TaxConfig`] without validating it.
pub fn parse_config(input: &str) -> Result<TaxConfig, RateDataError> {
    let config: TaxConfig = toml::from_str(input)?;
    debug!(
        brackets = config.brackets.len(),
        vat_rate = %config.vat_rate,
        "parsed tax configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::TaxBracket;

    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = parse_config("").expect("empty TOML should parse");

        assert_eq!(config, TaxConfig::default());
    }

    #[test]
    fn test_override_vat_only() {
        let config = parse_config("vat_rate = \"0.17\"").expect("should parse");

        assert_eq!(config.vat_rate, dec!(0.17));
        assert_eq!(config.brackets, TaxConfig::default().brackets);
    }

    #[test]
    fn test_override_single_social_security_rate() {
        let toml = r#"
[social_security]
main_rate = "0.14"
"#;

        let config = parse_config(toml).expect("should parse");

        assert_eq!(config.social_security.main_rate, dec!(0.14));
        assert_eq!(config.social_security.additional_rate, dec!(0.0667));
    }

    #[test]
    fn test_brackets_replace_default_table() {
        let toml = r#"
[[brackets]]
upper_bound = "12000"
rate = "0.09"

[[brackets]]
rate = "0.40"
"#;

        let config = parse_config(toml).expect("should parse");

        assert_eq!(
            config.brackets,
            vec![
                TaxBracket::bounded(dec!(12000), dec!(0.09)),
                TaxBracket::unbounded(dec!(0.40)),
            ]
        );
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let err = parse_config("vat_rate = ").expect_err("should fail");

        assert!(matches!(err, RateDataError::TomlParse(_)));
    }
}
