//! Loading injectable rate data for the tax engine.
//!
//! Rates normally come from [`TaxConfig::default`]. This crate lets a caller
//! replace them from a TOML configuration file, a CSV bracket table, or
//! both, so a new tax year needs no code change.

mod brackets;
mod config;

use std::fs::File;
use std::path::{Path, PathBuf};

use tax_core::{TaxConfig, TaxConfigError};
use thiserror::Error;
use tracing::info;

pub use brackets::{BracketRecord, BracketTableLoader};
pub use config::parse_config;

/// Errors that can occur when loading rate data.
#[derive(Debug, Error)]
pub enum RateDataError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tax configuration: {0}")]
    InvalidConfig(#[from] TaxConfigError),
}

impl From<csv::Error> for RateDataError {
    fn from(err: csv::Error) -> Self {
        RateDataError::CsvParse(err.to_string())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RateDataError + '_ {
    move |source| RateDataError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Builds a validated [`TaxConfig`].
///
/// Starts from the TOML file at `config_path` (or the defaults when `None`),
/// then replaces the bracket table with the CSV at `brackets_path` if given.
///
/// # Errors
///
/// Returns [`RateDataError`] if a file cannot be read or parsed, or if the
/// resulting configuration fails validation.
pub fn load_config(
    config_path: Option<&Path>,
    brackets_path: Option<&Path>,
) -> Result<TaxConfig, RateDataError> {
    let mut config = match config_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
            parse_config(&contents)?
        }
        None => TaxConfig::default(),
    };

    if let Some(path) = brackets_path {
        let file = File::open(path).map_err(io_error(path))?;
        config.brackets = BracketTableLoader::load(file)?;
    }

    config.validate()?;

    info!(
        brackets = config.brackets.len(),
        vat_rate = %config.vat_rate,
        social_security_rate = %config.social_security.total_rate(),
        "tax configuration loaded"
    );

    Ok(config)
}
