use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::TaxBracket;
use tracing::debug;

use crate::RateDataError;

/// A single record from a bracket table CSV file.
///
/// - `upper_bound`: inclusive upper limit of the bracket (empty for unlimited)
/// - `rate`: the marginal tax rate as a decimal (e.g. 0.22 for 22%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for TaxBracket {
    fn from(record: BracketRecord) -> Self {
        TaxBracket {
            upper_bound: record.upper_bound,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for income tax bracket tables stored as CSV.
///
/// ```csv
/// upper_bound,rate
/// 10000,0.09
/// 20000,0.22
/// ,0.44
/// ```
///
/// Rows are returned in file order; the table is not validated here. Pass
/// the result through [`TaxConfig::validate`](tax_core::TaxConfig::validate)
/// (or [`crate::load_config`]) before use.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RateDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Parse a CSV bracket table straight into [`TaxBracket`]s.
    pub fn load<R: Read>(reader: R) -> Result<Vec<TaxBracket>, RateDataError> {
        let records = Self::parse(reader)?;
        Ok(records.into_iter().map(TaxBracket::from).collect())
    }
}
