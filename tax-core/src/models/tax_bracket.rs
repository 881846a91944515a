use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a progressive income tax table.
///
/// The rate applies to the slice of income strictly above the previous
/// bracket's upper bound and at or below this one. `upper_bound` is `None`
/// for the final, unbounded bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    #[serde(default)]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}
