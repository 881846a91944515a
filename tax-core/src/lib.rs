pub mod calculations;
pub mod models;

pub use calculations::TaxEngine;
pub use models::*;
