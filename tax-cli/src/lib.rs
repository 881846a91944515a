//! Terminal front end for the freelancer tax engine: amount parsing, report
//! rendering, the interactive session and batch runs.

pub mod app;
pub mod batch;
pub mod input;
pub mod interactive;
pub mod logging;
pub mod report;

pub use app::{SaveOptions, perform_calculation};
pub use report::{Report, ReportStyle, format_currency};
