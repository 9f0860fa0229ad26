//! Report structures and output formatting

pub mod formatter;
pub mod report;

pub use formatter::{DisplayOptions, OutputFormatter, ReportGenerator};
pub use report::ShortlistReport;
