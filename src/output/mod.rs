//! Output formatting module
//!
//! Provides various output formats for run results.

mod formatter;

pub use formatter::{write_csv, OutputFormat, ResultFormatter, CSV_HEADER};
