pub mod formatter;

pub use formatter::Formatter;

use crate::api::types::AggregatedReport;
use crate::cli::OutputFormat;
use crate::error::Result;

/// Format an aggregated report based on the specified format
pub fn format_report(report: &AggregatedReport, format: OutputFormat) -> Result<String> {
    let formatter = Formatter::new(format);
    formatter.format_report(report)
}
