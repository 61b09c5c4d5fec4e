//! Formatter trait and the JSON envelope shared by all commands.

use anyhow::Result;
use serde::Serialize;
use zipexcept_core::CreationReport;

/// Renders the outcome of an archive run.
pub trait OutputFormatter {
    /// Prints the summary of a finished archive, including its warnings.
    fn format_creation_result(&self, report: &CreationReport) -> Result<()>;

    /// Prints a warning that is not part of a report.
    fn format_warning(&self, message: &str);
}

/// `{"operation": ..., "status": ..., "data": ...}` wrapper for `--json`.
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: &'static str,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
}

impl<T: Serialize> JsonOutput<T> {
    pub const fn new(operation: &'static str, status: Status, data: T) -> Self {
        Self {
            operation,
            status,
            data: Some(data),
        }
    }

    pub const fn success(operation: &'static str, data: T) -> Self {
        Self::new(operation, Status::Success, data)
    }

    pub const fn warning(operation: &'static str, data: T) -> Self {
        Self::new(operation, Status::Warning, data)
    }
}
