//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use zipexcept_core::CreationReport;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct CreationOutput {
    output_path: String,
    files_added: usize,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    directories_pruned: usize,
    files_excluded: usize,
    symlinks_skipped: usize,
    total_skipped: usize,
    ignore_file: Option<String>,
    pattern_count: usize,
    entries: Vec<String>,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&CreationReport> for CreationOutput {
    fn from(report: &CreationReport) -> Self {
        Self {
            output_path: report.output.display().to_string(),
            files_added: report.files_added,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            directories_pruned: report.directories_pruned,
            files_excluded: report.files_excluded,
            symlinks_skipped: report.symlinks_skipped,
            total_skipped: report.total_skipped(),
            ignore_file: report
                .ignore_file
                .as_ref()
                .map(|path| path.display().to_string()),
            pattern_count: report.pattern_count,
            entries: report.entries.clone(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, report: &CreationReport) -> Result<()> {
        let data = CreationOutput::from(report);
        let output = if report.has_warnings() {
            JsonOutput::warning("create", data)
        } else {
            JsonOutput::success("create", data)
        };
        Self::output(&output)
    }

    fn format_warning(&self, message: &str) {
        // stdout carries a single document; standalone warnings go to stderr
        #[derive(Serialize)]
        struct WarningOutput<'a> {
            warning: &'a str,
        }

        if let Ok(json) = serde_json::to_string(&WarningOutput { warning: message }) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_creation_output_fields() {
        let mut report = CreationReport::new();
        report.output = PathBuf::from("out.tar");
        report.files_added = 2;
        report.directories_pruned = 1;
        report.files_excluded = 3;
        report.entries = vec!["src/a.txt".to_string(), "src/b.txt".to_string()];

        let value = serde_json::to_value(JsonOutput::success(
            "create",
            CreationOutput::from(&report),
        ))
        .unwrap();

        assert_eq!(value["operation"], "create");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["output_path"], "out.tar");
        assert_eq!(value["data"]["files_added"], 2);
        assert_eq!(value["data"]["directories_pruned"], 1);
        assert_eq!(value["data"]["files_excluded"], 3);
        assert_eq!(value["data"]["total_skipped"], 4);
        assert_eq!(value["data"]["entries"][1], "src/b.txt");
        assert!(value["data"]["ignore_file"].is_null());
    }

    #[test]
    fn test_warning_status() {
        let value = serde_json::to_value(JsonOutput::warning("create", 1)).unwrap();
        assert_eq!(value["status"], "warning");
    }
}
