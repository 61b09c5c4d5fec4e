//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use zipexcept_core::CreationReport;

/// Renders a byte count with binary units, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, c) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn row(&self, label: &str, value: impl std::fmt::Display) {
        let _ = self.term.write_line(&format!("  {label:<20}{value}"));
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, report: &CreationReport) -> Result<()> {
        for warning in &report.warnings {
            self.format_warning(warning);
        }

        if self.quiet {
            return Ok(());
        }

        if self.verbose {
            if let Some(ignore_file) = &report.ignore_file {
                let _ = self.term.write_line(&format!(
                    "Using ignore patterns from: {} ({} patterns)",
                    ignore_file.display(),
                    report.pattern_count
                ));
            }
            for name in &report.entries {
                let _ = self.term.write_line(&format!("Added: {name}"));
            }
            let _ = self.term.write_line("");
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                report.output.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Archive created: {}", report.output.display()));
        }

        let _ = self.term.write_line("");
        self.row("Files added:", Self::format_number(report.files_added));
        self.row(
            "Directories pruned:",
            Self::format_number(report.directories_pruned),
        );
        self.row("Files excluded:", Self::format_number(report.files_excluded));
        self.row("Total size:", format_size(report.bytes_written));

        if report.bytes_compressed > 0 {
            self.row(
                "Archive size:",
                format_size(report.bytes_compressed),
            );
        }

        if self.verbose {
            if report.bytes_written > 0 {
                self.row(
                    "Space saved:",
                    format!("{:.1}%", report.compression_percentage()),
                );
            }
            self.row("Paths skipped:", Self::format_number(report.total_skipped()));
            if report.symlinks_skipped > 0 {
                self.row(
                    "Symlinks skipped:",
                    Self::format_number(report.symlinks_skipped),
                );
            }
            self.row("Duration:", format!("{:?}", report.duration));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&format!("WARNING: {message}"));
        }
    }
}
