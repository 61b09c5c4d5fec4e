//! Error conversion utilities for CLI.
//!
//! Converts zipexcept-core's typed errors (thiserror) into user-facing
//! errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zipexcept_core::ArchiveError;

/// Converts `ArchiveError` to a user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, output: &Path) -> anyhow::Error {
    match err {
        ArchiveError::SourceNotFound { path } => {
            anyhow!(
                "Source not found: {}\n\
                 HINT: Every SOURCE must exist; check the path and the current directory.",
                path.display()
            )
        }
        ArchiveError::OutputExists { path } => {
            anyhow!(
                "Output file already exists: {}\n\
                 HINT: Use --force to overwrite it.",
                path.display()
            )
        }
        ArchiveError::Walk { path, reason } => {
            anyhow!(
                "Cannot read '{}': {reason}\n\
                 HINT: Add a pattern for this directory to the ignore file to skip it.",
                path.display()
            )
        }
        ArchiveError::DuplicateArchiveName {
            name,
            first,
            second,
        } => {
            anyhow!(
                "Two files would be stored as '{name}': {} and {}\n\
                 HINT: Archive sources that share a parent directory.",
                first.display(),
                second.display()
            )
        }
        ArchiveError::NonUtf8Name { name, path } => {
            anyhow!(
                "Cannot store '{}' in a zip archive: its name {name:?} is not valid UTF-8\n\
                 HINT: Use --format tar, which keeps raw file names, or rename the file.",
                path.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while creating '{}': {io_err}",
                output.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Failed to create archive '{}'", output.display())),
    }
}
