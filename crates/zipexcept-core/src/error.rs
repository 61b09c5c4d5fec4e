//! Error types for archive creation operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while collecting sources or writing an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A declared source path does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// No source paths were supplied.
    #[error("no source paths provided")]
    NoSources,

    /// Directory traversal failed outside a pruned subtree.
    #[error("cannot walk {path}: {reason}")]
    Walk {
        /// Path where traversal failed.
        path: PathBuf,
        /// Underlying walk error.
        reason: String,
    },

    /// A computed archive name is absolute, empty, or escapes the base.
    #[error("invalid archive name {name:?} for {path}")]
    InvalidArchiveName {
        /// The offending archive name.
        name: String,
        /// Source file the name was computed for.
        path: PathBuf,
    },

    /// Two distinct source files were given the same archive name.
    #[error("duplicate archive name {name:?}: {first} and {second}")]
    DuplicateArchiveName {
        /// The colliding archive name.
        name: String,
        /// First source file with this name.
        first: PathBuf,
        /// Second source file with this name.
        second: PathBuf,
    },

    /// A member name is not valid UTF-8 and the container stores names as
    /// text.
    #[error("archive name {name:?} for {path} is not valid UTF-8")]
    NonUtf8Name {
        /// The name with invalid bytes replaced.
        name: String,
        /// Source file the name was computed for.
        path: PathBuf,
    },

    /// The destination archive already exists and overwriting is disabled.
    #[error("output file already exists: {path}")]
    OutputExists {
        /// The existing output path.
        path: PathBuf,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Archive format could not be determined from the output name.
    #[error("cannot determine archive format for {path}")]
    UnsupportedFormat {
        /// The output path whose extension was not recognized.
        path: PathBuf,
    },

    /// Builder was used without a required setting.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What is missing or inconsistent.
        reason: String,
    },

    /// Archive container library reported a failure.
    #[error("archive write failed: {0}")]
    Container(String),
}

impl ArchiveError {
    /// Returns `true` if this error signals a logic defect rather than bad
    /// input or an environmental failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::InvalidArchiveName {
    ///     name: "../etc/passwd".to_string(),
    ///     path: PathBuf::from("/etc/passwd"),
    /// };
    /// assert!(err.is_internal());
    ///
    /// let err = ArchiveError::NoSources;
    /// assert!(!err.is_internal());
    /// ```
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InvalidArchiveName { .. } | Self::DuplicateArchiveName { .. }
        )
    }

    /// Returns the filesystem path this error is about, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::Walk { path, .. }
            | Self::InvalidArchiveName { path, .. }
            | Self::NonUtf8Name { path, .. }
            | Self::OutputExists { path }
            | Self::UnsupportedFormat { path } => Some(path),
            Self::DuplicateArchiveName { second, .. } => Some(second),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Container(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map_or_else(PathBuf::new, Path::to_path_buf);
        Self::Walk {
            path,
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::NoSources;
        assert_eq!(err.to_string(), "no source paths provided");
    }

    #[test]
    fn test_source_not_found_error() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("/missing/dir"),
        };
        assert!(err.to_string().contains("/missing/dir"));
        assert_eq!(err.path(), Some(Path::new("/missing/dir")));
        assert!(!err.is_internal());
    }

    #[test]
    fn test_duplicate_name_is_internal() {
        let err = ArchiveError::DuplicateArchiveName {
            name: "a.txt".to_string(),
            first: PathBuf::from("/x/a.txt"),
            second: PathBuf::from("/y/a.txt"),
        };
        assert!(err.is_internal());
        assert_eq!(err.path(), Some(Path::new("/y/a.txt")));
        assert!(err.to_string().contains("a.txt"));
    }

    #[test]
    fn test_non_utf8_name_points_at_source() {
        let err = ArchiveError::NonUtf8Name {
            name: "src/a\u{FFFD}".to_string(),
            path: PathBuf::from("/work/src/a"),
        };
        assert!(!err.is_internal());
        assert_eq!(err.path(), Some(Path::new("/work/src/a")));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
        assert!(err.path().is_none());
    }

    #[test]
    fn test_compression_level_message() {
        let err = ArchiveError::InvalidCompressionLevel { level: 12 };
        assert_eq!(err.to_string(), "invalid compression level 12, must be 1-9");
    }
}
