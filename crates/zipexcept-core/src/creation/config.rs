//! Configuration for archive creation operations.

use crate::ArchiveError;
use crate::ArchiveFormat;
use crate::Result;
use crate::patterns::DEFAULT_IGNORE_FILE;
use std::path::PathBuf;

/// Configuration for archive creation operations.
///
/// Controls where ignore patterns come from, how the source tree is walked,
/// and how entries are written.
///
/// # Examples
///
/// ```
/// use zipexcept_core::ArchiveFormat;
/// use zipexcept_core::CreationConfig;
///
/// let config = CreationConfig::default()
///     .with_format(Some(ArchiveFormat::TarGz))
///     .with_compression_level(9)
///     .with_extra_patterns(vec!["*.tmp".to_string()]);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationConfig {
    /// Archive format to create.
    ///
    /// `None` means detect from the output file extension.
    ///
    /// Default: `None`.
    pub format: Option<ArchiveFormat>,

    /// Compression level (1-9) for gzip and deflate.
    ///
    /// Ignored for uncompressed tar. `None` uses the codec default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Follow symlinks while walking sources.
    ///
    /// Default: `false` (symlinks are skipped and counted).
    pub follow_symlinks: bool,

    /// Store source permissions and modification times.
    ///
    /// When disabled, tar entries get mode `0o644` and mtime 0.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,

    /// Ignore file to read patterns from.
    ///
    /// A missing file is not an error; creation proceeds without its
    /// patterns and the report carries a warning.
    ///
    /// Default: `Some(".tarignore")`.
    pub ignore_file: Option<PathBuf>,

    /// Patterns applied in addition to the ignore file.
    ///
    /// Default: empty.
    pub extra_patterns: Vec<String>,

    /// Replace an existing output file.
    ///
    /// Default: `false`.
    pub overwrite: bool,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            format: None,
            compression_level: Some(6),
            follow_symlinks: false,
            preserve_permissions: true,
            ignore_file: Some(PathBuf::from(DEFAULT_IGNORE_FILE)),
            extra_patterns: Vec::new(),
            overwrite: false,
        }
    }
}

impl CreationConfig {
    /// Creates a new `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive format.
    #[must_use]
    pub fn with_format(mut self, format: Option<ArchiveFormat>) -> Self {
        self.format = format;
        self
    }

    /// Sets the compression level.
    ///
    /// Out-of-range values are rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets the ignore file, or disables it with `None`.
    #[must_use]
    pub fn with_ignore_file(mut self, path: Option<PathBuf>) -> Self {
        self.ignore_file = path;
        self
    }

    /// Sets the extra exclude patterns.
    #[must_use]
    pub fn with_extra_patterns(mut self, patterns: Vec<String>) -> Self {
        self.extra_patterns = patterns;
        self
    }

    /// Sets whether an existing output may be replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidCompressionLevel`] if a compression
    /// level is set outside 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}
