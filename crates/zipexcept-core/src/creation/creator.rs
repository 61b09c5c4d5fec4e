//! Builder for creating archives with fluent API.

use crate::ArchiveError;
use crate::ArchiveFormat;
use crate::ProgressCallback;
use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::report::CreationReport;
use std::path::Path;
use std::path::PathBuf;

/// Builder for creating archives with fluent API.
///
/// # Examples
///
/// ```no_run
/// use zipexcept_core::ArchiveCreator;
///
/// let report = ArchiveCreator::new()
///     .output("backup.tar.gz")
///     .add_source("src/")
///     .add_source("Cargo.toml")
///     .exclude("*.tmp")
///     .compression_level(9)
///     .create()?;
///
/// println!("Created archive with {} files", report.files_added);
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveCreator {
    output_path: Option<PathBuf>,
    sources: Vec<PathBuf>,
    config: CreationConfig,
}

impl ArchiveCreator {
    /// Creates a new `ArchiveCreator` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output archive path.
    ///
    /// The format is detected from the extension unless set via
    /// [`format`](Self::format).
    #[must_use]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a source file or directory.
    #[must_use]
    pub fn add_source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds multiple source files or directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::ArchiveCreator;
    ///
    /// let creator = ArchiveCreator::new().sources(&["src/", "Cargo.toml", "README.md"]);
    /// ```
    #[must_use]
    pub fn sources<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.sources
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: CreationConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads patterns from `path` instead of `.tarignore`.
    #[must_use]
    pub fn ignore_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.ignore_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Does not read any ignore file.
    #[must_use]
    pub fn no_ignore_file(mut self) -> Self {
        self.config.ignore_file = None;
        self
    }

    /// Adds an exclude pattern on top of the ignore file.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::ArchiveCreator;
    ///
    /// let creator = ArchiveCreator::new().exclude("*.log").exclude("target/");
    /// ```
    #[must_use]
    pub fn exclude<S: Into<String>>(mut self, pattern: S) -> Self {
        self.config.extra_patterns.push(pattern.into());
        self
    }

    /// Sets explicit archive format.
    #[must_use]
    pub fn format(mut self, format: ArchiveFormat) -> Self {
        self.config.format = Some(format);
        self
    }

    /// Sets the compression level (1-9).
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Sets whether to follow symlinks.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Sets whether to preserve permissions and timestamps.
    #[must_use]
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.config.preserve_permissions = preserve;
        self
    }

    /// Allows replacing an existing output file.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Creates the archive.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidConfiguration`] if no output path was
    /// set, [`ArchiveError::NoSources`] without sources, and otherwise any
    /// error of [`create_archive`](crate::create_archive).
    pub fn create(self) -> Result<CreationReport> {
        let mut noop = crate::NoopProgress;
        self.create_with_progress(&mut noop)
    }

    /// Creates the archive, reporting progress to `progress`.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_with_progress(
        self,
        progress: &mut dyn ProgressCallback,
    ) -> Result<CreationReport> {
        let output_path = self
            .output_path
            .ok_or_else(|| ArchiveError::InvalidConfiguration {
                reason: "output path not set".to_string(),
            })?;

        if self.sources.is_empty() {
            return Err(ArchiveError::NoSources);
        }

        crate::api::create_archive_with_progress(
            &output_path,
            &self.sources,
            &self.config,
            progress,
        )
    }
}
