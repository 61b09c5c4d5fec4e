//! High-level public API for archive creation.

use crate::ArchiveError;
use crate::ArchiveFormat;
use crate::Collector;
use crate::IgnorePatterns;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::SourceSet;
use crate::creation::CreationConfig;
use crate::creation::CreationReport;
use crate::creation::progress::ProgressTracker;
use crate::namer::compute_names;
use crate::source::absolutize;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

/// Creates an archive from source files and directories.
///
/// Patterns come from `config.ignore_file` plus `config.extra_patterns`.
/// The format is taken from `config.format`, or detected from the output
/// file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid or the format cannot be determined
/// - A source does not exist
/// - The output exists and `config.overwrite` is not set
/// - Traversal fails or two files map to the same archive name
/// - Any I/O operation fails while writing
///
/// # Examples
///
/// ```no_run
/// use zipexcept_core::CreationConfig;
/// use zipexcept_core::create_archive;
///
/// let config = CreationConfig::default();
/// let report = create_archive("project.tar.gz", &["project"], &config)?;
/// println!("Added {} files", report.files_added);
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &CreationConfig,
) -> Result<CreationReport> {
    let mut noop = NoopProgress;
    create_archive_with_progress(output, sources, config, &mut noop)
}

/// Creates an archive, reporting each member to `progress`.
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    let start = Instant::now();
    let output = output.as_ref();

    config.validate()?;
    let format = determine_format(output, config)?;
    let sources = SourceSet::resolve(sources)?;

    if !config.overwrite && output.exists() {
        return Err(ArchiveError::OutputExists {
            path: output.to_path_buf(),
        });
    }

    let mut report = CreationReport::new();
    let patterns = load_patterns(config, &mut report)?;

    let mut files = Collector::new(&patterns)
        .with_follow_symlinks(config.follow_symlinks)
        .collect(&sources)?;
    if files.remove(&absolutize(output)?) {
        tracing::debug!(path = %output.display(), "output archive is inside a source, leaving it out");
    }

    let stats = files.stats();
    report.directories_pruned = stats.directories_pruned;
    report.files_excluded = stats.files_excluded;
    report.symlinks_skipped = stats.symlinks_skipped;
    if stats.symlinks_skipped > 0 {
        report.add_warning(format!(
            "skipped {} symbolic link(s); use --follow-symlinks to archive their targets",
            stats.symlinks_skipped
        ));
    }

    let entries = compute_names(&files, &sources)?;

    let file = File::create(output)?;
    let mut tracker = ProgressTracker::new(progress, entries.len());
    match format {
        ArchiveFormat::Tar => {
            crate::creation::tar::write_tar(file, &entries, config, &mut report, &mut tracker)?;
        }
        ArchiveFormat::TarGz => {
            crate::creation::tar::write_tar_gz(file, &entries, config, &mut report, &mut tracker)?;
        }
        ArchiveFormat::Zip => {
            crate::creation::zip::write_zip(file, &entries, config, &mut report, &mut tracker)?;
        }
    }
    tracker.on_complete();

    report.output = output.to_path_buf();
    report.duration = start.elapsed();

    tracing::info!(
        output = %output.display(),
        format = %format,
        files = report.files_added,
        bytes = report.bytes_written,
        "archive created"
    );

    Ok(report)
}

/// Determines archive format from config or output path.
fn determine_format(output: &Path, config: &CreationConfig) -> Result<ArchiveFormat> {
    match config.format {
        Some(format) => Ok(format),
        None => ArchiveFormat::detect(output),
    }
}

/// Loads the ignore file and extra patterns, recording both in `report`.
fn load_patterns(config: &CreationConfig, report: &mut CreationReport) -> Result<IgnorePatterns> {
    let loaded = match &config.ignore_file {
        Some(path) => {
            let loaded = IgnorePatterns::load(path)?;
            if loaded.source().is_none() {
                report.add_warning(format!(
                    "ignore file '{}' not found, no patterns loaded from it",
                    path.display()
                ));
            }
            loaded
        }
        None => IgnorePatterns::new(),
    };

    let patterns = loaded.with_extra(&config.extra_patterns);
    report.ignore_file = patterns.source().map(Path::to_path_buf);
    report.pattern_count = patterns.len();
    Ok(patterns)
}
