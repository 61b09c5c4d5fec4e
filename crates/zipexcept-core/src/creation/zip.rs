//! ZIP archive writing.
//!
//! Every entry is deflated. Names are already `/`-separated by the namer,
//! so they go into the central directory as-is.

use crate::ArchiveEntry;
use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::progress::ProgressTracker;
use crate::creation::report::CreationReport;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Entries at or above this size need ZIP64 extra fields.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

/// Writes `entries` as a deflate-compressed ZIP archive into `file`.
///
/// # Errors
///
/// Returns an error if a source file cannot be read or the archive cannot
/// be written.
pub fn write_zip(
    file: File,
    entries: &[ArchiveEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<()> {
    let writer = append_entries(BufWriter::new(file), entries, config, report, tracker)?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;

    report.bytes_compressed = file.metadata()?.len();
    Ok(())
}

fn append_entries<W: Write + Seek>(
    writer: W,
    entries: &[ArchiveEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(config.compression_level.map(i64::from));

    // Reused across entries.
    let mut buffer = vec![0u8; 64 * 1024];

    for entry in entries {
        let display_name = entry.display_name();
        tracker.on_entry_start(&display_name);
        append_file(&mut zip, entry, config, &options, report, tracker, &mut buffer)?;
        tracker.on_entry_complete(&display_name);
    }

    Ok(zip.finish()?)
}

fn append_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &ArchiveEntry,
    config: &CreationConfig,
    options: &SimpleFileOptions,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
    buffer: &mut [u8],
) -> Result<()> {
    let name = entry.utf8_name()?;
    let mut file = File::open(&entry.source)?;
    let metadata = file.metadata()?;

    let file_options = options.large_file(metadata.len() >= ZIP64_THRESHOLD);
    let file_options = if config.preserve_permissions {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file_options.unix_permissions(metadata.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            file_options
        }
    } else {
        file_options
    };

    zip.start_file(name.as_str(), file_options)?;

    let progress = tracker.callback();
    let mut bytes_written = 0u64;
    loop {
        let bytes_read = file.read(buffer)?;
        if bytes_read == 0 {
            break;
        }
        zip.write_all(&buffer[..bytes_read])?;
        bytes_written += bytes_read as u64;
        progress.on_bytes_written(bytes_read as u64);
    }

    tracing::trace!(name = %name, size = bytes_written, "appended zip entry");
    report.files_added += 1;
    report.bytes_written += bytes_written;
    report.entries.push(name);

    Ok(())
}
