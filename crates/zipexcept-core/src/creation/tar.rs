//! TAR archive writing, plain and gzip-compressed.

use crate::ArchiveEntry;
use crate::ArchiveError;
use crate::Result;
use crate::creation::config::CreationConfig;
use crate::creation::progress::ProgressReader;
use crate::creation::progress::ProgressTracker;
use crate::creation::report::CreationReport;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use tar::Builder;
use tar::Header;

/// Mode given to entries when permissions are not preserved.
const DEFAULT_MODE: u32 = 0o644;

/// Writes `entries` as an uncompressed TAR archive into `file`.
///
/// # Errors
///
/// Returns an error if a source file cannot be read, changes size while
/// being archived, or the output cannot be written.
pub fn write_tar(
    file: File,
    entries: &[ArchiveEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<()> {
    let writer = CountingWriter::new(BufWriter::new(file));
    let mut writer = append_entries(writer, entries, config, report, tracker)?;
    writer.flush()?;

    report.bytes_compressed = writer.total_bytes();
    Ok(())
}

/// Writes `entries` as a gzip-compressed TAR archive into `file`.
///
/// # Errors
///
/// Same as [`write_tar`], plus compression failures.
pub fn write_tar_gz(
    file: File,
    entries: &[ArchiveEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<()> {
    let writer = CountingWriter::new(BufWriter::new(file));
    let encoder = GzEncoder::new(writer, compression_level_to_flate2(config.compression_level));
    let encoder = append_entries(encoder, entries, config, report, tracker)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;

    report.bytes_compressed = writer.total_bytes();
    Ok(())
}

fn append_entries<W: Write>(
    writer: W,
    entries: &[ArchiveEntry],
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<W> {
    let mut builder = Builder::new(writer);

    for entry in entries {
        let display_name = entry.display_name();
        tracker.on_entry_start(&display_name);
        append_file(&mut builder, entry, config, report, tracker)?;
        tracker.on_entry_complete(&display_name);
    }

    // Writes the two terminating zero blocks.
    Ok(builder.into_inner()?)
}

fn append_file<W: Write>(
    builder: &mut Builder<W>,
    entry: &ArchiveEntry,
    config: &CreationConfig,
    report: &mut CreationReport,
    tracker: &mut ProgressTracker<'_>,
) -> Result<()> {
    let file = File::open(&entry.source)?;
    let metadata = file.metadata()?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(size);
    if config.preserve_permissions {
        set_permissions(&mut header, &metadata);
    } else {
        header.set_mode(DEFAULT_MODE);
        header.set_mtime(0);
    }
    header.set_cksum();

    let mut reader = ProgressReader::new(file.take(size), tracker.callback());
    builder.append_data(&mut header, &entry.name, &mut reader)?;
    let copied = reader.total_read();
    drop(reader);

    if copied != size {
        return Err(ArchiveError::Container(format!(
            "{} changed size while being archived ({size} bytes expected, {copied} read)",
            entry.source.display()
        )));
    }

    let display_name = entry.display_name();
    tracing::trace!(name = %display_name, size, "appended tar entry");
    report.files_added += 1;
    report.bytes_written += size;
    report.entries.push(display_name);

    Ok(())
}

/// Sets mode, owner and mtime in a TAR header from metadata.
#[cfg(unix)]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode());
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // Pre-epoch mtimes clamp to 0.
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        DEFAULT_MODE
    };
    header.set_mode(mode);

    if let Ok(modified) = metadata.modified()
        && let Ok(duration) = modified.duration_since(std::time::UNIX_EPOCH)
    {
        header.set_mtime(duration.as_secs());
    }
}

/// Converts compression level (1-9) to a flate2 compression level.
pub(crate) fn compression_level_to_flate2(level: Option<u8>) -> flate2::Compression {
    match level {
        None => flate2::Compression::default(),
        Some(n) => flate2::Compression::new(u32::from(n.min(9))),
    }
}

/// Writer wrapper that counts bytes passed through.
struct CountingWriter<W> {
    inner: W,
    total_bytes: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            total_bytes: 0,
        }
    }

    fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.total_bytes += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
