//! Progress reporting during archive creation.
//!
//! [`ProgressTracker`] numbers entries for a [`ProgressCallback`];
//! [`ProgressReader`] reports bytes as source files are read, batched so
//! large files do not flood the callback.

use std::io::Read;

/// Callback trait for progress reporting during archive creation.
///
/// # Examples
///
/// ```
/// use zipexcept_core::ProgressCallback;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, name: &str, total: usize, current: usize) {
///         println!("[{current}/{total}] {name}");
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, name: &str) {
///         println!("Added: {name}");
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is written.
    ///
    /// # Arguments
    ///
    /// * `name` - Archive name of the entry
    /// * `total` - Total number of entries
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, name: &str, total: usize, current: usize);

    /// Called as source bytes are read into the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called once an entry has been written in full.
    fn on_entry_complete(&mut self, name: &str);

    /// Called when the archive has been finalized.
    fn on_complete(&mut self);
}

/// Progress callback that does nothing.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _name: &str, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _name: &str) {}

    fn on_complete(&mut self) {}
}

/// Wraps a callback and keeps the running entry number.
pub struct ProgressTracker<'a> {
    progress: &'a mut dyn ProgressCallback,
    current_entry: usize,
    total_entries: usize,
}

impl<'a> ProgressTracker<'a> {
    /// Creates a tracker for `total_entries` entries.
    #[must_use]
    pub fn new(progress: &'a mut dyn ProgressCallback, total_entries: usize) -> Self {
        Self {
            progress,
            current_entry: 0,
            total_entries,
        }
    }

    /// Advances the entry counter and reports the start of `name`.
    pub fn on_entry_start(&mut self, name: &str) {
        self.current_entry += 1;
        self.progress
            .on_entry_start(name, self.total_entries, self.current_entry);
    }

    /// Reports that `name` was written.
    pub fn on_entry_complete(&mut self, name: &str) {
        self.progress.on_entry_complete(name);
    }

    /// Reports that the whole archive is done. Call exactly once.
    pub fn on_complete(&mut self) {
        self.progress.on_complete();
    }

    /// Borrows the wrapped callback, e.g. for a [`ProgressReader`].
    pub fn callback(&mut self) -> &mut dyn ProgressCallback {
        &mut *self.progress
    }
}

/// Reader that reports bytes read to a progress callback.
///
/// Bytes are accumulated and reported once the batch threshold (1 MB by
/// default) is reached, and on drop.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use std::io::Read;
/// use zipexcept_core::NoopProgress;
/// use zipexcept_core::creation::progress::ProgressReader;
///
/// let mut progress = NoopProgress;
/// let mut reader = ProgressReader::new(Cursor::new(b"data"), &mut progress);
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out)?;
/// assert_eq!(reader.total_read(), 4);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    bytes_since_last_update: u64,
    total_read: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Creates a reader with the default 1 MB batch threshold.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, 1024 * 1024)
    }

    /// Creates a reader that reports every `batch_threshold` bytes.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            bytes_since_last_update: 0,
            total_read: 0,
            batch_threshold,
        }
    }

    /// Total bytes read through this reader so far.
    #[must_use]
    pub fn total_read(&self) -> u64 {
        self.total_read
    }

    /// Reports any bytes not yet passed to the callback.
    pub fn flush_progress(&mut self) {
        if self.bytes_since_last_update > 0 {
            self.progress.on_bytes_written(self.bytes_since_last_update);
            self.bytes_since_last_update = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        if bytes_read > 0 {
            self.bytes_since_last_update += bytes_read as u64;
            self.total_read += bytes_read as u64;
            if self.bytes_since_last_update >= self.batch_threshold {
                self.flush_progress();
            }
        }
        Ok(bytes_read)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_progress();
    }
}
