//! Archive creation module.
//!
//! Writes the named entries produced by [`crate::namer`] into a tar, tar.gz
//! or zip container.

pub mod config;
pub mod creator;
pub mod progress;
pub mod report;
pub mod tar;
pub mod zip;

pub use config::CreationConfig;
pub use creator::ArchiveCreator;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::CreationReport;
