//! Archive creation that honors a `.tarignore` file.
//!
//! `zipexcept-core` walks one or more source paths, drops everything matched
//! by shell-style ignore patterns, and writes what remains into a tar,
//! tar.gz or zip archive. Excluded directories are pruned without being
//! descended into.
//!
//! The pipeline is four small pieces:
//!
//! - [`IgnorePatterns`] reads the ignore file.
//! - [`Matcher`] decides whether one relative path is excluded.
//! - [`Collector`] walks the sources and yields a sorted [`FileSet`].
//! - [`namer`] maps each file to a unique archive name.
//!
//! # Examples
//!
//! ```no_run
//! use zipexcept_core::CreationConfig;
//! use zipexcept_core::create_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CreationConfig::default().with_extra_patterns(vec!["*.tmp".into()]);
//! let report = create_archive("site.tar.gz", &["site"], &config)?;
//! println!("Added {} files, pruned {} directories", report.files_added, report.directories_pruned);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod collector;
pub mod creation;
pub mod error;
pub mod format;
pub mod matcher;
pub mod namer;
pub mod patterns;
pub mod source;

pub use api::create_archive;
pub use api::create_archive_with_progress;
pub use collector::CollectStats;
pub use collector::Collector;
pub use collector::FileSet;
pub use creation::ArchiveCreator;
pub use creation::CreationConfig;
pub use creation::CreationReport;
pub use creation::NoopProgress;
pub use creation::ProgressCallback;
pub use error::ArchiveError;
pub use error::Result;
pub use format::ArchiveFormat;
pub use matcher::Matcher;
pub use namer::ArchiveEntry;
pub use patterns::DEFAULT_IGNORE_FILE;
pub use patterns::IgnorePatterns;
pub use source::SourceSet;
