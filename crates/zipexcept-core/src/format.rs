//! Output archive formats.

use crate::ArchiveError;
use crate::Result;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Uncompressed tar.
    Tar,
    /// Gzip-compressed tar.
    TarGz,
    /// Zip with deflate compression.
    Zip,
}

impl ArchiveFormat {
    /// Maps the `tar`/`zip` choice plus the compress flag to a format.
    ///
    /// Compression only applies to tar; zip entries are always deflated.
    #[must_use]
    pub const fn from_choice(zip: bool, compress: bool) -> Self {
        match (zip, compress) {
            (true, _) => Self::Zip,
            (false, true) => Self::TarGz,
            (false, false) => Self::Tar,
        }
    }

    /// Detects the format from an output file name.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsupportedFormat`] if the name has no known
    /// archive suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::ArchiveFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(ArchiveFormat::detect(Path::new("out.tgz"))?, ArchiveFormat::TarGz);
    /// assert_eq!(ArchiveFormat::detect(Path::new("out.ZIP"))?, ArchiveFormat::Zip);
    /// assert!(ArchiveFormat::detect(Path::new("out.rar")).is_err());
    /// # Ok::<(), zipexcept_core::ArchiveError>(())
    /// ```
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if name.ends_with(".tar") {
            Ok(Self::Tar)
        } else if name.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(ArchiveError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    }

    /// Canonical file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Appends the format's extension when `path` lacks it.
    ///
    /// A `.tar` name asked to become gzip-compressed only gains `.gz`.
    /// Suffix checks are case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::ArchiveFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(ArchiveFormat::Zip.ensure_extension(Path::new("backup")), Path::new("backup.zip"));
    /// assert_eq!(ArchiveFormat::TarGz.ensure_extension(Path::new("b.tgz")), Path::new("b.tgz"));
    /// assert_eq!(ArchiveFormat::TarGz.ensure_extension(Path::new("b.tar")), Path::new("b.tar.gz"));
    /// ```
    #[must_use]
    pub fn ensure_extension(self, path: &Path) -> PathBuf {
        let name = path.as_os_str().to_string_lossy();
        let suffix = match self {
            Self::Tar if name.ends_with(".tar") => None,
            Self::Tar => Some(".tar"),
            Self::TarGz if name.ends_with(".tar.gz") || name.ends_with(".tgz") => None,
            Self::TarGz if name.ends_with(".tar") => Some(".gz"),
            Self::TarGz => Some(".tar.gz"),
            Self::Zip if name.ends_with(".zip") => None,
            Self::Zip => Some(".zip"),
        };

        match suffix {
            None => path.to_path_buf(),
            Some(suffix) => {
                let mut extended = OsString::from(path.as_os_str());
                extended.push(suffix);
                PathBuf::from(extended)
            }
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
