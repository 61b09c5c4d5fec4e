//! Source path resolution.

use crate::ArchiveError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Ordered, non-empty list of existing source roots.
///
/// Every root is absolute and lexically normalized (`.` removed, `..`
/// folded), but symlinks are not resolved, so a linked directory keeps the
/// name the user gave it inside the archive.
///
/// # Examples
///
/// ```no_run
/// use zipexcept_core::SourceSet;
///
/// let sources = SourceSet::resolve(&["src", "Cargo.toml"])?;
/// assert_eq!(sources.len(), 2);
/// assert!(sources.roots().iter().all(|root| root.is_absolute()));
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    roots: Vec<PathBuf>,
}

impl SourceSet {
    /// Resolves user-supplied paths to absolute roots.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NoSources`] for an empty slice and
    /// [`ArchiveError::SourceNotFound`] for the first path that does not
    /// exist.
    pub fn resolve<P: AsRef<Path>>(sources: &[P]) -> Result<Self> {
        if sources.is_empty() {
            return Err(ArchiveError::NoSources);
        }

        let mut roots = Vec::with_capacity(sources.len());
        for source in sources {
            let path = source.as_ref();
            let root = absolutize(path)?;
            if !root.exists() {
                return Err(ArchiveError::SourceNotFound {
                    path: path.to_path_buf(),
                });
            }
            roots.push(root);
        }

        Ok(Self { roots })
    }

    /// Builds a set from roots that are already absolute, skipping the
    /// existence check. Used to compute names for paths that are not on
    /// this machine.
    #[cfg(test)]
    pub(crate) fn from_absolute(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Returns the resolved roots in the order they were given.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Iterates over the resolved roots.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.roots.iter()
    }

    /// Number of roots. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Makes `path` absolute against the current directory and folds `.` and
/// `..` components without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
///
/// # Examples
///
/// ```
/// use zipexcept_core::source::absolutize;
/// use std::path::Path;
///
/// # #[cfg(unix)]
/// assert_eq!(absolutize(Path::new("/a/./b/../c"))?, Path::new("/a/c"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                if normalized.parent().is_some() {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
