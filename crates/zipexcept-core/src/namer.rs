//! Archive member naming.
//!
//! Names are computed against one base directory shared by every source:
//!
//! - one source: its parent, so the source's own name becomes the top-level
//!   entry in the archive;
//! - several sources with the same parent: that parent;
//! - several parents: their longest common ancestor;
//! - no common ancestor (different drives): bare file names, flattening the
//!   tree.
//!
//! Names keep the raw bytes of the file names on disk. Only the zip writer
//! needs them as UTF-8 text.

use crate::ArchiveError;
use crate::Result;
use crate::collector::FileSet;
use crate::source::SourceSet;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A source file paired with its name inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Absolute path of the file on disk.
    pub source: PathBuf,
    /// Relative member name made of normal components only.
    pub name: PathBuf,
}

impl ArchiveEntry {
    /// Pairs a source file with its member name.
    pub fn new(source: impl Into<PathBuf>, name: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }

    /// `/`-separated name for logs and reports. Bytes that are not UTF-8
    /// are replaced.
    #[must_use]
    pub fn display_name(&self) -> String {
        join_with_slash(&self.name, |part| Some(part.to_string_lossy()))
            .unwrap_or_default()
    }

    /// `/`-separated name as UTF-8 text, for containers that store names as
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NonUtf8Name`] if any component is not valid
    /// UTF-8.
    pub fn utf8_name(&self) -> Result<String> {
        join_with_slash(&self.name, |part| part.to_str().map(Into::into)).ok_or_else(|| {
            ArchiveError::NonUtf8Name {
                name: self.display_name(),
                path: self.source.clone(),
            }
        })
    }
}

/// Reference point for computing archive names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingBase {
    /// Names are paths relative to this directory.
    Directory(PathBuf),
    /// Names are bare file names.
    Flatten,
}

/// Picks the naming base for a set of sources.
///
/// # Examples
///
/// ```no_run
/// use zipexcept_core::SourceSet;
/// use zipexcept_core::namer::NamingBase;
/// use zipexcept_core::namer::naming_base;
/// use std::path::PathBuf;
///
/// let sources = SourceSet::resolve(&["/srv/www/site", "/srv/data/db"])?;
/// assert_eq!(naming_base(&sources), NamingBase::Directory(PathBuf::from("/srv")));
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
#[must_use]
pub fn naming_base(sources: &SourceSet) -> NamingBase {
    let parents: BTreeSet<&Path> = sources
        .iter()
        .map(|root| root.parent().unwrap_or(root))
        .collect();

    let mut parents = parents.into_iter();
    let Some(first) = parents.next() else {
        return NamingBase::Flatten;
    };

    let mut base = first.to_path_buf();
    for parent in parents {
        match common_ancestor(&base, parent) {
            Some(ancestor) => base = ancestor,
            None => return NamingBase::Flatten,
        }
    }

    NamingBase::Directory(base)
}

/// Computes the archive entry for every collected file.
///
/// Entries come out in the file set's sorted order.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidArchiveName`] if a file does not sit under
/// the computed base or its name would be empty, absolute, or contain `..`,
/// and [`ArchiveError::DuplicateArchiveName`] if two files map to the same
/// name. Both indicate inconsistent inputs rather than user error.
pub fn compute_names(files: &FileSet, sources: &SourceSet) -> Result<Vec<ArchiveEntry>> {
    let base = naming_base(sources);
    if base == NamingBase::Flatten {
        tracing::warn!("sources share no common ancestor, archive names are flattened");
    }
    name_entries(files, &base)
}

/// Names every file against an already chosen base.
///
/// # Errors
///
/// Same as [`compute_names`].
pub fn name_entries(files: &FileSet, base: &NamingBase) -> Result<Vec<ArchiveEntry>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(files.len());
    let mut entries = Vec::with_capacity(files.len());

    for path in files {
        let name = archive_name(path, base)?;
        if let Some(first) = seen.get(&name) {
            let entry = ArchiveEntry::new(path.clone(), name);
            return Err(ArchiveError::DuplicateArchiveName {
                name: entry.display_name(),
                first: first.to_path_buf(),
                second: entry.source,
            });
        }
        seen.insert(name.clone(), path);
        entries.push(ArchiveEntry::new(path.clone(), name));
    }

    Ok(entries)
}

/// Computes one archive name against a base.
///
/// # Errors
///
/// Returns [`ArchiveError::InvalidArchiveName`] when the name cannot be
/// formed or fails [`validate_name`].
///
/// # Examples
///
/// ```
/// use zipexcept_core::namer::NamingBase;
/// use zipexcept_core::namer::archive_name;
/// use std::path::Path;
/// use std::path::PathBuf;
///
/// # #[cfg(unix)]
/// # {
/// let base = NamingBase::Directory(PathBuf::from("/home/user"));
/// let name = archive_name(Path::new("/home/user/project/src/main.rs"), &base)?;
/// assert_eq!(name, Path::new("project/src/main.rs"));
/// # }
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
pub fn archive_name(path: &Path, base: &NamingBase) -> Result<PathBuf> {
    let invalid = |name: &Path| ArchiveError::InvalidArchiveName {
        name: name.display().to_string(),
        path: path.to_path_buf(),
    };

    let name = match base {
        NamingBase::Directory(dir) => path.strip_prefix(dir).map_err(|_| invalid(path))?,
        NamingBase::Flatten => path.file_name().map_or(Path::new(""), Path::new),
    };

    if validate_name(name) {
        Ok(name.to_path_buf())
    } else {
        Err(invalid(name))
    }
}

/// Returns `true` if `name` is a safe archive member name: non-empty,
/// relative, and free of `..` segments.
///
/// Backslashes count as separators too, since zip readers on Windows split
/// on them.
///
/// # Examples
///
/// ```
/// use zipexcept_core::namer::validate_name;
/// use std::path::Path;
///
/// assert!(validate_name(Path::new("dir/file.txt")));
/// assert!(!validate_name(Path::new("/etc/passwd")));
/// assert!(!validate_name(Path::new("a/../../b")));
/// assert!(!validate_name(Path::new("")));
/// ```
#[must_use]
pub fn validate_name(name: &Path) -> bool {
    let mut components = name.components().peekable();
    if components.peek().is_none() {
        return false;
    }

    components.enumerate().all(|(index, component)| {
        let Component::Normal(part) = component else {
            return false;
        };
        let text = part.to_string_lossy();
        let leading_separator = index == 0 && text.starts_with('\\');
        !leading_separator && text.split('\\').all(|segment| segment != "..")
    })
}

/// Joins the normal components of `name` with `/`, converting each one with
/// `convert`. Returns `None` on any other component kind or when a
/// conversion fails.
fn join_with_slash<'a>(
    name: &'a Path,
    convert: impl Fn(&'a OsStr) -> Option<std::borrow::Cow<'a, str>>,
) -> Option<String> {
    let mut joined = String::new();
    for component in name.components() {
        let Component::Normal(part) = component else {
            return None;
        };
        if !joined.is_empty() {
            joined.push('/');
        }
        joined.push_str(&convert(part)?);
    }
    Some(joined)
}

fn common_ancestor(a: &Path, b: &Path) -> Option<PathBuf> {
    let mut shared = PathBuf::new();
    for (left, right) in a.components().zip(b.components()) {
        if left != right {
            break;
        }
        shared.push(left.as_os_str());
    }

    if shared.as_os_str().is_empty() {
        None
    } else {
        Some(shared)
    }
}
