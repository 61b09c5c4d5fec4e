//! Source traversal with exclusion and subtree pruning.
//!
//! Directories are matched before they are entered. An excluded directory is
//! never opened, so deliberately ignored trees such as `node_modules/` cost
//! nothing and cannot fail the walk with permission errors.

use crate::Result;
use crate::matcher::Matcher;
use crate::matcher::match_path;
use crate::patterns::IgnorePatterns;
use crate::source::SourceSet;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Counters gathered while collecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Directories skipped together with everything beneath them.
    pub directories_pruned: usize,
    /// Files dropped because a pattern matched.
    pub files_excluded: usize,
    /// Symbolic links skipped because links are not followed.
    pub symlinks_skipped: usize,
}

/// Set of absolute regular-file paths selected for the archive.
///
/// Iteration is in sorted path order, so repeated runs over the same tree
/// write the same member sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    files: BTreeSet<PathBuf>,
    stats: CollectStats,
}

impl FileSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns `true` if `path` is a member.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    /// Removes a member, returning whether it was present.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.files.remove(path)
    }

    /// Iterates over members in sorted order.
    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, PathBuf> {
        self.files.iter()
    }

    /// Traversal counters.
    #[must_use]
    pub fn stats(&self) -> CollectStats {
        self.stats
    }
}

impl FromIterator<PathBuf> for FileSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
            stats: CollectStats::default(),
        }
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks source roots and selects the files to archive.
///
/// # Examples
///
/// ```no_run
/// use zipexcept_core::Collector;
/// use zipexcept_core::IgnorePatterns;
/// use zipexcept_core::SourceSet;
///
/// let patterns = IgnorePatterns::load(".tarignore")?;
/// let sources = SourceSet::resolve(&["project"])?;
/// let files = Collector::new(&patterns).collect(&sources)?;
/// println!("{} files selected", files.len());
/// # Ok::<(), zipexcept_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Collector {
    matcher: Matcher,
    follow_symlinks: bool,
}

impl Collector {
    /// Creates a collector for the given patterns. Symlinks are not followed.
    #[must_use]
    pub fn new(patterns: &IgnorePatterns) -> Self {
        Self {
            matcher: Matcher::new(patterns),
            follow_symlinks: false,
        }
    }

    /// Sets whether symbolic links are followed during traversal.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Collects the union of included files across all roots.
    ///
    /// Each path is matched relative to the root it was found under; a
    /// single-file root is matched by its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if a root cannot be inspected or the walk fails
    /// outside a pruned subtree (unreadable directory, symlink loop).
    pub fn collect(&self, sources: &SourceSet) -> Result<FileSet> {
        let mut set = FileSet::new();
        if self.matcher.is_empty() {
            tracing::debug!("no exclusion patterns, every regular file is kept");
        }

        for root in sources {
            let metadata = std::fs::metadata(root)?;
            if metadata.is_dir() {
                self.collect_directory(root, &mut set)?;
            } else if metadata.is_file() {
                self.collect_single(root, &mut set);
            } else {
                tracing::debug!(path = %root.display(), "skipping special file");
            }
        }

        tracing::info!(
            files = set.len(),
            pruned = set.stats.directories_pruned,
            excluded = set.stats.files_excluded,
            "collected source files"
        );

        Ok(set)
    }

    fn collect_single(&self, path: &Path, set: &mut FileSet) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.matcher.is_excluded(&name, false) {
            tracing::debug!(path = %path.display(), "excluded file");
            set.stats.files_excluded += 1;
        } else {
            set.files.insert(path.to_path_buf());
        }
    }

    fn collect_directory(&self, root: &Path, set: &mut FileSet) -> Result<()> {
        let pruned = Cell::new(0usize);

        let walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let relative = relative_match_path(entry.path(), root);
                if self.matcher.is_excluded(&relative, true) {
                    tracing::debug!(path = %entry.path().display(), "pruned directory");
                    pruned.set(pruned.get() + 1);
                    return false;
                }
                true
            });

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                continue;
            }

            if file_type.is_symlink() {
                tracing::warn!(path = %entry.path().display(), "skipping symbolic link");
                set.stats.symlinks_skipped += 1;
                continue;
            }

            if !file_type.is_file() {
                tracing::debug!(path = %entry.path().display(), "skipping special file");
                continue;
            }

            let relative = relative_match_path(entry.path(), root);
            if self.matcher.is_excluded(&relative, false) {
                tracing::debug!(path = %entry.path().display(), "excluded file");
                set.stats.files_excluded += 1;
                continue;
            }

            set.files.insert(entry.into_path());
        }

        set.stats.directories_pruned += pruned.get();
        Ok(())
    }
}

/// Collects files from `sources` with default options.
///
/// Shorthand for resolving the sources and running a [`Collector`].
///
/// # Errors
///
/// Returns [`crate::ArchiveError::SourceNotFound`] if any source is missing,
/// or a walk error as described on [`Collector::collect`].
pub fn collect<P: AsRef<Path>>(sources: &[P], patterns: &IgnorePatterns) -> Result<FileSet> {
    let sources = SourceSet::resolve(sources)?;
    Collector::new(patterns).collect(&sources)
}

fn relative_match_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).map_or_else(
        |_| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        },
        match_path,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveError;
    use std::fs;
    use tempfile::TempDir;

    /// Builds the reference tree used across the collector tests.
    fn reference_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("include_dir")).unwrap();
        fs::create_dir(root.join("exclude_dir")).unwrap();
        fs::create_dir(root.join("mixed_dir")).unwrap();
        fs::write(root.join("include_file.txt"), "include").unwrap();
        fs::write(root.join("exclude_file.log"), "exclude").unwrap();
        fs::write(root.join("exclude_dir/anything"), "exclude").unwrap();
        fs::write(root.join("mixed_dir/include.txt"), "include").unwrap();
        fs::write(root.join("mixed_dir/exclude.log"), "exclude").unwrap();
        temp
    }

    fn relative_names(set: &FileSet, root: &Path) -> Vec<String> {
        let root = crate::source::absolutize(root).unwrap();
        set.iter()
            .map(|p| match_path(p.strip_prefix(&root).unwrap()))
            .collect()
    }

    #[test]
    fn test_collect_reference_tree() {
        let temp = reference_tree();
        let patterns = IgnorePatterns::from_lines(["*.log", "exclude_dir/"]);

        let set = collect(&[temp.path()], &patterns).unwrap();

        assert_eq!(
            relative_names(&set, temp.path()),
            ["include_file.txt", "mixed_dir/include.txt"]
        );
        let stats = set.stats();
        assert_eq!(stats.directories_pruned, 1);
        assert_eq!(stats.files_excluded, 2);
    }

    #[test]
    fn test_collect_without_patterns_takes_everything() {
        let temp = reference_tree();
        let set = collect(&[temp.path()], &IgnorePatterns::new()).unwrap();

        assert_eq!(set.len(), 5);
        assert_eq!(set.stats(), CollectStats::default());
    }

    #[test]
    fn test_pruning_is_transitive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("node_modules/pkg/lib")).unwrap();
        fs::write(root.join("node_modules/pkg/lib/index.js"), "x").unwrap();
        fs::write(root.join("node_modules/pkg/README.md"), "x").unwrap();
        fs::write(root.join("main.js"), "x").unwrap();

        let patterns = IgnorePatterns::from_lines(["node_modules/"]);
        let set = collect(&[root], &patterns).unwrap();

        assert_eq!(relative_names(&set, root), ["main.js"]);
        assert_eq!(set.stats().directories_pruned, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_pruned_directory_is_never_opened() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let locked = root.join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret"), "x").unwrap();
        fs::write(root.join("keep.txt"), "x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let patterns = IgnorePatterns::from_lines(["locked/"]);
        let result = collect(&[root], &patterns);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let set = result.unwrap();
        assert_eq!(relative_names(&set, root), ["keep.txt"]);
    }

    #[test]
    fn test_directory_pattern_does_not_exclude_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("build"), "a file named build").unwrap();

        let patterns = IgnorePatterns::from_lines(["build/"]);
        let set = collect(&[root], &patterns).unwrap();

        assert_eq!(relative_names(&set, root), ["build"]);
    }

    #[test]
    fn test_matching_is_relative_to_each_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("app/build")).unwrap();
        fs::write(root.join("app/build/out.bin"), "x").unwrap();
        fs::write(root.join("app/main.c"), "x").unwrap();

        let patterns = IgnorePatterns::from_lines(["build/"]);

        // Relative to `app`, the directory is `build` and gets pruned.
        let set = collect(&[root.join("app")], &patterns).unwrap();
        assert_eq!(relative_names(&set, &root.join("app")), ["main.c"]);

        // Relative to the parent it is `app/build`, which `build*` misses.
        let set = collect(&[root], &patterns).unwrap();
        assert_eq!(
            relative_names(&set, root),
            ["app/build/out.bin", "app/main.c"]
        );
    }

    #[test]
    fn test_single_file_source_matches_by_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("notes.log"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();

        let patterns = IgnorePatterns::from_lines(["*.log"]);
        let set = collect(&[root.join("notes.log"), root.join("notes.txt")], &patterns).unwrap();

        assert_eq!(relative_names(&set, root), ["notes.txt"]);
        assert_eq!(set.stats().files_excluded, 1);
    }

    #[test]
    fn test_root_itself_is_not_matched() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("kept.txt"), "x").unwrap();

        let patterns = IgnorePatterns::from_lines(["build/"]);
        let set = collect(&[&root], &patterns).unwrap();

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_sources_collapse() {
        let temp = reference_tree();
        let root = temp.path();
        let patterns = IgnorePatterns::from_lines(["*.log"]);

        let set = collect(&[root.join("mixed_dir"), root.join("mixed_dir/include.txt")], &patterns)
            .unwrap();

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_union_of_disjoint_roots() {
        let temp = reference_tree();
        let root = temp.path();
        let patterns = IgnorePatterns::from_lines(["*.log", "exclude_dir/"]);

        let a = collect(&[root.join("mixed_dir")], &patterns).unwrap();
        let b = collect(&[root.join("include_dir")], &patterns).unwrap();
        let both = collect(&[root.join("mixed_dir"), root.join("include_dir")], &patterns).unwrap();

        let union: BTreeSet<_> = a.iter().chain(b.iter()).cloned().collect();
        let combined: BTreeSet<_> = both.iter().cloned().collect();
        assert_eq!(union, combined);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let temp = reference_tree();
        let result = collect(
            &[temp.path().to_path_buf(), temp.path().join("nope")],
            &IgnorePatterns::new(),
        );
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_by_default() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let set = collect(&[root], &IgnorePatterns::new()).unwrap();

        assert_eq!(relative_names(&set, root), ["target.txt"]);
        assert_eq!(set.stats().symlinks_skipped, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_symlinks_collects_link_targets() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("outside");
        let root = temp.path().join("root");
        fs::create_dir(&outside).unwrap();
        fs::create_dir(&root).unwrap();
        fs::write(outside.join("data.txt"), "x").unwrap();
        fs::write(outside.join("skip.log"), "x").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        let patterns = IgnorePatterns::from_lines(["*.log"]);
        let sources = SourceSet::resolve(&[&root]).unwrap();
        let set = Collector::new(&patterns)
            .with_follow_symlinks(true)
            .collect(&sources)
            .unwrap();

        assert_eq!(relative_names(&set, &root), ["linked/data.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_error_when_following() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        std::os::unix::fs::symlink(root.join("a"), root.join("a/b/loop")).unwrap();

        let sources = SourceSet::resolve(&[root]).unwrap();
        let result = Collector::new(&IgnorePatterns::new())
            .with_follow_symlinks(true)
            .collect(&sources);

        assert!(matches!(result, Err(ArchiveError::Walk { .. })));
    }

    #[test]
    fn test_file_set_from_iter_and_remove() {
        let mut set: FileSet = [PathBuf::from("/b"), PathBuf::from("/a"), PathBuf::from("/a")]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next(), Some(&PathBuf::from("/a")));
        assert!(set.remove(Path::new("/a")));
        assert!(!set.contains(Path::new("/a")));
        assert!(!set.is_empty());
    }
}
