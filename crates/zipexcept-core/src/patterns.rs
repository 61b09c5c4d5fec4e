//! Ignore-file parsing.
//!
//! An ignore file is plain text with one pattern per line. Surrounding
//! whitespace is stripped, and blank lines and lines starting with `#` are
//! dropped. There is no escaping, negation, or anchoring syntax; a trailing
//! `/` marks a directory pattern (see [`crate::matcher`]).

use crate::Result;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

/// Default ignore-file name, looked up relative to the working directory.
pub const DEFAULT_IGNORE_FILE: &str = ".tarignore";

/// Ordered, immutable list of exclusion patterns.
///
/// Order is preserved as read but has no effect on matching: a path is
/// excluded if any pattern matches.
///
/// # Examples
///
/// ```
/// use zipexcept_core::IgnorePatterns;
///
/// let patterns = IgnorePatterns::from_lines(["# build output", "", "target/", "*.log"]);
/// assert_eq!(patterns.as_slice(), ["target/", "*.log"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
    source: Option<PathBuf>,
}

impl IgnorePatterns {
    /// Creates an empty pattern list that excludes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads patterns from an ignore file.
    ///
    /// A missing file yields an empty list: no ignore file means no
    /// exclusions. Use [`IgnorePatterns::source`] to tell the two apart.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened or read.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexcept_core::IgnorePatterns;
    ///
    /// let patterns = IgnorePatterns::load("/definitely/not/here/.tarignore")?;
    /// assert!(patterns.is_empty());
    /// assert!(patterns.source().is_none());
    /// # Ok::<(), zipexcept_core::ArchiveError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "ignore file not found, nothing will be excluded"
                );
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut patterns = Vec::new();
        for line in BufReader::new(file).lines() {
            if let Some(pattern) = parse_line(&line?) {
                patterns.push(pattern.to_string());
            }
        }

        tracing::info!(
            path = %path.display(),
            count = patterns.len(),
            "loaded ignore patterns"
        );

        Ok(Self {
            patterns,
            source: Some(path.to_path_buf()),
        })
    }

    /// Parses patterns from in-memory lines using ignore-file rules.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = lines
            .into_iter()
            .filter_map(|line| parse_line(line.as_ref()).map(str::to_string))
            .collect();
        Self {
            patterns,
            source: None,
        }
    }

    /// Appends patterns parsed with ignore-file rules, keeping order.
    #[must_use]
    pub fn with_extra<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns.extend(Self::from_lines(lines).patterns);
        self
    }

    /// Returns the ignore file these patterns were read from.
    ///
    /// `None` when the file was missing or the patterns were built in memory.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Returns the patterns in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.patterns
    }

    /// Iterates over the patterns in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.patterns.iter()
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no pattern is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a IgnorePatterns {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}
