//! Exclusion matching.
//!
//! Each pattern falls into one of three kinds, decided by its text:
//!
//! - **Directory** (`build/`): matches directories whose relative path
//!   glob-matches the prefix followed by `*`. The match is a plain prefix
//!   glob, so `build/` also excludes `build-tmp`.
//! - **Wildcard** (contains `*`, `?` or `[`): shell-glob match against the
//!   relative path or the bare filename.
//! - **Literal**: exact equality with the relative path or the bare filename.
//!
//! Globs follow `fnmatch` rules: `*` crosses `/`, matching is case-sensitive,
//! and a `[` without a closing `]` stands for itself while the rest of the
//! pattern keeps its wildcards.
//! Relative paths always use `/` as the separator.

use crate::patterns::IgnorePatterns;
use glob::Pattern;
use std::path::Component;
use std::path::Path;

const WILDCARD_CHARS: [char; 3] = ['*', '?', '['];

/// Compiled form of an [`IgnorePatterns`] list.
///
/// Matching is a pure function of the relative path, the directory flag and
/// the pattern list; compiling once just avoids re-parsing globs for every
/// path during a walk.
///
/// # Examples
///
/// ```
/// use zipexcept_core::IgnorePatterns;
/// use zipexcept_core::Matcher;
///
/// let matcher = Matcher::new(&IgnorePatterns::from_lines(["*.log", "exclude_dir/"]));
///
/// assert!(matcher.is_excluded("mixed_dir/exclude.log", false));
/// assert!(matcher.is_excluded("exclude_dir", true));
/// assert!(!matcher.is_excluded("exclude_dir", false));
/// assert!(!matcher.is_excluded("mixed_dir/include.txt", false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
enum Rule {
    Directory(Pattern),
    Wildcard(Pattern),
    Literal(String),
}

impl Matcher {
    /// Compiles a pattern list. Empty patterns are dropped.
    #[must_use]
    pub fn new(patterns: &IgnorePatterns) -> Self {
        let rules = patterns
            .iter()
            .filter_map(|pattern| Rule::parse(pattern))
            .collect();
        Self { rules }
    }

    /// Returns `true` if no rule can ever match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decides whether a path is excluded.
    ///
    /// `relative_path` is the path below the source root it was found
    /// under, `/`-separated. `is_dir` tells whether it names a directory;
    /// directory patterns only ever match directories.
    #[must_use]
    pub fn is_excluded(&self, relative_path: &str, is_dir: bool) -> bool {
        let filename = relative_path.rsplit('/').next().unwrap_or(relative_path);

        self.rules.iter().any(|rule| match rule {
            Rule::Directory(glob) => is_dir && glob.matches(relative_path),
            Rule::Wildcard(glob) => glob.matches(relative_path) || glob.matches(filename),
            Rule::Literal(text) => text == relative_path || text == filename,
        })
    }
}

impl Rule {
    fn parse(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        if let Some(prefix) = pattern.strip_suffix('/') {
            return Some(Self::Directory(compile_prefix(prefix)));
        }

        if pattern.contains(WILDCARD_CHARS) {
            return Some(match compile(pattern) {
                Some(glob) => Self::Wildcard(glob),
                None => Self::Literal(pattern.to_string()),
            });
        }

        Some(Self::Literal(pattern.to_string()))
    }
}

/// Decides exclusion for a single path against a pattern list.
///
/// Convenience wrapper around [`Matcher`]; prefer building a `Matcher` once
/// when testing many paths.
///
/// # Examples
///
/// ```
/// use zipexcept_core::IgnorePatterns;
/// use zipexcept_core::matcher::is_excluded;
///
/// let patterns = IgnorePatterns::from_lines(["build/"]);
/// assert!(is_excluded("build", &patterns, true));
/// assert!(is_excluded("build-tmp", &patterns, true));
/// assert!(!is_excluded("src/build", &patterns, true));
/// ```
#[must_use]
pub fn is_excluded(relative_path: &str, patterns: &IgnorePatterns, is_dir: bool) -> bool {
    Matcher::new(patterns).is_excluded(relative_path, is_dir)
}

/// Renders a relative path in the `/`-separated form the matcher expects.
///
/// Only normal components are kept, so `./a/b` becomes `a/b`.
///
/// # Examples
///
/// ```
/// use zipexcept_core::matcher::match_path;
/// use std::path::Path;
///
/// assert_eq!(match_path(Path::new("./src/main.rs")), "src/main.rs");
/// ```
#[must_use]
pub fn match_path(relative: &Path) -> String {
    let mut rendered = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !rendered.is_empty() {
                rendered.push('/');
            }
            rendered.push_str(&part.to_string_lossy());
        }
    }
    rendered
}

/// Compiles an fnmatch-style glob.
///
/// Runs of `*` are collapsed first: they are equivalent under fnmatch but
/// `glob` reserves `**` for recursive matching. Unclosed `[` are escaped.
/// Returns `None` if the result still does not compile.
fn compile(pattern: &str) -> Option<Pattern> {
    Pattern::new(&escape_unclosed_brackets(&collapse_stars(pattern))).ok()
}

/// Rewrites every `[` that does not open a complete character class as
/// `[[]`. Class bounds follow fnmatch: an optional leading `!`, then a `]`
/// in first position is a member rather than the terminator.
fn escape_unclosed_brackets(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '[' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let mut j = i + 1;
        if chars.get(j) == Some(&'!') {
            j += 1;
        }
        if chars.get(j) == Some(&']') {
            j += 1;
        }
        while j < chars.len() && chars[j] != ']' {
            j += 1;
        }

        if j < chars.len() {
            out.extend(&chars[i..=j]);
            i = j + 1;
        } else {
            out.push_str("[[]");
            i += 1;
        }
    }

    out
}

fn compile_prefix(prefix: &str) -> Pattern {
    compile(&format!("{prefix}*")).unwrap_or_else(|| {
        let escaped = format!("{}*", Pattern::escape(prefix));
        // An escaped literal followed by `*` always compiles.
        Pattern::new(&escaped).unwrap_or_default()
    })
}

fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut previous_star = false;
    for c in pattern.chars() {
        if c == '*' && previous_star {
            continue;
        }
        previous_star = c == '*';
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> Matcher {
        Matcher::new(&IgnorePatterns::from_lines(patterns))
    }

    #[test]
    fn test_reference_tree_patterns() {
        let m = matcher(&["*.log", "exclude_dir/"]);

        assert!(m.is_excluded("exclude_file.log", false));
        assert!(m.is_excluded("exclude_dir", true));
        assert!(m.is_excluded("mixed_dir/exclude.log", false));

        assert!(!m.is_excluded("include_file.txt", false));
        assert!(!m.is_excluded("include_dir", true));
        assert!(!m.is_excluded("mixed_dir/include.txt", false));
    }

    #[test]
    fn test_directory_pattern_requires_directory() {
        let m = matcher(&["build/"]);
        assert!(m.is_excluded("build", true));
        assert!(!m.is_excluded("build", false));
    }

    #[test]
    fn test_directory_pattern_is_prefix_glob() {
        let m = matcher(&["build/"]);
        assert!(m.is_excluded("build-tmp", true));
        assert!(m.is_excluded("build/sub", true));
        assert!(m.is_excluded("builder", true));
        // Anchored at the start of the relative path, never on the filename.
        assert!(!m.is_excluded("src/build", true));
    }

    #[test]
    fn test_nested_directory_pattern() {
        let m = matcher(&["src/generated/"]);
        assert!(m.is_excluded("src/generated", true));
        assert!(!m.is_excluded("generated", true));
    }

    #[test]
    fn test_bare_slash_matches_every_directory() {
        let m = matcher(&["/"]);
        assert!(m.is_excluded("anything", true));
        assert!(m.is_excluded("a/b", true));
        assert!(!m.is_excluded("file.txt", false));
    }

    #[test]
    fn test_wildcard_matches_filename_or_path() {
        let m = matcher(&["*.tmp"]);
        assert!(m.is_excluded("a.tmp", false));
        assert!(m.is_excluded("deep/nested/b.tmp", false));
        assert!(!m.is_excluded("a.tmp.txt", false));

        let m = matcher(&["docs/*.md"]);
        assert!(m.is_excluded("docs/readme.md", false));
        // `*` crosses separators like fnmatch does.
        assert!(m.is_excluded("docs/deep/readme.md", false));
        assert!(!m.is_excluded("readme.md", false));
    }

    #[test]
    fn test_wildcard_applies_to_directories() {
        let m = matcher(&["*.cache"]);
        assert!(m.is_excluded("pip.cache", true));
    }

    #[test]
    fn test_question_mark_and_classes() {
        let m = matcher(&["file?.txt", "[abc].rs", "[!x]y"]);
        assert!(m.is_excluded("file1.txt", false));
        assert!(!m.is_excluded("file10.txt", false));
        assert!(m.is_excluded("src/b.rs", false));
        assert!(!m.is_excluded("d.rs", false));
        assert!(m.is_excluded("zy", false));
        assert!(!m.is_excluded("xy", false));
    }

    #[test]
    fn test_double_star_behaves_like_single_star() {
        let m = matcher(&["**.bak", "a**b"]);
        assert!(m.is_excluded("x/y.bak", false));
        assert!(m.is_excluded("a/c/b", false));
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        let m = matcher(&["[unclosed"]);
        assert!(m.is_excluded("[unclosed", false));
        assert!(m.is_excluded("dir/[unclosed", false));
        assert!(!m.is_excluded("u", false));
    }

    #[test]
    fn test_unclosed_bracket_keeps_other_wildcards() {
        let m = matcher(&["*[.log", "data?["]);
        assert!(m.is_excluded("foo[.log", false));
        assert!(m.is_excluded("nested/x[.log", false));
        assert!(m.is_excluded("data1[", false));
        assert!(!m.is_excluded("foo.log", false));
        assert!(!m.is_excluded("data12[", false));
    }

    #[test]
    fn test_escape_unclosed_brackets() {
        assert_eq!(escape_unclosed_brackets("*[.log"), "*[[].log");
        assert_eq!(escape_unclosed_brackets("a[bc]d["), "a[bc]d[[]");
        assert_eq!(escape_unclosed_brackets("[]]x"), "[]]x");
        assert_eq!(escape_unclosed_brackets("[!]x]"), "[!]x]");
        assert_eq!(escape_unclosed_brackets("[!"), "[[]!");
        assert_eq!(escape_unclosed_brackets("plain"), "plain");
    }

    #[test]
    fn test_literal_matches_exactly() {
        let m = matcher(&["secret.txt", "config/local.toml"]);
        assert!(m.is_excluded("secret.txt", false));
        assert!(m.is_excluded("nested/secret.txt", false));
        assert!(m.is_excluded("config/local.toml", false));
        assert!(!m.is_excluded("secret.txt.bak", false));
        assert!(!m.is_excluded("other/config/local.toml", false));
    }

    #[test]
    fn test_literal_matches_directories_too() {
        let m = matcher(&["node_modules"]);
        assert!(m.is_excluded("node_modules", true));
        assert!(m.is_excluded("web/node_modules", true));
    }

    #[test]
    fn test_case_sensitive() {
        let m = matcher(&["*.LOG"]);
        assert!(!m.is_excluded("a.log", false));
        assert!(m.is_excluded("a.LOG", false));
    }

    #[test]
    fn test_empty_patterns_never_match() {
        let m = matcher(&[]);
        assert!(m.is_empty());
        assert!(!m.is_excluded("", false));
        assert!(!m.is_excluded("anything", true));
    }

    #[test]
    fn test_free_function_agrees_with_matcher() {
        let patterns = IgnorePatterns::from_lines(["*.o", "target/"]);
        let m = Matcher::new(&patterns);
        for (path, dir) in [("a.o", false), ("target", true), ("src", true)] {
            assert_eq!(is_excluded(path, &patterns, dir), m.is_excluded(path, dir));
        }
    }

    #[test]
    fn test_match_path_uses_forward_slashes() {
        let path: std::path::PathBuf = ["a", "b", "c.txt"].iter().collect();
        assert_eq!(match_path(&path), "a/b/c.txt");
        assert_eq!(match_path(Path::new("")), "");
    }

    #[test]
    fn test_collapse_stars() {
        assert_eq!(collapse_stars("***.log"), "*.log");
        assert_eq!(collapse_stars("a*b**c"), "a*b*c");
        assert_eq!(collapse_stars("plain"), "plain");
    }
}
