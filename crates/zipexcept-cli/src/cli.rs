//! CLI argument parsing using clap.

use clap::Parser;
use clap::ValueEnum;
use std::path::PathBuf;
use zipexcept_core::ArchiveFormat;
use zipexcept_core::DEFAULT_IGNORE_FILE;

#[derive(Parser)]
#[command(name = "zipexcept")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source files or directories to archive
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Output archive path (the format's extension is appended if missing)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Archive format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Tar)]
    pub format: FormatArg,

    /// Compress tar archives with gzip
    #[arg(short, long)]
    pub compress: bool,

    /// File with exclusion patterns
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_IGNORE_FILE)]
    pub ignore_file: PathBuf,

    /// Additional exclude pattern (glob, can be repeated)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Archive the targets of symbolic links instead of skipping them
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Tar,
    Zip,
}

impl Cli {
    /// Archive format selected by `--format` and `--compress`.
    pub const fn archive_format(&self) -> ArchiveFormat {
        ArchiveFormat::from_choice(matches!(self.format, FormatArg::Zip), self.compress)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["zipexcept", "src", "-o", "out"]).unwrap();
        assert_eq!(cli.sources, [PathBuf::from("src")]);
        assert_eq!(cli.format, FormatArg::Tar);
        assert!(!cli.compress);
        assert_eq!(cli.ignore_file, PathBuf::from(".tarignore"));
        assert!(cli.exclude.is_empty());
        assert_eq!(cli.compression_level, None);
        assert_eq!(cli.archive_format(), ArchiveFormat::Tar);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "zipexcept", "a", "b", "-o", "out", "-f", "zip", "-c", "-i", "rules", "-x", "*.o",
            "-x", "target/", "-l", "9", "--follow-symlinks", "--force", "-v", "-j",
        ])
        .unwrap();

        assert_eq!(cli.sources.len(), 2);
        assert_eq!(cli.archive_format(), ArchiveFormat::Zip);
        assert_eq!(cli.ignore_file, PathBuf::from("rules"));
        assert_eq!(cli.exclude, ["*.o", "target/"]);
        assert_eq!(cli.compression_level, Some(9));
        assert!(cli.follow_symlinks && cli.force && cli.verbose && cli.json);
    }

    #[test]
    fn test_compress_selects_tar_gz() {
        let cli = Cli::try_parse_from(["zipexcept", "src", "-o", "out", "-c"]).unwrap();
        assert_eq!(cli.archive_format(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["zipexcept", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from(["zipexcept", "src"]).is_err());
        assert!(Cli::try_parse_from(["zipexcept", "src", "-o", "o", "-f", "rar"]).is_err());
        assert!(Cli::try_parse_from(["zipexcept", "src", "-o", "o", "-l", "0"]).is_err());
        assert!(Cli::try_parse_from(["zipexcept", "src", "-o", "o", "-v", "-q"]).is_err());
    }
}
