//! Archive creation command.

use crate::cli::Cli;
use crate::error::convert_archive_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use zipexcept_core::ArchiveFormat;
use zipexcept_core::CreationConfig;
use zipexcept_core::create_archive;
use zipexcept_core::create_archive_with_progress;

pub fn execute(args: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let format = args.archive_format();
    let output = format.ensure_extension(&args.output);

    if args.compress && format == ArchiveFormat::Zip {
        formatter.format_warning("--compress only applies to tar; zip entries are always deflated");
    }

    let config = build_config(args, format);

    let show_progress = !args.quiet && !args.json && CliProgress::should_show();
    let result = if show_progress {
        let mut progress = CliProgress::new("Archiving");
        create_archive_with_progress(&output, &args.sources, &config, &mut progress)
    } else {
        create_archive(&output, &args.sources, &config)
    };

    let report = result.map_err(|e| convert_archive_error(e, &output))?;
    formatter.format_creation_result(&report)?;

    Ok(())
}

fn build_config(args: &Cli, format: ArchiveFormat) -> CreationConfig {
    let mut config = CreationConfig::default()
        .with_format(Some(format))
        .with_ignore_file(Some(args.ignore_file.clone()))
        .with_extra_patterns(args.exclude.clone())
        .with_follow_symlinks(args.follow_symlinks)
        .with_overwrite(args.force);

    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_build_config_from_flags() {
        let args = Cli::try_parse_from([
            "zipexcept", "src", "-o", "out", "-c", "-i", "rules", "-x", "*.o", "-l", "3",
            "--force",
        ])
        .unwrap();
        let config = build_config(&args, args.archive_format());

        assert_eq!(config.format, Some(ArchiveFormat::TarGz));
        assert_eq!(config.ignore_file, Some(PathBuf::from("rules")));
        assert_eq!(config.extra_patterns, ["*.o"]);
        assert_eq!(config.compression_level, Some(3));
        assert!(config.overwrite);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_build_config_keeps_default_level() {
        let args = Cli::try_parse_from(["zipexcept", "src", "-o", "out"]).unwrap();
        let config = build_config(&args, args.archive_format());
        assert_eq!(
            config.compression_level,
            CreationConfig::default().compression_level
        );
    }
}
