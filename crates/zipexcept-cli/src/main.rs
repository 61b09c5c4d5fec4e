//! zipexcept CLI - archive source trees into tar, tar.gz or zip while
//! skipping everything matched by a `.tarignore` file.

mod cli;
mod create;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    create::execute(&cli, &*formatter)
}

/// Sends diagnostics to stderr. `RUST_LOG` overrides the flag-derived level.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "off"
    } else if verbose {
        "info"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
