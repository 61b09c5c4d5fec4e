//! Report rendering for the terminal (`human`) and for scripts (`json`).

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;
pub use human::format_size;

/// Picks the formatter for `--json`, `--verbose` and `--quiet`.
pub fn create_formatter(json: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(json::JsonFormatter)
    } else {
        Box::new(human::HumanFormatter::new(verbose, quiet))
    }
}
