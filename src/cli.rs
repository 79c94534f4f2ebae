//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; the route resolves a run mode and dispatches it.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, OutputFormat};
pub use presentation::{format_run_summary_json, format_run_summary_text};
pub use route::{Mode, RunContext, RunOutcome};
