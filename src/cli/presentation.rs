//! CLI presentation: text and json formatters for the run summary.

use crate::error::ApiError;
use crate::mirror::{RunSummary, SourceStatus};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Table of per-source results followed by one line per failed source.
pub fn format_run_summary_text(summary: &RunSummary, color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Source",
        "Output",
        "Directories",
        "Checksums",
        "Unreadable",
        "Status",
    ]);
    for outcome in &summary.outcomes {
        let destination = outcome
            .destination
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            outcome.source.display().to_string(),
            destination,
            outcome.directories.to_string(),
            outcome.artifacts.to_string(),
            outcome.failed_files.to_string(),
            status_label(outcome.status, color),
        ]);
    }

    let mut out = table.to_string();
    for outcome in &summary.outcomes {
        if let Some(ref error) = outcome.error {
            out.push_str(&format!(
                "\nFailed to process {}: {}",
                outcome.source.display(),
                error
            ));
        }
    }
    out
}

fn status_label(status: SourceStatus, color: bool) -> String {
    match (status, color) {
        (SourceStatus::Ok, true) => "ok".green().to_string(),
        (SourceStatus::Failed, true) => "failed".red().to_string(),
        (SourceStatus::Ok, false) => "ok".to_string(),
        (SourceStatus::Failed, false) => "failed".to_string(),
    }
}

/// Pretty-printed JSON of the run summary.
pub fn format_run_summary_json(summary: &RunSummary) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(summary)?)
}
