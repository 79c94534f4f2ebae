//! Mirror command service: runs the tree walker once per source directory.
//!
//! Sources are processed strictly one after another because they share an
//! output root. A structural failure of one source is recorded in the run
//! summary and the next source is still attempted.

use crate::diagnostics::DiagnosticSink;
use crate::tree::path;
use crate::tree::walker::{MirrorFailure, MirrorReport, Walker, WalkerConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// One run of the tool: a list of sources and a shared output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    pub sources: Vec<PathBuf>,
    pub output_root: PathBuf,
    pub walker: WalkerConfig,
}

impl MirrorRequest {
    pub fn new(sources: Vec<PathBuf>, output_root: PathBuf) -> Self {
        Self {
            sources,
            output_root,
            walker: WalkerConfig::default(),
        }
    }

    pub fn with_walker_config(mut self, walker: WalkerConfig) -> Self {
        self.walker = walker;
        self
    }
}

/// Outcome status of one source directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Ok,
    Failed,
}

/// Per-source entry of the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOutcome {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub status: SourceStatus,
    pub directories: usize,
    pub artifacts: usize,
    pub failed_files: usize,
    pub error: Option<String>,
}

impl SourceOutcome {
    fn succeeded(report: MirrorReport) -> Self {
        Self {
            source: report.source,
            destination: Some(report.destination),
            status: SourceStatus::Ok,
            directories: report.directories,
            artifacts: report.artifacts,
            failed_files: report.failed_files,
            error: None,
        }
    }

    /// Counts come from the partial report, so output written before the
    /// failure is still accounted for.
    fn failed(source: PathBuf, failure: MirrorFailure) -> Self {
        let error = Some(failure.error.to_string());
        match failure.partial {
            Some(partial) => Self {
                source,
                destination: Some(partial.destination),
                status: SourceStatus::Failed,
                directories: partial.directories,
                artifacts: partial.artifacts,
                failed_files: partial.failed_files,
                error,
            },
            None => Self {
                source,
                destination: None,
                status: SourceStatus::Failed,
                directories: 0,
                artifacts: 0,
                failed_files: 0,
                error,
            },
        }
    }
}

/// Summary of a whole run, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<SourceOutcome>,
}

impl RunSummary {
    /// True when any source failed structurally.
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| o.status == SourceStatus::Failed)
    }

    pub fn total_artifacts(&self) -> usize {
        self.outcomes.iter().map(|o| o.artifacts).sum()
    }

    pub fn total_failed_files(&self) -> usize {
        self.outcomes.iter().map(|o| o.failed_files).sum()
    }
}

/// Mirror command service
pub struct MirrorCommandService;

impl MirrorCommandService {
    /// Mirror every source in `request`, in order.
    pub fn run(request: &MirrorRequest, sink: &mut dyn DiagnosticSink) -> RunSummary {
        warn_on_shared_names(&request.sources);

        let mut summary = RunSummary::default();
        for source in &request.sources {
            let walker = Walker::with_config(
                source.clone(),
                request.output_root.clone(),
                request.walker.clone(),
            );
            let outcome = match walker.mirror_tracked(sink) {
                Ok(report) => SourceOutcome::succeeded(report),
                Err(failure) => SourceOutcome::failed(source.clone(), failure),
            };
            summary.outcomes.push(outcome);
        }

        info!(
            sources = summary.outcomes.len(),
            artifacts = summary.total_artifacts(),
            failed_files = summary.total_failed_files(),
            failed = summary.has_failures(),
            "Run complete"
        );
        summary
    }
}

/// Sources with the same basename mirror into the same subtree.
fn warn_on_shared_names(sources: &[PathBuf]) {
    let mut seen: HashMap<std::ffi::OsString, &PathBuf> = HashMap::new();
    for source in sources {
        let Ok(name) = path::source_name(source) else {
            continue;
        };
        if let Some(first) = seen.get(&name) {
            warn!(
                first = %first.display(),
                second = %source.display(),
                "Sources share a name; their checksum trees will be merged"
            );
        } else {
            seen.insert(name, source);
        }
    }
}
