//! Built-in end-to-end check, selected with `--self-test`.
//!
//! Builds a small fixture in a temporary directory, mirrors it, and checks the
//! resulting checksum tree against digests computed in memory.

use crate::diagnostics::Diagnostic;
use crate::error::ApiError;
use crate::mirror::{MirrorCommandService, MirrorRequest};
use crate::tree::hasher::compute_content_hash;
use crate::tree::walker::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

/// A single named check and whether it held
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
}

/// Run the self-test and return a line per check.
///
/// Fails with [`ApiError::SelfTest`] naming the failing checks.
pub fn run(walker: &WalkerConfig) -> Result<String, ApiError> {
    let checks = run_checks(walker)?;
    let report = checks
        .iter()
        .map(|c| format!("{} {}", if c.passed { "ok  " } else { "FAIL" }, c.name))
        .collect::<Vec<_>>()
        .join("\n");

    let failed: Vec<&str> = checks.iter().filter(|c| !c.passed).map(|c| c.name).collect();
    if failed.is_empty() {
        Ok(format!("{}\nself-test passed ({} checks)", report, checks.len()))
    } else {
        Err(ApiError::SelfTest(format!(
            "{}\n{} of {} checks failed: {}",
            report,
            failed.len(),
            checks.len(),
            failed.join(", ")
        )))
    }
}

/// Build the fixture, mirror it twice, and evaluate every check.
pub fn run_checks(walker: &WalkerConfig) -> Result<Vec<Check>, ApiError> {
    let workspace = TempDir::new()?;
    let root = workspace.path();
    debug!(root = %root.display(), "Self-test workspace");

    let dir1 = root.join("test_dir1");
    let dir2 = root.join("test_dir2");
    let output = root.join("test_output");
    fs::create_dir_all(dir1.join("subdir"))?;
    fs::create_dir_all(dir1.join("empty"))?;
    fs::create_dir_all(&dir2)?;
    fs::write(dir1.join("file1.txt"), "test content 1")?;
    fs::write(dir1.join("subdir").join("file2.txt"), "test content 2")?;
    fs::write(dir2.join("file1.txt"), "test content 1")?;
    fs::write(dir2.join("file3.txt"), "different content")?;

    let request = MirrorRequest::new(vec![dir1, dir2], output.clone())
        .with_walker_config(walker.clone());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let first = MirrorCommandService::run(&request, &mut diagnostics);

    let digest_ok = |relative: &str, content: &str| {
        artifact_matches(&output.join(relative), content.as_bytes())
    };

    let mut checks = vec![
        Check {
            name: "all sources succeed",
            passed: !first.has_failures() && diagnostics.is_empty(),
        },
        Check {
            name: "top-level file digest",
            passed: digest_ok("test_dir1/file1.txt.sha256", "test content 1"),
        },
        Check {
            name: "nested file digest",
            passed: digest_ok("test_dir1/subdir/file2.txt.sha256", "test content 2"),
        },
        Check {
            name: "empty directory mirrored",
            passed: is_empty_dir(&output.join("test_dir1").join("empty")),
        },
        Check {
            name: "second source kept separate",
            passed: digest_ok("test_dir2/file1.txt.sha256", "test content 1")
                && digest_ok("test_dir2/file3.txt.sha256", "different content"),
        },
    ];

    let before = fs::read(output.join("test_dir2").join("file3.txt.sha256")).ok();
    let second = MirrorCommandService::run(&request, &mut diagnostics);
    let after = fs::read(output.join("test_dir2").join("file3.txt.sha256")).ok();
    checks.push(Check {
        name: "repeat run is identical",
        passed: !second.has_failures() && before.is_some() && before == after,
    });

    Ok(checks)
}

fn artifact_matches(artifact: &Path, content: &[u8]) -> bool {
    match fs::read_to_string(artifact) {
        Ok(text) => text == compute_content_hash(content).to_artifact_line(),
        Err(_) => false,
    }
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
