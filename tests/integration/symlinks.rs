//! Integration tests for symlink handling

#![cfg(unix)]

use super::test_utils::{read_artifact, write_file};
use shatree::diagnostics::{Diagnostic, DiagnosticScope};
use shatree::tree::hasher::compute_content_hash;
use shatree::tree::walker::{mirror_tree, Walker, WalkerConfig};
use std::os::unix::fs::symlink;
use tempfile::TempDir;

fn following() -> WalkerConfig {
    WalkerConfig {
        follow_symlinks: true,
        ..WalkerConfig::default()
    }
}

/// A symlink to a file is hashed using its target's content
#[test]
fn test_symlink_to_file_is_hashed() {
    let temp_dir = TempDir::new().unwrap();
    let target = write_file(temp_dir.path(), "outside/real.txt", "linked content");
    let source = temp_dir.path().join("src");
    std::fs::create_dir_all(&source).unwrap();
    symlink(&target, source.join("alias.txt")).unwrap();
    let output = temp_dir.path().join("out");

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = mirror_tree(&source, &output, &mut diagnostics).unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(report.artifacts, 1);
    assert_eq!(
        read_artifact(&output.join("src").join("alias.txt.sha256")),
        compute_content_hash(b"linked content").to_artifact_line()
    );
}

/// Symlinked directories are not descended unless following is enabled
#[test]
fn test_symlink_to_directory_followed_only_when_enabled() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "elsewhere/inner.txt", "inner");
    let source = temp_dir.path().join("src");
    write_file(&source, "plain.txt", "plain");
    symlink(temp_dir.path().join("elsewhere"), source.join("linked")).unwrap();

    let output = temp_dir.path().join("out");
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = mirror_tree(&source, &output, &mut diagnostics).unwrap();
    assert_eq!(report.artifacts, 1);
    assert!(!output.join("src").join("linked").exists());

    let followed_output = temp_dir.path().join("followed");
    let report = Walker::with_config(source.clone(), followed_output.clone(), following())
        .mirror(&mut diagnostics)
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(report.artifacts, 2);
    assert_eq!(
        read_artifact(&followed_output.join("src").join("linked").join("inner.txt.sha256")),
        compute_content_hash(b"inner").to_artifact_line()
    );
}

/// A dangling symlink is a per-file failure, not a structural one
#[test]
fn test_dangling_symlink_reported() {
    for config in [WalkerConfig::default(), following()] {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        write_file(&source, "ok.txt", "fine");
        let broken = source.join("broken.txt");
        symlink(temp_dir.path().join("does_not_exist"), &broken).unwrap();
        let output = temp_dir.path().join("out");

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let report = Walker::with_config(source.clone(), output.clone(), config)
            .mirror(&mut diagnostics)
            .unwrap();

        assert_eq!(report.artifacts, 1);
        assert_eq!(report.failed_files, 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].scope, DiagnosticScope::File);
        assert_eq!(diagnostics[0].path, broken);
        assert!(!output.join("src").join("broken.txt.sha256").exists());
    }
}

/// A symlink loop is reported and skipped when following symlinks
#[test]
fn test_symlink_loop_skipped_when_following() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("src");
    write_file(&source, "sub/file.txt", "data");
    symlink(&source, source.join("sub").join("back")).unwrap();
    let output = temp_dir.path().join("out");

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let report = Walker::with_config(source.clone(), output.clone(), following())
        .mirror(&mut diagnostics)
        .unwrap();

    assert_eq!(report.artifacts, 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].scope, DiagnosticScope::Directory);
    assert!(output.join("src").join("sub").join("file.txt.sha256").is_file());
}
