//! Property-based tests for checksum and mirror determinism

use proptest::prelude::*;
use shatree::diagnostics::Diagnostic;
use shatree::tree::hasher::{compute_content_hash, FileHasher};
use shatree::tree::walker::{Walker, WalkerConfig};
use std::fs;
use tempfile::TempDir;

/// Streaming a file in chunks of any size yields the one-shot digest
#[test]
fn test_streamed_digest_matches_one_shot_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(64));

    runner
        .run(
            &(proptest::collection::vec(any::<u8>(), 0..20_000), 1usize..10_000),
            |(content, buffer_size)| {
                let temp_dir = TempDir::new().unwrap();
                let path = temp_dir.path().join("blob.bin");
                fs::write(&path, &content).unwrap();

                let streamed = FileHasher::new(buffer_size).checksum(&path).unwrap();
                prop_assert_eq!(streamed, compute_content_hash(&content));
                Ok(())
            },
        )
        .unwrap();
}

/// Digest text is always 64 lowercase hex characters plus a newline
#[test]
fn test_artifact_line_shape_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<Vec<u8>>(), |content| {
            let line = compute_content_hash(&content).to_artifact_line();
            prop_assert_eq!(line.len(), 65);
            prop_assert!(line.ends_with('\n'));
            prop_assert!(line[..64]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            Ok(())
        })
        .unwrap();
}

/// Mirroring the same tree twice produces byte-identical artifacts
#[test]
fn test_mirror_repeatable_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(16));

    runner
        .run(
            &proptest::collection::btree_map(
                "[a-z]{1,8}",
                proptest::collection::vec(any::<u8>(), 0..512),
                1..8,
            ),
            |files| {
                let temp_dir = TempDir::new().unwrap();
                let source = temp_dir.path().join("src");
                fs::create_dir_all(source.join("nested")).unwrap();
                for (name, content) in &files {
                    fs::write(source.join("nested").join(format!("{}.dat", name)), content)
                        .unwrap();
                }
                let output = temp_dir.path().join("out");
                let walker =
                    Walker::with_config(source.clone(), output.clone(), WalkerConfig::default());

                let mut diagnostics: Vec<Diagnostic> = Vec::new();
                let first = walker.mirror(&mut diagnostics).unwrap();
                let snapshot: Vec<Vec<u8>> = files
                    .keys()
                    .map(|name| {
                        fs::read(
                            output
                                .join("src")
                                .join("nested")
                                .join(format!("{}.dat.sha256", name)),
                        )
                        .unwrap()
                    })
                    .collect();
                let second = walker.mirror(&mut diagnostics).unwrap();

                prop_assert!(diagnostics.is_empty());
                prop_assert_eq!(first.artifacts, files.len());
                prop_assert_eq!(&first, &second);
                for ((name, content), artifact) in files.iter().zip(&snapshot) {
                    let path = output
                        .join("src")
                        .join("nested")
                        .join(format!("{}.dat.sha256", name));
                    prop_assert_eq!(&fs::read(&path).unwrap(), artifact);
                    let expected_line = compute_content_hash(content).to_artifact_line();
                    prop_assert_eq!(
                        artifact.as_slice(),
                        expected_line.as_bytes()
                    );
                }
                Ok(())
            },
        )
        .unwrap();
}
