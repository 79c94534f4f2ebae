//! Integration tests for layered configuration loading

use super::test_utils::{with_env, with_env_lock, write_file};
use shatree::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use shatree::error::ApiError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_without_any_source() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_env_lock(|| ConfigLoader::load_layers(None, temp_dir.path())).unwrap();

    assert_eq!(config.output.directory, PathBuf::from("."));
    assert_eq!(config.walk.buffer_size, 4096);
    assert!(!config.walk.follow_symlinks);
    assert_eq!(config.logging.level, "error");
}

#[test]
fn test_environment_overrides_workspace_file() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        WORKSPACE_CONFIG_FILE,
        "[output]\ndirectory = \"from-file\"\n\n[walk]\nbuffer_size = 1024\n",
    );

    let config = with_env(
        &[
            ("SHATREE_OUTPUT__DIRECTORY", "from-env"),
            ("SHATREE_WALK__FOLLOW_SYMLINKS", "true"),
        ],
        || ConfigLoader::load_layers(None, temp_dir.path()),
    )
    .unwrap();

    assert_eq!(config.output.directory, PathBuf::from("from-env"));
    assert_eq!(config.walk.buffer_size, 1024);
    assert!(config.walk.follow_symlinks);
}

#[test]
fn test_environment_buffer_size_is_parsed() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_env(&[("SHATREE_WALK__BUFFER_SIZE", "65536")], || {
        ConfigLoader::load_layers(None, temp_dir.path())
    })
    .unwrap();

    assert_eq!(config.walk.buffer_size, 65536);
}

#[test]
fn test_oversized_buffer_size_from_environment_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let result = with_env(&[("SHATREE_WALK__BUFFER_SIZE", "1099511627776")], || {
        ConfigLoader::load_layers(None, temp_dir.path())
    });

    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_zero_buffer_size_from_file_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "bad.toml", "[walk]\nbuffer_size = 0\n");

    let result = with_env_lock(|| ConfigLoader::load_from_file(&path));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_malformed_file_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        WORKSPACE_CONFIG_FILE,
        "[walk]\nbuffer_size = \"lots\"\n",
    );

    let result = with_env_lock(|| ConfigLoader::load_layers(None, temp_dir.path()));
    assert!(matches!(result, Err(ApiError::ConfigError(_))));
}

#[test]
fn test_logging_section_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(
        temp_dir.path(),
        "logging.toml",
        "[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[logging.modules]\nwalkdir = \"trace\"\n",
    );

    let config = with_env_lock(|| ConfigLoader::load_from_file(&path)).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(
        config.logging.modules.get("walkdir").map(String::as_str),
        Some("trace")
    );
}
