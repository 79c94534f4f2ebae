//! Error types for the shatree checksum mirroring tool.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file checksum errors
///
/// These never abort a walk: the walker turns them into diagnostics and moves on.
#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("No such file or directory")]
    NotFound { path: PathBuf },

    #[error("{source}")]
    AccessDenied { path: PathBuf, source: io::Error },

    #[error("{source}")]
    Io { path: PathBuf, source: io::Error },
}

impl ChecksumError {
    /// Classify an I/O error raised while opening or reading `path`.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => ChecksumError::NotFound { path },
            io::ErrorKind::PermissionDenied => ChecksumError::AccessDenied { path, source },
            _ => ChecksumError::Io { path, source },
        }
    }

    /// Path of the file that could not be hashed.
    pub fn path(&self) -> &Path {
        match self {
            ChecksumError::NotFound { path }
            | ChecksumError::AccessDenied { path, .. }
            | ChecksumError::Io { path, .. } => path,
        }
    }
}

/// Structural errors: the walk of one source directory cannot continue.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot derive an output name for source: {0}")]
    UnnamedSource(PathBuf),

    #[error("Failed to traverse {path}: {source}")]
    Traverse {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write checksum file {path}: {source}")]
    WriteArtifact { path: PathBuf, source: io::Error },

    #[error("I/O error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl MirrorError {
    /// Path most closely associated with the failure.
    pub fn path(&self) -> &Path {
        match self {
            MirrorError::SourceNotFound(path)
            | MirrorError::NotADirectory(path)
            | MirrorError::UnnamedSource(path) => path,
            MirrorError::Traverse { path, .. }
            | MirrorError::CreateDir { path, .. }
            | MirrorError::WriteArtifact { path, .. }
            | MirrorError::Io { path, .. } => path,
        }
    }
}

/// Application-level errors surfaced by the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Self-test failed: {0}")]
    SelfTest(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
