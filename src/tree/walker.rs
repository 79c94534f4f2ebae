//! Filesystem walker that mirrors a source tree as sidecar checksum files
//!
//! For a source directory `D` named `name`, every directory `D/rel` gets an
//! output directory `OUT/name/rel` (created even when it stays empty), and
//! every regular file `D/rel/file` gets `OUT/name/rel/file.sha256` holding its
//! hex digest and a newline.
//!
//! Per-file failures are reported to the diagnostic sink and skipped.
//! Only traversal-level failures end the walk with an error.

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{ChecksumError, MirrorError};
use crate::tree::hasher::{Digest, FileHasher, DEFAULT_BUFFER_SIZE};
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Whether to descend into symlinked directories (default: false)
    pub follow_symlinks: bool,
    /// Read chunk size used when hashing files
    pub buffer_size: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Result of mirroring one source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorReport {
    pub source: PathBuf,
    /// Root of the mirrored subtree (`output_root/<source name>`)
    pub destination: PathBuf,
    /// Output directories created or confirmed, including the destination itself
    pub directories: usize,
    /// Checksum files written
    pub artifacts: usize,
    /// Files skipped because they could not be hashed
    pub failed_files: usize,
}

/// A structural failure, with the partial report when output was already written
#[derive(Debug)]
pub struct MirrorFailure {
    pub error: MirrorError,
    /// `None` when the walk failed before its destination root existed
    pub partial: Option<MirrorReport>,
}

impl MirrorFailure {
    fn before_output(error: MirrorError) -> Self {
        Self {
            error,
            partial: None,
        }
    }
}

/// Tree mirror walker for one source directory
pub struct Walker {
    source: PathBuf,
    output_root: PathBuf,
    config: WalkerConfig,
    hasher: FileHasher,
}

impl Walker {
    /// Create a walker mirroring `source` into `output_root`
    pub fn new(source: PathBuf, output_root: PathBuf) -> Self {
        Self::with_config(source, output_root, WalkerConfig::default())
    }

    /// Create a walker with custom configuration
    pub fn with_config(source: PathBuf, output_root: PathBuf, config: WalkerConfig) -> Self {
        let hasher = FileHasher::new(config.buffer_size);
        Self {
            source,
            output_root,
            config,
            hasher,
        }
    }

    /// Walk the source tree and write its checksum mirror.
    ///
    /// A structural failure is reported to `sink` as well as returned. Output
    /// written before the failure is left in place.
    pub fn mirror(&self, sink: &mut dyn DiagnosticSink) -> Result<MirrorReport, MirrorError> {
        self.mirror_tracked(sink).map_err(|failure| failure.error)
    }

    /// Like [`Walker::mirror`], but a failure also carries the counts reached
    /// before it happened.
    pub fn mirror_tracked(
        &self,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<MirrorReport, MirrorFailure> {
        match self.run(sink) {
            Ok(report) => {
                info!(
                    source = %self.source.display(),
                    destination = %report.destination.display(),
                    directories = report.directories,
                    artifacts = report.artifacts,
                    failed_files = report.failed_files,
                    "Mirrored source directory"
                );
                Ok(report)
            }
            Err(failure) => {
                let e = &failure.error;
                warn!(source = %self.source.display(), error = %e, "Mirror failed");
                sink.report(Diagnostic::directory(e.path(), e));
                Err(failure)
            }
        }
    }

    fn run(&self, sink: &mut dyn DiagnosticSink) -> Result<MirrorReport, MirrorFailure> {
        let destination = self.prepare().map_err(MirrorFailure::before_output)?;

        let mut report = MirrorReport {
            source: self.source.clone(),
            destination,
            directories: 0,
            artifacts: 0,
            failed_files: 0,
        };
        match self.walk(&mut report, sink) {
            Ok(()) => Ok(report),
            Err(error) => Err(MirrorFailure {
                error,
                partial: Some(report),
            }),
        }
    }

    /// Check the source and create its destination root.
    fn prepare(&self) -> Result<PathBuf, MirrorError> {
        self.check_source()?;
        let destination = path::destination_root(&self.output_root, &self.source)?;
        create_dir(&destination)?;
        Ok(destination)
    }

    fn walk(
        &self,
        report: &mut MirrorReport,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), MirrorError> {
        let destination = report.destination.clone();
        let excluded = self.nested_destination(&destination);

        let mut entries = WalkDir::new(&self.source)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    self.handle_walk_error(e, report, sink)?;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                if is_excluded(&entry, excluded.as_deref()) {
                    debug!(path = %entry.path().display(), "Skipping output subtree inside source");
                    entries.skip_current_dir();
                    continue;
                }
                let relative = self.relative(entry.path())?;
                let out_dir = path::mirrored_dir(&destination, relative);
                create_dir(&out_dir)?;
                report.directories += 1;
                debug!(path = %out_dir.display(), "Mirrored directory");
            } else {
                self.mirror_file(&entry, &destination, report, sink)?;
            }
        }

        Ok(())
    }

    /// The source must exist and be a directory before anything is created.
    fn check_source(&self) -> Result<(), MirrorError> {
        match fs::metadata(&self.source) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(MirrorError::NotADirectory(self.source.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(MirrorError::SourceNotFound(self.source.clone()))
            }
            Err(e) => Err(MirrorError::Io {
                path: self.source.clone(),
                source: e,
            }),
        }
    }

    /// Canonical destination, if it lies strictly below the source directory.
    ///
    /// A destination equal to the source (output root is the source's parent)
    /// is not excluded: sidecars are then written next to the files they describe.
    fn nested_destination(&self, destination: &Path) -> Option<PathBuf> {
        let source = dunce::canonicalize(&self.source).ok()?;
        let destination = dunce::canonicalize(destination).ok()?;
        (destination != source && destination.starts_with(&source)).then_some(destination)
    }

    fn relative<'a>(&self, entry_path: &'a Path) -> Result<&'a Path, MirrorError> {
        entry_path
            .strip_prefix(&self.source)
            .map_err(|_| MirrorError::Io {
                path: entry_path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::Other,
                    format!("path is outside source {}", self.source.display()),
                ),
            })
    }

    fn handle_walk_error(
        &self,
        error: walkdir::Error,
        report: &mut MirrorReport,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), MirrorError> {
        let path = error
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.source.clone());

        if error.loop_ancestor().is_some() {
            warn!(path = %path.display(), "Skipping symlink loop");
            sink.report(Diagnostic::directory(&path, &error));
            return Ok(());
        }

        if error.depth() > 0 && is_dangling_symlink(&path) {
            warn!(path = %path.display(), "Skipping dangling symlink");
            report.failed_files += 1;
            sink.report(Diagnostic::file(
                &path,
                ChecksumError::NotFound { path: path.clone() },
            ));
            return Ok(());
        }

        Err(MirrorError::Traverse {
            path,
            source: error,
        })
    }

    fn mirror_file(
        &self,
        entry: &DirEntry,
        destination: &Path,
        report: &mut MirrorReport,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), MirrorError> {
        let file_path = entry.path();

        if !entry.file_type().is_file() {
            if !entry.path_is_symlink() {
                debug!(path = %file_path.display(), "Skipping non-regular file");
                return Ok(());
            }
            // Unfollowed symlink: hash file targets, never descend into directories
            match fs::metadata(file_path) {
                Ok(target) if target.is_file() => {}
                Ok(_) => {
                    debug!(path = %file_path.display(), "Skipping symlink to non-regular file");
                    return Ok(());
                }
                Err(e) => {
                    self.report_file_failure(ChecksumError::from_io(file_path, e), report, sink);
                    return Ok(());
                }
            }
        }

        let digest = match self.hasher.checksum(file_path) {
            Ok(digest) => digest,
            Err(e) => {
                self.report_file_failure(e, report, sink);
                return Ok(());
            }
        };

        let relative = self.relative(file_path)?;
        let Some(artifact) = path::sidecar_path(destination, relative) else {
            return Ok(());
        };
        write_artifact(&artifact, &digest).map_err(|e| MirrorError::WriteArtifact {
            path: artifact.clone(),
            source: e,
        })?;
        report.artifacts += 1;
        debug!(path = %artifact.display(), digest = %digest, "Wrote checksum");

        Ok(())
    }

    fn report_file_failure(
        &self,
        error: ChecksumError,
        report: &mut MirrorReport,
        sink: &mut dyn DiagnosticSink,
    ) {
        warn!(path = %error.path().display(), error = %error, "Failed to checksum file");
        report.failed_files += 1;
        sink.report(Diagnostic::file(error.path(), &error));
    }
}

/// Mirror `source` into `output_root` with the default configuration.
pub fn mirror_tree(
    source: &Path,
    output_root: &Path,
    sink: &mut dyn DiagnosticSink,
) -> Result<MirrorReport, MirrorError> {
    Walker::new(source.to_path_buf(), output_root.to_path_buf()).mirror(sink)
}

fn create_dir(dir: &Path) -> Result<(), MirrorError> {
    fs::create_dir_all(dir).map_err(|e| MirrorError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn is_excluded(entry: &DirEntry, excluded: Option<&Path>) -> bool {
    match excluded {
        Some(excluded) => dunce::canonicalize(entry.path())
            .map(|p| p == excluded)
            .unwrap_or(false),
        None => false,
    }
}

fn is_dangling_symlink(path: &Path) -> bool {
    let is_link = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    is_link && fs::metadata(path).is_err()
}

/// Write `digest` to `artifact` atomically, replacing any previous file.
fn write_artifact(artifact: &Path, digest: &Digest) -> io::Result<()> {
    let dir = artifact.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".shatree-")
        .tempfile_in(dir)?;
    tmp.write_all(digest.to_artifact_line().as_bytes())?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    tmp.persist(artifact).map_err(|e| e.error)?;
    Ok(())
}
