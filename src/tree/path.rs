//! Mapping from source paths to their mirrored output locations

use crate::error::MirrorError;
use crate::tree::hasher::SIDECAR_EXTENSION;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the subtree a source directory is mirrored into.
///
/// This is the basename of the source. Paths without one (`.`, `..`, `a/..`)
/// are canonicalized first; a filesystem root has no name and is rejected.
pub fn source_name(source: &Path) -> Result<OsString, MirrorError> {
    if let Some(name) = source.file_name() {
        return Ok(name.to_os_string());
    }

    let canonical = dunce::canonicalize(source).map_err(|e| MirrorError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    canonical
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| MirrorError::UnnamedSource(source.to_path_buf()))
}

/// Root of the mirrored subtree for `source` under `output_root`.
pub fn destination_root(output_root: &Path, source: &Path) -> Result<PathBuf, MirrorError> {
    Ok(output_root.join(source_name(source)?))
}

/// Mirrored output directory for a directory at `relative` inside the source.
pub fn mirrored_dir(destination: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        destination.to_path_buf()
    } else {
        destination.join(relative)
    }
}

/// Sidecar file name for `file_name`: the original name plus `.sha256`.
pub fn sidecar_name(file_name: &std::ffi::OsStr) -> OsString {
    let mut name = file_name.to_os_string();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    name
}

/// Sidecar path for a file at `relative` (including its file name) inside the source.
///
/// Returns `None` when `relative` has no file name component.
pub fn sidecar_path(destination: &Path, relative: &Path) -> Option<PathBuf> {
    let file_name = relative.file_name()?;
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    Some(mirrored_dir(destination, parent).join(sidecar_name(file_name)))
}
