//! Checksum mirror of a filesystem tree
//!
//! Each source directory is mirrored under the output root, with one
//! `<file>.sha256` sidecar per regular file.

pub mod hasher;
pub mod path;
pub mod walker;
