//! shatree: checksum mirrors of directory trees
//!
//! Recursively walks source directories and writes, for every regular file, a
//! `<name>.sha256` sidecar holding its SHA-256 digest into a mirrored directory
//! structure under a shared output root.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod mirror;
pub mod selftest;
pub mod tree;
