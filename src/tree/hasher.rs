//! Content checksums for files using SHA-256
//!
//! Files are streamed through a single incremental hasher with a fixed-size
//! buffer, so memory use does not depend on file size.

use crate::error::ChecksumError;
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default read chunk size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Largest read chunk size accepted, in bytes (16 MiB).
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Extension appended to a file name to form its sidecar checksum file.
pub const SIDECAR_EXTENSION: &str = "sha256";

/// A SHA-256 digest of a file's full byte content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Lowercase hexadecimal form (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Contents of a sidecar artifact: the hex digest and a single newline.
    pub fn to_artifact_line(&self) -> String {
        format!("{}\n", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Streaming file hasher
#[derive(Debug, Clone)]
pub struct FileHasher {
    buffer_size: usize,
}

impl Default for FileHasher {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FileHasher {
    /// Create a hasher reading `buffer_size` bytes per chunk, clamped to
    /// `1..=MAX_BUFFER_SIZE`.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.clamp(1, MAX_BUFFER_SIZE),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Compute the digest of the file at `path`.
    ///
    /// The file handle is dropped on every exit path; no partial digest is
    /// ever returned.
    pub fn checksum(&self, path: &Path) -> Result<Digest, ChecksumError> {
        let mut file = File::open(path).map_err(|e| ChecksumError::from_io(path, e))?;
        self.checksum_reader(&mut file)
            .map_err(|e| ChecksumError::from_io(path, e))
    }

    /// Digest everything `reader` yields until end of input.
    pub fn checksum_reader<R: Read>(&self, reader: &mut R) -> io::Result<Digest> {
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
        }

        Ok(Digest(hasher.finalize().into()))
    }
}

/// Compute the digest of a file with the default buffer size.
pub fn checksum_file(path: &Path) -> Result<Digest, ChecksumError> {
    FileHasher::default().checksum(path)
}

/// Compute the digest of an in-memory buffer
pub fn compute_content_hash(content: &[u8]) -> Digest {
    Digest(Sha256::digest(content).into())
}
