//! Diagnostics side channel
//!
//! Failures that do not change the outcome of a walk (an unreadable file, a
//! skipped symlink loop) and structural failures are both reported here as
//! one human-readable line each, as soon as they happen. Callers must not
//! derive control flow from diagnostics; the walker's `Result` is the contract.

use owo_colors::OwoColorize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// What a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticScope {
    File,
    Directory,
}

/// A single reported failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub scope: DiagnosticScope,
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn file(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self {
            scope: DiagnosticScope::File,
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn directory(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self {
            scope: DiagnosticScope::Directory,
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Receiver of diagnostics emitted during a walk
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in memory
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Writes each diagnostic to stderr immediately, prefixed with the program name.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    program: String,
    color: bool,
    reported: usize,
}

impl ConsoleSink {
    pub fn new(program: impl Into<String>, color: bool) -> Self {
        Self {
            program: program.into(),
            color,
            reported: 0,
        }
    }

    /// Number of diagnostics written so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    fn render(&self, diagnostic: &Diagnostic) -> String {
        if self.color {
            format!("{}: {}", self.program.yellow(), diagnostic)
        } else {
            format!("{}: {}", self.program, diagnostic)
        }
    }
}

impl DiagnosticSink for ConsoleSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let line = self.render(&diagnostic);
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        // Nowhere left to report a failing stderr.
        let _ = writeln!(handle, "{}", line);
        self.reported += 1;
    }
}
