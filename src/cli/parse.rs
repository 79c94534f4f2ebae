//! CLI parse: clap types for shatree. No behavior; definitions only.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// shatree - write a SHA-256 checksum file for every file in one or more directory trees
#[derive(Parser, Debug, Clone)]
#[command(name = "shatree", version)]
#[command(about = "Generate SHA256 tree for directories")]
pub struct Cli {
    /// Directories to process
    #[arg(required_unless_present = "self_test")]
    pub dirs: Vec<PathBuf>,

    /// Output directory (default: `output.directory` from config, else ".")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Read buffer size in bytes used while hashing
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Run summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run the built-in end-to-end check instead of processing directories
    #[arg(long, conflicts_with_all = ["dirs", "output"])]
    pub self_test: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable logging (diagnostics are still printed)
    #[arg(long, short, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Format of the run summary printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
