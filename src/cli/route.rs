//! CLI route: resolves the run mode once and dispatches it.

use crate::cli::parse::{Cli, OutputFormat};
use crate::cli::presentation::{format_run_summary_json, format_run_summary_text};
use crate::config::{ConfigLoader, ShatreeConfig};
use crate::diagnostics::ConsoleSink;
use crate::error::ApiError;
use crate::mirror::{MirrorCommandService, MirrorRequest};
use crate::selftest;
use crate::tree::walker::WalkerConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

/// What this invocation does, decided once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Mirror the requested source directories
    Mirror(MirrorRequest),
    /// Run the built-in end-to-end check
    SelfTest(WalkerConfig),
}

/// Printable result of a run and whether it counts as success
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub output: String,
    pub success: bool,
}

/// Runtime context for CLI execution: merged configuration plus CLI overrides.
pub struct RunContext {
    config: ShatreeConfig,
    format: OutputFormat,
}

impl RunContext {
    /// Load configuration (explicit file, or layered sources rooted at the
    /// current directory) and apply the CLI's walk and output overrides.
    pub fn new(cli: &Cli) -> Result<Self, ApiError> {
        let config = match cli.config {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&std::env::current_dir()?)?,
        };
        Self::with_config(config, cli)
    }

    /// Build from an already loaded configuration.
    pub fn with_config(mut config: ShatreeConfig, cli: &Cli) -> Result<Self, ApiError> {
        if cli.follow_symlinks {
            config.walk.follow_symlinks = true;
        }
        if let Some(buffer_size) = cli.buffer_size {
            config.walk.buffer_size = buffer_size;
        }
        if let Some(ref output) = cli.output {
            config.output.directory = output.clone();
        }
        config.validate()?;

        Ok(Self {
            config,
            format: cli.format,
        })
    }

    pub fn config(&self) -> &ShatreeConfig {
        &self.config
    }

    /// Resolve the mode for this invocation.
    pub fn mode(&self, cli: &Cli) -> Mode {
        if cli.self_test {
            return Mode::SelfTest(self.config.walk.clone());
        }
        Mode::Mirror(
            MirrorRequest::new(cli.dirs.clone(), self.output_root())
                .with_walker_config(self.config.walk.clone()),
        )
    }

    fn output_root(&self) -> PathBuf {
        self.config.output.directory.clone()
    }

    /// Execute the resolved mode.
    pub fn execute(&self, mode: &Mode) -> Result<RunOutcome, ApiError> {
        match mode {
            Mode::Mirror(request) => {
                info!(
                    sources = request.sources.len(),
                    output_root = %request.output_root.display(),
                    "Mirroring sources"
                );
                let color = self.config.logging.color && std::io::stderr().is_terminal();
                let mut sink = ConsoleSink::new("shatree", color);
                let summary = MirrorCommandService::run(request, &mut sink);
                let output = match self.format {
                    OutputFormat::Text => format_run_summary_text(&summary, color),
                    OutputFormat::Json => format_run_summary_json(&summary)?,
                };
                Ok(RunOutcome {
                    output,
                    success: !summary.has_failures(),
                })
            }
            Mode::SelfTest(walker) => {
                let output = selftest::run(walker)?;
                Ok(RunOutcome {
                    output,
                    success: true,
                })
            }
        }
    }
}
