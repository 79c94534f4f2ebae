//! Configuration System
//!
//! Layered configuration, lowest precedence first: built-in defaults, the
//! global config file, `.shatree.toml` in the working directory, then
//! `SHATREE_*` environment variables. CLI flags are applied on top by the
//! caller. An explicit `--config` file replaces both file layers.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::hasher::MAX_BUFFER_SIZE;
use crate::tree::walker::WalkerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShatreeConfig {
    /// Where mirrored checksum trees are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Traversal and hashing settings
    #[serde(default)]
    pub walk: WalkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root used when `--output` is not given
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl ShatreeConfig {
    /// Validate the merged configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.output.directory.as_os_str().is_empty() {
            return Err(ApiError::ConfigError(
                "output.directory cannot be empty".to_string(),
            ));
        }
        if self.walk.buffer_size == 0 {
            return Err(ApiError::ConfigError(
                "walk.buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.walk.buffer_size > MAX_BUFFER_SIZE {
            return Err(ApiError::ConfigError(format!(
                "walk.buffer_size must be at most {} bytes",
                MAX_BUFFER_SIZE
            )));
        }
        Ok(())
    }
}

/// Loads [`ShatreeConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the platform global config file and `working_dir/.shatree.toml`.
    pub fn load(working_dir: &Path) -> Result<ShatreeConfig, ApiError> {
        Self::load_layers(global_config_path().as_deref(), working_dir)
    }

    /// Load with an explicit global config path (or none).
    pub fn load_layers(
        global: Option<&Path>,
        working_dir: &Path,
    ) -> Result<ShatreeConfig, ApiError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder, global)?;
        let builder = sources::workspace_file::add_to_builder(builder, working_dir)?;
        Self::finish(sources::environment::add_to_builder(builder))
    }

    /// Load from a single explicit file; environment variables still apply.
    pub fn load_from_file(path: &Path) -> Result<ShatreeConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        Self::finish(sources::environment::add_to_builder(builder))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ShatreeConfig, ApiError> {
        let config: ShatreeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }
}
