//! Merge rules: built-in defaults beneath every other layer.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

use crate::tree::hasher::DEFAULT_BUFFER_SIZE;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("output.directory", ".")?
        .set_default("walk.follow_symlinks", false)?
        .set_default("walk.buffer_size", DEFAULT_BUFFER_SIZE as i64)
}
