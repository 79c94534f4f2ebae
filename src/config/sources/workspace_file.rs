//! Working directory config file source: `./.shatree.toml`

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const WORKSPACE_CONFIG_FILE: &str = ".shatree.toml";

pub fn workspace_config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(WORKSPACE_CONFIG_FILE)
}

/// Add the working directory config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    working_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = workspace_config_path(working_dir);
    if path.is_file() {
        return Ok(builder.add_source(File::from(path.as_path()).required(false)));
    }
    Ok(builder)
}
