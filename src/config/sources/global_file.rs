//! Global config file source: $XDG_CONFIG_HOME/vrg/config.toml or ~/.config/vrg/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `$XDG_CONFIG_HOME/vrg/config.toml`, falling back to `~/.config`.
pub fn global_config_path() -> Option<PathBuf> {
    let config_home = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("vrg").join("config.toml"))
}

/// Layer the global file when present; its absence is not an error.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if let Some(path) = global_config_path() {
        if path.exists() {
            builder = add_file(builder, &path, false);
        } else {
            debug!(
                config_path = %path.display(),
                "No global configuration file; using defaults and environment"
            );
        }
    }
    Ok(builder)
}

/// Add a TOML file source regardless of its extension.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(path)
            .format(FileFormat::Toml)
            .required(required),
    )
}
