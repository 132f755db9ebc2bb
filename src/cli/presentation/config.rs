use crate::config::VrgConfig;
use crate::error::VrgError;
use std::path::Path;

/// Effective configuration as TOML, with secrets masked.
pub fn format_config_show(config: &VrgConfig) -> Result<String, VrgError> {
    toml::to_string_pretty(&config.redacted())
        .map_err(|e| VrgError::ConfigError(format!("Failed to serialize configuration: {}", e)))
}

pub fn format_config_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "No configuration path could be determined (HOME is not set)".to_string(),
    }
}
