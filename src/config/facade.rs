//! Config loading facade: builds the layered configuration.

use super::merge::merge_policy::builder_with_defaults;
use super::sources::{environment, global_file};
use super::VrgConfig;
use crate::error::VrgError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`VrgConfig`] from defaults, file, and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file (when present), then `VRG_*`.
    pub fn load() -> Result<VrgConfig, VrgError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder);
        let config: VrgConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `path` (which must exist), then `VRG_*`.
    pub fn load_from_file(path: &Path) -> Result<VrgConfig, VrgError> {
        if !path.exists() {
            return Err(VrgError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!(config_path = %path.display(), "Loading configuration file");
        let builder = global_file::add_file(builder_with_defaults()?, path, true);
        let builder = environment::add_to_builder(builder);
        let config: VrgConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `load_from_file` when a path is given, `load` otherwise.
    pub fn load_with(path: Option<&Path>) -> Result<VrgConfig, VrgError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
