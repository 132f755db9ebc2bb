//! Built-in defaults: the lowest configuration layer.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Config builder seeded with every default that later layers may override.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("default_profile", "default")?
        .set_default("output.format", "table")?
        .set_default("output.color", true)?
        .set_default("wait.poll_interval_secs", 2)?
        .set_default("wait.timeout_secs", 600)
}
