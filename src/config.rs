//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file (or an
//! explicit `--config` file), `VRG_*` environment variables, then the
//! conventional `VERGE_*` connection variables for the selected profile.
//! CLI flags are applied last by the caller through [`ProfileOverrides`].

use crate::error::VrgError;
use crate::logging::LoggingConfig;
use crate::snapshot::WaitPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::apply_verge_env;
pub use sources::global_file::global_config_path;

const REDACTED: &str = "********";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrgConfig {
    /// Profile used when `--profile` is not given
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    /// Named connection profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, ConnectionProfile>,

    /// Output defaults
    #[serde(default)]
    pub output: OutputConfig,

    /// `--wait` polling
    #[serde(default)]
    pub wait: WaitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_profile_name() -> String {
    "default".to_string()
}

impl Default for VrgConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            profiles: BTreeMap::new(),
            output: OutputConfig::default(),
            wait: WaitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Connection settings for one VergeOS system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// API token; takes precedence over username/password
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            host: None,
            username: None,
            password: None,
            token: None,
            verify_tls: true,
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Connection values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub insecure: bool,
}

impl ConnectionProfile {
    pub fn apply(&mut self, overrides: &ProfileOverrides) {
        if let Some(host) = &overrides.host {
            self.host = Some(host.clone());
        }
        if let Some(username) = &overrides.username {
            self.username = Some(username.clone());
        }
        if let Some(password) = &overrides.password {
            self.password = Some(password.clone());
        }
        if let Some(token) = &overrides.token {
            self.token = Some(token.clone());
        }
        if overrides.insecure {
            self.verify_tls = false;
        }
    }

    /// A usable profile has a host and either a token or a username/password
    /// pair.
    pub fn validate(&self) -> Result<(), VrgError> {
        if self.host.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(VrgError::ConfigError(
                "no VergeOS host configured (use --host, VERGE_HOST, or a profile in the config file)"
                    .to_string(),
            ));
        }
        let has_token = self.token.as_deref().is_some_and(|t| !t.is_empty());
        let has_basic = self.username.as_deref().is_some_and(|u| !u.is_empty())
            && self.password.is_some();
        if !has_token && !has_basic {
            return Err(VrgError::ConfigError(
                "no credentials configured (use --token, or --username with --password)"
                    .to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(VrgError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| REDACTED.to_string()),
            token: self.token.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

/// Output defaults; `--output` and `--no-color` override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// table, wide, or json
    #[serde(default = "default_output_format")]
    pub format: String,

    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_output_format() -> String {
    "table".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            color: true,
        }
    }
}

/// Polling for `snapshot create --wait`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_wait_timeout")]
    pub timeout_secs: u64,
}

fn default_poll_interval() -> u64 {
    2
}

fn default_wait_timeout() -> u64 {
    600
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_wait_timeout(),
        }
    }
}

impl WaitConfig {
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl VrgConfig {
    /// Resolve the named profile (or the default one) with `VERGE_*`
    /// environment overrides applied. An explicitly named profile must
    /// exist; the default profile may be empty and filled from the
    /// environment or flags.
    pub fn select_profile(&self, name: Option<&str>) -> Result<ConnectionProfile, VrgError> {
        let mut profile = match name {
            Some(name) => self.profile(name).cloned().ok_or_else(|| {
                VrgError::ConfigError(format!("profile '{}' not found in configuration", name))
            })?,
            None => self
                .profile(&self.default_profile)
                .cloned()
                .unwrap_or_default(),
        };
        apply_verge_env(&mut profile, |key| std::env::var(key).ok());
        Ok(profile)
    }

    /// Profile by name. The config loader lowercases table keys, so
    /// `[profiles.Prod]` is stored as `prod`; lookups ignore case.
    pub fn profile(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles
            .get(name)
            .or_else(|| self.profiles.get(&name.to_lowercase()))
            .or_else(|| {
                self.profiles
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, profile)| profile)
            })
    }

    /// Copy with passwords and tokens masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            profiles: self
                .profiles
                .iter()
                .map(|(name, profile)| (name.clone(), profile.redacted()))
                .collect(),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), VrgError> {
        if !matches!(self.output.format.as_str(), "table" | "wide" | "json") {
            return Err(VrgError::ConfigError(format!(
                "invalid output.format '{}' (must be table, wide, or json)",
                self.output.format
            )));
        }
        if self.wait.timeout_secs == 0 {
            return Err(VrgError::ConfigError(
                "wait.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
