//! Cloud Snapshots
//!
//! System-wide point-in-time captures of a VergeOS environment. The remote
//! service owns scheduling, retention and immutability; this module only
//! models what the API returns, validates what the user asks for, and defines
//! the [`SnapshotManager`] seam that the HTTP client implements.

use crate::error::VrgError;
use crate::table::Row;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

pub mod commands;

pub use commands::{SnapshotCommandService, WaitPolicy};

/// Statuses the remote reports while a snapshot is still being materialized.
pub const IN_PROGRESS_STATUSES: &[&str] = &["creating", "pending", "initializing", "syncing"];

/// Cloud snapshot as returned by `cloud_snapshots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "$key", deserialize_with = "deserialize_key")]
    pub key: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Epoch seconds.
    #[serde(default)]
    pub created: Option<i64>,
    /// Epoch seconds; zero or absent means the snapshot never expires.
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub immutable: bool,
    #[serde(default)]
    pub immutable_status: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub snapshot_profile: Option<String>,
    #[serde(default)]
    pub created_manually: bool,
}

impl Snapshot {
    pub fn never_expires(&self) -> bool {
        matches!(self.expires, None | Some(0))
    }

    pub fn is_expired(&self, now: i64) -> bool {
        !self.never_expires() && self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn is_in_progress(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| IN_PROGRESS_STATUSES.contains(&s.trim().to_lowercase().as_str()))
            .unwrap_or(false)
    }

    pub fn to_row(&self) -> Row {
        into_row(json!({
            "key": self.key,
            "name": self.name,
            "description": self.description,
            "created": self.created,
            "expires": self.expires,
            "immutable": self.immutable,
            "immutable_status": self.immutable_status,
            "private": self.private,
            "status": self.status,
            "snapshot_profile": self.snapshot_profile,
            "created_manually": self.created_manually,
        }))
    }
}

/// VM captured in a cloud snapshot (`cloud_snapshot_vms`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotVm {
    #[serde(rename = "$key", deserialize_with = "deserialize_key")]
    pub key: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cpu_cores: Option<u32>,
    /// Megabytes.
    #[serde(default)]
    pub ram: Option<u64>,
    #[serde(default)]
    pub os_family: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SnapshotVm {
    pub fn to_row(&self) -> Row {
        into_row(json!({
            "key": self.key,
            "name": self.name,
            "description": self.description,
            "cpu_cores": self.cpu_cores,
            "ram": self.ram,
            "os_family": self.os_family,
            "status": self.status,
        }))
    }
}

/// Tenant captured in a cloud snapshot (`cloud_snapshot_tenants`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTenant {
    #[serde(rename = "$key", deserialize_with = "deserialize_key")]
    pub key: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SnapshotTenant {
    pub fn to_row(&self) -> Row {
        into_row(json!({
            "key": self.key,
            "name": self.name,
            "description": self.description,
            "status": self.status,
        }))
    }
}

fn into_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// The API sends `$key` as a number or as a numeric string depending on the
/// endpoint.
fn deserialize_key<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKey {
        Number(u64),
        Text(String),
    }

    match RawKey::deserialize(deserializer)? {
        RawKey::Number(n) => Ok(n),
        RawKey::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid $key: {}", s))),
    }
}

/// How the user identified a snapshot on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotRef {
    Key(u64),
    Name(String),
}

impl FromStr for SnapshotRef {
    type Err = VrgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VrgError::Validation(
                "snapshot name or key must not be empty".to_string(),
            ));
        }
        Ok(match trimmed.parse::<u64>() {
            Ok(key) => SnapshotRef::Key(key),
            Err(_) => SnapshotRef::Name(trimmed.to_string()),
        })
    }
}

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotRef::Key(key) => write!(f, "{}", key),
            SnapshotRef::Name(name) => write!(f, "{}", name),
        }
    }
}

/// Server-side list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub name: Option<String>,
}

impl ListFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Expiration requested at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Let the remote apply its default retention.
    Default,
    Seconds(u64),
    Never,
}

/// Validated options for `snapshot create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSnapshotOptions {
    pub name: Option<String>,
    pub retention: Retention,
    pub immutable: bool,
    pub private: bool,
    pub wait: bool,
}

impl CreateSnapshotOptions {
    /// Build options from raw flag values, rejecting invalid combinations.
    pub fn from_flags(
        name: Option<&str>,
        retention: Option<u64>,
        never_expire: bool,
        immutable: bool,
        private: bool,
        wait: bool,
    ) -> Result<Self, VrgError> {
        let retention = match (retention, never_expire) {
            (Some(_), true) => {
                return Err(VrgError::Validation(
                    "--retention and --never-expire are mutually exclusive".to_string(),
                ))
            }
            (Some(secs), false) => Retention::Seconds(secs),
            (None, true) => Retention::Never,
            (None, false) => Retention::Default,
        };

        let options = Self {
            name: name.map(|n| n.trim().to_string()),
            retention,
            immutable,
            private,
            wait,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), VrgError> {
        if self.retention == Retention::Seconds(0) {
            return Err(VrgError::Validation(
                "--retention must be greater than zero seconds".to_string(),
            ));
        }
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(VrgError::Validation("--name must not be empty".to_string()));
        }
        Ok(())
    }

    /// JSON body for `POST cloud_snapshots`.
    pub fn request_body(&self) -> Value {
        let mut body = serde_json::Map::new();
        if let Some(name) = &self.name {
            body.insert("name".to_string(), json!(name));
        }
        match self.retention {
            Retention::Default => {}
            Retention::Seconds(secs) => {
                body.insert("retention".to_string(), json!(secs));
            }
            Retention::Never => {
                body.insert("never_expire".to_string(), json!(true));
            }
        }
        body.insert("immutable".to_string(), json!(self.immutable));
        body.insert("private".to_string(), json!(self.private));
        Value::Object(body)
    }
}

/// Remote collaborator for cloud snapshots.
#[async_trait]
pub trait SnapshotManager: Send + Sync {
    async fn list(&self, filter: Option<&ListFilter>) -> Result<Vec<Snapshot>, VrgError>;

    /// Fails with [`VrgError::NotFound`] when the key does not exist.
    async fn get(&self, key: u64) -> Result<Snapshot, VrgError>;

    async fn create(&self, options: &CreateSnapshotOptions) -> Result<Snapshot, VrgError>;

    async fn delete(&self, key: u64) -> Result<(), VrgError>;

    async fn vms(&self, key: u64) -> Result<Vec<SnapshotVm>, VrgError>;

    async fn tenants(&self, key: u64) -> Result<Vec<SnapshotTenant>, VrgError>;
}
