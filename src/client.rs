//! VergeOS API client
//!
//! reqwest-based implementation of [`SnapshotManager`] against the VergeOS
//! REST API (`/api/v4`). Authenticates with an API token
//! (`x-yottabyte-token`) or HTTP basic credentials.

use crate::config::ConnectionProfile;
use crate::error::VrgError;
use crate::snapshot::{
    CreateSnapshotOptions, ListFilter, Snapshot, SnapshotManager, SnapshotTenant, SnapshotVm,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_PREFIX: &str = "/api/v4";
const TOKEN_HEADER: &str = "x-yottabyte-token";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const SNAPSHOT_FIELDS: &str = "$key,name,description,created,expires,immutable,immutable_status,\
private,status,snapshot_profile#name as snapshot_profile,created_manually";
const SNAPSHOT_VM_FIELDS: &str = "$key,name,description,cpu_cores,ram,os_family,status";
const SNAPSHOT_TENANT_FIELDS: &str = "$key,name,description,status";

/// Credentials sent with every request.
#[derive(Clone)]
pub enum Auth {
    Token(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Token(_) => f.write_str("Auth::Token(..)"),
            Auth::Basic { username, .. } => write!(f, "Auth::Basic({})", username),
        }
    }
}

/// HTTP client bound to one VergeOS system.
pub struct VergeClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl VergeClient {
    pub fn new(
        host: &str,
        auth: Auth,
        verify_tls: bool,
        timeout: Duration,
    ) -> Result<Self, VrgError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| VrgError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: api_base_url(host)?,
            auth,
        })
    }

    /// Build a client from a validated connection profile.
    pub fn from_profile(profile: &ConnectionProfile) -> Result<Self, VrgError> {
        profile.validate()?;
        let host = profile
            .host
            .as_deref()
            .ok_or_else(|| VrgError::ConfigError("no host configured".to_string()))?;
        let auth = match (&profile.token, &profile.username, &profile.password) {
            (Some(token), _, _) if !token.is_empty() => Auth::Token(token.clone()),
            (_, Some(username), Some(password)) => Auth::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => {
                return Err(VrgError::ConfigError(
                    "no credentials configured".to_string(),
                ))
            }
        };
        Self::new(
            host,
            auth,
            profile.verify_tls,
            Duration::from_secs(profile.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        match &self.auth {
            Auth::Token(token) => builder.header(TOKEN_HEADER, token),
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        resource: &'static str,
        identifier: &str,
    ) -> Result<Response, VrgError> {
        let request = builder.build().map_err(map_http_error)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let response = self.client.execute(request).await.map_err(map_http_error)?;
        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "VergeOS API request");

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, &body, resource, identifier))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &'static str,
        identifier: &str,
    ) -> Result<T, VrgError> {
        let response = self.send(builder, resource, identifier).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| VrgError::Transport(format!("Failed to parse {} response: {}", resource, e)))
    }
}

#[async_trait]
impl SnapshotManager for VergeClient {
    async fn list(&self, filter: Option<&ListFilter>) -> Result<Vec<Snapshot>, VrgError> {
        let mut query = vec![("fields", SNAPSHOT_FIELDS.to_string())];
        if let Some(name) = filter.and_then(|f| f.name.as_deref()) {
            query.push(("filter", name_filter(name)));
        }
        let builder = self.request(Method::GET, "cloud_snapshots").query(&query);
        let body: Value = self.get_json(builder, "Snapshot", "*").await?;
        parse_list(body)
    }

    async fn get(&self, key: u64) -> Result<Snapshot, VrgError> {
        let builder = self
            .request(Method::GET, &format!("cloud_snapshots/{}", key))
            .query(&[("fields", SNAPSHOT_FIELDS)]);
        self.get_json(builder, "Snapshot", &key.to_string()).await
    }

    async fn create(&self, options: &CreateSnapshotOptions) -> Result<Snapshot, VrgError> {
        let builder = self
            .request(Method::POST, "cloud_snapshots")
            .json(&options.request_body());
        let created: CreatedResponse = self.get_json(builder, "Snapshot", "new").await?;
        let key = created.key()?;
        self.get(key).await
    }

    async fn delete(&self, key: u64) -> Result<(), VrgError> {
        let builder = self.request(Method::DELETE, &format!("cloud_snapshots/{}", key));
        self.send(builder, "Snapshot", &key.to_string()).await?;
        Ok(())
    }

    async fn vms(&self, key: u64) -> Result<Vec<SnapshotVm>, VrgError> {
        let builder = self.request(Method::GET, "cloud_snapshot_vms").query(&[
            ("fields", SNAPSHOT_VM_FIELDS.to_string()),
            ("filter", format!("cloud_snapshot eq {}", key)),
        ]);
        let body: Value = self.get_json(builder, "Snapshot", &key.to_string()).await?;
        parse_list(body)
    }

    async fn tenants(&self, key: u64) -> Result<Vec<SnapshotTenant>, VrgError> {
        let builder = self.request(Method::GET, "cloud_snapshot_tenants").query(&[
            ("fields", SNAPSHOT_TENANT_FIELDS.to_string()),
            ("filter", format!("cloud_snapshot eq {}", key)),
        ]);
        let body: Value = self.get_json(builder, "Snapshot", &key.to_string()).await?;
        parse_list(body)
    }
}

/// `POST` answers with the new row's key, as a number or a string.
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    #[serde(rename = "$key")]
    key: Value,
}

impl CreatedResponse {
    fn key(&self) -> Result<u64, VrgError> {
        let key = match &self.key {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        key.ok_or_else(|| {
            VrgError::Transport(format!("Create response has invalid $key: {}", self.key))
        })
    }
}

/// `https://host[:port]` + `/api/v4`. A bare host gets `https://`.
pub fn api_base_url(host: &str) -> Result<String, VrgError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(VrgError::ConfigError("host must not be empty".to_string()));
    }
    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let base = with_scheme.trim_end_matches(API_PREFIX).trim_end_matches('/');
    Ok(format!("{}{}", base, API_PREFIX))
}

/// Exact-name filter expression; single quotes are doubled.
pub fn name_filter(name: &str) -> String {
    format!("name eq '{}'", name.replace('\'', "''"))
}

/// List endpoints return an array; a single object is treated as one row.
fn parse_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, VrgError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| VrgError::Transport(format!("Failed to parse list item: {}", e)))
        })
        .collect()
}

/// Error message from an API error body: `err`, then `message`, then the raw
/// text.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["err", "error", "message"] {
            if let Some(Value::String(msg)) = map.get(field) {
                return msg.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a non-success HTTP status to the error taxonomy.
pub fn map_status(
    status: StatusCode,
    body: &str,
    resource: &'static str,
    identifier: &str,
) -> VrgError {
    let message = error_message(body);
    match status.as_u16() {
        401 => VrgError::AuthFailed(message),
        403 => VrgError::Forbidden(message),
        404 => VrgError::not_found(resource, identifier),
        409 => VrgError::Conflict(message),
        400 | 422 => VrgError::Validation(message),
        408 | 504 => VrgError::Timeout(message),
        code => VrgError::Api {
            status: code,
            message,
        },
    }
}

fn map_http_error(error: reqwest::Error) -> VrgError {
    if error.is_timeout() {
        VrgError::Timeout(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        VrgError::Connection(format!("{}", error))
    } else if let Some(status) = error.status() {
        VrgError::Api {
            status: status.as_u16(),
            message: error.to_string(),
        }
    } else {
        VrgError::Transport(format!("HTTP error: {}", error))
    }
}
