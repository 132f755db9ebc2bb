//! Environment sources: `VRG_*` variables for any key, plus the conventional
//! `VERGE_*` connection variables.

use crate::config::ConnectionProfile;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// `VRG_OUTPUT__FORMAT=json`, `VRG_PROFILES__LAB__HOST=...`
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("VRG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}

/// Apply `VERGE_HOST`, `VERGE_USERNAME`, `VERGE_PASSWORD`, `VERGE_TOKEN`,
/// `VERGE_VERIFY_SSL` to a profile. Empty values are ignored.
pub fn apply_verge_env<F>(profile: &mut ConnectionProfile, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("VERGE_HOST") {
        profile.host = Some(host);
    }
    if let Some(username) = get("VERGE_USERNAME") {
        profile.username = Some(username);
    }
    if let Some(password) = get("VERGE_PASSWORD") {
        profile.password = Some(password);
    }
    if let Some(token) = get("VERGE_TOKEN") {
        profile.token = Some(token);
    }
    if let Some(verify) = get("VERGE_VERIFY_SSL") {
        profile.verify_tls = !matches!(
            verify.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        );
    }
}
