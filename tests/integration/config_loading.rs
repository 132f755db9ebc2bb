//! Integration tests for layered configuration: global file, VRG_* and
//! VERGE_* environment variables, and CLI overrides.

use clap::Parser;
use std::fs;
use tempfile::TempDir;
use vrg::cli::{Cli, RunContext};
use vrg::config::{ConfigLoader, ProfileOverrides};
use vrg::error::exit_code;

use crate::integration::with_xdg_env;

const GLOBAL_CONFIG: &str = r#"
default_profile = "lab"

[profiles.lab]
host = "lab.verge.local"
username = "admin"
password = "hunter2"

[profiles.prod]
host = "prod.verge.local"
token = "prod-token"
verify_tls = false

[output]
format = "wide"

[wait]
poll_interval_secs = 5
"#;

fn write_global_config(test_dir: &TempDir, content: &str) {
    let dir = test_dir.path().join("config").join("vrg");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_defaults_without_config_file() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.default_profile, "default");
        assert_eq!(config.output.format, "table");
        assert!(config.profiles.is_empty());

        let profile = config.select_profile(None).unwrap();
        assert!(profile.host.is_none());
        assert_eq!(
            profile.validate().unwrap_err().exit_code(),
            exit_code::CONFIG
        );
    });
}

#[test]
fn test_global_config_file_is_loaded() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("vrg/config.toml"));

        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.default_profile, "lab");
        assert_eq!(config.output.format, "wide");
        assert_eq!(config.wait.poll_interval_secs, 5);
        assert_eq!(config.wait.timeout_secs, 600);

        let lab = config.select_profile(None).unwrap();
        assert_eq!(lab.host.as_deref(), Some("lab.verge.local"));
        assert!(lab.validate().is_ok());

        let prod = config.select_profile(Some("prod")).unwrap();
        assert_eq!(prod.token.as_deref(), Some("prod-token"));
        assert!(!prod.verify_tls);
    });
}

#[test]
fn test_vrg_env_overrides_file() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        std::env::set_var("VRG_OUTPUT__FORMAT", "json");
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.output.format, "json");
    });
}

#[test]
fn test_verge_env_then_flags_override_profile() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        std::env::set_var("VERGE_HOST", "env.verge.local");
        std::env::set_var("VERGE_TOKEN", "env-token");
        let config = ConfigLoader::load().unwrap();

        let mut profile = config.select_profile(None).unwrap();
        assert_eq!(profile.host.as_deref(), Some("env.verge.local"));
        assert_eq!(profile.token.as_deref(), Some("env-token"));

        profile.apply(&ProfileOverrides {
            host: Some("flag.verge.local".to_string()),
            ..ProfileOverrides::default()
        });
        assert_eq!(profile.host.as_deref(), Some("flag.verge.local"));
        assert_eq!(profile.token.as_deref(), Some("env-token"));
    });
}

#[test]
fn test_unknown_profile_is_config_error() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load().unwrap();
        let err = config.select_profile(Some("staging")).unwrap_err();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    });
}

#[test]
fn test_invalid_toml_is_config_error() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, "default_profile = [");
    with_xdg_env(&test_dir, || {
        let err = ConfigLoader::load().unwrap_err();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    });
}

#[test]
fn test_config_show_and_path_commands() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        let cli = Cli::try_parse_from(["vrg", "--no-color", "config", "show"]).unwrap();
        let config = ConfigLoader::load_with(cli.config.as_deref()).unwrap();
        let ctx = RunContext::from_cli(&cli, config).unwrap();
        let shown = ctx.execute(&cli.command).unwrap();
        assert!(shown.contains("lab.verge.local"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("prod-token"));

        let cli = Cli::try_parse_from(["vrg", "config", "path"]).unwrap();
        let config = ConfigLoader::load().unwrap();
        let ctx = RunContext::from_cli(&cli, config).unwrap();
        let path = ctx.execute(&cli.command).unwrap();
        assert!(path.ends_with("vrg/config.toml"));
    });
}

#[test]
fn test_output_format_from_config_and_flag() {
    let test_dir = TempDir::new().unwrap();
    write_global_config(&test_dir, GLOBAL_CONFIG);
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load().unwrap();
        let cli = Cli::try_parse_from(["vrg", "snapshot", "list"]).unwrap();
        let ctx = RunContext::from_cli(&cli, config.clone()).unwrap();
        assert!(ctx.output().wide());

        let cli = Cli::try_parse_from(["vrg", "-o", "json", "snapshot", "list"]).unwrap();
        let ctx = RunContext::from_cli(&cli, config).unwrap();
        assert!(ctx.output().is_json());
    });
}

#[test]
fn test_explicit_config_file() {
    let test_dir = TempDir::new().unwrap();
    let path = test_dir.path().join("custom.toml");
    fs::write(&path, "[profiles.default]\nhost = \"custom.local\"\ntoken = \"t\"\n").unwrap();
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load_with(Some(&path)).unwrap();
        let profile = config.select_profile(None).unwrap();
        assert_eq!(profile.host.as_deref(), Some("custom.local"));

        let missing = test_dir.path().join("missing.toml");
        let err = ConfigLoader::load_with(Some(&missing)).unwrap_err();
        assert_eq!(err.exit_code(), exit_code::CONFIG);
    });
}

#[test]
fn test_mixed_case_profile_names_resolve() {
    let test_dir = TempDir::new().unwrap();
    let path = test_dir.path().join("mixed.toml");
    fs::write(
        &path,
        "default_profile = \"Prod\"\n\n[profiles.Prod]\nhost = \"prod.local\"\ntoken = \"t\"\n",
    )
    .unwrap();
    with_xdg_env(&test_dir, || {
        let config = ConfigLoader::load_from_file(&path).unwrap();

        let named = config.select_profile(Some("Prod")).unwrap();
        assert_eq!(named.host.as_deref(), Some("prod.local"));

        let default = config.select_profile(None).unwrap();
        assert_eq!(default.host.as_deref(), Some("prod.local"));
        assert!(default.validate().is_ok());
    });
}
