//! Tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Priority order: command line > environment > TOML > compiled defaults
//! - Explicit config file must exist; malformed TOML is an error
//! - Data source interpretation (directory vs URL)
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate VITRINE_* variables are marked with #[serial].

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use vitrine_common::config::{
    ConfigOverrides, DataSourceSpec, ViewerConfig, DEFAULT_MANIFEST, DEFAULT_PORT, ENV_CONFIG,
    ENV_DATA, ENV_HOST, ENV_MANIFEST, ENV_PORT,
};
use vitrine_common::Error;

fn clear_env() {
    for name in [ENV_DATA, ENV_MANIFEST, ENV_HOST, ENV_PORT, ENV_CONFIG] {
        env::remove_var(name);
    }
}

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write temp file");
    file
}

#[test]
#[serial]
fn test_toml_values_used_when_no_overrides() {
    clear_env();
    let file = toml_file(
        r#"
source = "/srv/vitrine/data"
manifest = "manifest.json"
host = "0.0.0.0"
port = 8088

[logging]
level = "debug"
"#,
    );

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = ViewerConfig::resolve(&overrides).expect("Should resolve");

    assert_eq!(
        config.source,
        DataSourceSpec::Directory(PathBuf::from("/srv/vitrine/data"))
    );
    assert_eq!(config.manifest, "manifest.json");
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8088);
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.config_file.as_deref(), Some(file.path()));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    let file = toml_file("source = \"from-toml\"\nport = 8088\n");
    env::set_var(ENV_DATA, "https://cdn.example.org/cafes");
    env::set_var(ENV_PORT, "9001");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = ViewerConfig::resolve(&overrides).expect("Should resolve");

    assert_eq!(
        config.source,
        DataSourceSpec::Url("https://cdn.example.org/cafes/".to_string())
    );
    assert_eq!(config.port, 9001);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    let file = toml_file("");
    env::set_var(ENV_DATA, "from-env");
    env::set_var(ENV_PORT, "9001");

    let overrides = ConfigOverrides {
        source: Some("from-cli".to_string()),
        port: Some(7000),
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = ViewerConfig::resolve(&overrides).expect("Should resolve");

    assert_eq!(config.source, DataSourceSpec::Directory(PathBuf::from("from-cli")));
    assert_eq!(config.port, 7000);

    clear_env();
}

#[test]
#[serial]
fn test_defaults_when_toml_empty() {
    clear_env();
    let file = toml_file("");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = ViewerConfig::resolve(&overrides).expect("Should resolve");

    assert_eq!(config.source, DataSourceSpec::Directory(PathBuf::from("data")));
    assert_eq!(config.manifest, DEFAULT_MANIFEST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.log_level, "info");
}

#[test]
#[serial]
fn test_missing_explicit_config_is_error() {
    clear_env();
    let overrides = ConfigOverrides {
        config_file: Some(PathBuf::from("/nonexistent/vitrine/config.toml")),
        ..Default::default()
    };

    let result = ViewerConfig::resolve(&overrides);
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
#[serial]
fn test_config_file_from_env() {
    clear_env();
    let file = toml_file("port = 6001\n");
    env::set_var(ENV_CONFIG, file.path());

    let config = ViewerConfig::resolve(&ConfigOverrides::default()).expect("Should resolve");
    assert_eq!(config.port, 6001);

    clear_env();
}

#[test]
#[serial]
fn test_malformed_toml_is_error() {
    clear_env();
    let file = toml_file("port = \"not a number\"\n");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let result = ViewerConfig::resolve(&overrides);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_invalid_port_env_is_error() {
    clear_env();
    let file = toml_file("");
    env::set_var(ENV_PORT, "eighty");

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let result = ViewerConfig::resolve(&overrides);
    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}
