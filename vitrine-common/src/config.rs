//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file never prevents startup; a malformed one is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the data source (directory or base URL)
pub const ENV_DATA: &str = "VITRINE_DATA";
/// Environment variable naming the manifest document
pub const ENV_MANIFEST: &str = "VITRINE_MANIFEST";
/// Environment variable for the listen address
pub const ENV_HOST: &str = "VITRINE_HOST";
/// Environment variable for the listen port
pub const ENV_PORT: &str = "VITRINE_PORT";
/// Environment variable pointing at a TOML config file
pub const ENV_CONFIG: &str = "VITRINE_CONFIG";

pub const DEFAULT_SOURCE: &str = "data";
pub const DEFAULT_MANIFEST: &str = "index.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration loaded from TOML file
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Data directory or `http(s)://` base URL holding the documents
    #[serde(default)]
    pub source: Option<String>,

    /// Manifest reference relative to the source
    #[serde(default)]
    pub manifest: Option<String>,

    /// Listen address
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Where item documents are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceSpec {
    /// Documents under a local directory
    Directory(PathBuf),
    /// Documents under an HTTP base URL (always ends with `/`)
    Url(String),
}

impl DataSourceSpec {
    /// Interpret a configured source string
    ///
    /// `http://` and `https://` prefixes select a URL source; anything else
    /// is a directory path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let mut base = trimmed.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            DataSourceSpec::Url(base)
        } else {
            DataSourceSpec::Directory(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for DataSourceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceSpec::Directory(path) => write!(f, "{}", path.display()),
            DataSourceSpec::Url(url) => f.write_str(url),
        }
    }
}

/// Values supplied on the command line (highest priority)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub manifest: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<PathBuf>,
}

/// Fully resolved viewer configuration
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub source: DataSourceSpec,
    pub manifest: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// TOML file the configuration was read from, if any
    pub config_file: Option<PathBuf>,
}

impl ViewerConfig {
    /// Resolve configuration from overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let (toml_config, config_file) = load_toml_for(overrides)?;

        let source = overrides
            .source
            .clone()
            .or_else(|| env_string(ENV_DATA))
            .or(toml_config.source)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        let manifest = overrides
            .manifest
            .clone()
            .or_else(|| env_string(ENV_MANIFEST))
            .or(toml_config.manifest)
            .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());

        let host = overrides
            .host
            .clone()
            .or_else(|| env_string(ENV_HOST))
            .or(toml_config.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match overrides.port {
            Some(port) => port,
            None => match env_string(ENV_PORT) {
                Some(raw) => raw.parse::<u16>().map_err(|e| {
                    Error::Config(format!("Invalid {} value '{}': {}", ENV_PORT, raw, e))
                })?,
                None => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        Ok(Self {
            source: DataSourceSpec::parse(&source),
            manifest,
            host,
            port,
            log_level: toml_config.logging.level,
            config_file,
        })
    }
}

/// Read a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Default per-user config file location (`<config_dir>/vitrine/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vitrine").join("config.toml"))
}

/// Pick and load the TOML file, if any
///
/// An explicitly named file must exist; the per-user default is optional.
fn load_toml_for(overrides: &ConfigOverrides) -> Result<(TomlConfig, Option<PathBuf>)> {
    let explicit = overrides
        .config_file
        .clone()
        .or_else(|| env_string(ENV_CONFIG).map(PathBuf::from));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }
        let config = load_toml_config(&path)?;
        return Ok((config, Some(path)));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            Ok((config, Some(path)))
        }
        _ => Ok((TomlConfig::default(), None)),
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
