//! Document sources: where the manifest and item documents come from
//!
//! A source resolves a relative reference (as written in the manifest) to a
//! JSON document. Two implementations exist: a local directory and an HTTP
//! base URL. Each fetch is a single attempt; no retries.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("vitrine-viewer/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Document fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reference is empty, absolute, or escapes the base location
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered with a non-success status
    #[error("HTTP {0} loading {1}")]
    Http(u16, String),

    /// Network or filesystem failure
    #[error("Failed to read {0}: {1}")]
    Transport(String, String),

    /// Body is not valid JSON
    #[error("Invalid JSON in {0}: {1}")]
    Parse(String, String),
}

impl FetchError {
    /// Whether the document was reachable but unparsable
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse(..))
    }

    /// Whether the document does not exist at its location
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_) | FetchError::Http(404, _))
    }
}

/// Source of JSON documents addressed by relative reference
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable location for logs
    fn describe(&self) -> String;

    /// Fetch and parse one document
    async fn fetch_json(&self, reference: &str) -> Result<Value, FetchError>;
}

/// Check that a reference stays inside the base location
///
/// Only plain relative paths are accepted: no absolute paths, no URL
/// schemes, no `..` segments.
pub fn check_reference(reference: &str) -> Result<(), FetchError> {
    let invalid = || FetchError::InvalidReference(reference.to_string());

    if reference.trim().is_empty() || reference.contains('\\') {
        return Err(invalid());
    }

    // A colon in the first segment reads as a scheme or drive prefix
    let first = reference.split('/').next().unwrap_or_default();
    if first.contains(':') {
        return Err(invalid());
    }

    let path = Path::new(reference);
    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !plain {
        return Err(invalid());
    }

    Ok(())
}

/// Documents stored under a local directory
#[derive(Debug, Clone)]
pub struct DirSource {
    base: PathBuf,
}

impl DirSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl DocumentSource for DirSource {
    fn describe(&self) -> String {
        self.base.display().to_string()
    }

    async fn fetch_json(&self, reference: &str) -> Result<Value, FetchError> {
        check_reference(reference)?;
        let path = self.base.join(reference);
        debug!(path = %path.display(), "Reading document");

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.display().to_string())
            } else {
                FetchError::Transport(path.display().to_string(), e.to_string())
            }
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::Parse(path.display().to_string(), e.to_string()))
    }
}

/// Documents served under an HTTP base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpSource {
    /// Create a source for `base_url` (a trailing `/` is added if missing)
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let mut base_text = base_url.to_string();
        if !base_text.ends_with('/') {
            base_text.push('/');
        }
        let base = reqwest::Url::parse(&base_text)
            .map_err(|_| FetchError::InvalidReference(base_url.to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::Transport(base_url.to_string(), e.to_string()))?;

        Ok(Self { client, base })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn fetch_json(&self, reference: &str) -> Result<Value, FetchError> {
        check_reference(reference)?;
        let url = self
            .base
            .join(reference)
            .map_err(|_| FetchError::InvalidReference(reference.to_string()))?;
        if url.origin() != self.base.origin() || !url.path().starts_with(self.base.path()) {
            return Err(FetchError::InvalidReference(reference.to_string()));
        }
        debug!(url = %url, "Fetching document");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(url.to_string(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16(), url.to_string()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(url.to_string(), e.to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::Parse(url.to_string(), e.to_string()))
    }
}
