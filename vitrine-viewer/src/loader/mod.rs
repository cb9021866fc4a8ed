//! Tolerant catalog loading
//!
//! Fetches the manifest, then every referenced item document one at a time
//! in manifest order. Nothing below the manifest is allowed to fail the
//! load: an entry without a usable reference or a document that cannot be
//! fetched or parsed becomes a visible stub item carrying its error, plus a
//! diagnostic line. Only a manifest that cannot be fetched is an error.
//!
//! Policy: stub-always. Every manifest entry yields exactly one catalog item.

pub mod source;

pub use source::{DirSource, DocumentSource, FetchError, HttpSource};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use vitrine_common::{decode_item, time, uid, validate_item, Item};

/// Field of the manifest holding the entry list
pub const MANIFEST_ENTRIES_FIELD: &str = "cafes";

/// Field of an object entry holding its reference
pub const ENTRY_HREF_FIELD: &str = "href";

/// `sourceRef` given to stubs for entries without a usable reference
pub const INVALID_ENTRY_REF: &str = "[invalid entry]";

/// Name marker for documents that could not be parsed
pub const MARKER_INVALID_JSON: &str = "[invalid JSON]";

/// Name marker for documents that could not be fetched
pub const MARKER_UNAVAILABLE: &str = "[unavailable]";

/// Heading of the advisory listing load diagnostics
pub const DIAGNOSTICS_HEADING: &str = "Warnings/errors during load:";

/// A catalog item plus the view-only fields attached by the loader
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(flatten)]
    pub item: Item,
    /// Reference the item was loaded from
    pub source_ref: String,
    /// Failure message, present only on stubs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    /// Validation warnings (never blocking)
    pub warnings: Vec<String>,
}

impl CatalogItem {
    /// Placeholder for a reference that failed to load
    pub fn stub(source_ref: &str, name: String, error: String) -> Self {
        let mut item = Item::empty(uid::stub_id(), time::now_millis());
        item.name = name;
        Self {
            item,
            source_ref: source_ref.to_string(),
            load_error: Some(error),
            warnings: Vec::new(),
        }
    }

    pub fn is_stub(&self) -> bool {
        self.load_error.is_some()
    }
}

/// Non-blocking status message for the most recent load cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "severity", content = "message", rename_all = "snake_case")]
pub enum Advisory {
    /// Nothing to report
    #[default]
    Hidden,
    /// Diagnostics collected; the catalog is still shown
    Warning(String),
    /// Catalog could not be (re)loaded
    Error(String),
}

impl Advisory {
    pub fn message(&self) -> Option<&str> {
        match self {
            Advisory::Hidden => None,
            Advisory::Warning(msg) | Advisory::Error(msg) => Some(msg),
        }
    }

    /// Advisory for a finished cycle: warning when diagnostics exist
    pub fn from_diagnostics(diagnostics: &[String]) -> Self {
        if diagnostics.is_empty() {
            Advisory::Hidden
        } else {
            Advisory::Warning(format!("{}\n{}", DIAGNOSTICS_HEADING, diagnostics.join("\n")))
        }
    }
}

/// Result of one load cycle
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Items sorted by `_ts` descending (stable)
    pub items: Vec<CatalogItem>,
    /// One line per problem, in manifest order
    pub diagnostics: Vec<String>,
    pub advisory: Advisory,
}

/// Load errors (manifest only)
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load manifest {reference}: {source}")]
    Manifest {
        reference: String,
        #[source]
        source: FetchError,
    },
}

/// Extract entry references from a manifest document
///
/// Returns one slot per entry; `None` marks an entry without a usable
/// reference. A manifest whose entry list is missing or not a list has no
/// entries.
pub fn manifest_entries(manifest: &Value) -> Vec<Option<String>> {
    let Some(entries) = manifest.get(MANIFEST_ENTRIES_FIELD).and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let reference = match entry {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => entry.get(ENTRY_HREF_FIELD).and_then(Value::as_str),
                _ => None,
            };
            reference
                .filter(|r| !r.trim().is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// Run one full load cycle
pub async fn load_all(
    source: &dyn DocumentSource,
    manifest_ref: &str,
) -> Result<LoadOutcome, LoadError> {
    info!(source = %source.describe(), manifest = %manifest_ref, "Loading manifest");

    let manifest = source
        .fetch_json(manifest_ref)
        .await
        .map_err(|source| LoadError::Manifest {
            reference: manifest_ref.to_string(),
            source,
        })?;

    let entries = manifest_entries(&manifest);
    if entries.is_empty() {
        warn!(manifest = %manifest_ref, "Manifest has no entries");
        return Ok(LoadOutcome {
            items: Vec::new(),
            diagnostics: Vec::new(),
            advisory: Advisory::Warning(format!("Manifest is empty. Edit {}.", manifest_ref)),
        });
    }

    let mut items = Vec::with_capacity(entries.len());
    let mut diagnostics = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(reference) = entry else {
            let message = format!(
                "manifest entry #{} has no valid '{}'",
                index + 1,
                ENTRY_HREF_FIELD
            );
            warn!("{}", message);
            items.push(CatalogItem::stub(
                INVALID_ENTRY_REF,
                format!("{} #{}", INVALID_ENTRY_REF, index + 1),
                message.clone(),
            ));
            diagnostics.push(message);
            continue;
        };

        match load_one(source, reference).await {
            Ok(item) => {
                if !item.warnings.is_empty() {
                    diagnostics.push(format!("{}: {}", reference, item.warnings.join("; ")));
                }
                items.push(item);
            }
            Err(e) => {
                warn!(
                    reference = %reference,
                    error = %e,
                    "Document failed to load, rendering stub"
                );
                let marker = if e.is_parse() {
                    MARKER_INVALID_JSON
                } else {
                    MARKER_UNAVAILABLE
                };
                items.push(CatalogItem::stub(
                    reference,
                    format!("{} {}", marker, reference),
                    e.to_string(),
                ));
                diagnostics.push(format!("{}: {}", reference, e));
            }
        }
    }

    // Stable: equal timestamps keep manifest order
    items.sort_by(|a, b| b.item.ts.cmp(&a.item.ts));

    let stubs = items.iter().filter(|i| i.is_stub()).count();
    info!(
        items = items.len(),
        stubs,
        diagnostics = diagnostics.len(),
        "Catalog loaded"
    );

    let advisory = Advisory::from_diagnostics(&diagnostics);
    Ok(LoadOutcome {
        items,
        diagnostics,
        advisory,
    })
}

/// Fetch, normalize and validate a single document
///
/// Used per manifest entry and by the detail page. Failures are returned,
/// not stubbed.
pub async fn load_one(
    source: &dyn DocumentSource,
    reference: &str,
) -> Result<CatalogItem, FetchError> {
    let raw = source.fetch_json(reference).await?;

    let decoded = decode_item(&raw);
    for coercion in &decoded.coercions {
        debug!(reference = %reference, coercion = %coercion, "Coerced field");
    }

    let item = decoded.value;
    let warnings = validate_item(&item);
    if !warnings.is_empty() {
        debug!(reference = %reference, count = warnings.len(), "Validation warnings");
    }

    Ok(CatalogItem {
        item,
        source_ref: reference.to_string(),
        load_error: None,
        warnings,
    })
}
