//! In-memory catalog shared by the HTTP handlers
//!
//! The catalog is read-only between load cycles and replaced wholesale at
//! the end of each one. Overlapping reloads are not coordinated: the cycle
//! that finishes last wins.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::loader::{Advisory, CatalogItem, LoadOutcome};

/// Items from the latest successful load plus the current advisory
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
    pub advisory: Advisory,
    /// When the items were loaded (None before the first successful cycle)
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        Self {
            items: outcome.items,
            advisory: outcome.advisory,
            loaded_at: Some(vitrine_common::time::now()),
        }
    }

    pub fn status(&self) -> CatalogStatus {
        CatalogStatus {
            advisory: self.advisory.clone(),
            items: self.items.len(),
            stubs: self.items.iter().filter(|i| i.is_stub()).count(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Summary returned by the status and reload endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStatus {
    pub advisory: Advisory,
    pub items: usize,
    pub stubs: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}
