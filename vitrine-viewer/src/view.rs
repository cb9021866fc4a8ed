//! Filtering, sorting and facet options over the catalog
//!
//! Linear scans with case-insensitive string comparisons; the catalog is
//! small enough that nothing is indexed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use vitrine_common::aggregate_rating;

use crate::loader::CatalogItem;

/// Sort orders offered by the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// `_ts` descending
    #[default]
    Recent,
    /// Name ascending, case-insensitive
    Name,
    /// Aggregate rating descending
    Rating,
}

impl SortOrder {
    /// Parse a query-string value; unknown values mean `Recent`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "name" => SortOrder::Name,
            "rating" => SortOrder::Rating,
            _ => SortOrder::Recent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Name => "name",
            SortOrder::Rating => "rating",
        }
    }
}

/// Filter settings, as submitted by the filter form
///
/// Empty strings disable a filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewFilters {
    /// Free-text search over the whole item
    #[serde(default)]
    pub query: String,
    /// Substring of the origin
    #[serde(default)]
    pub origin: String,
    /// Exact process
    #[serde(default)]
    pub process: String,
    /// Exact brew method of any evaluation
    #[serde(default)]
    pub method: String,
    /// Exact roast level
    #[serde(default)]
    pub roast: String,
    #[serde(default)]
    pub sort: String,
}

impl ViewFilters {
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(&self.sort)
    }
}

/// Apply filters and sort order, returning references into `items`
pub fn apply<'a>(items: &'a [CatalogItem], filters: &ViewFilters) -> Vec<&'a CatalogItem> {
    let query = filters.query.trim().to_lowercase();
    let origin = filters.origin.trim().to_lowercase();
    let process = filters.process.trim().to_lowercase();
    let method = filters.method.trim().to_lowercase();
    let roast = filters.roast.trim().to_lowercase();

    let mut list: Vec<&CatalogItem> = items
        .iter()
        .filter(|c| query.is_empty() || searchable_text(c).contains(&query))
        .filter(|c| origin.is_empty() || c.item.origin.to_lowercase().contains(&origin))
        .filter(|c| process.is_empty() || c.item.process.to_lowercase() == process)
        .filter(|c| {
            method.is_empty()
                || c.item
                    .evaluations
                    .iter()
                    .any(|e| e.method.to_lowercase() == method)
        })
        .filter(|c| roast.is_empty() || c.item.roast_level.to_lowercase() == roast)
        .collect();

    match filters.sort_order() {
        SortOrder::Name => list.sort_by(|a, b| compare_text(&a.item.name, &b.item.name)),
        SortOrder::Rating => list.sort_by(|a, b| {
            aggregate_rating(&b.item.evaluations).cmp(&aggregate_rating(&a.item.evaluations))
        }),
        SortOrder::Recent => list.sort_by(|a, b| b.item.ts.cmp(&a.item.ts)),
    }

    list
}

/// Lowercased JSON rendering of an item, used by free-text search
fn searchable_text(item: &CatalogItem) -> String {
    serde_json::to_string(item)
        .unwrap_or_default()
        .to_lowercase()
}

/// Case-insensitive ordering with a deterministic tie-break
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Option lists for the filter form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Country part of each origin (text before the first `/`)
    pub origins: Vec<String>,
    pub processes: Vec<String>,
    pub methods: Vec<String>,
    pub roast_levels: Vec<String>,
}

/// Collect sorted, de-duplicated, non-empty facet values over all items
pub fn facets(items: &[CatalogItem]) -> Facets {
    Facets {
        origins: uniq_sorted(items.iter().map(|c| {
            c.item
                .origin
                .split('/')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })),
        processes: uniq_sorted(items.iter().map(|c| c.item.process.clone())),
        methods: uniq_sorted(
            items
                .iter()
                .flat_map(|c| c.item.evaluations.iter().map(|e| e.method.clone())),
        ),
        roast_levels: uniq_sorted(items.iter().map(|c| c.item.roast_level.clone())),
    }
}

fn uniq_sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.filter(|v| !v.is_empty()).collect();
    out.sort_by(|a, b| compare_text(a, b));
    out.dedup();
    out
}
