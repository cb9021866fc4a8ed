//! HTTP handlers for vitrine-viewer

pub mod health;
pub mod items;
pub mod status;
pub mod ui;

use serde::Deserialize;

pub use health::health_routes;
pub use items::{get_item, list_items};
pub use status::{get_status, reload_catalog};
pub use ui::{reload_page, serve_index, serve_post, serve_style_css};

/// Query parameters addressing one document (`?cafe=<ref>`)
#[derive(Debug, Default, Deserialize)]
pub struct ItemParams {
    pub cafe: Option<String>,
}

impl ItemParams {
    /// Non-blank reference, trimmed
    pub fn reference(&self) -> Option<&str> {
        self.cafe.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }
}
