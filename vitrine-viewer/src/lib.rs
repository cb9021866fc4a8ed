//! vitrine-viewer library - read-only coffee catalog viewer
//!
//! Loads the manifest and item documents through a [`DocumentSource`],
//! keeps the normalized catalog in memory and serves it as HTML pages and a
//! small JSON API.

use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::error;

pub mod api;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod render;
pub mod view;

use catalog::{Catalog, CatalogStatus};
use loader::{load_all, Advisory, DocumentSource};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog from the latest load cycle (replaced wholesale)
    pub catalog: Arc<RwLock<Catalog>>,
    /// Where documents are fetched from
    pub source: Arc<dyn DocumentSource>,
    /// Manifest reference relative to the source
    pub manifest_ref: Arc<str>,
}

impl AppState {
    /// Create new application state with an empty catalog
    pub fn new(source: Arc<dyn DocumentSource>, manifest_ref: impl Into<Arc<str>>) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Catalog::default())),
            source,
            manifest_ref: manifest_ref.into(),
        }
    }

    /// Run one load cycle and publish its result
    ///
    /// On success the catalog is replaced. When the manifest itself cannot be
    /// loaded, the previous items stay and the advisory becomes an error.
    pub async fn reload(&self) -> CatalogStatus {
        match load_all(self.source.as_ref(), &self.manifest_ref).await {
            Ok(outcome) => {
                let fresh = Catalog::from_outcome(outcome);
                let mut catalog = self.catalog.write().await;
                *catalog = fresh;
                catalog.status()
            }
            Err(e) => {
                error!("Catalog load failed: {}", e);
                let mut catalog = self.catalog.write().await;
                catalog.advisory = Advisory::Error(e.to_string());
                catalog.status()
            }
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    // Pages
    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/post", get(api::serve_post))
        .route("/reload", post(api::reload_page))
        .route("/static/style.css", get(api::serve_style_css));

    // JSON API
    let json_api = Router::new()
        .route("/api/items", get(api::list_items))
        .route("/api/item", get(api::get_item))
        .route("/api/status", get(api::get_status))
        .route("/api/reload", post(api::reload_catalog))
        .merge(api::health_routes());

    Router::new()
        .merge(pages)
        .merge(json_api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
