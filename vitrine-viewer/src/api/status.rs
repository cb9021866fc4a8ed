//! Load status and reload endpoints

use axum::{extract::State, Json};
use tracing::info;

use crate::catalog::CatalogStatus;
use crate::AppState;

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let catalog = state.catalog.read().await;
    Json(catalog.status())
}

/// POST /api/reload
///
/// Runs one load cycle and returns the resulting status. A failed manifest
/// load is reported in the status advisory, not as an HTTP error.
pub async fn reload_catalog(State(state): State<AppState>) -> Json<CatalogStatus> {
    info!("Reload requested");
    Json(state.reload().await)
}
