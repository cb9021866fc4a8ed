//! Catalog JSON endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use super::ItemParams;
use crate::error::{ApiError, ApiResult};
use crate::loader::{load_one, CatalogItem};
use crate::view::{self, ViewFilters};
use crate::AppState;

/// GET /api/items
///
/// Current catalog after filters and sort order from the query string
pub async fn list_items(
    State(state): State<AppState>,
    Query(filters): Query<ViewFilters>,
) -> Json<Vec<CatalogItem>> {
    let catalog = state.catalog.read().await;
    let items = view::apply(&catalog.items, &filters)
        .into_iter()
        .cloned()
        .collect();
    Json(items)
}

/// GET /api/item?cafe=<ref>
///
/// One document loaded fresh from the source (not from the catalog)
pub async fn get_item(
    State(state): State<AppState>,
    Query(params): Query<ItemParams>,
) -> ApiResult<Json<CatalogItem>> {
    let reference = params
        .reference()
        .ok_or_else(|| ApiError::BadRequest("missing 'cafe' parameter".to_string()))?;

    let item = load_one(state.source.as_ref(), reference).await?;
    Ok(Json(item))
}
