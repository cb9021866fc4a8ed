//! HTML page routes

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::warn;

use super::ItemParams;
use crate::error::fetch_status;
use crate::loader::{load_one, Advisory};
use crate::view::{self, ViewFilters};
use crate::{render, AppState};

const STYLE_CSS: &str = include_str!("../ui/style.css");

/// GET /
///
/// Card grid of the current catalog, filtered and sorted per the query string
pub async fn serve_index(
    State(state): State<AppState>,
    Query(filters): Query<ViewFilters>,
) -> Html<String> {
    let catalog = state.catalog.read().await;
    let facets = view::facets(&catalog.items);
    let visible = view::apply(&catalog.items, &filters);
    Html(render::index_page(&visible, &filters, &facets, &catalog.advisory))
}

/// GET /post?cafe=<ref>
///
/// Detail page for one document, fetched fresh from the source
pub async fn serve_post(
    State(state): State<AppState>,
    Query(params): Query<ItemParams>,
) -> Response {
    let Some(reference) = params.reference() else {
        let advisory = Advisory::Error("No 'cafe' parameter in the URL.".to_string());
        return (
            StatusCode::BAD_REQUEST,
            Html(render::advisory_page("Missing parameter", &advisory)),
        )
            .into_response();
    };

    match load_one(state.source.as_ref(), reference).await {
        Ok(item) => Html(render::detail_page(&item)).into_response(),
        Err(e) => {
            warn!(reference = %reference, error = %e, "Detail page load failed");
            let advisory = Advisory::Error(e.to_string());
            (
                fetch_status(&e),
                Html(render::advisory_page("Could not load coffee", &advisory)),
            )
                .into_response()
        }
    }
}

/// POST /reload
///
/// Form target of the reload button: runs a load cycle, then back to the index
pub async fn reload_page(State(state): State<AppState>) -> Redirect {
    state.reload().await;
    Redirect::to("/")
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLE_CSS,
    )
        .into_response()
}
