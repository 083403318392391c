//! The page itself: every request is a page load.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::app_state::AppState;

/// `GET /` — Load and render the page.
///
/// Runs the latest-event render, the list render and the mirror snapshot,
/// in that order, then returns the HTML shell.
#[utoipa::path(
    get,
    path = "/",
    tag = "Page",
    summary = "Load the page",
    description = "Fetches the latest event and the recent list, mirrors the rendered text, and returns the page HTML. Upstream failures leave the affected container as it was.",
    responses(
        (status = 200, description = "Rendered page", body = String, content_type = "text/html"),
    )
)]
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page_service.render_index().await)
}

/// Page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
}
