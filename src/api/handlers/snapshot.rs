//! Read access to the local mirror.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::SnapshotRecord;
use crate::error::{ErrorResponse, GempaError};

/// `GET /snapshots/latest` — Most recent mirrored page text.
///
/// # Errors
///
/// Returns [`GempaError::NotFound`] if nothing has been mirrored (or the
/// mirror is unsupported), and [`GempaError::Mirror`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/snapshots/latest",
    tag = "Mirror",
    summary = "Latest snapshot",
    description = "Returns the newest record written by the local mirror store.",
    responses(
        (status = 200, description = "Latest snapshot", body = SnapshotRecord),
        (status = 404, description = "No snapshot stored", body = ErrorResponse),
        (status = 500, description = "Mirror store failure", body = ErrorResponse),
    )
)]
pub async fn latest_snapshot(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GempaError> {
    let record = state
        .page_service
        .mirror()
        .latest()
        .await?
        .ok_or_else(|| GempaError::NotFound("no snapshot stored".to_string()))?;
    Ok(Json(record))
}

/// Mirror routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/snapshots/latest", get(latest_snapshot))
}
