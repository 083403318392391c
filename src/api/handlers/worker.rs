//! Cache worker endpoints: diagnostics and the controlled fetch path.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GempaError};
use crate::worker::{FetchRequest, FetchResponse, WorkerStatus};

/// `GET /worker` — Worker lifecycle and cache contents.
///
/// # Errors
///
/// Returns [`GempaError::WorkerUnavailable`] if the worker actor is gone.
#[utoipa::path(
    get,
    path = "/api/v1/worker",
    tag = "Worker",
    summary = "Worker status",
    description = "Returns the cache worker's lifecycle state and every cache partition with its URLs.",
    responses(
        (status = 200, description = "Worker status", body = WorkerStatus),
        (status = 503, description = "Worker unavailable", body = ErrorResponse),
    )
)]
pub async fn worker_status(State(state): State<AppState>) -> Result<impl IntoResponse, GempaError> {
    Ok(Json(state.worker.status().await?))
}

/// `GET /offline/{*path}` — Fetch `/{path}` as a worker-controlled client.
///
/// Answered cache-first; misses go to the origin and `200` same-origin
/// responses are kept.
///
/// # Errors
///
/// Returns [`GempaError::Network`] on a miss whose network fetch fails.
#[utoipa::path(
    get,
    path = "/offline/{path}",
    tag = "Worker",
    summary = "Controlled fetch",
    description = "Routes a same-origin request through the cache-first worker.",
    params(("path" = String, Path, description = "Origin-relative asset path")),
    responses(
        (status = 200, description = "Cached or network response"),
        (status = 502, description = "Cache miss and network failure", body = ErrorResponse),
    )
)]
pub async fn offline_fetch(
    State(state): State<AppState>,
    Path(path): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, GempaError> {
    controlled_fetch(&state, &path, &uri, &headers).await
}

/// `GET /offline` and `GET /offline/` — Fetch the origin root through the
/// worker.
///
/// # Errors
///
/// Returns [`GempaError::Network`] on a miss whose network fetch fails.
#[utoipa::path(
    get,
    path = "/offline/",
    tag = "Worker",
    summary = "Controlled fetch of the root page",
    description = "Routes `/` through the cache-first worker.",
    responses(
        (status = 200, description = "Cached or network response"),
        (status = 502, description = "Cache miss and network failure", body = ErrorResponse),
    )
)]
pub async fn offline_root(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, GempaError> {
    controlled_fetch(&state, "", &uri, &headers).await
}

async fn controlled_fetch(
    state: &AppState,
    path: &str,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, GempaError> {
    let mut url = format!("{}/{}", state.origin, path.trim_start_matches('/'));
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let mut forwarded = HeaderMap::new();
    for name in [header::ACCEPT, header::ACCEPT_LANGUAGE, header::USER_AGENT] {
        if let Some(value) = headers.get(&name) {
            forwarded.insert(name, value.clone());
        }
    }

    let response = state
        .worker
        .fetch(FetchRequest {
            method: Method::GET,
            url,
            headers: forwarded,
        })
        .await?;
    Ok(into_http_response(response))
}

/// Replays a worker response to the client, minus connection-level headers.
fn into_http_response(response: FetchResponse) -> Response {
    let mut headers = response.headers;
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONNECTION);
    headers.remove(header::CONTENT_LENGTH);

    let mut out = Response::new(Body::from(response.body));
    *out.status_mut() = response.status;
    *out.headers_mut() = headers;
    out
}

/// Worker routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/offline", get(offline_root))
        .route("/offline/", get(offline_root))
        .route("/offline/{*path}", get(offline_fetch))
}

/// Worker routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/worker", get(worker_status))
}
