//! HTTP layer: the page, the worker-controlled fetch path, REST endpoints,
//! and static assets.
//!
//! REST endpoints are mounted under `/api/v1`; everything the router does
//! not match is served from the asset directory.

pub mod dto;
pub mod handlers;

use std::path::Path;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, utoipa::OpenApi)]
#[openapi(
    info(title = "gempa-pwa", description = "Earthquake bulletin page with an offline cache worker"),
    paths(
        handlers::system::health_handler,
        handlers::page::index_handler,
        handlers::snapshot::latest_snapshot,
        handlers::install::install_signal,
        handlers::install::install_click,
        handlers::install::install_choice,
        handlers::worker::worker_status,
        handlers::worker::offline_fetch,
        handlers::worker::offline_root,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        crate::domain::SnapshotRecord,
        crate::domain::snapshot::SnapshotData,
        crate::domain::snapshot::SnapshotInfo,
        crate::install::InstallOutcome,
        crate::worker::WorkerStatus,
        crate::worker::Lifecycle,
        crate::worker::actor::PartitionStatus,
        dto::InstallSignalRequest,
        dto::InstallSignalResponse,
        dto::InstallChoiceRequest,
        dto::InstallClickResponse,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Page", description = "Page load"),
        (name = "Mirror", description = "Local mirror store"),
        (name = "Install", description = "Deferred install prompt"),
        (name = "Worker", description = "Cache-first worker"),
    )
)]
pub struct ApiDoc;

/// Builds the router with the page, worker and REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(handlers::page::routes())
        .merge(handlers::worker::routes())
}

/// Builds the complete application: routes, static asset fallback from
/// `asset_dir`, tracing and CORS layers, and state.
pub fn build_app(state: AppState, asset_dir: &Path) -> Router {
    let router = build_router();

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url(
                "/api-docs/openapi.json",
                <ApiDoc as utoipa::OpenApi>::openapi(),
            ),
    );

    router
        .fallback_service(ServeDir::new(asset_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
