//! REST endpoint handlers organized by resource.

pub mod install;
pub mod page;
pub mod snapshot;
pub mod system;
pub mod worker;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(install::routes())
        .merge(snapshot::routes())
        .merge(worker::api_routes())
}
