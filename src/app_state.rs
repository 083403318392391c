//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PageService;
use crate::worker::CacheWorkerHandle;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Page loads, mirror access and the install controller.
    pub page_service: Arc<PageService>,
    /// Handle to the cache worker actor.
    pub worker: CacheWorkerHandle,
    /// Origin the worker treats as same-origin, without trailing slash.
    pub origin: String,
}
