//! Asset cache manager: a cache-first worker running in its own context.
//!
//! The worker is a tokio actor ([`CacheWorkerHandle`]) that owns a
//! versioned [`CacheStorage`] and a [`Network`] to fall back on. It reacts
//! to three events:
//!
//! - **install**: precache [`PRECACHE_ASSETS`] into [`CACHE_NAME`], then
//!   skip waiting.
//! - **activate**: delete every cache partition not named [`CACHE_NAME`].
//! - **fetch**: answer from any partition, else go to the network and keep
//!   a copy of `200` same-origin responses.
//!
//! Nothing is shared with the page side except the handle's channel.

pub mod actor;
pub mod network;
pub mod request;
pub mod storage;

pub use actor::{CacheWorkerHandle, Lifecycle, WorkerSettings, WorkerStatus};
pub use network::{Network, OriginNetwork};
pub use request::{FetchRequest, FetchResponse, RequestKey, ResponseKind};
pub use storage::{Cache, CacheStorage};

/// Name of the current cache partition.
pub const CACHE_NAME: &str = "gempa-bumi-pwa-v1";

/// Path the worker script is registered from.
pub const REGISTRATION_PATH: &str = "/sw.js";

/// Same-origin assets added to the cache at install time.
///
/// The worker script itself and favicons are not listed; they are cached
/// lazily on first fetch like any other asset.
pub const PRECACHE_ASSETS: [&str; 12] = [
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/manifest.json",
    "/images/icon-72x72.png",
    "/images/icon-96x96.png",
    "/images/icon-128x128.png",
    "/images/icon-144x144.png",
    "/images/icon-152x152.png",
    "/images/icon-192x192.png",
    "/images/icon-512x512.png",
];
