//! # gempa-pwa
//!
//! Installable earthquake bulletin page backed by the BMKG TEWS feed.
//!
//! Every page load fetches the latest event and the recent-events list,
//! renders them into two containers, and mirrors the resulting text into a
//! local SQLite record. A cache-first worker, running as its own actor,
//! precaches the page assets and keeps same-origin responses for offline
//! use.
//!
//! ## Architecture
//!
//! ```text
//! Clients (browser, HTTP)
//!     │
//!     ├── Page + REST Handlers (api/)
//!     │
//!     ├── PageService (service/) ─── InstallPromptController (install/)
//!     │       │
//!     │       ├── RenderPipeline (render/) ── QuakeFeed / BMKG (feed/)
//!     │       └── MirrorStore (mirror/) ── SQLite
//!     │
//!     └── CacheWorkerHandle (worker/)  [separate actor]
//!             ├── CacheStorage (named partitions)
//!             └── OriginNetwork (reqwest)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod install;
pub mod mirror;
pub mod render;
pub mod service;
pub mod worker;
