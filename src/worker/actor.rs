//! Worker actor: lifecycle, event loop, and the handle used to drive it.
//!
//! The actor task owns the lifecycle state and applies every transition
//! itself, in arrival order. The precache of an `install` and every `fetch`
//! run in their own spawned tasks, so a slow upstream never holds up the
//! event loop. A precache task reports back to the loop, which then
//! settles the lifecycle and answers the caller.

use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use utoipa::ToSchema;

use super::network::Network;
use super::request::{FetchRequest, FetchResponse};
use super::storage::CacheStorage;
use super::{CACHE_NAME, PRECACHE_ASSETS, REGISTRATION_PATH};
use crate::error::GempaError;

/// Worker lifecycle, following the registration state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Spawned; no install attempted yet.
    Parsed,
    /// Precache in progress.
    Installing,
    /// Precache complete; waiting to activate.
    Installed,
    /// Deleting stale partitions.
    Activating,
    /// Controlling fetches.
    Activated,
    /// Install failed; the worker never controls fetches.
    Redundant,
}

/// Static worker parameters.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Name of the current cache partition.
    pub cache_name: String,
    /// Origin-relative paths added at install time.
    pub precache: Vec<String>,
    /// Origin precache paths are resolved against, without trailing slash.
    pub origin: String,
    /// Path the worker is registered from.
    pub script_url: String,
    /// Capacity of the event channel.
    pub channel_capacity: usize,
}

impl WorkerSettings {
    /// Default settings for `origin`: [`CACHE_NAME`], [`PRECACHE_ASSETS`]
    /// and [`REGISTRATION_PATH`].
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            cache_name: CACHE_NAME.to_string(),
            precache: PRECACHE_ASSETS.iter().map(|p| (*p).to_string()).collect(),
            origin: origin.into(),
            script_url: REGISTRATION_PATH.to_string(),
            channel_capacity: 256,
        }
    }
}

/// Snapshot of the worker for diagnostics.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkerStatus {
    /// Path the worker was registered from.
    pub script_url: String,
    /// Current lifecycle state.
    pub lifecycle: Lifecycle,
    /// Name of the current partition.
    pub cache_name: String,
    /// Every partition with its cached URLs.
    pub partitions: Vec<PartitionStatus>,
}

/// One cache partition in a [`WorkerStatus`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PartitionStatus {
    /// Partition name.
    pub name: String,
    /// Cached URLs, sorted.
    pub urls: Vec<String>,
}

#[derive(Debug)]
enum WorkerEvent {
    Install {
        reply: oneshot::Sender<Result<(), GempaError>>,
    },
    Activate {
        reply: oneshot::Sender<Result<Vec<String>, GempaError>>,
    },
    Fetch {
        request: FetchRequest,
        reply: oneshot::Sender<Result<FetchResponse, GempaError>>,
    },
    Status {
        reply: oneshot::Sender<WorkerStatus>,
    },
}

/// What a spawned fetch task needs; cloned per request.
#[derive(Debug, Clone)]
struct FetchContext {
    storage: Arc<CacheStorage>,
    network: Arc<dyn Network>,
    cache_name: String,
}

impl FetchContext {
    /// Cache-first answer for a controlled request.
    async fn respond(self, request: FetchRequest) -> Result<FetchResponse, GempaError> {
        if let Some(cached) = self.storage.match_any(&request).await {
            tracing::debug!(url = %request.url, "cache hit");
            return Ok(cached);
        }

        let response = self.network.fetch(request.clone()).await?;
        if !response.is_cacheable() {
            tracing::debug!(
                url = %request.url,
                status = %response.status,
                kind = ?response.kind,
                "response not cached"
            );
            return Ok(response);
        }

        let cache = self.storage.open(&self.cache_name).await;
        cache.put(&request, response.clone()).await;
        tracing::debug!(url = %request.url, cache = %self.cache_name, "response cached");
        Ok(response)
    }
}

/// Outcome of a precache task, reported back to the actor loop.
#[derive(Debug)]
struct InstallDone {
    result: Result<usize, GempaError>,
    reply: oneshot::Sender<Result<(), GempaError>>,
}

struct CacheWorker {
    settings: WorkerSettings,
    context: FetchContext,
    lifecycle: Lifecycle,
}

impl CacheWorker {
    async fn run(mut self, mut events: mpsc::Receiver<WorkerEvent>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        WorkerEvent::Install { reply } => self.on_install(reply, done_tx.clone()),
                        WorkerEvent::Activate { reply } => {
                            let _ = reply.send(self.on_activate().await);
                        }
                        WorkerEvent::Fetch { request, reply } => self.on_fetch(request, reply),
                        WorkerEvent::Status { reply } => {
                            let _ = reply.send(self.status().await);
                        }
                    }
                }
                Some(done) = done_rx.recv() => self.on_installed(done),
            }
        }
        tracing::debug!(script = %self.settings.script_url, "cache worker stopped");
    }

    /// Starts the precache in its own task. The loop keeps serving events
    /// meanwhile; fetches stay uncontrolled until activation.
    fn on_install(
        &mut self,
        reply: oneshot::Sender<Result<(), GempaError>>,
        done: mpsc::UnboundedSender<InstallDone>,
    ) {
        if self.lifecycle == Lifecycle::Installing {
            let _ = reply.send(Err(GempaError::WorkerUnavailable(
                "install already in progress".to_string(),
            )));
            return;
        }
        self.lifecycle = Lifecycle::Installing;

        let context = self.context.clone();
        let origin = self.settings.origin.clone();
        let paths = self.settings.precache.clone();
        tokio::spawn(async move {
            let result = precache(&context, &origin, &paths).await;
            let _ = done.send(InstallDone { result, reply });
        });
    }

    fn on_installed(&mut self, done: InstallDone) {
        let result = match done.result {
            Ok(count) => {
                self.lifecycle = Lifecycle::Installed;
                tracing::info!(cache = %self.settings.cache_name, assets = count, "precache complete, skipping wait");
                Ok(())
            }
            Err(err) => {
                self.lifecycle = Lifecycle::Redundant;
                tracing::error!(error = %err, "cache worker install failed");
                Err(err)
            }
        };
        let _ = done.reply.send(result);
    }

    async fn on_activate(&mut self) -> Result<Vec<String>, GempaError> {
        if self.lifecycle != Lifecycle::Installed {
            return Err(GempaError::WorkerUnavailable(format!(
                "cannot activate a worker in state {:?}",
                self.lifecycle
            )));
        }
        self.lifecycle = Lifecycle::Activating;

        let storage = &self.context.storage;
        let mut deleted = Vec::new();
        for name in storage.keys().await {
            if name != self.settings.cache_name && storage.delete(&name).await {
                tracing::info!(cache = %name, "deleted stale cache");
                deleted.push(name);
            }
        }

        self.lifecycle = Lifecycle::Activated;
        Ok(deleted)
    }

    /// Until activation the worker does not control requests: they go
    /// straight to the network and nothing is cached.
    fn on_fetch(
        &self,
        request: FetchRequest,
        reply: oneshot::Sender<Result<FetchResponse, GempaError>>,
    ) {
        let context = self.context.clone();
        let controlled = self.lifecycle == Lifecycle::Activated;
        tokio::spawn(async move {
            let result = if controlled {
                context.respond(request).await
            } else {
                context.network.fetch(request).await
            };
            let _ = reply.send(result);
        });
    }

    async fn status(&self) -> WorkerStatus {
        let storage = &self.context.storage;
        let mut partitions = Vec::new();
        for name in storage.keys().await {
            let urls = storage.open(&name).await.urls().await;
            partitions.push(PartitionStatus { name, urls });
        }
        WorkerStatus {
            script_url: self.settings.script_url.clone(),
            lifecycle: self.lifecycle,
            cache_name: self.settings.cache_name.clone(),
            partitions,
        }
    }
}

/// Fetches every precache path, then stores them all at once. Any network
/// error or non-success status aborts without storing anything.
async fn precache(
    context: &FetchContext,
    origin: &str,
    paths: &[String],
) -> Result<usize, GempaError> {
    let cache = context.storage.open(&context.cache_name).await;
    let fetches = paths.iter().map(|path| {
        let request = FetchRequest::get(format!("{origin}{path}"));
        let network = Arc::clone(&context.network);
        async move {
            let response = network.fetch(request.clone()).await.map_err(|e| {
                GempaError::Precache {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !response.status.is_success() {
                return Err(GempaError::Precache {
                    path: path.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok((request, response))
        }
    });

    let pairs = try_join_all(fetches).await?;
    let count = pairs.len();
    cache.put_all(pairs).await;
    Ok(count)
}

/// Cloneable handle to a running cache worker.
#[derive(Debug, Clone)]
pub struct CacheWorkerHandle {
    sender: mpsc::Sender<WorkerEvent>,
    script_url: String,
}

impl CacheWorkerHandle {
    /// Spawns the worker actor on the current tokio runtime.
    #[must_use]
    pub fn spawn(
        settings: WorkerSettings,
        storage: Arc<CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(settings.channel_capacity.max(1));
        let script_url = settings.script_url.clone();
        let worker = CacheWorker {
            context: FetchContext {
                storage,
                network,
                cache_name: settings.cache_name.clone(),
            },
            settings,
            lifecycle: Lifecycle::Parsed,
        };
        tokio::spawn(worker.run(receiver));
        Self { sender, script_url }
    }

    /// Path the worker is registered from.
    #[must_use]
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    /// Installs and, since install always skips waiting, immediately
    /// activates the worker.
    ///
    /// # Errors
    ///
    /// Returns the install or activate error; the worker then keeps
    /// passing fetches straight to the network.
    pub async fn register(&self) -> Result<(), GempaError> {
        self.install().await?;
        let deleted = self.activate().await?;
        tracing::info!(script = %self.script_url, stale_caches = deleted.len(), "cache worker registered");
        Ok(())
    }

    /// Sends the install event.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Precache`] if any precache asset could not be
    /// added, or [`GempaError::WorkerUnavailable`] if the actor is gone.
    pub async fn install(&self) -> Result<(), GempaError> {
        self.call(|reply| WorkerEvent::Install { reply }).await?
    }

    /// Sends the activate event and returns the names of deleted partitions.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::WorkerUnavailable`] if the worker is not
    /// installed or the actor is gone.
    pub async fn activate(&self) -> Result<Vec<String>, GempaError> {
        self.call(|reply| WorkerEvent::Activate { reply }).await?
    }

    /// Routes `request` through the worker.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Network`] on a cache miss whose network fetch
    /// fails, or [`GempaError::WorkerUnavailable`] if the actor is gone.
    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, GempaError> {
        self.call(|reply| WorkerEvent::Fetch { request, reply })
            .await?
    }

    /// Returns the worker's lifecycle and partition contents.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::WorkerUnavailable`] if the actor is gone.
    pub async fn status(&self) -> Result<WorkerStatus, GempaError> {
        self.call(|reply| WorkerEvent::Status { reply }).await
    }

    async fn call<T>(
        &self,
        event: impl FnOnce(oneshot::Sender<T>) -> WorkerEvent,
    ) -> Result<T, GempaError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(event(reply))
            .await
            .map_err(|_| GempaError::WorkerUnavailable("worker stopped".to_string()))?;
        response
            .await
            .map_err(|_| GempaError::WorkerUnavailable("worker dropped the reply".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::worker::request::ResponseKind;
    use async_trait::async_trait;
    use axum::http::{HeaderMap, StatusCode};
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    const ORIGIN: &str = "http://app.test";
    const SHAKEMAP: &str = "https://data.bmkg.go.id/DataMKG/TEWS/a.mmi.jpg";

    #[derive(Debug, Default)]
    struct FakeNetwork {
        routes: HashMap<String, (StatusCode, ResponseKind)>,
        calls: AtomicUsize,
        /// URL whose response is held back until the gate is opened.
        gate: Option<(String, Arc<Notify>)>,
    }

    impl FakeNetwork {
        fn site() -> Self {
            let mut routes: HashMap<String, (StatusCode, ResponseKind)> = PRECACHE_ASSETS
                .iter()
                .map(|p| (format!("{ORIGIN}{p}"), (StatusCode::OK, ResponseKind::Basic)))
                .collect();
            routes.insert(format!("{ORIGIN}/extra.js"), (StatusCode::OK, ResponseKind::Basic));
            routes.insert(
                format!("{ORIGIN}/missing"),
                (StatusCode::NOT_FOUND, ResponseKind::Basic),
            );
            routes.insert(SHAKEMAP.to_string(), (StatusCode::OK, ResponseKind::Cors));
            Self {
                routes,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, GempaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((url, gate)) = &self.gate {
                if *url == request.url {
                    gate.notified().await;
                }
            }
            let Some((status, kind)) = self.routes.get(&request.url) else {
                return Err(GempaError::Network(format!("unreachable {}", request.url)));
            };
            Ok(FetchResponse {
                status: *status,
                headers: HeaderMap::new(),
                body: Bytes::from(request.url.clone()),
                kind: *kind,
            })
        }
    }

    fn spawn_with(
        settings: WorkerSettings,
        network: FakeNetwork,
    ) -> (CacheWorkerHandle, Arc<CacheStorage>, Arc<FakeNetwork>) {
        let storage = Arc::new(CacheStorage::new());
        let network = Arc::new(network);
        let handle = CacheWorkerHandle::spawn(
            settings,
            Arc::clone(&storage),
            Arc::clone(&network) as Arc<dyn Network>,
        );
        (handle, storage, network)
    }

    fn spawn_site() -> (CacheWorkerHandle, Arc<CacheStorage>, Arc<FakeNetwork>) {
        spawn_with(WorkerSettings::new(ORIGIN), FakeNetwork::site())
    }

    async fn lifecycle(handle: &CacheWorkerHandle) -> Lifecycle {
        let Ok(status) = handle.status().await else {
            panic!("worker should report status");
        };
        status.lifecycle
    }

    #[tokio::test]
    async fn install_precaches_every_listed_asset() {
        let (handle, storage, _) = spawn_site();

        assert!(handle.install().await.is_ok());

        let cache = storage.open(CACHE_NAME).await;
        assert_eq!(cache.len().await, PRECACHE_ASSETS.len());
        for path in PRECACHE_ASSETS {
            let url = format!("{ORIGIN}{path}");
            let Some(hit) = cache.match_request(&FetchRequest::get(url.clone())).await else {
                panic!("{path} should be precached");
            };
            assert_eq!(hit.status, StatusCode::OK);
            assert_eq!(hit.body, Bytes::from(url));
        }
        assert_eq!(lifecycle(&handle).await, Lifecycle::Installed);
    }

    #[tokio::test]
    async fn fetches_are_answered_while_precache_is_pending() {
        let gate = Arc::new(Notify::new());
        let mut network = FakeNetwork::site();
        network.gate = Some((format!("{ORIGIN}/"), Arc::clone(&gate)));
        let (handle, storage, _) = spawn_with(WorkerSettings::new(ORIGIN), network);

        let installer = handle.clone();
        let install = tokio::spawn(async move { installer.install().await });
        while lifecycle(&handle).await != Lifecycle::Installing {
            tokio::task::yield_now().await;
        }

        let fetch = handle.fetch(FetchRequest::get(format!("{ORIGIN}/styles.css")));
        let Ok(Ok(response)) = tokio::time::timeout(Duration::from_secs(2), fetch).await else {
            panic!("fetch must not wait for the precache");
        };
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(lifecycle(&handle).await, Lifecycle::Installing);
        assert!(storage.open(CACHE_NAME).await.is_empty().await);

        gate.notify_one();
        let Ok(result) = install.await else {
            panic!("install task completes");
        };
        assert!(result.is_ok());
        assert_eq!(lifecycle(&handle).await, Lifecycle::Installed);
        assert_eq!(storage.open(CACHE_NAME).await.len().await, PRECACHE_ASSETS.len());
    }

    #[tokio::test]
    async fn second_install_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let mut network = FakeNetwork::site();
        network.gate = Some((format!("{ORIGIN}/"), Arc::clone(&gate)));
        let (handle, _, _) = spawn_with(WorkerSettings::new(ORIGIN), network);

        let installer = handle.clone();
        let install = tokio::spawn(async move { installer.install().await });
        while lifecycle(&handle).await != Lifecycle::Installing {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            handle.install().await,
            Err(GempaError::WorkerUnavailable(_))
        ));
        assert!(handle.activate().await.is_err());

        gate.notify_one();
        assert!(matches!(install.await, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn failed_precache_stores_nothing() {
        let mut network = FakeNetwork::site();
        network.routes.remove(&format!("{ORIGIN}/manifest.json"));
        let (handle, storage, _) = spawn_with(WorkerSettings::new(ORIGIN), network);

        let result = handle.install().await;

        assert!(matches!(result, Err(GempaError::Precache { ref path, .. }) if path == "/manifest.json"));
        assert!(storage.open(CACHE_NAME).await.is_empty().await);
        assert_eq!(lifecycle(&handle).await, Lifecycle::Redundant);
        assert!(handle.activate().await.is_err());
    }

    #[tokio::test]
    async fn activate_keeps_only_current_version() {
        let mut settings = WorkerSettings::new(ORIGIN);
        settings.cache_name = "v2".to_string();
        let (handle, storage, _) = spawn_with(settings, FakeNetwork::site());
        let _ = storage.open("v1").await;
        let _ = storage.open("v2").await;

        assert!(handle.install().await.is_ok());
        let Ok(deleted) = handle.activate().await else {
            panic!("activate should succeed");
        };

        assert_eq!(deleted, ["v1"]);
        assert_eq!(storage.keys().await, ["v2"]);
        assert_eq!(lifecycle(&handle).await, Lifecycle::Activated);
    }

    #[tokio::test]
    async fn cached_request_never_reaches_network() {
        let (handle, _, network) = spawn_site();
        assert!(handle.register().await.is_ok());
        let before = network.calls();

        let Ok(response) = handle.fetch(FetchRequest::get(format!("{ORIGIN}/styles.css"))).await
        else {
            panic!("cached fetch should succeed");
        };

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(network.calls(), before);
    }

    #[tokio::test]
    async fn uncached_same_origin_200_is_stored_once() {
        let (handle, storage, network) = spawn_site();
        assert!(handle.register().await.is_ok());
        let before = network.calls();
        let url = format!("{ORIGIN}/extra.js");

        assert!(handle.fetch(FetchRequest::get(url.clone())).await.is_ok());
        assert!(handle.fetch(FetchRequest::get(url.clone())).await.is_ok());

        assert_eq!(network.calls(), before + 1);
        let cache = storage.open(CACHE_NAME).await;
        assert_eq!(cache.len().await, PRECACHE_ASSETS.len() + 1);
        assert!(cache.urls().await.contains(&url));
    }

    #[tokio::test]
    async fn non_200_and_cross_origin_are_returned_uncached() {
        let (handle, storage, network) = spawn_site();
        assert!(handle.register().await.is_ok());

        let Ok(missing) = handle.fetch(FetchRequest::get(format!("{ORIGIN}/missing"))).await else {
            panic!("404 is still a response");
        };
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let Ok(image) = handle.fetch(FetchRequest::get(SHAKEMAP)).await else {
            panic!("cross-origin fetch should succeed");
        };
        assert_eq!(image.kind, ResponseKind::Cors);

        assert_eq!(storage.open(CACHE_NAME).await.len().await, PRECACHE_ASSETS.len());
        let before = network.calls();
        assert!(handle.fetch(FetchRequest::get(SHAKEMAP)).await.is_ok());
        assert_eq!(network.calls(), before + 1);
    }

    #[tokio::test]
    async fn network_failure_propagates() {
        let (handle, _, _) = spawn_site();
        assert!(handle.register().await.is_ok());

        let result = handle.fetch(FetchRequest::get(format!("{ORIGIN}/offline-only"))).await;
        assert!(matches!(result, Err(GempaError::Network(_))));
    }

    #[tokio::test]
    async fn uncontrolled_fetch_bypasses_cache() {
        let (handle, storage, network) = spawn_site();
        let url = format!("{ORIGIN}/extra.js");

        assert!(handle.fetch(FetchRequest::get(url.clone())).await.is_ok());
        assert!(handle.fetch(FetchRequest::get(url)).await.is_ok());

        assert_eq!(network.calls(), 2);
        assert!(!storage.has(CACHE_NAME).await);
    }

    #[tokio::test]
    async fn concurrent_fetches_are_independent() {
        let (handle, _, _) = spawn_site();
        assert!(handle.register().await.is_ok());

        let fetches = PRECACHE_ASSETS
            .iter()
            .map(|p| handle.fetch(FetchRequest::get(format!("{ORIGIN}{p}"))))
            .chain(std::iter::once(handle.fetch(FetchRequest::get(SHAKEMAP))));
        let results = futures_util::future::join_all(fetches).await;

        assert_eq!(results.len(), PRECACHE_ASSETS.len() + 1);
        assert!(results.iter().all(Result::is_ok));
    }
}
