//! gempa-pwa server entry point.
//!
//! Starts the Axum HTTP server, then registers the cache worker against
//! the server's own origin.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use gempa_pwa::api;
use gempa_pwa::app_state::AppState;
use gempa_pwa::config::GempaConfig;
use gempa_pwa::feed::BmkgFeed;
use gempa_pwa::install::InstallPromptController;
use gempa_pwa::mirror::MirrorStore;
use gempa_pwa::render::RenderPipeline;
use gempa_pwa::service::PageService;
use gempa_pwa::worker::{CacheStorage, CacheWorkerHandle, OriginNetwork, WorkerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GempaConfig::from_env().map_err(|e| anyhow::anyhow!("configuration: {e}"))?;
    tracing::info!(addr = %config.listen_addr, feed = %config.bmkg_base_url, "starting gempa-pwa");

    let client = reqwest::Client::new();

    // Page context
    let feed = Arc::new(BmkgFeed::new(client.clone(), config.bmkg_base_url.clone()));
    let page_service = Arc::new(PageService::new(
        RenderPipeline::new(feed),
        MirrorStore::from_config(&config),
        Arc::new(InstallPromptController::new()),
    ));

    // Worker context
    let network = Arc::new(OriginNetwork::new(client, &config.origin_url)?);
    let mut settings = WorkerSettings::new(config.origin_url.clone());
    settings.channel_capacity = config.worker_channel_capacity;
    let worker = CacheWorkerHandle::spawn(settings, Arc::new(CacheStorage::new()), network);

    let app_state = AppState {
        page_service,
        worker: worker.clone(),
        origin: config.origin_url.clone(),
    };
    let app = api::build_app(app_state, &config.asset_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    // Precache needs the listener up; failures leave the site online-only.
    tokio::spawn(async move {
        if let Err(err) = worker.register().await {
            tracing::error!(error = %err, script = worker.script_url(), "cache worker registration failed");
        }
    });

    axum::serve(listener, app).await?;

    Ok(())
}
