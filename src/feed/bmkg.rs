//! HTTP client for the BMKG TEWS JSON documents.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::QuakeFeed;
use crate::domain::{Bulletin, EarthquakeEvent, EarthquakeList};
use crate::error::GempaError;

/// Latest-event document, relative to the feed base.
pub const LATEST_PATH: &str = "autogempa.json";

/// Recent-events document, relative to the feed base.
pub const RECENT_PATH: &str = "gempaterkini.json";

/// `reqwest`-backed [`QuakeFeed`].
///
/// The HTTP status is not inspected: whatever body comes back
/// is handed to the JSON decoder. No timeout or retry is configured.
#[derive(Debug, Clone)]
pub struct BmkgFeed {
    client: reqwest::Client,
    base_url: String,
}

impl BmkgFeed {
    /// Creates a feed client rooted at `base_url` (must end with `/`).
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, GempaError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await?;
        tracing::debug!(%url, status = %response.status(), "feed response");
        let body = response.bytes().await?;
        let bulletin: Bulletin<T> = serde_json::from_slice(&body)?;
        Ok(bulletin.into_gempa())
    }
}

#[async_trait]
impl QuakeFeed for BmkgFeed {
    async fn latest(&self) -> Result<EarthquakeEvent, GempaError> {
        self.fetch(LATEST_PATH).await
    }

    async fn recent(&self) -> Result<EarthquakeList, GempaError> {
        self.fetch(RECENT_PATH).await
    }

    fn shakemap_base(&self) -> &str {
        &self.base_url
    }
}
