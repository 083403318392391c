//! Sequential fetch-and-render over the two page containers.

use std::sync::Arc;

use super::templates::{latest_fragment, list_fragment};
use crate::domain::{Container, Document};
use crate::feed::QuakeFeed;

/// Which of the two render steps updated their container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// `#info-gempa` was replaced.
    pub latest_rendered: bool,
    /// `#daftar-gempa` was replaced.
    pub list_rendered: bool,
}

/// Drives the latest-event and recent-list renders.
///
/// Each step is independent: a failure is logged and leaves its container
/// with whatever it held before. The latest step always finishes before
/// the list step starts.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    feed: Arc<dyn QuakeFeed>,
}

impl RenderPipeline {
    /// Creates a pipeline reading from `feed`.
    #[must_use]
    pub fn new(feed: Arc<dyn QuakeFeed>) -> Self {
        Self { feed }
    }

    /// Runs both steps in order against `document`.
    pub async fn run(&self, document: &mut Document) -> RenderOutcome {
        let latest_rendered = self.render_latest(document).await;
        let list_rendered = self.render_list(document).await;
        RenderOutcome {
            latest_rendered,
            list_rendered,
        }
    }

    /// Fetches the latest event and fills `#info-gempa`. Returns `false`
    /// (container untouched) on any fetch or decode failure.
    pub async fn render_latest(&self, document: &mut Document) -> bool {
        match self.feed.latest().await {
            Ok(event) => {
                let html = latest_fragment(&event, self.feed.shakemap_base());
                document.set_inner_html(Container::LatestInfo, html);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching latest earthquake data");
                false
            }
        }
    }

    /// Fetches the recent list and fills `#daftar-gempa`. Returns `false`
    /// (container untouched) on any fetch or decode failure.
    pub async fn render_list(&self, document: &mut Document) -> bool {
        match self.feed.recent().await {
            Ok(events) => {
                tracing::debug!(count = events.len(), "rendering earthquake list");
                document.set_inner_html(Container::RecentList, list_fragment(&events));
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching earthquakes data");
                false
            }
        }
    }
}
