//! Page service: one page load = render pipeline, then mirror snapshot.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::shell::index_html;
use crate::domain::{Document, SnapshotRecord};
use crate::install::InstallPromptController;
use crate::mirror::MirrorStore;
use crate::render::{RenderOutcome, RenderPipeline};

/// Result of one page load.
#[derive(Debug, Clone)]
pub struct PageLoad {
    /// Container state after the load.
    pub document: Document,
    /// Which render steps replaced their container.
    pub rendered: RenderOutcome,
    /// Record written by the mirror store, if any.
    pub snapshot: Option<SnapshotRecord>,
}

/// Orchestrates page loads over the shared [`Document`].
///
/// Loads are serialized on the document lock: the latest render, the list
/// render and the mirror write of one load all finish before the next load
/// touches the containers.
#[derive(Debug)]
pub struct PageService {
    document: Mutex<Document>,
    pipeline: RenderPipeline,
    mirror: MirrorStore,
    install: Arc<InstallPromptController>,
}

impl PageService {
    /// Creates a page service with blank containers.
    #[must_use]
    pub fn new(
        pipeline: RenderPipeline,
        mirror: MirrorStore,
        install: Arc<InstallPromptController>,
    ) -> Self {
        Self {
            document: Mutex::new(Document::new()),
            pipeline,
            mirror,
            install,
        }
    }

    /// Runs one page load: latest render, list render, mirror snapshot.
    ///
    /// Failures inside any step are logged by that step and never stop the
    /// steps after it.
    pub async fn load(&self) -> PageLoad {
        let mut document = self.document.lock().await;
        let rendered = self.pipeline.run(&mut document).await;
        let snapshot = self.mirror.mirror(&document).await;
        tracing::debug!(
            latest = rendered.latest_rendered,
            list = rendered.list_rendered,
            mirrored = snapshot.is_some(),
            "page load complete"
        );
        PageLoad {
            document: document.clone(),
            rendered,
            snapshot,
        }
    }

    /// Runs a page load and renders the full HTML page.
    pub async fn render_index(&self) -> String {
        let load = self.load().await;
        let button_visible = self.install.button_visible().await;
        index_html(&load.document, button_visible)
    }

    /// Returns the mirror store.
    #[must_use]
    pub fn mirror(&self) -> &MirrorStore {
        &self.mirror
    }

    /// Returns the install prompt controller.
    #[must_use]
    pub fn install(&self) -> &Arc<InstallPromptController> {
        &self.install
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Container;
    use crate::mirror::MirrorSupport;
    use crate::render::pipeline::tests::{ScriptedFeed, sample_event};

    fn service(feed: ScriptedFeed, mirror: MirrorStore) -> PageService {
        PageService::new(
            RenderPipeline::new(Arc::new(feed)),
            mirror,
            Arc::new(InstallPromptController::new()),
        )
    }

    #[tokio::test]
    async fn load_mirrors_rendered_text() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let mirror = MirrorStore::new(MirrorSupport::Sqlite {
            database_url: format!("sqlite://{}", dir.path().join("gempaDB.sqlite").display()),
        });
        let svc = service(
            ScriptedFeed {
                latest: Some(sample_event()),
                recent: Some(vec![sample_event()]),
                ..ScriptedFeed::default()
            },
            mirror,
        );

        let load = svc.load().await;

        let Some(snapshot) = load.snapshot else {
            panic!("snapshot should be written");
        };
        assert_eq!(snapshot.data.info.date, load.document.inner_text(Container::LatestInfo));
        assert_eq!(snapshot.data.info.list, load.document.inner_text(Container::RecentList));
        assert!(snapshot.data.info.date.contains("Magnitude: 5.2"));
    }

    #[tokio::test]
    async fn failed_renders_still_reach_the_mirror_step() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let mirror = MirrorStore::new(MirrorSupport::Sqlite {
            database_url: format!("sqlite://{}", dir.path().join("gempaDB.sqlite").display()),
        });
        let svc = service(ScriptedFeed::default(), mirror);

        let load = svc.load().await;

        assert_eq!(load.rendered, RenderOutcome::default());
        let Some(snapshot) = load.snapshot else {
            panic!("empty page is still mirrored");
        };
        assert!(snapshot.data.info.date.is_empty());
        assert!(snapshot.data.info.list.is_empty());
    }

    #[tokio::test]
    async fn index_contains_rendered_containers() {
        let svc = service(
            ScriptedFeed {
                latest: Some(sample_event()),
                recent: Some(Vec::new()),
                ..ScriptedFeed::default()
            },
            MirrorStore::new(MirrorSupport::Unsupported),
        );

        let html = svc.render_index().await;

        assert!(html.contains("Informasi Gempa Terkini"));
        assert!(html.contains("<h2>Daftar Gempa Bumi M 5.0+</h2></section>"));
        assert!(html.contains(r#"style="display: none;""#));
    }
}
