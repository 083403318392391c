//! Deferred install prompt events.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};
use utoipa::ToSchema;

use crate::error::GempaError;

/// The user's answer to the install dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstallOutcome {
    /// The user installed the app.
    Accepted,
    /// The user closed the dialog.
    Dismissed,
}

/// A platform-supplied offer to install the page as an app.
#[async_trait]
pub trait DeferredPrompt: Send + Sync + fmt::Debug {
    /// Suppresses the platform's automatic prompt.
    fn prevent_default(&self);

    /// Shows the native install dialog.
    fn prompt(&self);

    /// Waits for the user's answer to a shown dialog.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::InvalidRequest`] if the answer can no longer
    /// arrive (already consumed, or the platform side went away).
    async fn user_choice(&self) -> Result<InstallOutcome, GempaError>;
}

/// Deferred prompt whose dialog lives in a remote client.
///
/// The client reports the user's answer through the paired
/// [`ChoiceSender`].
#[derive(Debug)]
pub struct RelayedPrompt {
    platforms: Vec<String>,
    default_prevented: AtomicBool,
    shown: AtomicBool,
    choice: Mutex<Option<oneshot::Receiver<InstallOutcome>>>,
}

/// Delivers the user's answer to a [`RelayedPrompt`].
#[derive(Debug)]
pub struct ChoiceSender(oneshot::Sender<InstallOutcome>);

impl ChoiceSender {
    /// Delivers `outcome`. Returns `false` if the prompt was dropped first.
    pub fn send(self, outcome: InstallOutcome) -> bool {
        self.0.send(outcome).is_ok()
    }
}

impl RelayedPrompt {
    /// Creates a prompt offered for `platforms` and the sender for its
    /// answer.
    #[must_use]
    pub fn new(platforms: Vec<String>) -> (Self, ChoiceSender) {
        let (tx, rx) = oneshot::channel();
        let prompt = Self {
            platforms,
            default_prevented: AtomicBool::new(false),
            shown: AtomicBool::new(false),
            choice: Mutex::new(Some(rx)),
        };
        (prompt, ChoiceSender(tx))
    }

    /// Platforms the install was offered for.
    #[must_use]
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    /// Returns `true` once [`DeferredPrompt::prevent_default`] was called.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }

    /// Returns `true` once the dialog was shown.
    #[must_use]
    pub fn shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeferredPrompt for RelayedPrompt {
    fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    fn prompt(&self) {
        self.shown.store(true, Ordering::SeqCst);
        tracing::debug!(platforms = ?self.platforms, "install dialog shown");
    }

    async fn user_choice(&self) -> Result<InstallOutcome, GempaError> {
        let receiver = self.choice.lock().await.take().ok_or_else(|| {
            GempaError::InvalidRequest("install choice already consumed".to_string())
        })?;
        receiver.await.map_err(|_| {
            GempaError::InvalidRequest("install choice was never delivered".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relayed_choice_arrives_once() {
        let (prompt, sender) = RelayedPrompt::new(vec!["web".to_string()]);
        prompt.prevent_default();
        prompt.prompt();
        assert!(sender.send(InstallOutcome::Accepted));

        assert!(prompt.default_prevented() && prompt.shown());
        assert!(matches!(prompt.user_choice().await, Ok(InstallOutcome::Accepted)));
        assert!(prompt.user_choice().await.is_err());
    }

    #[tokio::test]
    async fn dropped_sender_is_an_error() {
        let (prompt, sender) = RelayedPrompt::new(Vec::new());
        drop(sender);
        assert!(prompt.user_choice().await.is_err());
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&InstallOutcome::Dismissed).unwrap_or_default();
        assert_eq!(json, "\"dismissed\"");
    }
}
