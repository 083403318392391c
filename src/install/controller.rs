//! Retained-prompt state and the button flow around it.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::prompt::{ChoiceSender, DeferredPrompt, InstallOutcome, RelayedPrompt};
use crate::error::GempaError;

/// Holds at most one deferred prompt. A newer capture replaces the older
/// one; there is no queue.
#[derive(Debug, Default)]
pub struct PromptSlot {
    pending: Option<Arc<dyn DeferredPrompt>>,
}

impl PromptSlot {
    /// Retains `event`. Returns `true` if it replaced an earlier one.
    pub fn capture(&mut self, event: Arc<dyn DeferredPrompt>) -> bool {
        self.pending.replace(event).is_some()
    }

    /// Takes the retained event, leaving the slot empty.
    pub fn consume(&mut self) -> Option<Arc<dyn DeferredPrompt>> {
        self.pending.take()
    }

    /// Returns `true` if an event is retained.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    slot: PromptSlot,
    /// Answer channel of the retained prompt, when it is relayed.
    retained_answer: Option<ChoiceSender>,
    /// Answer channel of the prompt whose dialog is open.
    open_answer: Option<ChoiceSender>,
    button_visible: bool,
}

/// Drives the `#install-button` from deferred prompt signals.
#[derive(Debug, Default)]
pub struct InstallPromptController {
    state: Mutex<ControllerState>,
}

impl InstallPromptController {
    /// Creates a controller with no retained prompt and a hidden button.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles the platform's deferred-install signal: suppress the default
    /// prompt, retain `event`, show the button.
    pub async fn on_before_install_prompt(&self, event: Arc<dyn DeferredPrompt>) {
        self.capture(event, None).await;
    }

    /// Handles a deferred-install signal relayed from a client. The user's
    /// answer comes back later through [`Self::deliver_choice`].
    pub async fn relay_signal(&self, platforms: Vec<String>) {
        let (prompt, answer) = RelayedPrompt::new(platforms);
        self.capture(Arc::new(prompt), Some(answer)).await;
    }

    async fn capture(&self, event: Arc<dyn DeferredPrompt>, answer: Option<ChoiceSender>) {
        event.prevent_default();
        let mut state = self.state.lock().await;
        if state.slot.capture(event) {
            tracing::debug!("replaced retained install prompt");
        }
        state.retained_answer = answer;
        state.button_visible = true;
    }

    /// Delivers a relayed answer to the open dialog, or to the retained
    /// prompt if its dialog has not been opened yet.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::NoPendingPrompt`] if no relayed prompt is
    /// waiting for an answer.
    pub async fn deliver_choice(&self, outcome: InstallOutcome) -> Result<(), GempaError> {
        let answer = {
            let mut state = self.state.lock().await;
            state
                .open_answer
                .take()
                .or_else(|| state.retained_answer.take())
        };
        match answer.map(|answer| answer.send(outcome)) {
            Some(true) => Ok(()),
            _ => Err(GempaError::NoPendingPrompt),
        }
    }

    /// Handles a button click: replay the retained prompt, wait for the
    /// answer, then hide the button.
    ///
    /// The slot is emptied before the dialog is shown, so a signal that
    /// arrives while the user is deciding is kept, and the button stays
    /// visible for it.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::NoPendingPrompt`] if nothing is retained, or
    /// the error from [`DeferredPrompt::user_choice`].
    pub async fn on_install_click(&self) -> Result<InstallOutcome, GempaError> {
        let event = {
            let mut state = self.state.lock().await;
            let event = state.slot.consume().ok_or(GempaError::NoPendingPrompt)?;
            state.open_answer = state.retained_answer.take();
            event
        };

        event.prompt();
        let choice = event.user_choice().await;
        drop(event);

        match &choice {
            Ok(InstallOutcome::Accepted) => tracing::info!("user accepted the install prompt"),
            Ok(InstallOutcome::Dismissed) => tracing::info!("user dismissed the install prompt"),
            Err(err) => tracing::warn!(error = %err, "install prompt ended without a choice"),
        }

        let mut state = self.state.lock().await;
        if !state.slot.is_pending() {
            state.button_visible = false;
        }
        choice
    }

    /// Returns `true` if the install button is shown.
    pub async fn button_visible(&self) -> bool {
        self.state.lock().await.button_visible
    }

    /// Returns `true` if a prompt is retained.
    pub async fn has_pending_prompt(&self) -> bool {
        self.state.lock().await.slot.is_pending()
    }
}
