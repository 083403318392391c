//! Install prompt controller: deferred "add to home screen" handling.
//!
//! The platform offers installation through a deferred prompt event. The
//! controller suppresses the automatic prompt, keeps the event in a
//! [`PromptSlot`], and shows the install button. Clicking the button
//! replays the prompt and hides the button once the user has answered.

pub mod controller;
pub mod prompt;

pub use controller::{InstallPromptController, PromptSlot};
pub use prompt::{ChoiceSender, DeferredPrompt, InstallOutcome, RelayedPrompt};
