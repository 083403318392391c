//! Install prompt request/response bodies.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::install::InstallOutcome;

/// Body of `POST /api/v1/install/signal`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct InstallSignalRequest {
    /// Platforms the client offers installation on.
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Controller state after a signal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstallSignalResponse {
    /// Whether the install button is now shown.
    pub button_visible: bool,
}

/// Body of `POST /api/v1/install/choice`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InstallChoiceRequest {
    /// The user's answer.
    pub outcome: InstallOutcome,
}

/// Result of a button click.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstallClickResponse {
    /// The user's answer.
    pub outcome: InstallOutcome,
    /// Whether the install button is still shown.
    pub button_visible: bool,
}
