//! Install prompt endpoints.
//!
//! A client relays the platform's deferred-install signal, the button
//! click, and finally the user's answer. The click request completes once
//! the answer has been delivered.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    InstallChoiceRequest, InstallClickResponse, InstallSignalRequest, InstallSignalResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GempaError};

/// `POST /install/signal` — Platform offered installation.
#[utoipa::path(
    post,
    path = "/api/v1/install/signal",
    tag = "Install",
    summary = "Deferred install signal",
    description = "Retains the deferred prompt (replacing any earlier one) and shows the install button.",
    request_body = InstallSignalRequest,
    responses(
        (status = 200, description = "Prompt retained", body = InstallSignalResponse),
    )
)]
pub async fn install_signal(
    State(state): State<AppState>,
    Json(req): Json<InstallSignalRequest>,
) -> impl IntoResponse {
    let controller = state.page_service.install();
    controller.relay_signal(req.platforms).await;

    Json(InstallSignalResponse {
        button_visible: controller.button_visible().await,
    })
}

/// `POST /install/click` — Install button pressed.
///
/// # Errors
///
/// Returns [`GempaError::NoPendingPrompt`] if no prompt is retained, or
/// [`GempaError::InvalidRequest`] if the answer never arrives.
#[utoipa::path(
    post,
    path = "/api/v1/install/click",
    tag = "Install",
    summary = "Install button click",
    description = "Replays the retained prompt and waits for the user's answer, then hides the button.",
    responses(
        (status = 200, description = "User answered", body = InstallClickResponse),
        (status = 409, description = "No prompt retained", body = ErrorResponse),
    )
)]
pub async fn install_click(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GempaError> {
    let controller = state.page_service.install();
    let outcome = controller.on_install_click().await?;
    Ok(Json(InstallClickResponse {
        outcome,
        button_visible: controller.button_visible().await,
    }))
}

/// `POST /install/choice` — The user's answer to the shown dialog.
///
/// # Errors
///
/// Returns [`GempaError::NoPendingPrompt`] if no prompt is waiting for an
/// answer.
#[utoipa::path(
    post,
    path = "/api/v1/install/choice",
    tag = "Install",
    summary = "Install choice",
    description = "Delivers the accepted/dismissed answer to the open install dialog, or to the retained prompt if no dialog is open yet.",
    request_body = InstallChoiceRequest,
    responses(
        (status = 204, description = "Answer delivered"),
        (status = 409, description = "No prompt waiting", body = ErrorResponse),
    )
)]
pub async fn install_choice(
    State(state): State<AppState>,
    Json(req): Json<InstallChoiceRequest>,
) -> Result<impl IntoResponse, GempaError> {
    state
        .page_service
        .install()
        .deliver_choice(req.outcome)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Install routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/install/signal", post(install_signal))
        .route("/install/click", post(install_click))
        .route("/install/choice", post(install_choice))
}
