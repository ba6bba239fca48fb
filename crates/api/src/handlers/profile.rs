//! Handlers for profile completion.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::completion::CompletionRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/v1/profile/complete
///
/// Validate, upload media and persist the profile in one transaction. The
/// pipeline runs detached from the request, so a timeout answers the
/// caller without interrupting it.
/// Accepts JSON or multipart bodies (see [`CompletionRequest`]).
pub async fn complete_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    request: CompletionRequest,
) -> AppResult<impl IntoResponse> {
    state
        .completion
        .spawn_complete(auth.user_id, request.payload, request.client_ip)
        .await
        .map_err(|e| AppError::InternalError(format!("Completion task failed: {e}")))??;

    Ok(Json(MessageResponse::ok("Profile completed successfully")))
}
