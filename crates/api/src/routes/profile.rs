use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use matcha_core::image::MAX_IMAGE_BYTES;

use crate::handlers::profile;
use crate::state::AppState;

/// Body limit for a completion: a profile picture and a generous gallery,
/// with room for base64 overhead.
pub const MAX_COMPLETION_BODY_BYTES: usize = 16 * MAX_IMAGE_BYTES;

/// Routes mounted at `/profile`.
///
/// ```text
/// POST   /complete          -> complete_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/complete", post(profile::complete_profile))
        .layer(DefaultBodyLimit::max(MAX_COMPLETION_BODY_BYTES))
}
