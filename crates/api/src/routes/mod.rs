pub mod health;
pub mod interests;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /interests              list vocabulary (public)
/// /profile/complete       complete profile (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/interests", interests::router())
        .nest("/profile", profile::router())
}
