use axum::routing::get;
use axum::Router;

use crate::handlers::interests;
use crate::state::AppState;

/// Routes mounted at `/interests`.
///
/// ```text
/// GET    /                  -> list_interests
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(interests::list_interests))
}
