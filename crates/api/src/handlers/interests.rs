//! Handlers for the interest vocabulary.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use matcha_db::repositories::InterestTagRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/interests
///
/// List every selectable interest tag, alphabetically.
pub async fn list_interests(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = InterestTagRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: tags }))
}
