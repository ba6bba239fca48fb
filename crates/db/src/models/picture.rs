use matcha_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pictures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Picture {
    pub id: DbId,
    pub user_id: UserId,
    pub picture_url: String,
    pub created_at: Timestamp,
}
