use matcha_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `interest_tags` vocabulary table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InterestTag {
    pub id: DbId,
    pub tag: String,
}
