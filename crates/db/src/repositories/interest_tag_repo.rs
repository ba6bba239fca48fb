//! Repository for the `interest_tags` vocabulary.

use sqlx::PgPool;

use crate::models::interest_tag::InterestTag;

/// Read-only access to the interest vocabulary.
pub struct InterestTagRepo;

impl InterestTagRepo {
    /// List every tag, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<InterestTag>, sqlx::Error> {
        sqlx::query_as::<_, InterestTag>("SELECT id, tag FROM interest_tags ORDER BY tag")
            .fetch_all(pool)
            .await
    }

    /// List tag names only.
    pub async fn list_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT tag FROM interest_tags ORDER BY tag")
            .fetch_all(pool)
            .await
    }
}
