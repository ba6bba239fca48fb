//! Repository for the `interests` association table.

use matcha_core::types::UserId;
use sqlx::{PgPool, Postgres, Transaction};

/// Links users to vocabulary tags.
pub struct UserInterestRepo;

impl UserInterestRepo {
    /// Tag names associated with a user, alphabetically.
    pub async fn list_for_user(pool: &PgPool, user_id: UserId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT t.tag FROM interests i \
             JOIN interest_tags t ON t.id = i.interest_id \
             WHERE i.user_id = $1 \
             ORDER BY t.tag",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Associate the user with each named tag (idempotent).
    ///
    /// Tags are resolved against the vocabulary in the same statement; unknown
    /// names match nothing and existing pairs are skipped. Returns rows
    /// inserted.
    pub async fn insert_by_tags(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        tags: &[String],
    ) -> Result<u64, sqlx::Error> {
        if tags.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO interests (user_id, interest_id) \
             SELECT $1, id FROM interest_tags WHERE tag = ANY($2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(tags)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
