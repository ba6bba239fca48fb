//! Repository for the `pictures` table.

use matcha_core::types::UserId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::picture::Picture;

const COLUMNS: &str = "id, user_id, picture_url, created_at";

/// Provides access to gallery pictures.
pub struct PictureRepo;

impl PictureRepo {
    /// List a user's pictures in insertion order.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<Picture>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pictures WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Picture>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Append one row per URL, preserving order. Returns rows inserted.
    pub async fn insert_many(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        urls: &[String],
    ) -> Result<u64, sqlx::Error> {
        if urls.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO pictures (user_id, picture_url)
             SELECT $1, url FROM unnest($2::text[]) WITH ORDINALITY AS t(url, ord)
             ORDER BY ord",
        )
        .bind(user_id)
        .bind(urls)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
