//! Repository for the `users` table.

use matcha_core::store::ProfileUpdate;
use matcha_core::types::UserId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, username, first_name, last_name, biography, \
                       sexual_preferences, profile_picture, city, country, latitude, longitude, \
                       profile_completed, created_at, updated_at";

/// Provides access to user rows.
pub struct UserRepo;

impl UserRepo {
    /// Insert a signup row with every profile column unset.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write the completed profile onto the user row and set
    /// `profile_completed`.
    ///
    /// Coordinates are written as given; `None` clears them. Returns the
    /// number of rows affected (0 when the user does not exist).
    pub async fn complete_profile(
        tx: &mut Transaction<'_, Postgres>,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                biography = $2,
                latitude = $3,
                longitude = $4,
                sexual_preferences = $5,
                profile_picture = $6,
                city = $7,
                country = $8,
                profile_completed = TRUE
             WHERE id = $1",
        )
        .bind(id)
        .bind(&update.biography)
        .bind(update.coordinates.map(|c| c.latitude))
        .bind(update.coordinates.map(|c| c.longitude))
        .bind(update.preference.as_str())
        .bind(&update.profile_picture_url)
        .bind(&update.city)
        .bind(&update.country)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
