//! User entity model and DTOs.

use matcha_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Profile columns stay `NULL` until the user completes their profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub sexual_preferences: Option<String>,
    pub profile_picture: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the signup row that precedes completion.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}
