/// Dependent rows (pictures, interest tags) use PostgreSQL BIGSERIAL keys.
pub type DbId = i64;

/// Users are keyed by UUID, assigned at signup.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
