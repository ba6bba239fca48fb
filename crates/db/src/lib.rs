//! PostgreSQL persistence for profile completion.
//!
//! Exposes the connection pool helpers, row models, per-table repositories
//! and [`PgCompletionStore`], the transactional store used by the
//! completion service.

pub mod completion_store;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub use completion_store::{PgCompletionStore, PgCompletionTx};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
