use std::sync::Arc;

use matcha_db::PgCompletionStore;
use matcha_remote::{CloudinaryUploader, IpGeoClient};

use crate::completion::CompletionService;
use crate::config::ServerConfig;

/// The completion service as wired in production.
pub type ProfileCompletion = CompletionService<CloudinaryUploader, PgCompletionStore, IpGeoClient>;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: matcha_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Profile completion pipeline (media host, store, geolocation).
    pub completion: Arc<ProfileCompletion>,
}
