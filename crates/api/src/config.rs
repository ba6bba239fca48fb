use matcha_remote::cloudinary::CloudinaryConfig;
use matcha_remote::geolocation::DEFAULT_GEOLOCATION_URL;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All non-secret fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// Media host credentials.
    pub cloudinary: CloudinaryConfig,
    /// IP geolocation endpoint used when a submission carries no coordinates.
    pub geolocation_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `GEOLOCATION_URL`      | `http://ip-api.com/json`   |
    ///
    /// See [`JwtConfig::from_env`] and [`CloudinaryConfig::from_env`] for
    /// the required secrets.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let geolocation_url =
            std::env::var("GEOLOCATION_URL").unwrap_or_else(|_| DEFAULT_GEOLOCATION_URL.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
            geolocation_url,
        }
    }
}
