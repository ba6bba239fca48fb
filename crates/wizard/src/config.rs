use std::time::Duration;

use matcha_remote::geolocation::DEFAULT_GEOLOCATION_URL;

/// Where the wizard sends its requests.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// API origin, e.g. `http://localhost:3000`. No trailing slash.
    pub api_base_url: String,
    /// IP geolocation endpoint used for the coordinate hint.
    pub geolocation_url: String,
    /// Timeout for the completion request.
    pub request_timeout: Duration,
}

impl WizardConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default                   |
    /// |-------------------|---------------------------|
    /// | `API_BASE_URL`    | `http://localhost:3000`   |
    /// | `GEOLOCATION_URL` | `http://ip-api.com/json`  |
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into()),
        );
        if let Ok(url) = std::env::var("GEOLOCATION_URL") {
            config.geolocation_url = url;
        }
        config
    }

    pub fn completion_url(&self) -> String {
        format!("{}/api/v1/profile/complete", self.api_base_url)
    }
}
