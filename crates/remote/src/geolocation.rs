//! IP geolocation against an ip-api.com compatible endpoint.
//!
//! `GET {base_url}` locates the caller; `GET {base_url}/{ip}` locates a
//! specific address. The service answers `200` with a `status` field of
//! `"success"` or `"fail"`.

use std::net::IpAddr;
use std::time::Duration;

use matcha_core::geo::{Coordinates, GeoError, GeoLocator};
use serde::Deserialize;

/// Default lookup endpoint.
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// [`GeoLocator`] backed by an HTTP lookup service.
#[derive(Clone)]
pub struct IpGeoClient {
    client: reqwest::Client,
    base_url: String,
}

impl IpGeoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| GeoError::Request(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn lookup_url(&self, ip: Option<IpAddr>) -> String {
        match ip {
            Some(ip) => format!("{}/{ip}", self.base_url),
            None => self.base_url.clone(),
        }
    }
}

impl GeoLocator for IpGeoClient {
    async fn locate(&self, ip: Option<IpAddr>) -> Result<Coordinates, GeoError> {
        let response = self
            .client
            .get(self.lookup_url(ip))
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Request(format!("lookup returned {status}")));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;

        if body.status != "success" {
            return Err(GeoError::Lookup(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }

        let coordinates = match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Coordinates {
                latitude,
                longitude,
            },
            _ => return Err(GeoError::Lookup("response missing coordinates".into())),
        };
        if !coordinates.is_in_range() {
            return Err(GeoError::Lookup("coordinates out of range".into()));
        }
        Ok(coordinates)
    }
}
