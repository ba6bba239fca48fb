//! Coordinates and the IP-geolocation collaborator.

use std::future::Future;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Transport-level failure talking to the lookup service.
    #[error("geolocation request failed: {0}")]
    Request(String),

    /// The service answered but could not place the address.
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

/// Resolves an IP address to approximate coordinates.
///
/// `None` asks the service to locate the caller's own public address,
/// which is what a client-side lookup does.
pub trait GeoLocator: Send + Sync {
    fn locate(
        &self,
        ip: Option<IpAddr>,
    ) -> impl Future<Output = Result<Coordinates, GeoError>> + Send;
}
