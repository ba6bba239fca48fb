//! Best-effort coordinate hint.
//!
//! The lookup starts when the wizard is created and runs in the background.
//! Submission reads whatever has arrived by then and never waits.

use std::sync::{Arc, OnceLock};

use matcha_core::geo::{Coordinates, GeoError, GeoLocator};
use matcha_remote::IpGeoClient;

use crate::config::WizardConfig;

/// A slot filled at most once by a background lookup.
#[derive(Debug, Clone, Default)]
pub struct GeoHint {
    slot: Arc<OnceLock<Coordinates>>,
}

impl GeoHint {
    /// A hint that never resolves.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A hint that is already resolved.
    pub fn resolved(coordinates: Coordinates) -> Self {
        let hint = Self::default();
        let _ = hint.slot.set(coordinates);
        hint
    }

    /// Start a lookup of the caller's own address on the current runtime.
    ///
    /// Failures are logged and leave the hint empty.
    pub fn spawn<L>(locator: L) -> Self
    where
        L: GeoLocator + 'static,
    {
        let hint = Self::default();
        let slot = Arc::clone(&hint.slot);
        tokio::spawn(async move {
            match locator.locate(None).await {
                Ok(coordinates) => {
                    let _ = slot.set(coordinates);
                }
                Err(e) => tracing::debug!(error = %e, "Coordinate lookup failed"),
            }
        });
        hint
    }

    /// Start a lookup against the configured geolocation endpoint.
    pub fn from_config(config: &WizardConfig) -> Result<Self, GeoError> {
        let client = IpGeoClient::new(config.geolocation_url.clone())?;
        Ok(Self::spawn(client))
    }

    /// The coordinates, if the lookup has finished successfully.
    pub fn get(&self) -> Option<Coordinates> {
        self.slot.get().copied()
    }
}
