//! One-shot device location for the map screens.
//!
//! A request runs once per screen, bounded by a timeout. A position fixed
//! recently enough is reused instead of asking the device again. Failure is
//! never fatal: the state carries an error message and no coordinates, and
//! map feeds go unfiltered.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::LocationError;
use crate::geo::LatLng;
use crate::types::Config;

/// What the map screens know about the device position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationState {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub loading: bool,
    pub error: Option<String>,
}

impl GeolocationState {
    /// Initial state while a request is in flight.
    pub fn loading() -> Self {
        Self {
            lat: None,
            lng: None,
            loading: true,
            error: None,
        }
    }

    pub fn located(position: LatLng) -> Self {
        Self {
            lat: Some(position.lat),
            lng: Some(position.lng),
            loading: false,
            error: None,
        }
    }

    pub fn failed(error: &LocationError) -> Self {
        Self {
            lat: None,
            lng: None,
            loading: false,
            error: Some(error.to_string()),
        }
    }

    /// Center for radius filtering. `None` unless both coordinates are known.
    pub fn center(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<LatLng, LocationError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub LatLng);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Ok(self.0)
    }
}

/// A device without location services.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Provider for the configured demo position, if any.
pub fn provider_from_config(config: &Config) -> Arc<dyn LocationProvider> {
    match config.fixed_location {
        Some(position) => Arc::new(FixedLocation(position)),
        None => Arc::new(NoLocation),
    }
}

/// Wraps a provider with a timeout and a max-age position cache.
pub struct Locator {
    provider: Arc<dyn LocationProvider>,
    timeout: Duration,
    max_age: Duration,
    last_fix: Mutex<Option<(Instant, LatLng)>>,
}

impl Locator {
    pub fn new(provider: Arc<dyn LocationProvider>, timeout: Duration, max_age: Duration) -> Self {
        Self {
            provider,
            timeout,
            max_age,
            last_fix: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            provider_from_config(config),
            Duration::from_secs(config.geolocation_timeout_secs),
            Duration::from_secs(config.geolocation_max_age_secs),
        )
    }

    fn cached(&self) -> Option<LatLng> {
        let last_fix = *self.last_fix.lock();
        last_fix
            .filter(|(at, _)| at.elapsed() <= self.max_age)
            .map(|(_, position)| position)
    }

    /// Resolve the position once. No retry on failure.
    pub async fn locate(&self) -> GeolocationState {
        if let Some(position) = self.cached() {
            return GeolocationState::located(position);
        }
        let result = match tokio::time::timeout(self.timeout, self.provider.current_position()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout(self.timeout.as_secs())),
        };
        match result {
            Ok(position) => {
                *self.last_fix.lock() = Some((Instant::now(), position));
                GeolocationState::located(position)
            }
            Err(e) => {
                log::warn!("Geolocation unavailable: {}", e);
                GeolocationState::failed(&e)
            }
        }
    }
}
