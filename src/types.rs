use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;

/// Configuration stored in ~/.danjicare/config.json
///
/// Every field has a default so a partial (or absent) file still yields a
/// usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding `danjicare.db`. Defaults to `~/.danjicare`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Apartment name stamped on requests submitted from the client portal.
    #[serde(default = "default_tenant_name")]
    pub tenant_name: String,
    #[serde(default = "default_horizon_days")]
    pub renewal_horizon_days: i64,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default = "default_geolocation_timeout_secs")]
    pub geolocation_timeout_secs: u64,
    /// Cached positions younger than this are reused instead of asking again.
    #[serde(default = "default_geolocation_max_age_secs")]
    pub geolocation_max_age_secs: u64,
    #[serde(default = "default_request_page_size")]
    pub request_page_size: usize,
    /// Position reported by the demo locator. `None` behaves like a device
    /// without location services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_location: Option<LatLng>,
}

fn default_tenant_name() -> String {
    "우리 단지".to_string()
}

fn default_horizon_days() -> i64 {
    crate::renewal::RENEWAL_HORIZON_DAYS
}

fn default_radius_km() -> f64 {
    crate::geo::RADIUS_KM
}

fn default_geolocation_timeout_secs() -> u64 {
    10
}

fn default_geolocation_max_age_secs() -> u64 {
    60
}

fn default_request_page_size() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            tenant_name: default_tenant_name(),
            renewal_horizon_days: default_horizon_days(),
            radius_km: default_radius_km(),
            geolocation_timeout_secs: default_geolocation_timeout_secs(),
            geolocation_max_age_secs: default_geolocation_max_age_secs(),
            request_page_size: default_request_page_size(),
            fixed_location: None,
        }
    }
}

impl Config {
    pub fn radius_meters(&self) -> f64 {
        self.radius_km * 1000.0
    }
}
