//! Service configuration: one JSON document plus environment overrides for
//! secrets.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discount::DiscountConfig;
use crate::pricing::TariffConfig;
use crate::routing::{GeometricConfig, MapServiceConfig, RouteCacheConfig};

/// Preferred environment variable for the server-side map key.
pub const MAP_API_KEY_ENV: &str = "GOOGLE_MAPS_SERVER_API_KEY";
/// Consulted when [`MAP_API_KEY_ENV`] is unset or blank.
pub const MAP_API_KEY_FALLBACK_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareGuideConfig {
    pub tariff: TariffConfig,
    pub discounts: DiscountConfig,
    pub geometric: GeometricConfig,
    pub map_service: MapServiceConfig,
    pub cache: RouteCacheConfig,
}

impl FareGuideConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Reject values that would make every quote of some class fail or the
    /// geometric fallback produce an invalid distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tariff = &self.tariff;
        for (name, value) in [
            ("tariff.base_fare", tariff.base_fare),
            ("tariff.base_distance_km", tariff.base_distance_km),
            ("tariff.additional_rate_per_km", tariff.additional_rate_per_km),
        ] {
            if value < Decimal::ZERO {
                return Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")));
            }
        }

        let rate = self.discounts.statutory_rate;
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "discounts.statutory_rate must be within [0, 1], got {rate}"
            )));
        }

        let geometric = &self.geometric;
        if !geometric.road_factor.is_finite() || geometric.road_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "geometric.road_factor must be finite and positive, got {}",
                geometric.road_factor
            )));
        }
        if !geometric.average_speed_kmh.is_finite() || geometric.average_speed_kmh < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "geometric.average_speed_kmh must be finite and non-negative, got {}",
                geometric.average_speed_kmh
            )));
        }
        Ok(())
    }

    /// Fill the map API key from `lookup` unless the file already set one.
    pub fn with_api_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let has_key = self
            .map_service
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if !has_key {
            let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
            self.map_service.api_key =
                non_blank(MAP_API_KEY_ENV).or_else(|| non_blank(MAP_API_KEY_FALLBACK_ENV));
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_from(|name| std::env::var(name).ok())
    }
}
