//! Pluggable distance providers: trait abstraction for routing backends.
//!
//! Two implementations:
//!
//! - **`GeometricEstimator`**: Haversine distance times a road-network correction
//!   factor. No I/O and never fails; this is the guaranteed fallback.
//! - **`MapServiceClient`** (feature `map-service`): Calls a Google-Maps-compatible
//!   Directions endpoint for road distance, duration and polyline.
//!
//! Any provider can be wrapped in a [`CachedDistanceProvider`]. The fallback
//! ordering itself lives in [`crate::orchestrator`].

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{haversine_km, Coordinate};

mod error;

pub use error::{FailureClass, MapServiceError};

#[cfg(feature = "map-service")]
pub mod map_service;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Which provider produced a distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    MapService,
    Geometric,
}

impl DistanceMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MapService => "map_service",
            Self::Geometric => "geometric",
        }
    }
}

/// A latitude/longitude pair as reported by the routing provider.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

/// One turn-by-turn instruction, in the provider's display units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub distance: String,
    pub duration: String,
    pub instruction: String,
}

/// Detailed route from the mapping provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDetails {
    pub distance_m: u64,
    pub distance_text: String,
    pub duration_secs: u64,
    pub duration_text: String,
    /// Encoded polyline of the whole route.
    pub polyline: Option<String>,
    pub bounds: Option<RouteBounds>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    pub steps: Vec<RouteStep>,
}

impl RouteDetails {
    pub fn distance_km(&self) -> f64 {
        self.distance_m as f64 / 1000.0
    }
}

/// Distance and duration only (Distance Matrix variant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_m: u64,
    pub distance_text: String,
    pub duration_secs: u64,
    pub duration_text: String,
}

/// Distance between two points and how it was obtained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    pub kilometers: f64,
    pub duration_secs: Option<u64>,
    pub method: DistanceMethod,
    /// Raw route metadata, only present for map-service results.
    pub route: Option<RouteDetails>,
}

impl DistanceResult {
    pub fn polyline(&self) -> Option<&str> {
        self.route.as_ref().and_then(|route| route.polyline.as_deref())
    }
}

/// Trait for distance backends. Implementations must be `Send + Sync` so a
/// single orchestrator can serve concurrent requests.
pub trait DistanceProvider: Send + Sync {
    /// Distance from `origin` to `destination`.
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DistanceResult, MapServiceError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "provider"
    }
}

// ---------------------------------------------------------------------------
// Geometric estimator (always available)
// ---------------------------------------------------------------------------

/// Straight-line distance underestimates road travel by roughly this factor.
pub const ROAD_NETWORK_FACTOR: f64 = 1.4;

/// Free-flow speed used to estimate durations without a routing provider.
pub const DEFAULT_CITY_SPEED_KMH: f64 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometricConfig {
    pub road_factor: f64,
    pub average_speed_kmh: f64,
}

impl Default for GeometricConfig {
    fn default() -> Self {
        Self {
            road_factor: ROAD_NETWORK_FACTOR,
            average_speed_kmh: DEFAULT_CITY_SPEED_KMH,
        }
    }
}

/// Haversine distance scaled by a road-network correction factor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometricEstimator {
    config: GeometricConfig,
}

impl GeometricEstimator {
    pub fn new(config: GeometricConfig) -> Self {
        Self { config }
    }

    /// Estimated road distance in kilometres.
    pub fn estimate(&self, origin: Coordinate, destination: Coordinate) -> f64 {
        haversine_km(origin, destination) * self.config.road_factor
    }

    /// Estimated free-flow duration for `distance_km`.
    pub fn estimate_duration_secs(&self, distance_km: f64) -> u64 {
        if distance_km > 0.0 && self.config.average_speed_kmh > 0.0 {
            ((distance_km / self.config.average_speed_kmh) * 3600.0).round() as u64
        } else {
            0
        }
    }

    /// Full [`DistanceResult`] without going through the fallible trait.
    pub fn distance(&self, origin: Coordinate, destination: Coordinate) -> DistanceResult {
        let kilometers = self.estimate(origin, destination);
        DistanceResult {
            kilometers,
            duration_secs: Some(self.estimate_duration_secs(kilometers)),
            method: DistanceMethod::Geometric,
            route: None,
        }
    }
}

impl DistanceProvider for GeometricEstimator {
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DistanceResult, MapServiceError> {
        Ok(self.distance(origin, destination))
    }

    fn name(&self) -> &'static str {
        "geometric"
    }
}

// ---------------------------------------------------------------------------
// Map service configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_MAP_SERVICE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_MAP_TIMEOUT_MS: u64 = 5_000;

/// Retries against the provider are capped at this many.
pub const MAX_MAP_RETRIES: u32 = 1;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapServiceConfig {
    /// When false the orchestrator never calls the provider.
    pub enabled: bool,
    pub base_url: String,
    /// Server-side API key. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    /// Retries on transient failures; values above [`MAX_MAP_RETRIES`] are clamped.
    pub max_retries: u32,
}

impl Default for MapServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_MAP_SERVICE_URL.to_string(),
            api_key: None,
            timeout_ms: DEFAULT_MAP_TIMEOUT_MS,
            max_retries: MAX_MAP_RETRIES,
        }
    }
}

impl std::fmt::Debug for MapServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapServiceConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

pub const DEFAULT_ROUTE_CACHE_CAPACITY: usize = 1_024;
pub const DEFAULT_ROUTE_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_COORDINATE_DECIMALS: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteCacheConfig {
    pub enabled: bool,
    pub capacity: usize,
    /// Entries older than this are never served.
    pub ttl_secs: u64,
    /// Coordinates are rounded to this many decimal places to form the key.
    pub coordinate_decimals: u32,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
            ttl_secs: DEFAULT_ROUTE_CACHE_TTL_SECS,
            coordinate_decimals: DEFAULT_CACHE_COORDINATE_DECIMALS,
        }
    }
}

type CacheKey = ((i64, i64), (i64, i64));

/// LRU-cached wrapper around any [`DistanceProvider`].
///
/// Cache key is the directional pair of rounded coordinates. Only successful
/// results are stored; failures always reach the inner provider again.
pub struct CachedDistanceProvider {
    inner: Box<dyn DistanceProvider>,
    cache: Mutex<LruCache<CacheKey, (Instant, DistanceResult)>>,
    ttl: Duration,
    coordinate_decimals: u32,
}

impl CachedDistanceProvider {
    pub fn new(inner: Box<dyn DistanceProvider>, config: &RouteCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            ttl: Duration::from_secs(config.ttl_secs),
            coordinate_decimals: config.coordinate_decimals,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DistanceProvider for CachedDistanceProvider {
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DistanceResult, MapServiceError> {
        let key = (
            origin.rounded_key(self.coordinate_decimals),
            destination.rounded_key(self.coordinate_decimals),
        );

        // Fast path: fresh cache hit
        if let Ok(mut cache) = self.cache.lock() {
            let mut expired = false;
            if let Some((stored_at, cached)) = cache.get(&key) {
                if stored_at.elapsed() < self.ttl {
                    debug!(provider = self.inner.name(), "route cache hit");
                    return Ok(cached.clone());
                }
                expired = true;
            }
            if expired {
                cache.pop(&key);
            }
        }

        let result = self.inner.measure(origin, destination)?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, (Instant::now(), result.clone()));
        }
        Ok(result)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

// ---------------------------------------------------------------------------
// Factory: build the map-service provider from configuration
// ---------------------------------------------------------------------------

/// Construct the map-service provider, wrapped in a cache when enabled.
///
/// Fails with a configuration-class [`MapServiceError`] when the provider is
/// disabled, has no API key, or the crate was built without `map-service`.
pub fn build_map_service_provider(
    config: &MapServiceConfig,
    cache: &RouteCacheConfig,
) -> Result<Box<dyn DistanceProvider>, MapServiceError> {
    if !config.enabled {
        return Err(MapServiceError::NotConfigured(
            "map service disabled in configuration",
        ));
    }

    #[cfg(feature = "map-service")]
    {
        let client: Box<dyn DistanceProvider> =
            Box::new(map_service::MapServiceClient::from_config(config)?);
        if cache.enabled {
            Ok(Box::new(CachedDistanceProvider::new(client, cache)))
        } else {
            Ok(client)
        }
    }

    #[cfg(not(feature = "map-service"))]
    {
        let _ = cache;
        Err(MapServiceError::NotConfigured(
            "built without map-service support",
        ))
    }
}
