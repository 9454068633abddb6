use reqwest::{blocking::Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::parser::{parse_directions_response, parse_distance_matrix_response};
use super::response::{DirectionsResponse, DistanceMatrixResponse};
use crate::geo::Coordinate;
use crate::routing::{
    DistanceMethod, DistanceProvider, DistanceResult, MapServiceConfig, MapServiceError,
    RouteDetails, RouteSummary, MAX_MAP_RETRIES,
};

const DIRECTIONS_PATH: &str = "maps/api/directions/json";
const DISTANCE_MATRIX_PATH: &str = "maps/api/distancematrix/json";

/// Error bodies kept in [`MapServiceError::HttpStatus`] are cut to this size.
pub(super) const MAX_ERROR_BODY_BYTES: usize = 256;

/// Thin HTTP client for driving-mode routes.
#[derive(Clone)]
pub struct MapServiceClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
}

impl std::fmt::Debug for MapServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl MapServiceClient {
    /// Build a client; fails without an API key or with an unparsable base URL.
    pub fn from_config(config: &MapServiceConfig) -> Result<Self, MapServiceError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(MapServiceError::NotConfigured("missing API key"))?
            .to_string();

        // A trailing slash makes `Url::join` append rather than replace the last segment.
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|err| MapServiceError::InvalidUrl(format!("{}: {err}", config.base_url)))?;

        let timeout = Duration::from_millis(config.timeout_ms.max(1));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MapServiceError::Transport(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            timeout,
            max_retries: config.max_retries.min(MAX_MAP_RETRIES),
        })
    }

    /// Detailed driving route with polyline, bounds and steps.
    pub fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteDetails, MapServiceError> {
        if origin == destination {
            debug!("origin and destination are identical; returning zero route");
            return Ok(RouteDetails {
                distance_m: 0,
                distance_text: "0 m".to_string(),
                duration_secs: 0,
                duration_text: "0 mins".to_string(),
                polyline: None,
                bounds: None,
                start_address: None,
                end_address: None,
                steps: Vec::new(),
            });
        }

        let url = self.endpoint(
            DIRECTIONS_PATH,
            &[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", "driving".to_string()),
                ("departure_time", "now".to_string()),
            ],
        )?;
        let parsed: DirectionsResponse = self.get_json(url)?;
        parse_directions_response(parsed)
    }

    /// Driving distance and duration only.
    ///
    /// Standalone lookup for callers that need no route geometry; the
    /// [`DistanceProvider`] impl always uses [`route`](Self::route).
    pub fn distance_matrix(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteSummary, MapServiceError> {
        let url = self.endpoint(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", origin.to_string()),
                ("destinations", destination.to_string()),
                ("mode", "driving".to_string()),
                ("units", "metric".to_string()),
                ("departure_time", "now".to_string()),
            ],
        )?;
        let parsed: DistanceMatrixResponse = self.get_json(url)?;
        parse_distance_matrix_response(parsed)
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, MapServiceError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|err| MapServiceError::InvalidUrl(format!("failed to build URL: {err}")))?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// GET with at most `max_retries` retries, only on transient failures.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, MapServiceError> {
        let mut attempt = 0;
        loop {
            match self.fetch(url.clone()) {
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %err, "map service request failed; retrying");
                }
                outcome => return outcome,
            }
        }
    }

    fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, MapServiceError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MapServiceError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(body, MAX_ERROR_BODY_BYTES),
            });
        }

        response.json::<T>().map_err(|err| {
            if err.is_timeout() {
                self.timeout_error()
            } else {
                MapServiceError::Decode(err.without_url().to_string())
            }
        })
    }

    // The request URL carries the API key, so it is stripped from messages.
    fn transport_error(&self, err: reqwest::Error) -> MapServiceError {
        if err.is_timeout() {
            self.timeout_error()
        } else {
            MapServiceError::Transport(err.without_url().to_string())
        }
    }

    fn timeout_error(&self) -> MapServiceError {
        MapServiceError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }
}

/// Cut `body` to at most `max_bytes`, on a char boundary.
pub(super) fn truncate_body(mut body: String, max_bytes: usize) -> String {
    if body.len() > max_bytes {
        let mut end = max_bytes;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

impl DistanceProvider for MapServiceClient {
    fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<DistanceResult, MapServiceError> {
        let route = self.route(origin, destination)?;
        Ok(DistanceResult {
            kilometers: route.distance_km(),
            duration_secs: Some(route.duration_secs),
            method: DistanceMethod::MapService,
            route: Some(route),
        })
    }

    fn name(&self) -> &'static str {
        "map_service"
    }
}
