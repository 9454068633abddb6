use std::time::Duration;

use fare_core::routing::MapServiceConfig;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-key";
pub const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";

/// Mock map provider for the blocking client.
///
/// The server runs on its own thread, so requests issued from the test thread
/// (outside the runtime) are served normally.
pub struct MockMaps {
    runtime: Runtime,
    server: MockServer,
}

impl MockMaps {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client config pointing at this server, one retry, short timeout.
    pub fn config(&self) -> MapServiceConfig {
        MapServiceConfig {
            enabled: true,
            base_url: self.uri(),
            api_key: Some(TEST_API_KEY.to_string()),
            timeout_ms: 2_000,
            max_retries: 1,
        }
    }

    pub fn respond(&self, endpoint: &str, template: ResponseTemplate) {
        let mock = Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(template);
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn respond_json(&self, endpoint: &str, body: Value) {
        self.respond(endpoint, ResponseTemplate::new(200).set_body_json(body));
    }

    pub fn respond_delayed(&self, endpoint: &str, body: Value, delay: Duration) {
        self.respond(
            endpoint,
            ResponseTemplate::new(200).set_body_json(body).set_delay(delay),
        );
    }

    pub fn request_count(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Directions payload for a single-leg route of `meters` / `seconds`.
pub fn directions_ok(meters: u64, seconds: u64) -> Value {
    json!({
        "status": "OK",
        "routes": [{
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
            "bounds": {
                "northeast": { "lat": 11.3012, "lng": 125.0823 },
                "southwest": { "lat": 11.28026, "lng": 125.06909 }
            },
            "legs": [{
                "distance": { "text": format!("{:.1} km", meters as f64 / 1000.0), "value": meters },
                "duration": { "text": format!("{} mins", seconds / 60), "value": seconds },
                "start_address": "Poblacion, Basey, Samar",
                "end_address": "Bacubac, Basey, Samar",
                "steps": [{
                    "distance": { "text": "0.3 km", "value": 300 },
                    "duration": { "text": "1 min", "value": 45 },
                    "html_instructions": "Head <b>north-east</b>"
                }]
            }]
        }]
    })
}

pub fn status_only(status: &str, message: &str) -> Value {
    json!({ "status": status, "error_message": message, "routes": [] })
}

pub fn matrix_ok(meters: u64, seconds: u64) -> Value {
    json!({
        "status": "OK",
        "rows": [{ "elements": [{
            "status": "OK",
            "distance": { "text": format!("{:.1} km", meters as f64 / 1000.0), "value": meters },
            "duration": { "text": format!("{} mins", seconds / 60), "value": seconds }
        }]}]
    })
}

pub fn matrix_element_status(status: &str) -> Value {
    json!({ "status": "OK", "rows": [{ "elements": [{ "status": status }] }] })
}
