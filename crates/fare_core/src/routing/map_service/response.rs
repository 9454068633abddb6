//! Wire structures for the provider's JSON responses.

#[derive(serde::Deserialize)]
pub(super) struct TextValue {
    #[serde(default)]
    pub(super) text: String,
    pub(super) value: u64,
}

#[derive(serde::Deserialize)]
pub(super) struct ApiLatLng {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

#[derive(serde::Deserialize)]
pub(super) struct ApiBounds {
    pub(super) northeast: ApiLatLng,
    pub(super) southwest: ApiLatLng,
}

#[derive(serde::Deserialize)]
pub(super) struct EncodedPolyline {
    pub(super) points: String,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsResponse {
    pub(super) status: String,
    pub(super) error_message: Option<String>,
    #[serde(default)]
    pub(super) routes: Vec<DirectionsRoute>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsRoute {
    pub(super) overview_polyline: Option<EncodedPolyline>,
    pub(super) bounds: Option<ApiBounds>,
    #[serde(default)]
    pub(super) legs: Vec<DirectionsLeg>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsLeg {
    pub(super) distance: TextValue,
    pub(super) duration: TextValue,
    pub(super) start_address: Option<String>,
    pub(super) end_address: Option<String>,
    #[serde(default)]
    pub(super) steps: Vec<DirectionsStep>,
}

#[derive(serde::Deserialize)]
pub(super) struct DirectionsStep {
    pub(super) distance: TextValue,
    pub(super) duration: TextValue,
    #[serde(default)]
    pub(super) html_instructions: String,
}

#[derive(serde::Deserialize)]
pub(super) struct DistanceMatrixResponse {
    pub(super) status: String,
    pub(super) error_message: Option<String>,
    #[serde(default)]
    pub(super) rows: Vec<MatrixRow>,
}

#[derive(serde::Deserialize)]
pub(super) struct MatrixRow {
    #[serde(default)]
    pub(super) elements: Vec<MatrixElement>,
}

#[derive(serde::Deserialize)]
pub(super) struct MatrixElement {
    pub(super) status: String,
    pub(super) distance: Option<TextValue>,
    pub(super) duration: Option<TextValue>,
}
