use serde::{Deserialize, Serialize};
use skypointcore::interface::AircraftSample;

/// Query string for `GET /aircraft`.
#[derive(Debug, Clone, Deserialize)]
pub struct AircraftQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftResponse {
    pub provider: String,
    pub count: usize,
    pub aircraft: Vec<AircraftSample>,
}

/// Body for `POST /match`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub heading: Option<f64>,
    pub tilt: Option<f64>,
    #[serde(default)]
    pub aircraft: Vec<AircraftSample>,
    pub heading_tolerance: Option<f64>,
    pub elevation_tolerance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matched: Option<AircraftSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
