use serde::{Deserialize, Serialize};

/// Provider-neutral aircraft record, before any geometry is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawAircraft {
    /// ICAO 24-bit address as lowercase hex.
    pub id: String,
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_m: Option<f64>,
    pub on_ground: bool,
    pub velocity_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub vertical_rate_mps: Option<f64>,
    pub registration: Option<String>,
    pub aircraft_type: Option<String>,
    pub operator: Option<String>,
    pub squawk: Option<String>,
    pub origin_country: Option<String>,
}

impl RawAircraft {
    pub fn new(id: &str, latitude: f64, longitude: f64, altitude_m: f64) -> Self {
        Self {
            id: normalize_id(id),
            latitude: Some(latitude),
            longitude: Some(longitude),
            altitude_m: Some(altitude_m),
            ..Default::default()
        }
    }

    pub fn with_callsign(mut self, callsign: &str) -> Self {
        self.callsign = normalize_callsign(callsign);
        self
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Aircraft as seen from the observer, with bearing, distance and elevation attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftSample {
    pub id: String,
    pub callsign: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub bearing_deg: f64,
    pub elevation_deg: f64,
    pub distance_km: f64,
    pub altitude_m: f64,
    pub velocity_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub vertical_rate_mps: Option<f64>,
    pub on_ground: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squawk: Option<String>,
}

impl AircraftSample {
    /// Minimal sample carrying only the pointing geometry.
    pub fn new(id: &str, bearing_deg: f64, elevation_deg: f64, distance_km: f64) -> Self {
        Self {
            id: id.to_string(),
            callsign: None,
            latitude: 0.0,
            longitude: 0.0,
            bearing_deg,
            elevation_deg,
            distance_km,
            altitude_m: 0.0,
            velocity_mps: None,
            heading_deg: None,
            vertical_rate_mps: None,
            on_ground: false,
            registration: None,
            aircraft_type: None,
            operator: None,
            squawk: None,
        }
    }

    pub fn label(&self) -> &str {
        self.callsign.as_deref().unwrap_or(&self.id)
    }
}

pub fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

pub fn normalize_callsign(callsign: &str) -> Option<String> {
    let trimmed = callsign.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_uppercase())
    }
}
