use super::{
    http_client, trim_base_url, AircraftProvider, AreaQuery, ProviderError, ProviderResult,
};
use async_trait::async_trait;
use serde_json::Value;
use skypointcore::interface::{normalize_callsign, normalize_id, RawAircraft};
use std::time::Duration;

// column positions in an OpenSky state vector
const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const ON_GROUND: usize = 8;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;
const VERTICAL_RATE: usize = 11;
const GEO_ALTITUDE: usize = 13;
const SQUAWK: usize = 14;

/// OpenSky Network `states/all` bounding-box query. All units are already SI.
pub struct OpenSkyProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenSkyProvider {
    pub fn new(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
        })
    }
}

#[async_trait]
impl AircraftProvider for OpenSkyProvider {
    fn name(&self) -> &str {
        "opensky"
    }

    async fn fetch(&self, query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
        let mut aircraft = Vec::new();
        for (lamin, lomin, lamax, lomax) in query.bounding_boxes() {
            let body: Value = self
                .client
                .get(format!("{}/states/all", self.base_url))
                .query(&[
                    ("lamin", lamin),
                    ("lomin", lomin),
                    ("lamax", lamax),
                    ("lomax", lomax),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            aircraft.extend(decode_states(&body)?);
        }
        Ok(aircraft)
    }
}

fn text(row: &[Value], index: usize) -> Option<&str> {
    row.get(index).and_then(Value::as_str)
}

fn number(row: &[Value], index: usize) -> Option<f64> {
    row.get(index).and_then(Value::as_f64)
}

/// Decodes an OpenSky response. A `null` state list means no aircraft in the box.
pub fn decode_states(body: &Value) -> ProviderResult<Vec<RawAircraft>> {
    let states = match body.get("states") {
        None => return Err(ProviderError::Decode("missing states field".into())),
        Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(states)) => states,
        Some(other) => {
            return Err(ProviderError::Decode(format!(
                "states is not an array: {other}"
            )))
        }
    };

    let aircraft = states
        .iter()
        .filter_map(Value::as_array)
        .filter_map(|row| {
            let id = text(row, ICAO24)?;
            Some(RawAircraft {
                id: normalize_id(id),
                callsign: text(row, CALLSIGN).and_then(normalize_callsign),
                latitude: number(row, LATITUDE),
                longitude: number(row, LONGITUDE),
                altitude_m: number(row, GEO_ALTITUDE).or_else(|| number(row, BARO_ALTITUDE)),
                on_ground: row.get(ON_GROUND).and_then(Value::as_bool).unwrap_or(false),
                velocity_mps: number(row, VELOCITY),
                heading_deg: number(row, TRUE_TRACK),
                vertical_rate_mps: number(row, VERTICAL_RATE),
                squawk: text(row, SQUAWK).map(str::to_string),
                origin_country: text(row, ORIGIN_COUNTRY).map(str::to_string),
                ..Default::default()
            })
        })
        .collect();
    Ok(aircraft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_state_vectors() {
        let body = json!({
            "time": 1_700_000_000,
            "states": [
                ["4CA7B4", "RYR12AB ", "Ireland", 1_700_000_000, 1_700_000_000,
                 -0.2, 51.6, 3500.0, false, 180.5, 92.0, -4.5, null, 3550.0, "2301", false, 0],
                ["406a1b", "", "United Kingdom", null, 1_700_000_000,
                 null, null, null, true, 0.0, null, null, null, null, null, false, 0],
                "garbage"
            ]
        });

        let aircraft = decode_states(&body).unwrap();
        assert_eq!(aircraft.len(), 2);

        let first = &aircraft[0];
        assert_eq!(first.id, "4ca7b4");
        assert_eq!(first.callsign.as_deref(), Some("RYR12AB"));
        assert_eq!(first.position(), Some((51.6, -0.2)));
        assert_eq!(first.altitude_m, Some(3550.0));
        assert_eq!(first.heading_deg, Some(92.0));
        assert_eq!(first.vertical_rate_mps, Some(-4.5));
        assert_eq!(first.squawk.as_deref(), Some("2301"));
        assert!(!first.on_ground);

        let second = &aircraft[1];
        assert_eq!(second.callsign, None);
        assert_eq!(second.position(), None);
        assert!(second.on_ground);
    }

    #[test]
    fn falls_back_to_barometric_altitude() {
        let body = json!({
            "states": [["abcdef", "TEST1", "X", null, null, 1.0, 2.0, 1200.0, false,
                        null, null, null, null, null, null, false, 0]]
        });
        let aircraft = decode_states(&body).unwrap();
        assert_eq!(aircraft[0].altitude_m, Some(1200.0));
    }

    #[test]
    fn null_states_means_empty_sky() {
        assert!(decode_states(&json!({"time": 1, "states": null})).unwrap().is_empty());
        assert!(decode_states(&json!({"time": 1})).is_err());
        assert!(decode_states(&json!({"states": 5})).is_err());
    }
}
