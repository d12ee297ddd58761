use super::{
    http_client, trim_base_url, AircraftProvider, AreaQuery, ProviderResult, FEET_TO_METERS,
    FPM_TO_MPS, KNOTS_TO_MPS,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use skypointcore::interface::{normalize_callsign, normalize_id, RawAircraft};
use std::time::Duration;

/// The v2 point API caps the query radius.
const MAX_RADIUS_NM: f64 = 250.0;

/// readsb-style `v2/point/{lat}/{lon}/{nm}` API, as served by adsb.lol and airplanes.live.
/// Reports feet, knots and ft/min.
pub struct ReadsbProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ReadsbProvider {
    pub fn new(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReadsbResponse {
    #[serde(default)]
    pub ac: Vec<ReadsbAircraft>,
}

#[derive(Debug, Deserialize)]
pub struct ReadsbAircraft {
    pub hex: String,
    pub flight: Option<String>,
    pub r: Option<String>,
    pub t: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Feet, or the string `"ground"`.
    pub alt_baro: Option<Value>,
    pub alt_geom: Option<f64>,
    pub gs: Option<f64>,
    pub track: Option<f64>,
    pub baro_rate: Option<f64>,
    pub geom_rate: Option<f64>,
    pub squawk: Option<String>,
    #[serde(rename = "ownOp")]
    pub own_op: Option<String>,
}

impl From<ReadsbAircraft> for RawAircraft {
    fn from(ac: ReadsbAircraft) -> Self {
        let on_ground = matches!(&ac.alt_baro, Some(Value::String(s)) if s == "ground");
        let altitude_ft = ac
            .alt_geom
            .or_else(|| ac.alt_baro.as_ref().and_then(Value::as_f64));

        RawAircraft {
            id: normalize_id(ac.hex.trim_start_matches('~')),
            callsign: ac.flight.as_deref().and_then(normalize_callsign),
            latitude: ac.lat,
            longitude: ac.lon,
            altitude_m: altitude_ft.map(|ft| ft * FEET_TO_METERS),
            on_ground,
            velocity_mps: ac.gs.map(|kt| kt * KNOTS_TO_MPS),
            heading_deg: ac.track,
            vertical_rate_mps: ac.baro_rate.or(ac.geom_rate).map(|fpm| fpm * FPM_TO_MPS),
            registration: ac.r,
            aircraft_type: ac.t,
            operator: ac.own_op,
            squawk: ac.squawk,
            origin_country: None,
        }
    }
}

pub fn decode_response(response: ReadsbResponse) -> Vec<RawAircraft> {
    response.ac.into_iter().map(RawAircraft::from).collect()
}

#[async_trait]
impl AircraftProvider for ReadsbProvider {
    fn name(&self) -> &str {
        "readsb"
    }

    async fn fetch(&self, query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
        let radius_nm = query.radius_nm().clamp(1.0, MAX_RADIUS_NM).ceil();
        let url = format!(
            "{}/v2/point/{:.4}/{:.4}/{}",
            self.base_url, query.latitude, query.longitude, radius_nm
        );
        let response: ReadsbResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(decode_response(response))
    }
}
