//! Aircraft and route data backends.
//!
//! Every backend reduces its payload to [`RawAircraft`] so the core never sees which
//! provider answered.

pub mod chain;
pub mod opensky;
pub mod readsb;
pub mod route;
pub mod simulated;

use async_trait::async_trait;
use skypointcore::interface::RawAircraft;
use std::time::Duration;

pub use chain::ProviderChain;
pub use opensky::OpenSkyProvider;
pub use readsb::ReadsbProvider;
pub use route::{AdsbdbRouteProvider, RouteResolver};

pub const FEET_TO_METERS: f64 = 0.3048;
pub const KNOTS_TO_MPS: f64 = 0.514444;
pub const FPM_TO_MPS: f64 = 0.00508;
pub const KM_PER_NM: f64 = 1.852;
const KM_PER_DEGREE_LAT: f64 = 111.32;

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{provider} timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },
    #[error("all providers failed: {0}")]
    Exhausted(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Circular search area around an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl AreaQuery {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    /// `(lamin, lomin, lamax, lomax)` boxes enclosing the search circle.
    ///
    /// A circle crossing the antimeridian yields two boxes, one on each side of ±180°.
    /// A circle reaching a pole spans every longitude.
    pub fn bounding_boxes(&self) -> Vec<(f64, f64, f64, f64)> {
        let lat_delta = self.radius_km / KM_PER_DEGREE_LAT;
        let lamin = (self.latitude - lat_delta).max(-90.0);
        let lamax = (self.latitude + lat_delta).min(90.0);
        let lon_scale = self.latitude.to_radians().cos().abs();
        let lon_delta = self.radius_km / (KM_PER_DEGREE_LAT * lon_scale.max(1e-9));

        if lamin <= -90.0 || lamax >= 90.0 || lon_delta >= 180.0 {
            return vec![(lamin, -180.0, lamax, 180.0)];
        }
        let lomin = self.longitude - lon_delta;
        let lomax = self.longitude + lon_delta;
        if lomin < -180.0 {
            vec![
                (lamin, lomin + 360.0, lamax, 180.0),
                (lamin, -180.0, lamax, lomax),
            ]
        } else if lomax > 180.0 {
            vec![
                (lamin, lomin, lamax, 180.0),
                (lamin, -180.0, lamax, lomax - 360.0),
            ]
        } else {
            vec![(lamin, lomin, lamax, lomax)]
        }
    }

    pub fn radius_nm(&self) -> f64 {
        self.radius_km / KM_PER_NM
    }
}

#[async_trait]
pub trait AircraftProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>>;
}

/// Shared `reqwest` client with a fixed request timeout.
pub fn http_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("skypoint/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_encloses_radius() {
        let query = AreaQuery::new(51.5, -0.12, 50.0);
        let boxes = query.bounding_boxes();
        assert_eq!(boxes.len(), 1);
        let (lamin, lomin, lamax, lomax) = boxes[0];
        assert!((lamax - lamin - 2.0 * 50.0 / 111.32).abs() < 1e-9);
        assert!(lomax - lomin > lamax - lamin);
        assert!(lamin < 51.5 && 51.5 < lamax);
        assert!(lomin < -0.12 && -0.12 < lomax);
    }

    #[test]
    fn bounding_box_spans_all_longitudes_at_pole() {
        let query = AreaQuery::new(89.9, 10.0, 100.0);
        let boxes = query.bounding_boxes();
        assert_eq!(boxes.len(), 1);
        let (lamin, lomin, lamax, lomax) = boxes[0];
        assert_eq!(lamax, 90.0);
        assert!(lamin < 89.9);
        assert_eq!((lomin, lomax), (-180.0, 180.0));
    }

    #[test]
    fn bounding_box_splits_at_antimeridian() {
        let query = AreaQuery::new(0.0, 179.8, 50.0);
        let boxes = query.bounding_boxes();
        assert_eq!(boxes.len(), 2);
        let (_, east_min, _, east_max) = boxes[0];
        let (_, west_min, _, west_max) = boxes[1];
        assert!(east_min < 179.8 && east_max == 180.0);
        assert!(west_min == -180.0 && west_max > -179.9);

        let west = AreaQuery::new(0.0, -179.8, 50.0).bounding_boxes();
        assert_eq!(west.len(), 2);
        assert_eq!(west[0].3, 180.0);
        assert!(west[0].1 < 179.9);
        assert!(west[1].1 == -180.0 && west[1].3 > -179.8);
    }

    #[test]
    fn radius_converts_to_nautical_miles() {
        assert!((AreaQuery::new(0.0, 0.0, 18.52).radius_nm() - 10.0).abs() < 1e-9);
    }
}
