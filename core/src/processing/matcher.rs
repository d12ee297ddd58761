//! Pointing matcher: picks the aircraft closest to where the device is aimed.

use serde::{Deserialize, Serialize};

use crate::interface::AircraftSample;
use crate::math::geo::angle_diff;

pub const DEFAULT_HEADING_TOLERANCE_DEG: f64 = 30.0;
pub const DEFAULT_ELEVATION_TOLERANCE_DEG: f64 = 20.0;
/// Horizontal pointing is more accurate than tilt, so heading error costs more.
pub const DEFAULT_HEADING_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    pub heading_tolerance_deg: f64,
    pub elevation_tolerance_deg: f64,
    pub heading_weight: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            heading_tolerance_deg: DEFAULT_HEADING_TOLERANCE_DEG,
            elevation_tolerance_deg: DEFAULT_ELEVATION_TOLERANCE_DEG,
            heading_weight: DEFAULT_HEADING_WEIGHT,
        }
    }
}

/// Score for one aircraft, or `None` when it lies outside either tolerance.
pub fn score(
    heading_deg: f64,
    tilt_deg: f64,
    aircraft: &AircraftSample,
    config: &MatchConfig,
) -> Option<f64> {
    let heading_diff = angle_diff(heading_deg, aircraft.bearing_deg).abs();
    let elevation_diff = (tilt_deg - aircraft.elevation_deg).abs();

    // NaN fails both comparisons and is never eligible.
    if heading_diff < config.heading_tolerance_deg
        && elevation_diff < config.elevation_tolerance_deg
    {
        Some(heading_diff * config.heading_weight + elevation_diff)
    } else {
        None
    }
}

/// Best aircraft for the given pointing direction.
///
/// Lowest score wins; on a tie the earlier aircraft in `aircraft` is kept. Returns `None`
/// when heading or tilt is unset, the list is empty, or nothing is within tolerance.
pub fn match_aircraft<'a>(
    heading_deg: Option<f64>,
    tilt_deg: Option<f64>,
    aircraft: &'a [AircraftSample],
    config: &MatchConfig,
) -> Option<&'a AircraftSample> {
    let (heading, tilt) = (heading_deg?, tilt_deg?);

    let mut best: Option<(&AircraftSample, f64)> = None;
    for candidate in aircraft {
        if let Some(candidate_score) = score(heading, tilt, candidate, config) {
            match best {
                Some((_, best_score)) if candidate_score >= best_score => {}
                _ => best = Some((candidate, candidate_score)),
            }
        }
    }
    best.map(|(sample, _)| sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aircraft(id: &str, bearing: f64, elevation: f64) -> AircraftSample {
        AircraftSample::new(id, bearing, elevation, 10.0)
    }

    #[test]
    fn picks_lowest_weighted_score() {
        let list = vec![aircraft("B", 100.0, 10.0), aircraft("A", 95.0, 12.0)];
        let config = MatchConfig::default();
        let best = match_aircraft(Some(90.0), Some(10.0), &list, &config).unwrap();
        assert_eq!(best.id, "A");
        assert!((score(90.0, 10.0, &list[1], &config).unwrap() - 9.5).abs() < 1e-9);
        assert!((score(90.0, 10.0, &list[0], &config).unwrap() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn tolerances_are_strict() {
        let config = MatchConfig::default();
        let list = vec![
            aircraft("edge-heading", 120.0, 10.0),
            aircraft("edge-tilt", 90.0, 30.0),
        ];
        assert!(match_aircraft(Some(90.0), Some(10.0), &list, &config).is_none());
    }

    #[test]
    fn closest_aircraft_outside_tolerance_is_not_matched() {
        let config = MatchConfig::default();
        let mut near = aircraft("near", 200.0, 10.0);
        near.distance_km = 1.0;
        let list = vec![near, aircraft("steep", 92.0, 45.0)];
        assert!(match_aircraft(Some(90.0), Some(10.0), &list, &config).is_none());
    }

    #[test]
    fn heading_difference_wraps_around_north() {
        let config = MatchConfig::default();
        let list = vec![aircraft("north", 355.0, 10.0)];
        let best = match_aircraft(Some(5.0), Some(10.0), &list, &config);
        assert_eq!(best.map(|a| a.id.as_str()), Some("north"));
    }

    #[test]
    fn ties_keep_first_seen() {
        let config = MatchConfig::default();
        let list = vec![aircraft("first", 95.0, 10.0), aircraft("second", 85.0, 10.0)];
        let best = match_aircraft(Some(90.0), Some(10.0), &list, &config).unwrap();
        assert_eq!(best.id, "first");
    }

    #[test]
    fn unset_orientation_or_empty_list_yields_none() {
        let config = MatchConfig::default();
        let list = vec![aircraft("A", 90.0, 10.0)];
        assert!(match_aircraft(None, Some(10.0), &list, &config).is_none());
        assert!(match_aircraft(Some(90.0), None, &list, &config).is_none());
        assert!(match_aircraft(Some(90.0), Some(10.0), &[], &config).is_none());
    }

    #[test]
    fn nan_orientation_never_matches() {
        let config = MatchConfig::default();
        let list = vec![aircraft("A", 90.0, 10.0)];
        assert!(match_aircraft(Some(f64::NAN), Some(10.0), &list, &config).is_none());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let config = MatchConfig::default();
        let list = vec![aircraft("A", 95.0, 12.0), aircraft("B", 100.0, 10.0)];
        let first = match_aircraft(Some(90.0), Some(10.0), &list, &config).cloned();
        for _ in 0..5 {
            let again = match_aircraft(Some(90.0), Some(10.0), &list, &config).cloned();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn custom_tolerances_widen_the_cone() {
        let config = MatchConfig {
            heading_tolerance_deg: 45.0,
            ..Default::default()
        };
        let list = vec![aircraft("wide", 130.0, 10.0)];
        assert!(match_aircraft(Some(90.0), Some(10.0), &list, &config).is_some());
    }
}
