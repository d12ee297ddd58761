/// Mean Earth radius used by the spherical formulas, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed difference `to - from`, wrapped into `[-180, 180]`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Initial great-circle bearing from point 1 to point 2 in degrees `[0, 360)`, 0 = North.
pub fn calculate_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Great-circle distance in kilometers (haversine).
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Elevation angle above the horizon for a target `distance_km` away at `altitude_m`.
///
/// Flat-earth right triangle; no curvature or refraction correction.
/// `atan2` keeps the zero-distance case finite (90° for anything above the observer).
pub fn calculate_elevation(distance_km: f64, altitude_m: f64) -> f64 {
    altitude_m.atan2(distance_km * 1000.0).to_degrees()
}

/// Point reached by travelling `distance_km` from `(lat, lon)` along initial `bearing_deg`.
///
/// Returns `(lat, lon)` with longitude wrapped into `[-180, 180)`.
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_km: f64) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat_rad.sin() * delta.cos() + lat_rad.cos() * delta.sin() * theta.cos()).asin();
    let y = theta.sin() * delta.sin() * lat_rad.cos();
    let x = delta.cos() - lat_rad.sin() * lat2.sin();
    let lon2 = lon_rad + y.atan2(x);

    let lon2_deg = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    (lat2.to_degrees(), lon2_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: (f64, f64) = (51.5074, -0.1278);

    #[test]
    fn london_due_east_bearing_and_distance() {
        let bearing = calculate_bearing(LONDON.0, LONDON.1, 51.5074, 0.1278);
        let distance = calculate_distance(LONDON.0, LONDON.1, 51.5074, 0.1278);
        assert!((bearing - 90.0).abs() < 0.2, "bearing {bearing}");
        assert!((distance - 17.7).abs() < 0.15, "distance {distance}");
    }

    #[test]
    fn cardinal_bearings() {
        assert!(calculate_bearing(0.0, 0.0, 1.0, 0.0).abs() < 1e-9);
        assert!((calculate_bearing(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((calculate_bearing(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((calculate_bearing(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_and_distance_stay_in_range() {
        let points = [
            (0.0, 0.0),
            (89.9, 179.0),
            (-89.9, -179.0),
            (45.0, -120.0),
            (-33.9, 151.2),
            (35.7, 139.7),
        ];
        for &(lat1, lon1) in &points {
            for &(lat2, lon2) in &points {
                let bearing = calculate_bearing(lat1, lon1, lat2, lon2);
                let distance = calculate_distance(lat1, lon1, lat2, lon2);
                assert!((0.0..360.0).contains(&bearing), "bearing {bearing}");
                assert!(distance >= 0.0);
                let reverse = calculate_distance(lat2, lon2, lat1, lon1);
                assert!((distance - reverse).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(calculate_distance(LONDON.0, LONDON.1, LONDON.0, LONDON.1), 0.0);
        assert_eq!(calculate_distance(-45.0, 170.0, -45.0, 170.0), 0.0);
    }

    #[test]
    fn antimeridian_has_no_discontinuity() {
        let east = calculate_bearing(0.0, 0.0, 10.0, 180.0);
        let west = calculate_bearing(0.0, 0.0, 10.0, -180.0);
        assert!(angle_diff(east, west).abs() < 1e-6);

        assert!(calculate_distance(10.0, 180.0, 10.0, -180.0) < 1e-6);

        let crossing = calculate_distance(0.0, 179.9, 0.0, -179.9);
        assert!((crossing - 22.24).abs() < 0.05, "crossing {crossing}");
        let heading = calculate_bearing(0.0, 179.9, 0.0, -179.9);
        assert!((heading - 90.0).abs() < 1e-6);
    }

    #[test]
    fn elevation_extremes() {
        assert!((calculate_elevation(0.0, 1000.0) - 90.0).abs() < 1e-9);
        assert_eq!(calculate_elevation(100.0, 0.0), 0.0);
        assert!((calculate_elevation(1.0, 1000.0) - 45.0).abs() < 1e-9);
        assert!(calculate_elevation(80.0, 300.0) < 1.0);
    }

    #[test]
    fn nan_input_propagates() {
        assert!(calculate_bearing(f64::NAN, 0.0, 1.0, 1.0).is_nan());
        assert!(calculate_distance(0.0, f64::NAN, 1.0, 1.0).is_nan());
        assert!(calculate_elevation(f64::NAN, 1000.0).is_nan());
    }

    #[test]
    fn angle_helpers_wrap() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert!((angle_diff(359.0, 2.0) - 3.0).abs() < 1e-9);
        assert!((angle_diff(2.0, 359.0) + 3.0).abs() < 1e-9);
        assert!((angle_diff(90.0, 270.0).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn destination_point_round_trips_through_bearing() {
        let (lat, lon) = destination_point(LONDON.0, LONDON.1, 45.0, 30.0);
        let distance = calculate_distance(LONDON.0, LONDON.1, lat, lon);
        let bearing = calculate_bearing(LONDON.0, LONDON.1, lat, lon);
        assert!((distance - 30.0).abs() < 1e-6);
        assert!((bearing - 45.0).abs() < 1e-6);
    }
}
