use super::{AircraftProvider, AreaQuery, ProviderResult};
use async_trait::async_trait;
use log::warn;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use skypointcore::interface::RawAircraft;
use skypointcore::math::destination_point;

const CALLSIGN_PREFIXES: [&str; 6] = ["BAW", "DLH", "EZY", "RYR", "UAL", "KLM"];

/// Configuration for generating synthetic traffic around the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub count: usize,
    pub seed: u64,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    /// Share of aircraft generated on the ground.
    pub ground_fraction: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            count: 24,
            seed: 0,
            min_altitude_m: 300.0,
            max_altitude_m: 12_000.0,
            ground_fraction: 0.1,
        }
    }
}

/// Seeded synthetic traffic. The same seed and query always yield the same aircraft.
pub struct SimulatedProvider {
    config: SimulationConfig,
}

impl SimulatedProvider {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, query: &AreaQuery) -> Vec<RawAircraft> {
        if !query.radius_km.is_finite() {
            warn!("simulated traffic needs a finite radius, got {}", query.radius_km);
            return Vec::new();
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let radius_km = query.radius_km.max(1.0);
        let min_alt = self.config.min_altitude_m.max(0.0);
        let max_alt = self.config.max_altitude_m.max(min_alt + 1.0);

        (0..self.config.count)
            .map(|index| {
                let bearing = rng.gen_range(0.0..360.0);
                // keep everything inside the search circle
                let distance_km = rng.gen_range(0.5..radius_km * 0.95);
                let (lat, lon) =
                    destination_point(query.latitude, query.longitude, bearing, distance_km);
                let on_ground = rng.gen_bool(self.config.ground_fraction.clamp(0.0, 1.0));
                let altitude_m = if on_ground {
                    0.0
                } else {
                    rng.gen_range(min_alt..max_alt)
                };
                let prefix = CALLSIGN_PREFIXES[index % CALLSIGN_PREFIXES.len()];

                let id = format!("{:06x}", 0xf0_0000 + index);
                let callsign = format!("{}{}", prefix, rng.gen_range(10..9999));
                let mut raw = RawAircraft::new(&id, lat, lon, altitude_m).with_callsign(&callsign);
                raw.on_ground = on_ground;
                raw.velocity_mps = Some(if on_ground { 0.0 } else { rng.gen_range(60.0..250.0) });
                raw.heading_deg = Some(rng.gen_range(0.0..360.0));
                raw.vertical_rate_mps = Some(rng.gen_range(-10.0..10.0));
                raw.origin_country = Some("Simulated".into());
                raw
            })
            .collect()
    }
}

#[async_trait]
impl AircraftProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch(&self, query: &AreaQuery) -> ProviderResult<Vec<RawAircraft>> {
        Ok(self.generate(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skypointcore::math::calculate_distance;

    #[test]
    fn generator_builds_expected_count_inside_radius() {
        let provider = SimulatedProvider::new(SimulationConfig {
            count: 40,
            seed: 3,
            ..Default::default()
        });
        let query = AreaQuery::new(47.45, -122.3, 30.0);
        let aircraft = provider.generate(&query);

        assert_eq!(aircraft.len(), 40);
        for raw in &aircraft {
            let (lat, lon) = raw.position().unwrap();
            assert!(calculate_distance(47.45, -122.3, lat, lon) < 30.0);
            if raw.on_ground {
                assert_eq!(raw.altitude_m, Some(0.0));
            } else {
                let altitude = raw.altitude_m.unwrap();
                assert!((300.0..12_000.0).contains(&altitude));
            }
        }
    }

    #[test]
    fn generator_ignores_unbounded_area() {
        let provider = SimulatedProvider::new(SimulationConfig::default());
        let query = AreaQuery::new(47.45, -122.3, f64::INFINITY);
        assert!(provider.generate(&query).is_empty());
    }

    #[test]
    fn generator_is_deterministic_per_seed() {
        let query = AreaQuery::new(0.0, 0.0, 50.0);
        let a = SimulatedProvider::new(SimulationConfig {
            seed: 11,
            ..Default::default()
        });
        let b = SimulatedProvider::new(SimulationConfig {
            seed: 11,
            ..Default::default()
        });
        assert_eq!(a.generate(&query), b.generate(&query));
    }
}
