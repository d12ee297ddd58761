use crate::interface::{AircraftSample, RawAircraft};
use crate::math::geo::{calculate_bearing, calculate_distance, calculate_elevation};
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Attaches bearing, distance and elevation relative to the observer to each raw record.
///
/// Records without a usable position are dropped. Missing altitude is treated as 0 m,
/// which the filter stage then rejects as too low.
pub struct ProjectionStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl ProjectionStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for ProjectionStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds one sample from a raw record as seen from `(observer_lat, observer_lon)`.
pub fn project(raw: &RawAircraft, observer_lat: f64, observer_lon: f64) -> Option<AircraftSample> {
    let (lat, lon) = raw.position()?;
    let altitude_m = raw.altitude_m.filter(|a| a.is_finite()).unwrap_or(0.0);
    let distance_km = calculate_distance(observer_lat, observer_lon, lat, lon);

    Some(AircraftSample {
        id: raw.id.clone(),
        callsign: raw.callsign.clone(),
        latitude: lat,
        longitude: lon,
        bearing_deg: calculate_bearing(observer_lat, observer_lon, lat, lon),
        elevation_deg: calculate_elevation(distance_km, altitude_m),
        distance_km,
        altitude_m,
        velocity_mps: raw.velocity_mps,
        heading_deg: raw.heading_deg,
        vertical_rate_mps: raw.vertical_rate_mps,
        on_ground: raw.on_ground,
        registration: raw.registration.clone(),
        aircraft_type: raw.aircraft_type.clone(),
        operator: raw.operator.clone(),
        squawk: raw.squawk.clone(),
    })
}

impl ProcessingStage<RawAircraft, AircraftSample> for ProjectionStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if !config.observer.is_valid() {
            return Err(StageError::InvalidInput(format!(
                "observer position ({}, {}) out of range",
                config.observer.latitude, config.observer.longitude
            )));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(
        &mut self,
        input: StageInput<RawAircraft>,
    ) -> StageResult<StageOutput<AircraftSample>> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;
        let observer = config.observer;

        let total = input.items.len();
        let items: Vec<AircraftSample> = input
            .items
            .iter()
            .filter_map(|raw| project(raw, observer.latitude, observer.longitude))
            .collect();
        let dropped = total - items.len();

        self.logger.debug(&format!(
            "ProjectionStage projected {} of {} records",
            items.len(),
            total
        ));

        let metadata = StageMetadata {
            dropped,
            notes: vec![format!("{} without position", dropped)],
        };

        Ok(StageOutput { items, metadata })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}
