use crate::interface::AircraftSample;
use crate::prelude::{
    ProcessingStage, StageConfig, StageError, StageInput, StageMetadata, StageOutput, StageResult,
};
use crate::telemetry::log::LogManager;

/// Drops aircraft that cannot be pointed at and orders the rest nearest first.
///
/// Excluded: on-ground, below `min_altitude_m`, or beyond `radius_km`. The sort is stable,
/// so equal distances keep provider order.
pub struct FilterStage {
    config: Option<StageConfig>,
    logger: LogManager,
}

impl FilterStage {
    pub fn new() -> Self {
        Self {
            config: None,
            logger: LogManager::new(),
        }
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage<AircraftSample, AircraftSample> for FilterStage {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()> {
        if !config.radius_km.is_finite() || config.radius_km <= 0.0 {
            return Err(StageError::InvalidInput(format!(
                "radius must be positive and finite, got {}",
                config.radius_km
            )));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn execute(
        &mut self,
        input: StageInput<AircraftSample>,
    ) -> StageResult<StageOutput<AircraftSample>> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| StageError::Internal("stage not initialized".into()))?;

        let total = input.items.len();
        let mut items: Vec<AircraftSample> = input
            .items
            .into_iter()
            .filter(|sample| {
                !sample.on_ground
                    && sample.altitude_m >= config.min_altitude_m
                    && sample.distance_km <= config.radius_km
            })
            .collect();

        items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        if let Some(max) = config.max_results {
            items.truncate(max);
        }

        let dropped = total - items.len();
        self.logger.debug(&format!(
            "FilterStage kept {} of {} aircraft",
            items.len(),
            total
        ));

        let metadata = StageMetadata {
            dropped,
            notes: vec![format!(
                "min altitude {:.0} m, radius {:.1} km",
                config.min_altitude_m, config.radius_km
            )],
        };

        Ok(StageOutput { items, metadata })
    }

    fn cleanup(&mut self) {
        self.config = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::Observer;

    fn sample(id: &str, distance_km: f64, altitude_m: f64) -> AircraftSample {
        let mut sample = AircraftSample::new(id, 0.0, 5.0, distance_km);
        sample.altitude_m = altitude_m;
        sample
    }

    fn config() -> StageConfig {
        StageConfig::for_observer(Observer::new(0.0, 0.0))
    }

    #[test]
    fn filter_stage_excludes_low_grounded_and_distant() {
        let mut stage = FilterStage::new();
        stage.initialize(&config()).unwrap();

        let mut grounded = sample("ground", 2.0, 3000.0);
        grounded.on_ground = true;
        let input = StageInput::new(vec![
            sample("far", 60.0, 10_000.0),
            sample("low", 3.0, 99.0),
            grounded,
            sample("edge", 4.0, 100.0),
            sample("near", 1.0, 5000.0),
        ]);

        let output = stage.execute(input).unwrap();
        let ids: Vec<&str> = output.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "edge"]);
        assert_eq!(output.metadata.dropped, 3);
        stage.cleanup();
    }

    #[test]
    fn filter_stage_truncates_to_max_results() {
        let mut stage = FilterStage::new();
        let mut cfg = config();
        cfg.max_results = Some(2);
        stage.initialize(&cfg).unwrap();

        let input = StageInput::new(vec![
            sample("c", 30.0, 9000.0),
            sample("a", 10.0, 9000.0),
            sample("b", 20.0, 9000.0),
        ]);
        let output = stage.execute(input).unwrap();
        let ids: Vec<&str> = output.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn filter_stage_rejects_non_positive_radius() {
        let mut stage = FilterStage::new();
        let mut cfg = config();
        cfg.radius_km = 0.0;
        assert!(stage.initialize(&cfg).is_err());
        cfg.radius_km = f64::NAN;
        assert!(stage.initialize(&cfg).is_err());
    }

    #[test]
    fn filter_stage_rejects_infinite_radius() {
        let mut stage = FilterStage::new();
        let mut cfg = config();
        cfg.radius_km = f64::INFINITY;
        assert!(stage.initialize(&cfg).is_err());
    }
}
