//! Tracking session: ingest sample → update smoothed state → recompute match.
//!
//! A session owns every piece of mutable state the pointing flow needs and is driven
//! synchronously by its caller, one event at a time.

use crate::interface::{AircraftSample, Observer, OrientationSample, RawAircraft};
use crate::orientation::{OrientationSmoother, SmoothingConfig};
use crate::prelude::{ProcessingStage, StageConfig, StageResult};
use crate::processing::{
    match_aircraft, run_pipeline, FilterStage, MatchConfig, ProjectionStage,
};
use crate::telemetry::{LogManager, MetricsRecorder};

pub struct TrackingSession {
    stage_config: StageConfig,
    match_config: MatchConfig,
    smoother: OrientationSmoother,
    aircraft: Vec<AircraftSample>,
    tracking: bool,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl TrackingSession {
    /// Fails when the observer in `stage_config` is not a valid position.
    pub fn new(
        stage_config: StageConfig,
        smoothing: SmoothingConfig,
        match_config: MatchConfig,
    ) -> StageResult<Self> {
        // validates observer and radius up front so later polls cannot fail on config
        ProjectionStage::new().initialize(&stage_config)?;
        FilterStage::new().initialize(&stage_config)?;

        Ok(Self {
            stage_config,
            match_config,
            smoother: OrientationSmoother::new(smoothing),
            aircraft: Vec::new(),
            tracking: false,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
        })
    }

    pub fn observer(&self) -> Observer {
        self.stage_config.observer
    }

    pub fn aircraft(&self) -> &[AircraftSample] {
        &self.aircraft
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    /// Projects and filters a fresh poll result, then swaps it in whole.
    ///
    /// On error the previous list is left untouched.
    pub fn update_from_raw(&mut self, raw: Vec<RawAircraft>) -> StageResult<usize> {
        let output = run_pipeline(&self.stage_config, raw)?;
        self.replace_aircraft(output.items);
        Ok(self.aircraft.len())
    }

    /// Replaces the aircraft list wholesale.
    pub fn replace_aircraft(&mut self, aircraft: Vec<AircraftSample>) {
        self.aircraft = aircraft;
        self.metrics.record_poll();
        self.logger
            .debug(&format!("session aircraft list now {}", self.aircraft.len()));
    }

    pub fn start_tracking(&mut self) {
        self.tracking = true;
    }

    /// Stops tracking and forgets the smoothed orientation.
    pub fn stop_tracking(&mut self) {
        self.tracking = false;
        self.smoother.reset();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn heading(&self) -> Option<f64> {
        self.smoother.heading()
    }

    pub fn tilt(&self) -> Option<f64> {
        self.smoother.tilt()
    }

    /// Feeds one orientation reading and returns the resulting match.
    ///
    /// Readings are ignored while tracking is stopped.
    pub fn ingest(&mut self, sample: &OrientationSample) -> Option<&AircraftSample> {
        if !self.tracking {
            return None;
        }
        self.smoother.ingest(sample);

        let found = match_aircraft(
            self.smoother.heading(),
            self.smoother.tilt(),
            &self.aircraft,
            &self.match_config,
        );
        if let Some(aircraft) = found {
            self.metrics.record_match();
            self.logger.debug(&format!("pointing at {}", aircraft.label()));
        }
        found
    }

    /// Match for the current smoothed orientation and aircraft list.
    pub fn current_match(&self) -> Option<&AircraftSample> {
        if !self.tracking {
            return None;
        }
        match_aircraft(
            self.smoother.heading(),
            self.smoother.tilt(),
            &self.aircraft,
            &self.match_config,
        )
    }
}
