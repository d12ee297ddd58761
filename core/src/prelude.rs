use serde::{Deserialize, Serialize};

use crate::interface::Observer;

pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const DEFAULT_MIN_ALTITUDE_M: f64 = 100.0;

/// Shared configuration for each processing stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub observer: Observer,
    pub radius_km: f64,
    pub min_altitude_m: f64,
    pub max_results: Option<usize>,
}

impl StageConfig {
    pub fn for_observer(observer: Observer) -> Self {
        Self {
            observer,
            radius_km: DEFAULT_RADIUS_KM,
            min_altitude_m: DEFAULT_MIN_ALTITUDE_M,
            max_results: None,
        }
    }
}

/// Input payload for a processing stage.
#[derive(Debug, Clone)]
pub struct StageInput<T> {
    pub items: Vec<T>,
    pub timestamp: Option<f64>,
}

impl<T> StageInput<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            timestamp: None,
        }
    }
}

/// Output produced by each stage.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub items: Vec<T>,
    pub metadata: StageMetadata,
}

/// Metadata used for chaining stages and telemetry.
#[derive(Debug, Clone, Default)]
pub struct StageMetadata {
    pub dropped: usize,
    pub notes: Vec<String>,
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// Trait describing the aircraft processing stages.
pub trait ProcessingStage<I, O> {
    fn initialize(&mut self, config: &StageConfig) -> StageResult<()>;
    fn execute(&mut self, input: StageInput<I>) -> StageResult<StageOutput<O>>;
    fn cleanup(&mut self);
}
