pub mod filter;
pub mod matcher;
pub mod projection;

pub use filter::FilterStage;
pub use matcher::{match_aircraft, MatchConfig};
pub use projection::{project, ProjectionStage};

use crate::interface::{AircraftSample, RawAircraft};
use crate::prelude::{ProcessingStage, StageConfig, StageInput, StageOutput, StageResult};

/// Runs projection then filtering over one poll result.
pub fn run_pipeline(
    config: &StageConfig,
    raw: Vec<RawAircraft>,
) -> StageResult<StageOutput<AircraftSample>> {
    let mut projection = ProjectionStage::new();
    projection.initialize(config)?;
    let projected = projection.execute(StageInput::new(raw))?;
    projection.cleanup();

    let mut filter = FilterStage::new();
    filter.initialize(config)?;
    let mut filtered = filter.execute(StageInput::new(projected.items))?;
    filter.cleanup();

    filtered.metadata.dropped += projected.metadata.dropped;
    filtered.metadata.notes.splice(0..0, projected.metadata.notes);
    Ok(filtered)
}
