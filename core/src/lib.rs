//! Core geometry and pointing logic for the Skypoint plane finder.
//!
//! Turns provider aircraft records into bearing/distance/elevation samples relative to
//! a fixed observer, smooths device orientation, and matches where the device points
//! against the nearby aircraft.

pub mod cache;
pub mod interface;
pub mod lookup;
pub mod math;
pub mod orientation;
pub mod prelude;
pub mod processing;
pub mod session;
pub mod telemetry;

pub use prelude::{ProcessingStage, StageConfig, StageInput, StageOutput};
pub use session::TrackingSession;
