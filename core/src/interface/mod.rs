pub mod aircraft;
pub mod route;
pub mod sensor;

pub use aircraft::{normalize_callsign, normalize_id, AircraftSample, RawAircraft};
pub use route::FlightRoute;
pub use sensor::{Observer, OrientationSample};
