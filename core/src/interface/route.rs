use serde::{Deserialize, Serialize};

/// Origin/destination for a flight, as codes plus resolved display names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightRoute {
    pub callsign: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub origin_name: Option<String>,
    pub destination_name: Option<String>,
    pub airline: Option<String>,
}

impl FlightRoute {
    /// Route with nothing resolved beyond the callsign itself.
    pub fn unknown(callsign: &str) -> Self {
        Self {
            callsign: callsign.to_string(),
            ..Default::default()
        }
    }

    pub fn is_known(&self) -> bool {
        self.origin.is_some() || self.destination.is_some()
    }
}
