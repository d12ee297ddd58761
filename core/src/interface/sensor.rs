use serde::{Deserialize, Serialize};

use crate::orientation::compass_heading;

/// Fixed observer position for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One raw device-orientation reading. Either field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrientationSample {
    /// Compass heading in degrees, 0 = North.
    pub heading_deg: Option<f64>,
    /// Device front-back rotation (beta) in degrees.
    pub tilt_raw_deg: Option<f64>,
}

impl OrientationSample {
    /// Builds a sample from raw device-orientation fields.
    pub fn from_device(
        absolute_heading: Option<f64>,
        alpha: Option<f64>,
        beta: Option<f64>,
    ) -> Self {
        Self {
            heading_deg: compass_heading(absolute_heading, alpha),
            tilt_raw_deg: beta,
        }
    }
}
