//! Orientation smoothing for compass heading and device tilt.
//!
//! Raw sensor readings are noisy and arrive at device rate. The smoother keeps an
//! exponentially weighted heading (circular) and tilt (linear), both of which stay
//! unset until the first reading arrives.

use serde::{Deserialize, Serialize};

use crate::interface::OrientationSample;
use crate::math::geo::{angle_diff, normalize_degrees};

pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.3;
pub const DEFAULT_DEAD_ZONE_DEG: f64 = 0.5;

/// Exponential smoothing on a circular quantity.
///
/// `current == None` bootstraps straight to `target`. Otherwise the result moves
/// `factor` of the shortest signed distance towards `target`, so 359° → 2° passes
/// through 0° rather than the long way round.
pub fn smooth_angle(current: Option<f64>, target: f64, factor: f64) -> f64 {
    match current {
        None => normalize_degrees(target),
        Some(current) => normalize_degrees(current + angle_diff(current, target) * factor),
    }
}

/// Same as [`smooth_angle`] but holds `current` while the change is inside `dead_zone`.
pub fn smooth_angle_with_dead_zone(
    current: Option<f64>,
    target: f64,
    factor: f64,
    dead_zone: f64,
) -> f64 {
    match current {
        Some(current) if angle_diff(current, target).abs() < dead_zone => current,
        _ => smooth_angle(current, target, factor),
    }
}

/// Exponential smoothing on a linear quantity such as tilt.
pub fn smooth_linear(current: Option<f64>, target: f64, factor: f64) -> f64 {
    match current {
        None => target,
        Some(current) => current + (target - current) * factor,
    }
}

/// Elevation of the rear camera axis for a device front-back rotation `beta`.
///
/// Flat on its back (beta 0) the camera looks straight down, upright (beta ±90) it
/// looks at the horizon, and flipped over (beta ±180) it looks at the zenith. The
/// camera axis has vertical component `-cos(beta)`, so the elevation is
/// `asin(-cos(beta)) = |beta| - 90` once beta is wrapped into `[-180, 180)`.
pub fn elevation_from_beta(beta_deg: f64) -> f64 {
    let wrapped = (beta_deg + 180.0).rem_euclid(360.0) - 180.0;
    wrapped.abs() - 90.0
}

/// Tilt used for matching: camera elevation clamped into `[0, 90]`.
pub fn tilt_from_beta(beta_deg: f64) -> f64 {
    elevation_from_beta(beta_deg).clamp(0.0, 90.0)
}

/// Compass heading from a device alpha reading when no absolute compass heading is available.
pub fn heading_from_alpha(alpha_deg: f64) -> f64 {
    normalize_degrees(360.0 - alpha_deg)
}

/// Absolute compass heading when the platform reports one, otherwise derived from alpha.
pub fn compass_heading(absolute_deg: Option<f64>, alpha_deg: Option<f64>) -> Option<f64> {
    match absolute_deg.filter(|h| h.is_finite()) {
        Some(heading) => Some(normalize_degrees(heading)),
        None => alpha_deg.filter(|a| a.is_finite()).map(heading_from_alpha),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmoothingConfig {
    pub heading_factor: f64,
    pub tilt_factor: f64,
    pub dead_zone_deg: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            heading_factor: DEFAULT_SMOOTHING_FACTOR,
            tilt_factor: DEFAULT_SMOOTHING_FACTOR,
            dead_zone_deg: DEFAULT_DEAD_ZONE_DEG,
        }
    }
}

/// Smoothed `(heading, tilt)` state for one tracking session.
#[derive(Debug, Clone, Default)]
pub struct OrientationSmoother {
    config: SmoothingConfig,
    heading: Option<f64>,
    tilt: Option<f64>,
}

impl OrientationSmoother {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            config: SmoothingConfig {
                heading_factor: config.heading_factor.clamp(f64::EPSILON, 1.0),
                tilt_factor: config.tilt_factor.clamp(f64::EPSILON, 1.0),
                dead_zone_deg: config.dead_zone_deg.max(0.0),
            },
            heading: None,
            tilt: None,
        }
    }

    /// Folds one sensor reading in. Missing fields leave their half of the state untouched.
    pub fn ingest(&mut self, sample: &OrientationSample) {
        if let Some(heading) = sample.heading_deg.filter(|h| h.is_finite()) {
            self.heading = Some(smooth_angle_with_dead_zone(
                self.heading,
                heading,
                self.config.heading_factor,
                self.config.dead_zone_deg,
            ));
        }
        if let Some(beta) = sample.tilt_raw_deg.filter(|b| b.is_finite()) {
            let target = tilt_from_beta(beta);
            self.tilt = Some(match self.tilt {
                Some(current) if (target - current).abs() < self.config.dead_zone_deg => current,
                current => smooth_linear(current, target, self.config.tilt_factor),
            });
        }
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn tilt(&self) -> Option<f64> {
        self.tilt
    }

    pub fn reset(&mut self) {
        self.heading = None;
        self.tilt = None;
    }
}
