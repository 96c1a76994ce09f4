//! Camera state, limits, and the derived view.

use std::f64::consts::PI;

use glam::DVec3;
use serde::Serialize;
use uranus_config::CameraConfig;
use uranus_math::{Spherical, normalize_angle};

/// Closest the polar angle may get to either pole, whatever the limits say.
pub const POLE_EPSILON: f64 = 1e-6;

/// Radius and polar-angle bounds for the orbit camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraLimits {
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_phi: f64,
    pub max_phi: f64,
}

impl CameraLimits {
    /// Order both bound pairs and pull the polar bounds off the poles.
    ///
    /// Non-finite or non-positive radius bounds fall back to the defaults.
    pub fn normalized(self) -> Self {
        let defaults = CameraConfig::default();
        let radius_or = |r: f64, fallback: f64| if r.is_finite() && r > 0.0 { r } else { fallback };
        let (min_radius, max_radius) = ordered(
            radius_or(self.min_radius, defaults.min_radius),
            radius_or(self.max_radius, defaults.max_radius),
        );
        let (min_phi, max_phi) = ordered(pole_safe(self.min_phi), pole_safe(self.max_phi));
        Self {
            min_radius,
            max_radius,
            min_phi,
            max_phi,
        }
    }

    /// Clamp a radius into `[min_radius, max_radius]`.
    pub fn clamp_radius(&self, radius: f64) -> f64 {
        let (lo, hi) = ordered(self.min_radius, self.max_radius);
        radius.max(lo).min(hi)
    }

    /// Clamp a polar angle into `[min_phi, max_phi]`, never touching 0 or pi.
    pub fn clamp_phi(&self, phi: f64) -> f64 {
        let (lo, hi) = ordered(pole_safe(self.min_phi), pole_safe(self.max_phi));
        phi.max(lo).min(hi)
    }
}

// f64::max/min skip a NaN operand, so neither helper can panic.
fn pole_safe(phi: f64) -> f64 {
    phi.max(POLE_EPSILON).min(PI - POLE_EPSILON)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for CameraLimits {
    fn from(config: &CameraConfig) -> Self {
        Self {
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            min_phi: config.min_phi,
            max_phi: config.max_phi,
        }
    }
}

/// The camera's source of truth: spherical coordinates around a target.
///
/// `theta` is unbounded; it is only wrapped while interpolating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
    pub target: DVec3,
}

impl CameraState {
    pub fn spherical(&self) -> Spherical {
        Spherical::new(self.radius, self.theta, self.phi)
    }

    /// World-space camera position.
    pub fn position(&self) -> DVec3 {
        self.target + self.spherical().to_offset()
    }
}

impl From<&CameraConfig> for CameraState {
    fn from(config: &CameraConfig) -> Self {
        Self {
            radius: config.radius,
            theta: config.theta,
            phi: config.phi,
            target: DVec3::ZERO,
        }
    }
}

/// Orientation derived from [`CameraState`]. Recomputed after every change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub position: DVec3,
    pub target: DVec3,
    /// Always world up; re-asserted on every refresh so repeated look-at
    /// calls cannot accumulate roll.
    pub up: DVec3,
    pub forward: DVec3,
    pub right: DVec3,
    /// Screen-space up (perpendicular to `forward` and `right`).
    pub screen_up: DVec3,
}

impl CameraView {
    pub fn from_state(state: &CameraState) -> Self {
        let position = state.position();
        let forward = (state.target - position).normalize_or(DVec3::NEG_Z);
        // phi is kept away from the poles, so forward is never parallel to up.
        let right = forward.cross(DVec3::Y).normalize_or(DVec3::X);
        let screen_up = right.cross(forward);
        Self {
            position,
            target: state.target,
            up: DVec3::Y,
            forward,
            right,
            screen_up,
        }
    }
}

/// Serializable camera summary for display by external UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CameraInfo {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
    /// Azimuth normalized into `[0, 360)` degrees.
    pub theta_degrees: f64,
    pub phi_degrees: f64,
    pub animating: bool,
    pub momentum: bool,
}

impl CameraInfo {
    pub fn new(state: &CameraState, view: &CameraView, animating: bool, momentum: bool) -> Self {
        Self {
            position: view.position.to_array(),
            target: state.target.to_array(),
            radius: state.radius,
            theta: state.theta,
            phi: state.phi,
            theta_degrees: normalize_angle(state.theta).to_degrees(),
            phi_degrees: state.phi.to_degrees(),
            animating,
            momentum,
        }
    }
}
