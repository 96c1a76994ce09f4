//! Time-based camera transitions.

use std::time::{Duration, Instant};

use glam::DVec3;
use uranus_math::{EasingFunction, lerp, lerp_angle};

use crate::state::{CameraLimits, CameraState};

/// Destination of an animated transition. `target: None` keeps the current
/// look-at point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraGoal {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
    pub target: Option<DVec3>,
}

impl CameraGoal {
    pub fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self {
            radius,
            theta,
            phi,
            target: None,
        }
    }

    pub fn with_target(mut self, target: DVec3) -> Self {
        self.target = Some(target);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.radius.is_finite()
            && self.theta.is_finite()
            && self.phi.is_finite()
            && self.target.is_none_or(|t| t.is_finite())
    }
}

/// An in-flight transition between two camera states.
///
/// Progress is measured against wall-clock time, not the simulation step.
#[derive(Clone, Debug)]
pub struct AnimationTween {
    /// State when the transition started.
    pub from: CameraState,
    /// State at completion. `to.theta` is already unwrapped onto the short
    /// arc from `from.theta`.
    pub to: CameraState,
    pub start: Instant,
    pub duration: Duration,
    pub easing: EasingFunction,
}

impl AnimationTween {
    /// Build a tween from `from` towards `goal`, clamping the goal into `limits`.
    pub fn new(
        from: CameraState,
        goal: CameraGoal,
        limits: &CameraLimits,
        start: Instant,
        duration: Duration,
    ) -> Self {
        let to = CameraState {
            radius: limits.clamp_radius(goal.radius),
            theta: lerp_angle(from.theta, goal.theta, 1.0),
            phi: limits.clamp_phi(goal.phi),
            target: goal.target.unwrap_or(from.target),
        };
        Self {
            from,
            to,
            start,
            duration,
            easing: EasingFunction::EaseInOut,
        }
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated state for an already-eased parameter.
    pub fn sample(&self, eased: f64) -> CameraState {
        CameraState {
            radius: lerp(self.from.radius, self.to.radius, eased),
            theta: lerp(self.from.theta, self.to.theta, eased),
            phi: lerp(self.from.phi, self.to.phi, eased),
            target: self.from.target.lerp(self.to.target, eased),
        }
    }

    /// State at `now`, plus whether the tween has finished.
    pub fn state_at(&self, now: Instant) -> (CameraState, bool) {
        let p = self.progress(now);
        if p >= 1.0 {
            (self.to, true)
        } else {
            (self.sample(self.easing.apply(p)), false)
        }
    }
}
