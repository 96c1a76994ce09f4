//! Orbit camera controller: rotate, zoom, pan, and animated transitions.

use std::time::{Duration, Instant};

use glam::{DVec2, DVec3};
use tracing::debug;
use uranus_config::CameraConfig;

use crate::state::{CameraInfo, CameraLimits, CameraState, CameraView};
use crate::tween::{AnimationTween, CameraGoal};

/// Angular velocity carried between updates when momentum is enabled.
#[derive(Clone, Copy, Debug)]
struct Momentum {
    enabled: bool,
    damping: f64,
    epsilon: f64,
    /// Per-update (azimuth, polar) rotation still to apply.
    velocity: DVec2,
}

impl Momentum {
    fn stop(&mut self) {
        self.velocity = DVec2::ZERO;
    }
}

/// Owns the camera's spherical state and every operation that mutates it.
///
/// All inputs are accepted: finite values are clamped into the limits and
/// non-finite values are ignored. Manual input cancels an active tween.
#[derive(Clone, Debug)]
pub struct CameraController {
    state: CameraState,
    view: CameraView,
    limits: CameraLimits,
    pan_speed: f64,
    default_transition: Duration,
    tween: Option<AnimationTween>,
    momentum: Momentum,
}

impl CameraController {
    /// Create a controller with explicit limits. The limits are normalized
    /// and the initial state is clamped into them.
    pub fn new(initial: CameraState, limits: CameraLimits) -> Self {
        let limits = limits.normalized();
        let config = CameraConfig::default();
        let mut controller = Self {
            state: initial,
            view: CameraView::from_state(&initial),
            limits,
            pan_speed: config.pan_speed,
            default_transition: Duration::from_secs_f64(config.transition_seconds),
            tween: None,
            momentum: Momentum {
                enabled: config.momentum,
                damping: config.damping,
                epsilon: config.velocity_epsilon,
                velocity: DVec2::ZERO,
            },
        };
        controller.state.radius = limits.clamp_radius(initial.radius);
        controller.state.phi = limits.clamp_phi(initial.phi);
        controller.refresh();
        controller
    }

    /// Create a controller from a validated camera config.
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut controller = Self::new(CameraState::from(config), CameraLimits::from(config));
        controller.pan_speed = config.pan_speed;
        controller.default_transition = Duration::from_secs_f64(config.transition_seconds);
        controller.momentum.enabled = config.momentum;
        controller.momentum.damping = config.damping;
        controller.momentum.epsilon = config.velocity_epsilon;
        controller
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn view(&self) -> &CameraView {
        &self.view
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    pub fn position(&self) -> DVec3 {
        self.view.position
    }

    /// Duration used by callers that don't pick one.
    pub fn default_transition(&self) -> Duration {
        self.default_transition
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn tween(&self) -> Option<&AnimationTween> {
        self.tween.as_ref()
    }

    pub fn momentum_enabled(&self) -> bool {
        self.momentum.enabled
    }

    /// Enable or disable momentum. Disabling drops any residual velocity.
    pub fn set_momentum(&mut self, enabled: bool) {
        self.momentum.enabled = enabled;
        if !enabled {
            self.momentum.stop();
        }
    }

    /// Residual (azimuth, polar) velocity per update.
    pub fn angular_velocity(&self) -> DVec2 {
        self.momentum.velocity
    }

    /// Rotate around the target.
    ///
    /// Positive `delta_azimuth` decreases `theta`; `delta_polar` is added to
    /// `phi` and clamped. The rotation is applied immediately. With momentum
    /// enabled the delta also feeds the velocity, scaled so the coast after
    /// the last impulse travels its own size again.
    pub fn rotate(&mut self, delta_azimuth: f64, delta_polar: f64) {
        if !(delta_azimuth.is_finite() && delta_polar.is_finite()) {
            debug!(delta_azimuth, delta_polar, "ignoring non-finite rotate");
            return;
        }
        self.cancel_animation();
        self.apply_rotation(delta_azimuth, delta_polar);
        if self.momentum.enabled {
            let gain = 1.0 - self.momentum.damping;
            self.momentum.velocity += DVec2::new(delta_azimuth, delta_polar) * gain;
        }
    }

    /// Multiplicative zoom: `radius *= 1 + fractional_delta`, then clamped.
    pub fn zoom(&mut self, fractional_delta: f64) {
        if !fractional_delta.is_finite() {
            debug!(fractional_delta, "ignoring non-finite zoom");
            return;
        }
        self.cancel_animation();
        self.state.radius = self
            .limits
            .clamp_radius(self.state.radius * (1.0 + fractional_delta));
        self.refresh();
    }

    /// Set the radius directly, clamped, without animation.
    pub fn set_zoom(&mut self, radius: f64) {
        if !radius.is_finite() {
            debug!(radius, "ignoring non-finite set_zoom");
            return;
        }
        self.cancel_animation();
        self.state.radius = self.limits.clamp_radius(radius);
        self.refresh();
    }

    /// Move the target along the camera's right and screen-up vectors.
    ///
    /// The distance moved scales with the current radius.
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        if !(delta_x.is_finite() && delta_y.is_finite()) {
            debug!(delta_x, delta_y, "ignoring non-finite pan");
            return;
        }
        self.cancel_animation();
        let scale = self.state.radius * self.pan_speed;
        let offset = (-self.view.right * delta_x + self.view.screen_up * delta_y) * scale;
        self.state.target += offset;
        self.refresh();
    }

    /// Aim at a new target immediately, keeping the spherical offset.
    pub fn look_at(&mut self, target: DVec3) {
        if !target.is_finite() {
            debug!(?target, "ignoring non-finite look_at");
            return;
        }
        self.cancel_animation();
        self.state.target = target;
        self.refresh();
    }

    /// Start a transition to `goal`, replacing any transition in flight.
    ///
    /// The old tween is discarded without blending; the new one starts from
    /// wherever the camera is now. A zero duration snaps immediately.
    pub fn animate_to_position(&mut self, goal: CameraGoal, duration: Duration, now: Instant) {
        if !goal.is_finite() {
            debug!(?goal, "ignoring non-finite animation goal");
            return;
        }
        self.momentum.stop();
        let tween = AnimationTween::new(self.state, goal, &self.limits, now, duration);
        if duration.is_zero() {
            self.state = tween.to;
            self.tween = None;
            self.refresh();
        } else {
            self.tween = Some(tween);
        }
    }

    /// Animate the radius only, keeping angles and target.
    pub fn animate_to_radius(&mut self, radius: f64, duration: Duration, now: Instant) {
        let goal = CameraGoal::new(radius, self.state.theta, self.state.phi);
        self.animate_to_position(goal, duration, now);
    }

    /// Drop the active tween, leaving the camera where it is.
    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Advance the active tween to `now`. Returns `true` while still animating.
    pub fn update_animation(&mut self, now: Instant) -> bool {
        let Some(tween) = &self.tween else {
            return false;
        };
        let (state, finished) = tween.state_at(now);
        self.state = state;
        if finished {
            self.tween = None;
        }
        self.refresh();
        !finished
    }

    /// Per-frame update: tween first, then momentum when no tween is active.
    ///
    /// `_dt` is unused. The tween is driven by `now`, and momentum decays by
    /// `damping` once per call, so coasting depends on the frame count rather
    /// than on frame duration.
    pub fn update(&mut self, _dt: f64, now: Instant) {
        if self.update_animation(now) {
            return;
        }
        if !self.momentum.enabled {
            return;
        }
        let velocity = self.momentum.velocity;
        if velocity.length() < self.momentum.epsilon {
            self.momentum.stop();
            return;
        }
        self.apply_rotation(velocity.x, velocity.y);
        self.momentum.velocity *= self.momentum.damping;
    }

    /// Serializable summary for the query surface.
    pub fn info(&self) -> CameraInfo {
        CameraInfo::new(
            &self.state,
            &self.view,
            self.is_animating(),
            self.momentum.enabled,
        )
    }

    fn apply_rotation(&mut self, delta_azimuth: f64, delta_polar: f64) {
        self.state.theta -= delta_azimuth;
        self.state.phi = self.limits.clamp_phi(self.state.phi + delta_polar);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view = CameraView::from_state(&self.state);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
