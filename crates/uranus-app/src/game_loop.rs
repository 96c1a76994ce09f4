//! Fixed-timestep animation loop implementing the "Fix Your Timestep" pattern.
//!
//! Simulation time advances in constant steps drained from an accumulator,
//! independent of how irregularly the host delivers frames. Visual updates
//! and rendering run once per frame with the clamped frame delta. Frames are
//! one-shot callbacks from a [`FrameHost`]; the loop re-arms the next one at
//! the end of each frame and stopping cancels whatever is armed.

use std::time::Instant;

use tracing::{debug, info, trace, warn};
use uranus_camera::CameraController;
use uranus_config::{Config, ConfigError};
use uranus_sim::{
    ClockError, CollaboratorSet, FixedContext, FrameContext, QualityLevel, SimulationClock,
};

use crate::controls::{ControlCommand, ControlError};
use crate::governor::{PerformanceGovernor, QualityChange};
use crate::host::{FrameHandle, FrameHost};
use crate::render::{RenderView, Renderer};
use crate::report::{LoopInfo, PerformanceReport};

#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Clock(#[from] ClockError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// What happened during one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Host delta in seconds before clamping.
    pub raw_delta: f64,
    pub delta: f64,
    pub clamped: bool,
    pub sub_steps: u32,
    pub hit_sub_step_cap: bool,
    pub alpha: f64,
    pub collaborator_failures: usize,
    pub quality_change: Option<QualityChange>,
}

#[derive(Clone, Copy, Debug, Default)]
struct LoopStats {
    frames: u64,
    fixed_steps: u64,
    clamped_frames: u64,
    cap_hits: u64,
    render_failures: u64,
}

pub struct AnimationLoop<H: FrameHost, R: Renderer> {
    host: H,
    renderer: R,
    clock: SimulationClock,
    camera: CameraController,
    governor: PerformanceGovernor,
    collaborators: CollaboratorSet,

    fixed_step: f64,
    max_frame_time: f64,
    max_sub_steps: u32,
    report_interval: u64,

    state: LoopState,
    pending: Option<FrameHandle>,
    last_time: Option<Instant>,
    accumulator: f64,
    alpha: f64,
    /// Level the collaborators were last told about.
    applied_quality: QualityLevel,
    stats: LoopStats,
}

impl<H: FrameHost, R: Renderer> AnimationLoop<H, R> {
    /// Build a stopped loop. The config is validated first.
    pub fn new(
        config: &Config,
        host: H,
        renderer: R,
        collaborators: CollaboratorSet,
    ) -> Result<Self, LoopError> {
        config.validate()?;
        let clock = SimulationClock::from_config(&config.simulation)?;
        let governor = PerformanceGovernor::new(&config.performance);
        let applied_quality = governor.quality();
        Ok(Self {
            host,
            renderer,
            clock,
            camera: CameraController::from_config(&config.camera),
            governor,
            collaborators,
            fixed_step: config.simulation.fixed_time_step,
            max_frame_time: config.simulation.max_frame_time,
            max_sub_steps: config.simulation.max_sub_steps,
            report_interval: config.debug.report_interval_frames,
            state: LoopState::Stopped,
            pending: None,
            last_time: None,
            accumulator: 0.0,
            alpha: 0.0,
            applied_quality,
            stats: LoopStats::default(),
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Begin scheduling frames. No-op when already running.
    ///
    /// The first frame measures its delta from this call, so time spent
    /// stopped never reaches the accumulator.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running;
        self.last_time = Some(self.host.now());
        self.pending = Some(self.host.request_frame());
        info!(
            fixed_step = self.fixed_step,
            max_sub_steps = self.max_sub_steps,
            quality = %self.governor.quality(),
            "animation loop started"
        );
    }

    /// Stop scheduling frames and cancel the armed one. No-op when stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = LoopState::Stopped;
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        info!(frames = self.stats.frames, "animation loop stopped");
    }

    /// Wait for the armed frame and run it. Returns `false` when the loop is
    /// stopped or nothing is armed.
    pub fn pump(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        match self.host.wait_for_frame() {
            Some(now) => self.on_frame(now).is_some(),
            None => false,
        }
    }

    /// Run one frame at host time `now`.
    ///
    /// Returns `None` without doing any work if the loop was stopped before
    /// the callback fired.
    pub fn on_frame(&mut self, now: Instant) -> Option<FrameSummary> {
        if !self.is_running() {
            return None;
        }
        self.pending = None;

        let last = self.last_time.replace(now).unwrap_or(now);
        let raw_delta = now.saturating_duration_since(last).as_secs_f64();
        let clamped = raw_delta > self.max_frame_time;
        let delta = if clamped {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                raw_delta * 1000.0,
                self.max_frame_time * 1000.0
            );
            self.stats.clamped_frames += 1;
            self.max_frame_time
        } else {
            raw_delta
        };

        let quality_change = self.governor.record_frame(delta * 1000.0);

        let mut failures = 0;
        let (sub_steps, hit_cap) = self.drain_fixed_steps(delta, &mut failures);
        self.alpha = self.accumulator / self.fixed_step;

        self.camera.update(delta, now);
        let frame_ctx = FrameContext {
            delta,
            alpha: self.alpha,
            simulation_time: self.clock.simulation_time(),
            paused: self.clock.is_paused(),
            quality: self.applied_quality,
            camera_position: self.camera.position(),
        };
        failures += self.collaborators.update_all(&frame_ctx);

        self.stats.frames += 1;
        let view = RenderView {
            frame: self.stats.frames,
            camera: self.camera.view(),
            alpha: self.alpha,
            simulation_time: self.clock.simulation_time(),
            quality: self.applied_quality,
            paused: self.clock.is_paused(),
        };
        if let Err(error) = self.renderer.render(&view) {
            self.stats.render_failures += 1;
            warn!(%error, frame = self.stats.frames, "render failed");
        }

        if let Some(change) = quality_change {
            info!(
                from = %change.from,
                to = %change.to,
                average_ms = change.average_ms,
                "quality changed"
            );
            failures += self.broadcast_quality(change.to);
        }

        if self.report_interval > 0 && self.stats.frames % self.report_interval == 0 {
            info!(
                frame = self.stats.frames,
                fps = self.governor.fps(),
                average_ms = self.governor.rolling_average_ms(),
                quality = %self.governor.quality(),
                sim_time = self.clock.simulation_time(),
                "performance"
            );
        }

        trace!(
            frame = self.stats.frames,
            delta,
            sub_steps,
            alpha = self.alpha,
            "frame complete"
        );

        if self.is_running() {
            self.pending = Some(self.host.request_frame());
        }

        Some(FrameSummary {
            raw_delta,
            delta,
            clamped,
            sub_steps,
            hit_sub_step_cap: hit_cap,
            alpha: self.alpha,
            collaborator_failures: failures,
            quality_change,
        })
    }

    /// Drain the accumulator in constant steps, at most `max_sub_steps`.
    ///
    /// When the cap stops draining, the remainder is kept but bounded to one
    /// frame's worth of steps so a sustained overload cannot grow it without
    /// limit.
    fn drain_fixed_steps(&mut self, delta: f64, failures: &mut usize) -> (u32, bool) {
        self.accumulator += delta;
        let mut sub_steps = 0;
        while self.accumulator >= self.fixed_step && sub_steps < self.max_sub_steps {
            let scaled_step = self.clock.advance(self.fixed_step);
            if !self.clock.is_paused() {
                let ctx = FixedContext {
                    step: self.fixed_step,
                    scaled_step,
                    simulation_time: self.clock.simulation_time(),
                    time_speed: self.clock.time_speed(),
                };
                *failures += self.collaborators.step_all(&ctx);
            }
            self.accumulator -= self.fixed_step;
            sub_steps += 1;
            self.stats.fixed_steps += 1;
        }

        let hit_cap = self.accumulator >= self.fixed_step;
        if hit_cap {
            self.stats.cap_hits += 1;
            let backlog = self.fixed_step * f64::from(self.max_sub_steps);
            debug!(
                sub_steps,
                accumulator = self.accumulator,
                "sub-step cap reached, carrying remainder"
            );
            self.accumulator = self.accumulator.min(backlog);
        }
        (sub_steps, hit_cap)
    }

    fn broadcast_quality(&mut self, level: QualityLevel) -> usize {
        self.applied_quality = level;
        self.collaborators.broadcast_quality(level)
    }

    /// Apply a control command between frames.
    pub fn apply(&mut self, command: ControlCommand) -> Result<(), ControlError> {
        let now = self.host.now();
        match command {
            ControlCommand::Rotate { azimuth, polar } => self.camera.rotate(azimuth, polar),
            ControlCommand::Zoom(delta) => self.camera.zoom(delta),
            ControlCommand::SetZoom(radius) => self.camera.set_zoom(radius),
            ControlCommand::Pan { x, y } => self.camera.pan(x, y),
            ControlCommand::LookAt(target) => self.camera.look_at(target),
            ControlCommand::AnimateTo { goal, duration } => {
                let duration = duration.unwrap_or(self.camera.default_transition());
                self.camera.animate_to_position(goal, duration, now);
            }
            ControlCommand::AnimateToRadius { radius, duration } => {
                let duration = duration.unwrap_or(self.camera.default_transition());
                self.camera.animate_to_radius(radius, duration, now);
            }
            ControlCommand::Preset(preset) => {
                debug!(%preset, "moving to view preset");
                let duration = self.camera.default_transition();
                self.camera.animate_to_position(preset.goal(), duration, now);
            }
            ControlCommand::CancelAnimation => self.camera.cancel_animation(),
            ControlCommand::Pause => self.clock.pause(),
            ControlCommand::Resume => self.clock.resume(),
            ControlCommand::TogglePause => {
                let paused = self.clock.toggle_pause();
                info!(paused, "simulation pause toggled");
            }
            ControlCommand::ResetTime => {
                self.clock.reset();
                info!("simulation time reset");
            }
            ControlCommand::SetTimeSpeed(speed) => {
                if let Err(error) = self.clock.set_time_speed(speed) {
                    warn!(%error, "time speed unchanged");
                    return Err(error.into());
                }
            }
            ControlCommand::SetQuality(name) => {
                if let Some(change) = self.governor.request_quality(&name)? {
                    info!(from = %change.from, to = %change.to, "quality set");
                    self.broadcast_quality(change.to);
                }
            }
            ControlCommand::ToggleMomentum => {
                let enabled = !self.camera.momentum_enabled();
                self.camera.set_momentum(enabled);
            }
            ControlCommand::ToggleAdaptive => {
                let adaptive = !self.governor.is_adaptive();
                self.governor.set_adaptive(adaptive);
                info!(adaptive, "adaptive quality toggled");
            }
        }
        Ok(())
    }

    pub fn get_info(&self) -> LoopInfo {
        LoopInfo {
            running: self.is_running(),
            paused: self.clock.is_paused(),
            simulation_time: self.clock.simulation_time(),
            time_speed: self.clock.time_speed(),
            frame_count: self.stats.frames,
            fixed_step_count: self.stats.fixed_steps,
            accumulator: self.accumulator,
            alpha: self.alpha,
            camera: self.camera.info(),
        }
    }

    pub fn get_performance_report(&self) -> PerformanceReport {
        PerformanceReport {
            quality: self.governor.quality(),
            adaptive: self.governor.is_adaptive(),
            frame_count: self.stats.frames,
            average_frame_ms: self.governor.rolling_average_ms(),
            last_window_average_ms: self.governor.last_window_average_ms(),
            fps: self.governor.fps(),
            min_frame_ms: self.governor.min_frame_ms(),
            max_frame_ms: self.governor.max_frame_ms(),
            quality_changes: self.governor.changes(),
            clamped_frames: self.stats.clamped_frames,
            sub_step_cap_hits: self.stats.cap_hits,
            collaborator_failures: self.collaborators.total_failures(),
            render_failures: self.stats.render_failures,
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn governor(&self) -> &PerformanceGovernor {
        &self.governor
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    pub fn fixed_step_count(&self) -> u64 {
        self.stats.fixed_steps
    }

    pub fn frame_count(&self) -> u64 {
        self.stats.frames
    }
}
