//! End-to-end properties of the animation core, driven through a
//! hand-stepped host.

use std::f64::consts::PI;
use std::time::Duration;

use glam::DVec3;
use uranus_app::{
    AnimationLoop, ControlCommand, FrameHost, FrameSummary, ManualHost, RenderError, RenderView,
    Renderer,
};
use uranus_camera::CameraGoal;
use uranus_config::Config;
use uranus_math::wrap_angle;
use uranus_sim::{
    Collaborator, CollaboratorError, CollaboratorSet, FixedContext, FrameContext, FrameUpdate,
    QualityAdjustable, QualityLevel, SimulationStep, shared,
};
use uranus_space::UranusSystem;

#[derive(Default)]
struct FrameCounter {
    frames: u64,
}

impl Renderer for FrameCounter {
    fn render(&mut self, _view: &RenderView<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Probe {
    steps: u64,
    frames: u64,
    level: Option<QualityLevel>,
}

impl SimulationStep for Probe {
    fn step(&mut self, _ctx: &FixedContext) -> Result<(), CollaboratorError> {
        self.steps += 1;
        Ok(())
    }
}

impl FrameUpdate for Probe {
    fn update(&mut self, _ctx: &FrameContext) -> Result<(), CollaboratorError> {
        self.frames += 1;
        Ok(())
    }
}

impl QualityAdjustable for Probe {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.level = Some(level);
        Ok(())
    }
}

struct Exploding;

impl FrameUpdate for Exploding {
    fn update(&mut self, _ctx: &FrameContext) -> Result<(), CollaboratorError> {
        panic!("effect blew up");
    }
}

type TestLoop = AnimationLoop<ManualHost, FrameCounter>;

fn build(config: &Config, collaborators: CollaboratorSet) -> TestLoop {
    let mut animation =
        AnimationLoop::new(config, ManualHost::default(), FrameCounter::default(), collaborators)
            .unwrap();
    animation.start();
    animation
}

fn run_frames(animation: &mut TestLoop, seconds: &[f64]) -> Vec<FrameSummary> {
    seconds
        .iter()
        .map(|&s| {
            animation
                .host_mut()
                .script([Duration::from_secs_f64(s)]);
            let now = animation.host_mut().wait_for_frame().unwrap();
            animation.on_frame(now).unwrap()
        })
        .collect()
}

#[test]
fn test_phi_stays_inside_limits_for_any_rotation() {
    let config = Config::default();
    let mut animation = build(&config, CollaboratorSet::new());
    for i in 0..500 {
        let polar = ((i * 37 % 101) as f64 - 50.0) * 0.07;
        let azimuth = (i as f64 * 0.91).sin() * 3.0;
        animation
            .apply(ControlCommand::Rotate { azimuth, polar })
            .unwrap();
        run_frames(&mut animation, &[0.016]);
        let phi = animation.camera().state().phi;
        assert!(phi >= config.camera.min_phi && phi <= config.camera.max_phi);
        assert!(phi > 0.0 && phi < PI);
    }
    animation
        .apply(ControlCommand::Rotate {
            azimuth: f64::NAN,
            polar: 1.0,
        })
        .unwrap();
    assert!(animation.camera().state().phi.is_finite());
}

#[test]
fn test_radius_stays_inside_limits_for_any_zoom() {
    let config = Config::default();
    let mut animation = build(&config, CollaboratorSet::new());
    let commands = [
        ControlCommand::Zoom(5.0),
        ControlCommand::Zoom(-0.99),
        ControlCommand::Zoom(-3.0),
        ControlCommand::SetZoom(1e9),
        ControlCommand::SetZoom(-10.0),
        ControlCommand::SetZoom(f64::INFINITY),
        ControlCommand::Zoom(0.3),
    ];
    for command in commands.into_iter().cycle().take(70) {
        animation.apply(command).unwrap();
        let radius = animation.camera().state().radius;
        assert!(radius >= config.camera.min_radius && radius <= config.camera.max_radius);
    }
}

#[test]
fn test_tween_hits_midpoint_and_converges() {
    let config = Config::default();
    let mut animation = build(&config, CollaboratorSet::new());
    let start = *animation.camera().state();

    let goal = CameraGoal::new(100.0, start.theta + 1.0 + 4.0 * PI, 60f64.to_radians())
        .with_target(DVec3::new(5.0, 0.0, 0.0));
    animation
        .apply(ControlCommand::AnimateTo {
            goal,
            duration: Some(Duration::from_secs(1)),
        })
        .unwrap();

    run_frames(&mut animation, &[0.25, 0.25]);
    let mid = *animation.camera().state();
    assert!(animation.camera().is_animating());
    assert!(mid.radius > start.radius && mid.radius < 100.0);
    assert!(mid.phi < start.phi && mid.phi > goal.phi);
    assert!(mid.theta > start.theta && mid.theta < start.theta + 1.0);
    assert!(mid.target.x > 0.0 && mid.target.x < 5.0);

    run_frames(&mut animation, &[0.016; 40]);
    let end = *animation.camera().state();
    assert!(!animation.camera().is_animating());
    assert!((end.radius - 100.0).abs() < 1e-9);
    assert!((end.phi - goal.phi).abs() < 1e-9);
    assert!(wrap_angle(end.theta - goal.theta).abs() < 1e-9);
    assert!((end.target - DVec3::new(5.0, 0.0, 0.0)).length() < 1e-9);
}

#[test]
fn test_angular_tween_takes_the_short_way() {
    let mut animation = build(&Config::default(), CollaboratorSet::new());
    let theta0 = animation.camera().state().theta;
    let goal = CameraGoal::new(60.0, theta0 + 1.9 * PI, 1.2);
    animation
        .apply(ControlCommand::AnimateTo {
            goal,
            duration: Some(Duration::from_secs(1)),
        })
        .unwrap();

    for frame in 0..70 {
        run_frames(&mut animation, &[0.016]);
        let theta = animation.camera().state().theta;
        assert!(theta <= theta0 + 1e-12, "frame {frame}: went the long way");
        assert!(theta0 - theta <= 0.1 * PI + 1e-9);
    }
    let theta = animation.camera().state().theta;
    assert!(wrap_angle(theta - (theta0 - 0.1 * PI)).abs() < 1e-9);
}

#[test]
fn test_fixed_steps_conserve_elapsed_time() {
    let config = Config::default();
    let mut animation = build(&config, CollaboratorSet::new());
    let pattern = [0.017, 0.015, 0.020, 0.016, 0.033, 0.008, 0.018, 0.05, 0.099];
    let deltas: Vec<f64> = pattern.iter().copied().cycle().take(270).collect();

    let summaries = run_frames(&mut animation, &deltas);
    let total: f64 = summaries.iter().map(|s| s.raw_delta).sum();
    let step = animation.fixed_step();

    assert!(summaries.iter().all(|s| !s.clamped && !s.hit_sub_step_cap));
    let accounted = animation.fixed_step_count() as f64 * step + animation.accumulator();
    assert!((accounted - total).abs() < 1e-9, "{accounted} vs {total}");
    assert!(animation.accumulator() >= 0.0 && animation.accumulator() < step);
}

#[test]
fn test_long_gap_is_bounded_by_sub_step_cap() {
    let config = Config::default();
    let mut animation = build(&config, CollaboratorSet::new());
    let summary = run_frames(&mut animation, &[10.0])[0];
    assert!(summary.clamped);
    assert!(summary.sub_steps <= config.simulation.max_sub_steps);
    assert!(animation.fixed_step_count() <= u64::from(config.simulation.max_sub_steps));
}

#[test]
fn test_governor_upgrades_and_broadcasts() {
    let mut config = Config::default();
    config.performance.initial_quality = "medium".to_string();
    let probe = shared(Probe::default());
    let mut set = CollaboratorSet::new();
    set.register(Collaborator::new("probe").with_quality(probe.clone()));
    let mut animation = build(&config, set);

    let changes: Vec<_> = run_frames(&mut animation, &[0.010; 60])
        .into_iter()
        .filter_map(|s| s.quality_change)
        .collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(animation.governor().quality(), QualityLevel::High);
    assert_eq!(probe.borrow().level, Some(QualityLevel::High));
}

#[test]
fn test_governor_downgrades_one_step_per_window() {
    let probe = shared(Probe::default());
    let mut set = CollaboratorSet::new();
    set.register(Collaborator::new("probe").with_quality(probe.clone()));
    let mut animation = build(&Config::default(), set);

    run_frames(&mut animation, &[0.040; 60]);
    assert_eq!(animation.governor().quality(), QualityLevel::Medium);
    assert_eq!(probe.borrow().level, Some(QualityLevel::Medium));

    run_frames(&mut animation, &[0.040; 59]);
    assert_eq!(animation.governor().quality(), QualityLevel::Medium);
    run_frames(&mut animation, &[0.040]);
    assert_eq!(animation.governor().quality(), QualityLevel::Low);
}

#[test]
fn test_unsupported_quality_request_keeps_level() {
    let mut animation = build(&Config::default(), CollaboratorSet::new());
    let result = animation.apply(ControlCommand::SetQuality("ultra".to_string()));
    assert!(result.is_err());
    assert_eq!(animation.governor().quality(), QualityLevel::High);
    assert!(animation.is_running());
}

#[test]
fn test_pause_freezes_time_but_camera_and_render_continue() {
    let probe = shared(Probe::default());
    let mut set = CollaboratorSet::new();
    set.register(
        Collaborator::new("probe")
            .with_simulation(probe.clone())
            .with_frame(probe.clone()),
    );
    let mut animation = build(&Config::default(), set);
    run_frames(&mut animation, &[0.02; 3]);
    animation.apply(ControlCommand::Pause).unwrap();

    let frozen = animation.clock().simulation_time();
    let steps_before = probe.borrow().steps;
    let state_before = *animation.camera().state();

    animation
        .apply(ControlCommand::Rotate {
            azimuth: 0.3,
            polar: 0.1,
        })
        .unwrap();
    animation.apply(ControlCommand::Zoom(0.5)).unwrap();
    animation
        .apply(ControlCommand::Pan { x: 20.0, y: -10.0 })
        .unwrap();
    run_frames(&mut animation, &[0.02; 30]);

    let state = *animation.camera().state();
    assert_eq!(animation.clock().simulation_time(), frozen);
    assert_eq!(probe.borrow().steps, steps_before);
    assert_eq!(probe.borrow().frames, 33);
    assert_eq!(animation.renderer().frames, 33);
    assert_ne!(state.theta, state_before.theta);
    assert!(state.radius > state_before.radius);
    assert_ne!(state.target, state_before.target);
}

#[test]
fn test_failing_collaborator_is_isolated() {
    let probe = shared(Probe::default());
    let mut set = CollaboratorSet::new();
    set.register(Collaborator::new("exploding").with_frame(shared(Exploding)));
    set.register(Collaborator::new("probe").with_frame(probe.clone()));
    let mut animation = build(&Config::default(), set);

    let summaries = run_frames(&mut animation, &[0.016; 5]);
    assert!(summaries.iter().all(|s| s.collaborator_failures == 1));
    assert_eq!(probe.borrow().frames, 5);
    assert_eq!(animation.renderer().frames, 5);
    assert_eq!(animation.get_performance_report().collaborator_failures, 5);
    assert!(animation.is_running());
}

#[test]
fn test_uranus_system_runs_cleanly() {
    let config = Config::default();
    let system = UranusSystem::new(&config, QualityLevel::High);
    let mut animation = build(&config, system.collaborators());
    let start = system.moons.borrow().moons[0].position;

    run_frames(&mut animation, &[1.0 / 60.0; 120]);

    let info = animation.get_info();
    assert!(info.simulation_time > 1.5);
    assert_eq!(animation.get_performance_report().collaborator_failures, 0);
    assert_ne!(system.moons.borrow().moons[0].position, start);
    assert!(system.magnetosphere.borrow().phase > 0.0);
}
