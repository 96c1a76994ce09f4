//! `uranus-viewer`: runs the animation core headless for a fixed number of
//! frames and prints the resulting statistics.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use uranus_app::platform::{PlatformDirs, PlatformError};
use uranus_app::{
    AnimationLoop, ControlCommand, LogRenderer, LoopError, LoopInfo, PacedHost,
    PerformanceReport, ViewPreset,
};
use uranus_config::{CliArgs, Config, ConfigError};
use uranus_sim::QualityLevel;
use uranus_space::UranusSystem;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Loop(#[from] LoopError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct FinalReport {
    info: LoopInfo,
    performance: PerformanceReport,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("uranus-viewer: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(root) => PlatformDirs::with_root(root),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;

    uranus_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Uranus viewer starting");

    // The governor reports an unknown name; the bodies just start at the default.
    let quality = config
        .performance
        .initial_quality
        .parse::<QualityLevel>()
        .unwrap_or_default();
    let system = UranusSystem::new(&config, quality);

    let host = PacedHost::new(config.demo.target_fps);
    let renderer = LogRenderer::new(config.debug.report_interval_frames);
    let mut animation = AnimationLoop::new(&config, host, renderer, system.collaborators())?;

    animation.start();
    for frame in 0..config.demo.frames {
        if let Some(command) = demo_command(frame, config.demo.frames) {
            if let Err(e) = animation.apply(command) {
                error!("demo command rejected: {e}");
            }
        }
        if !animation.pump() {
            break;
        }
    }
    animation.stop();

    let report = FinalReport {
        info: animation.get_info(),
        performance: animation.get_performance_report(),
    };
    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let perf = &report.performance;
        info!(
            frames = perf.frame_count,
            fps = perf.fps,
            quality = %perf.quality,
            sim_days = report.info.simulation_time,
            collaborator_failures = perf.collaborator_failures,
            "run complete"
        );
    }
    Ok(())
}

/// Scripted tour: visit each preset in turn with a slow drift in between.
fn demo_command(frame: u64, total: u64) -> Option<ControlCommand> {
    let leg = (total / ViewPreset::ALL.len() as u64).max(1);
    if frame % leg == 0 {
        let index = (frame / leg) as usize;
        return ViewPreset::ALL.get(index).copied().map(ControlCommand::Preset);
    }
    if frame % leg > leg * 3 / 4 {
        return Some(ControlCommand::Rotate {
            azimuth: 0.002,
            polar: 0.0,
        });
    }
    None
}
