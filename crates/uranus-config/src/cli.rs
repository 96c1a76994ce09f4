//! Command-line argument parsing for the viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Uranus viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "uranus-viewer", about = "Uranus system viewer")]
pub struct CliArgs {
    /// Number of frames to run.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Frame pacing target in frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Simulation time multiplier.
    #[arg(long, allow_hyphen_values = true)]
    pub time_speed: Option<f64>,

    /// Initial quality level (low, medium, high).
    #[arg(long)]
    pub quality: Option<String>,

    /// Disable adaptive quality.
    #[arg(long)]
    pub no_adaptive: bool,

    /// Start with the simulation clock paused.
    #[arg(long)]
    pub paused: bool,

    /// Enable camera momentum.
    #[arg(long)]
    pub momentum: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the final performance report as JSON.
    #[arg(long)]
    pub report_json: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Call [`Config::validate`] afterwards; overrides are not checked here.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(fps) = args.fps {
            self.demo.target_fps = fps;
        }
        if let Some(speed) = args.time_speed {
            self.simulation.time_speed = speed;
        }
        if let Some(ref quality) = args.quality {
            self.performance.initial_quality = quality.clone();
        }
        if args.no_adaptive {
            self.performance.adaptive = false;
        }
        if args.paused {
            self.simulation.start_paused = true;
        }
        if args.momentum {
            self.camera.momentum = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            frames: Some(120),
            time_speed: Some(50.0),
            no_adaptive: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.demo.frames, 120);
        assert!((config.simulation.time_speed - 50.0).abs() < f64::EPSILON);
        assert!(!config.performance.adaptive);
        // Non-overridden fields retain defaults
        assert_eq!(config.demo.target_fps, 60);
        assert!(!config.camera.momentum);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_negative_time_speed() {
        let args = CliArgs::try_parse_from(["uranus-viewer", "--time-speed", "-3"]).unwrap();
        assert_eq!(args.time_speed, Some(-3.0));
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "uranus-viewer",
            "--quality",
            "low",
            "--paused",
            "--report-json",
        ])
        .unwrap();
        assert_eq!(args.quality.as_deref(), Some("low"));
        assert!(args.paused);
        assert!(args.report_json);
        assert!(!args.momentum);
    }
}
