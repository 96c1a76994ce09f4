//! Configuration structs with sensible defaults and RON persistence.

use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
///
/// Owned by the application and handed to each component by reference at
/// construction. Nothing reads it through global lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fixed-step simulation and time-flow settings.
    pub simulation: SimulationConfig,
    /// Orbit camera limits and defaults.
    pub camera: CameraConfig,
    /// Adaptive quality governor settings.
    pub performance: PerformanceConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
    /// Headless demo driver settings.
    pub demo: DemoConfig,
}

/// Simulation clock and fixed-timestep settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation step in seconds.
    pub fixed_time_step: f64,
    /// Upper bound applied to each raw frame delta, in seconds.
    pub max_frame_time: f64,
    /// Maximum fixed steps executed in a single frame.
    pub max_sub_steps: u32,
    /// Multiplier applied to each fixed step before it reaches simulation time.
    pub time_speed: f64,
    /// Whether a negative `time_speed` (reverse time) is accepted.
    pub allow_reverse_time: bool,
    /// Largest accepted magnitude for `time_speed`.
    pub max_time_speed: f64,
    /// Start with the simulation clock paused.
    pub start_paused: bool,
}

/// Orbit camera configuration. Angles are in radians.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance from the target.
    pub radius: f64,
    /// Initial azimuth.
    pub theta: f64,
    /// Initial polar angle measured from world up.
    pub phi: f64,
    /// Closest allowed distance.
    pub min_radius: f64,
    /// Farthest allowed distance.
    pub max_radius: f64,
    /// Smallest polar angle. Must be strictly greater than zero.
    pub min_phi: f64,
    /// Largest polar angle. Must be strictly less than pi.
    pub max_phi: f64,
    /// Pan distance per screen unit, scaled by the current radius.
    pub pan_speed: f64,
    /// Keep rotating after input stops, decaying by `damping`.
    pub momentum: bool,
    /// Per-update velocity multiplier in momentum mode.
    pub damping: f64,
    /// Angular velocity below which momentum stops.
    pub velocity_epsilon: f64,
    /// Default duration of animated camera transitions, in seconds.
    pub transition_seconds: f64,
}

/// Performance governor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Let the governor change quality on its own.
    pub adaptive: bool,
    /// Quality level at startup: "low", "medium" or "high".
    pub initial_quality: String,
    /// Frames per evaluation window.
    pub window_frames: u32,
    /// Average frame time (ms) above which quality steps down.
    pub slow_frame_ms: f64,
    /// Average frame time (ms) below which quality may step up.
    pub fast_frame_ms: f64,
    /// Upgrades are suppressed when a window saw more slow frames than this.
    pub max_slow_frames_for_upgrade: u32,
    /// Number of recent frame times kept for reporting.
    pub sample_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Emit a performance summary every N frames (0 disables).
    pub report_interval_frames: u64,
}

/// Settings for the headless viewer binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to run before exiting.
    pub frames: u64,
    /// Frame pacing target.
    pub target_fps: u32,
    /// Seed for the procedural starfield.
    pub star_seed: u64,
}

// --- Default implementations ---

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_time_step: 1.0 / 60.0,
            max_frame_time: 0.1,
            max_sub_steps: 10,
            time_speed: 1.0,
            allow_reverse_time: false,
            max_time_speed: 1000.0,
            start_paused: false,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            theta: 0.0,
            phi: 75.0_f64.to_radians(),
            min_radius: 8.0,
            max_radius: 400.0,
            min_phi: 0.01,
            max_phi: PI - 0.01,
            pan_speed: 0.001,
            momentum: false,
            damping: 0.92,
            velocity_epsilon: 1e-5,
            transition_seconds: 1.5,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            initial_quality: "high".to_string(),
            window_frames: 60,
            slow_frame_ms: 33.3,
            fast_frame_ms: 16.7,
            max_slow_frames_for_upgrade: 3,
            sample_capacity: 120,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval_frames: 300,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            target_fps: 60,
            star_seed: 0x5552_414e_5553,
        }
    }
}

// --- Validation ---

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl SimulationConfig {
    /// Check the time-flow settings, including the sign policy for `time_speed`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_time_step.is_finite() && self.fixed_time_step > 0.0) {
            return Err(invalid("simulation.fixed_time_step", "must be > 0"));
        }
        if !(self.max_frame_time.is_finite() && self.max_frame_time > 0.0) {
            return Err(invalid("simulation.max_frame_time", "must be > 0"));
        }
        if self.max_sub_steps == 0 {
            return Err(invalid("simulation.max_sub_steps", "must be at least 1"));
        }
        if !(self.max_time_speed.is_finite() && self.max_time_speed > 0.0) {
            return Err(invalid("simulation.max_time_speed", "must be > 0"));
        }
        if !self.time_speed.is_finite() {
            return Err(invalid("simulation.time_speed", "must be finite"));
        }
        if self.time_speed < 0.0 && !self.allow_reverse_time {
            return Err(invalid(
                "simulation.time_speed",
                "negative speed requires allow_reverse_time",
            ));
        }
        if self.time_speed.abs() > self.max_time_speed {
            return Err(invalid(
                "simulation.time_speed",
                format!("magnitude exceeds max_time_speed {}", self.max_time_speed),
            ));
        }
        Ok(())
    }
}

impl CameraConfig {
    /// Check radius and polar limits, and that the initial state lies inside them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return Err(invalid("camera.min_radius", "must be > 0"));
        }
        if !(self.max_radius.is_finite() && self.max_radius >= self.min_radius) {
            return Err(invalid("camera.max_radius", "must be >= min_radius"));
        }
        if !(self.min_phi > 0.0 && self.max_phi < PI && self.min_phi < self.max_phi) {
            return Err(invalid(
                "camera.min_phi",
                "polar limits must satisfy 0 < min_phi < max_phi < pi",
            ));
        }
        if !(self.radius >= self.min_radius && self.radius <= self.max_radius) {
            return Err(invalid("camera.radius", "must lie within [min_radius, max_radius]"));
        }
        if !(self.phi >= self.min_phi && self.phi <= self.max_phi) {
            return Err(invalid("camera.phi", "must lie within [min_phi, max_phi]"));
        }
        if !self.theta.is_finite() {
            return Err(invalid("camera.theta", "must be finite"));
        }
        if !(self.pan_speed.is_finite() && self.pan_speed >= 0.0) {
            return Err(invalid("camera.pan_speed", "must be >= 0"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(invalid("camera.damping", "must lie in (0, 1)"));
        }
        if !(self.velocity_epsilon.is_finite() && self.velocity_epsilon >= 0.0) {
            return Err(invalid("camera.velocity_epsilon", "must be >= 0"));
        }
        if !(self.transition_seconds.is_finite() && self.transition_seconds >= 0.0) {
            return Err(invalid("camera.transition_seconds", "must be >= 0"));
        }
        Ok(())
    }
}

impl PerformanceConfig {
    /// Check the governor window and thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_frames == 0 {
            return Err(invalid("performance.window_frames", "must be at least 1"));
        }
        if !(self.fast_frame_ms > 0.0 && self.slow_frame_ms > self.fast_frame_ms) {
            return Err(invalid(
                "performance.slow_frame_ms",
                "thresholds must satisfy 0 < fast_frame_ms < slow_frame_ms",
            ));
        }
        if self.sample_capacity == 0 {
            return Err(invalid("performance.sample_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

impl Config {
    /// Validate every section.
    ///
    /// `performance.initial_quality` is not checked here; an unknown level is
    /// reported as a warning by the governor, which keeps its default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.camera.validate()?;
        self.performance.validate()?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("window_frames: 60"));
        assert!(ron_str.contains("max_sub_steps: 10"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(simulation: (), camera: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.performance, PerformanceConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_speed_rejected_without_reverse_time() {
        let mut config = Config::default();
        config.simulation.time_speed = -2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "simulation.time_speed",
                ..
            })
        ));

        config.simulation.allow_reverse_time = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_speed_accepted() {
        let mut config = Config::default();
        config.simulation.time_speed = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_above_maximum_rejected() {
        let mut config = Config::default();
        config.simulation.time_speed = 5000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_polar_limits_must_avoid_poles() {
        let mut config = Config::default();
        config.camera.min_phi = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.camera.max_phi = PI;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_radius_outside_limits_rejected() {
        let mut config = Config::default();
        config.camera.radius = config.camera.max_radius * 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_governor_thresholds_must_be_ordered() {
        let mut config = Config::default();
        config.performance.slow_frame_ms = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.simulation.time_speed = 25.0;
        config.camera.momentum = true;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.ron"),
            "(simulation: (max_sub_steps: 0))",
        )
        .unwrap();
        assert!(matches!(
            Config::load_or_create(dir.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.performance.adaptive = false;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_some());
        assert!(!result.unwrap().performance.adaptive);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
