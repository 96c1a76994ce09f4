//! Configuration for the Uranus system viewer.
//!
//! A single owned [`Config`] struct replaces shared mutable settings. It
//! persists to disk as RON, supports CLI overrides via clap, hot-reload
//! detection, and validates every numeric constraint the animation core
//! relies on.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, DemoConfig, PerformanceConfig, SimulationConfig,
};
pub use error::ConfigError;
