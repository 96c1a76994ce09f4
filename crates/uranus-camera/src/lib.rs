//! Orbit camera for the Uranus viewer.
//!
//! The camera is positioned by spherical coordinates around a movable target.
//! [`CameraController`] owns that state, clamps every input into its limits,
//! and runs its own wall-clock tween for animated transitions, independent of
//! the simulation's fixed step.

pub mod controller;
pub mod state;
pub mod tween;

pub use controller::CameraController;
pub use state::{CameraInfo, CameraLimits, CameraState, CameraView};
pub use tween::{AnimationTween, CameraGoal};
