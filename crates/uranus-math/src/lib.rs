//! Interpolation and coordinate helpers for the orbit camera.
//!
//! Scalar and wrap-aware angular interpolation, easing curves, and the
//! spherical/Cartesian conversion used by the camera controller.

pub mod angle;
pub mod easing;
pub mod spherical;

pub use angle::{lerp, lerp_angle, normalize_angle, shortest_angle_delta, wrap_angle};
pub use easing::EasingFunction;
pub use spherical::Spherical;
