//! Animation core of the Uranus viewer.
//!
//! [`AnimationLoop`] drives the simulation clock in fixed steps, updates the
//! orbit camera and visual collaborators once per frame, renders, and lets
//! the [`PerformanceGovernor`] trade detail for frame time.

pub mod controls;
pub mod game_loop;
pub mod governor;
pub mod host;
pub mod platform;
pub mod render;
pub mod report;

pub use controls::{ControlCommand, ControlError, ViewPreset};
pub use game_loop::{AnimationLoop, FrameSummary, LoopError, LoopState};
pub use governor::{PerformanceGovernor, QualityChange};
pub use host::{FrameHandle, FrameHost, ManualHost, PacedHost};
pub use render::{LogRenderer, RenderError, RenderView, Renderer};
pub use report::{LoopInfo, PerformanceReport};
