//! The render trigger: invoked exactly once per frame after all updates.

use tracing::debug;
use uranus_camera::CameraView;
use uranus_sim::QualityLevel;

/// Everything a renderer needs from the loop for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderView<'a> {
    pub frame: u64,
    pub camera: &'a CameraView,
    /// Interpolation fraction between the last two fixed steps.
    pub alpha: f64,
    pub simulation_time: f64,
    pub quality: QualityLevel,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),
}

pub trait Renderer {
    fn render(&mut self, view: &RenderView<'_>) -> Result<(), RenderError>;
}

/// Headless renderer that logs a summary every `interval` frames.
#[derive(Debug, Default)]
pub struct LogRenderer {
    interval: u64,
    rendered: u64,
}

impl LogRenderer {
    /// `interval` of zero never logs.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            rendered: 0,
        }
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, view: &RenderView<'_>) -> Result<(), RenderError> {
        self.rendered += 1;
        if self.interval > 0 && view.frame % self.interval == 0 {
            let p = view.camera.position;
            debug!(
                frame = view.frame,
                sim_time = view.simulation_time,
                alpha = view.alpha,
                quality = %view.quality,
                paused = view.paused,
                "camera at ({:.2}, {:.2}, {:.2})",
                p.x,
                p.y,
                p.z
            );
        }
        Ok(())
    }
}
