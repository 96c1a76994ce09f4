//! Magnetosphere glow: a visual-only effect animated by frame time.

use std::f64::consts::TAU;

use uranus_math::normalize_angle;
use uranus_sim::{CollaboratorError, FrameContext, FrameUpdate, QualityAdjustable, QualityLevel};

/// Tilt of the magnetic dipole from the rotation axis, in radians.
pub const DIPOLE_TILT: f64 = 59.0 * std::f64::consts::PI / 180.0;

/// Pulses per second of wall-clock time.
const PULSE_RATE: f64 = 0.25;

#[derive(Clone, Debug)]
pub struct Magnetosphere {
    /// Pulse phase in `[0, TAU)`. Advances even while the simulation is paused.
    pub phase: f64,
    pub field_lines: u32,
}

impl Magnetosphere {
    pub fn new(quality: QualityLevel) -> Self {
        Self {
            phase: 0.0,
            field_lines: Self::field_lines_for(quality),
        }
    }

    pub fn field_lines_for(quality: QualityLevel) -> u32 {
        match quality {
            QualityLevel::Low => 8,
            QualityLevel::Medium => 16,
            QualityLevel::High => 32,
        }
    }

    /// Shell opacity for the current phase.
    pub fn opacity(&self) -> f64 {
        0.35 + 0.15 * self.phase.sin()
    }
}

impl FrameUpdate for Magnetosphere {
    fn update(&mut self, ctx: &FrameContext) -> Result<(), CollaboratorError> {
        self.phase = normalize_angle(self.phase + ctx.delta * PULSE_RATE * TAU);
        Ok(())
    }
}

impl QualityAdjustable for Magnetosphere {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.field_lines = Self::field_lines_for(level);
        Ok(())
    }
}
