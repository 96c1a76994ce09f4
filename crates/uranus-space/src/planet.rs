//! Uranus itself: axial spin driven by simulation time.

use std::f64::consts::TAU;

use glam::DQuat;
use uranus_math::normalize_angle;
use uranus_sim::{CollaboratorError, FixedContext, QualityAdjustable, QualityLevel, SimulationStep};

/// Sidereal rotation period in days (17 h 14 min, retrograde).
pub const ROTATION_PERIOD_DAYS: f64 = 0.718_33;

/// Obliquity in radians (97.77 degrees).
pub const AXIAL_TILT: f64 = 97.77 * std::f64::consts::PI / 180.0;

#[derive(Clone, Debug)]
pub struct Planet {
    /// Spin angle about the planet's own axis, in `[0, TAU)`.
    pub rotation: f64,
    /// Longitude/latitude segments of the sphere mesh.
    pub segments: u32,
}

impl Planet {
    pub fn new(quality: QualityLevel) -> Self {
        Self {
            rotation: 0.0,
            segments: Self::segments_for(quality),
        }
    }

    pub fn segments_for(quality: QualityLevel) -> u32 {
        match quality {
            QualityLevel::Low => 32,
            QualityLevel::Medium => 64,
            QualityLevel::High => 128,
        }
    }

    /// Spin angle at an absolute simulation time. Retrograde, so negative.
    pub fn rotation_at(time_days: f64) -> f64 {
        normalize_angle(-TAU * time_days / ROTATION_PERIOD_DAYS)
    }

    /// Tilt followed by spin.
    pub fn orientation(&self) -> DQuat {
        DQuat::from_rotation_z(AXIAL_TILT) * DQuat::from_rotation_y(self.rotation)
    }
}

impl SimulationStep for Planet {
    fn step(&mut self, ctx: &FixedContext) -> Result<(), CollaboratorError> {
        // Derived from absolute time, so reverse or frozen time stays consistent.
        self.rotation = Self::rotation_at(ctx.simulation_time);
        Ok(())
    }
}

impl QualityAdjustable for Planet {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.segments = Self::segments_for(level);
        log::debug!("planet segments -> {}", self.segments);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(time: f64) -> FixedContext {
        FixedContext {
            step: 1.0 / 60.0,
            scaled_step: 1.0 / 60.0,
            simulation_time: time,
            time_speed: 1.0,
        }
    }

    #[test]
    fn test_full_rotation_after_one_period() {
        let mut planet = Planet::new(QualityLevel::High);
        planet.step(&ctx(ROTATION_PERIOD_DAYS * 0.25)).unwrap();
        let quarter = planet.rotation;
        planet.step(&ctx(ROTATION_PERIOD_DAYS * 1.25)).unwrap();
        assert!((planet.rotation - quarter).abs() < 1e-9);
        assert!((quarter - 0.75 * TAU).abs() < 1e-9);
    }

    #[test]
    fn test_quality_changes_segments() {
        let mut planet = Planet::new(QualityLevel::High);
        planet.update_quality(QualityLevel::Low).unwrap();
        assert_eq!(planet.segments, 32);
    }

    #[test]
    fn test_orientation_tilts_axis_past_the_ecliptic() {
        let planet = Planet::new(QualityLevel::Low);
        let axis = planet.orientation() * glam::DVec3::Y;
        // 97.77 degrees of tilt puts the spin axis slightly below the plane.
        assert!(axis.y < 0.0 && axis.y > -0.2);
    }
}
