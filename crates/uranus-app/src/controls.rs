//! Semantic control commands, already translated from raw device input.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::time::Duration;

use glam::DVec3;
use uranus_camera::CameraGoal;
use uranus_sim::{ClockError, QualityError};
use uranus_space::planet::AXIAL_TILT;

/// Named camera positions around the planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPreset {
    /// Three-quarter view of the whole system.
    Overview,
    /// Edge-on to the rings.
    RingPlane,
    /// Down the spin axis, rings face-on.
    NorthPole,
    /// Low over the equatorial plane, close in.
    Equator,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [
        ViewPreset::Overview,
        ViewPreset::RingPlane,
        ViewPreset::NorthPole,
        ViewPreset::Equator,
    ];

    /// Camera goal for this preset, aimed at the planet centre.
    ///
    /// The spin axis is the world Y axis rotated by the axial tilt about Z, so
    /// the equatorial plane contains Z.
    pub fn goal(self) -> CameraGoal {
        let (radius, theta, phi) = match self {
            ViewPreset::Overview => (60.0, 0.6, 70f64.to_radians()),
            ViewPreset::RingPlane => (45.0, 0.0, FRAC_PI_2),
            ViewPreset::NorthPole => (50.0, -FRAC_PI_2, AXIAL_TILT),
            ViewPreset::Equator => (20.0, -FRAC_PI_2, AXIAL_TILT - FRAC_PI_2),
        };
        CameraGoal::new(radius, theta, phi).with_target(DVec3::ZERO)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewPreset::Overview => "overview",
            ViewPreset::RingPlane => "ring-plane",
            ViewPreset::NorthPole => "north-pole",
            ViewPreset::Equator => "equator",
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input the loop accepts between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlCommand {
    Rotate { azimuth: f64, polar: f64 },
    Zoom(f64),
    SetZoom(f64),
    Pan { x: f64, y: f64 },
    LookAt(DVec3),
    /// `None` uses the camera's default transition time.
    AnimateTo {
        goal: CameraGoal,
        duration: Option<Duration>,
    },
    AnimateToRadius {
        radius: f64,
        duration: Option<Duration>,
    },
    Preset(ViewPreset),
    CancelAnimation,
    Pause,
    Resume,
    TogglePause,
    ResetTime,
    SetTimeSpeed(f64),
    SetQuality(String),
    ToggleMomentum,
    ToggleAdaptive,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error(transparent)]
    Clock(#[from] ClockError),
    #[error(transparent)]
    Quality(#[from] QualityError),
}
