//! Spherical coordinates around a look-at target (y-up).

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A point on a sphere: distance, azimuth around +Y, polar angle from +Y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f64,
    /// Azimuth in radians, measured from +Z towards +X.
    pub theta: f64,
    /// Polar angle in radians, measured from +Y.
    pub phi: f64,
}

impl Spherical {
    pub const fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self { radius, theta, phi }
    }

    /// Cartesian offset from the origin.
    pub fn to_offset(&self) -> DVec3 {
        let sin_phi = self.phi.sin();
        DVec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    /// Recover spherical coordinates from a Cartesian offset.
    ///
    /// A zero offset yields radius 0 with both angles 0.
    pub fn from_offset(offset: DVec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }
}
