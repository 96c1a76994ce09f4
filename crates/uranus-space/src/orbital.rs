//! Simplified Keplerian orbits for the moons.

use std::f64::consts::TAU;

use glam::DVec3;

/// Newton-Raphson iterations for Kepler's equation. Uranian moons are nearly
/// circular, so this converges far below f64 precision.
const KEPLER_ITERATIONS: usize = 8;

/// Classical orbital elements. Angles in radians, time in days.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis in scene units.
    pub semi_major_axis: f64,
    /// Eccentricity in `[0, 1)`.
    pub eccentricity: f64,
    /// Inclination relative to the planet's equatorial plane.
    pub inclination: f64,
    pub longitude_ascending: f64,
    pub argument_periapsis: f64,
    pub mean_anomaly_epoch: f64,
    /// Orbital period in days.
    pub period_days: f64,
}

impl OrbitalElements {
    /// A circular, uninclined orbit.
    pub fn circular(semi_major_axis: f64, period_days: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity: 0.0,
            inclination: 0.0,
            longitude_ascending: 0.0,
            argument_periapsis: 0.0,
            mean_anomaly_epoch: 0.0,
            period_days,
        }
    }

    /// Mean anomaly at `time_days`, unwrapped.
    pub fn mean_anomaly(&self, time_days: f64) -> f64 {
        self.mean_anomaly_epoch + TAU * time_days / self.period_days
    }

    /// Solve `E - e sin E = M` for the eccentric anomaly.
    pub fn eccentric_anomaly(&self, mean_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let mut anomaly = mean_anomaly;
        for _ in 0..KEPLER_ITERATIONS {
            let residual = anomaly - e * anomaly.sin() - mean_anomaly;
            anomaly -= residual / (1.0 - e * anomaly.cos());
        }
        anomaly
    }

    /// Position relative to the planet at `time_days`, y-up, equatorial plane
    /// being XZ.
    pub fn position_at(&self, time_days: f64) -> DVec3 {
        let e = self.eccentricity;
        let ecc = self.eccentric_anomaly(self.mean_anomaly(time_days));

        let true_anomaly =
            2.0 * ((1.0 + e).sqrt() * (ecc / 2.0).sin()).atan2((1.0 - e).sqrt() * (ecc / 2.0).cos());
        let r = self.semi_major_axis * (1.0 - e * ecc.cos());

        // Argument of latitude, then rotate out of the orbital plane.
        let u = self.argument_periapsis + true_anomaly;
        let (sin_u, cos_u) = u.sin_cos();
        let (sin_o, cos_o) = self.longitude_ascending.sin_cos();
        let (sin_i, cos_i) = self.inclination.sin_cos();

        let x = r * (cos_o * cos_u - sin_o * sin_u * cos_i);
        let z = r * (sin_o * cos_u + cos_o * sin_u * cos_i);
        let y = r * (sin_u * sin_i);

        DVec3::new(x, y, z)
    }
}
