//! The five major moons on Keplerian orbits.

use glam::{DQuat, DVec3};
use uranus_sim::{CollaboratorError, FixedContext, QualityAdjustable, QualityLevel, SimulationStep};

use crate::km_to_scene;
use crate::orbital::OrbitalElements;
use crate::planet::AXIAL_TILT;

/// (name, semi-major axis km, eccentricity, inclination deg, period days, radius km)
const MOON_CATALOGUE: [(&str, f64, f64, f64, f64, f64); 5] = [
    ("Miranda", 129_390.0, 0.0013, 4.232, 1.413_479, 235.8),
    ("Ariel", 191_020.0, 0.0012, 0.260, 2.520_379, 578.9),
    ("Umbriel", 266_000.0, 0.0039, 0.205, 4.144_177, 584.7),
    ("Titania", 435_910.0, 0.0011, 0.340, 8.705_872, 788.4),
    ("Oberon", 583_520.0, 0.0014, 0.058, 13.463_239, 761.4),
];

#[derive(Clone, Debug)]
pub struct Moon {
    pub name: &'static str,
    pub orbit: OrbitalElements,
    /// Body radius in scene units.
    pub radius: f64,
    /// Position relative to the planet centre, in the tilted equatorial frame.
    pub position: DVec3,
    /// Tidally locked spin: the moon keeps one face towards Uranus.
    pub spin: f64,
}

#[derive(Clone, Debug)]
pub struct MoonSystem {
    pub moons: Vec<Moon>,
    /// Sphere segments per moon mesh.
    pub segments: u32,
}

impl MoonSystem {
    pub fn new(quality: QualityLevel) -> Self {
        let moons = MOON_CATALOGUE
            .iter()
            .enumerate()
            .map(|(i, &(name, a_km, e, inc_deg, period, r_km))| {
                let orbit = OrbitalElements {
                    semi_major_axis: km_to_scene(a_km),
                    eccentricity: e,
                    inclination: inc_deg.to_radians(),
                    longitude_ascending: 0.0,
                    argument_periapsis: 0.0,
                    // Spread the moons out so they don't start in a line.
                    mean_anomaly_epoch: i as f64 * 1.3,
                    period_days: period,
                };
                let position = Self::place(&orbit, 0.0);
                Moon {
                    name,
                    orbit,
                    radius: km_to_scene(r_km),
                    position,
                    spin: 0.0,
                }
            })
            .collect();
        Self {
            moons,
            segments: Self::segments_for(quality),
        }
    }

    pub fn segments_for(quality: QualityLevel) -> u32 {
        match quality {
            QualityLevel::Low => 12,
            QualityLevel::Medium => 24,
            QualityLevel::High => 48,
        }
    }

    pub fn moon(&self, name: &str) -> Option<&Moon> {
        self.moons.iter().find(|m| m.name == name)
    }

    /// Orbit position rotated into the planet's tilted equatorial frame.
    fn place(orbit: &OrbitalElements, time_days: f64) -> DVec3 {
        DQuat::from_rotation_z(AXIAL_TILT) * orbit.position_at(time_days)
    }
}

impl SimulationStep for MoonSystem {
    fn step(&mut self, ctx: &FixedContext) -> Result<(), CollaboratorError> {
        for moon in &mut self.moons {
            let position = Self::place(&moon.orbit, ctx.simulation_time);
            if !position.is_finite() {
                return Err(CollaboratorError::failed(format!(
                    "{} orbit produced a non-finite position",
                    moon.name
                )));
            }
            moon.position = position;
            moon.spin = moon.orbit.mean_anomaly(ctx.simulation_time);
        }
        Ok(())
    }
}

impl QualityAdjustable for MoonSystem {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.segments = Self::segments_for(level);
        log::debug!("moon segments -> {}", self.segments);
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
    fn test_moons_ordered_by_distance() {
        let system = MoonSystem::new(QualityLevel::High);
        let distances: Vec<f64> = system.moons.iter().map(|m| m.orbit.semi_major_axis).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(system.moons[0].name, "Miranda");
        assert_eq!(system.moons[4].name, "Oberon");
    }

    #[test]
    fn test_moons_move_with_simulation_time() {
        let mut system = MoonSystem::new(QualityLevel::High);
        system.step(&ctx(0.0)).unwrap();
        let before = system.moon("Ariel").unwrap().position;
        system.step(&ctx(0.5)).unwrap();
        let after = system.moon("Ariel").unwrap().position;
        assert!((after - before).length() > 1.0);
    }

    #[test]
    fn test_moon_distance_stays_near_semi_major_axis() {
        let mut system = MoonSystem::new(QualityLevel::High);
        for day in 0..20 {
            system.step(&ctx(day as f64 * 0.7)).unwrap();
            for moon in &system.moons {
                let ratio = moon.position.length() / moon.orbit.semi_major_axis;
                assert!((ratio - 1.0).abs() < 0.01, "{} ratio {ratio}", moon.name);
            }
        }
    }

    #[test]
    fn test_runaway_orbit_reports_failure() {
        let mut system = MoonSystem::new(QualityLevel::High);
        system.moons[2].orbit.period_days = 0.0;
        assert!(system.step(&ctx(1.0)).is_err());
    }
}
