//! The Uranus system as loop collaborators: planet, rings, moons,
//! magnetosphere and starfield.
//!
//! Simulation time is measured in days. Distances are scene units with the
//! planet's equatorial radius at [`PLANET_RADIUS`]. Each body owns only the
//! state the animation core drives (angles, positions, quality-dependent
//! detail); building meshes from it is the renderer's business.

pub mod magnetosphere;
pub mod moons;
pub mod orbital;
pub mod planet;
pub mod rings;
pub mod starfield;

use uranus_config::Config;
use uranus_sim::{Collaborator, CollaboratorSet, QualityLevel, Shared, shared};

pub use magnetosphere::Magnetosphere;
pub use moons::{Moon, MoonSystem};
pub use orbital::OrbitalElements;
pub use planet::Planet;
pub use rings::{Ring, RingSystem};
pub use starfield::{Star, Starfield};

/// Equatorial radius of Uranus in kilometres.
pub const URANUS_RADIUS_KM: f64 = 25_559.0;

/// Standard gravitational parameter of Uranus in km^3/s^2.
pub const URANUS_GM_KM3_S2: f64 = 5_793_939.0;

/// Scene-space radius of the planet.
pub const PLANET_RADIUS: f64 = 5.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert kilometres to scene units.
pub fn km_to_scene(km: f64) -> f64 {
    km * PLANET_RADIUS / URANUS_RADIUS_KM
}

/// Keplerian period in days of a circular orbit of radius `km` around Uranus.
pub fn circular_period_days(km: f64) -> f64 {
    std::f64::consts::TAU * (km.powi(3) / URANUS_GM_KM3_S2).sqrt() / SECONDS_PER_DAY
}

/// Handles to every body, so callers can inspect state after registering
/// them with the loop.
pub struct UranusSystem {
    pub planet: Shared<Planet>,
    pub rings: Shared<RingSystem>,
    pub moons: Shared<MoonSystem>,
    pub magnetosphere: Shared<Magnetosphere>,
    pub starfield: Shared<Starfield>,
}

impl UranusSystem {
    /// Build every body at the given quality.
    pub fn new(config: &Config, quality: QualityLevel) -> Self {
        Self {
            planet: shared(Planet::new(quality)),
            rings: shared(RingSystem::new(quality)),
            moons: shared(MoonSystem::new(quality)),
            magnetosphere: shared(Magnetosphere::new(quality)),
            starfield: shared(Starfield::new(config.demo.star_seed, quality)),
        }
    }

    /// Registrations in update order: orbital bodies first, effects after.
    pub fn collaborators(&self) -> CollaboratorSet {
        let mut set = CollaboratorSet::new();
        set.register(
            Collaborator::new("planet")
                .with_simulation(self.planet.clone())
                .with_quality(self.planet.clone()),
        );
        set.register(
            Collaborator::new("rings")
                .with_simulation(self.rings.clone())
                .with_quality(self.rings.clone()),
        );
        set.register(
            Collaborator::new("moons")
                .with_simulation(self.moons.clone())
                .with_quality(self.moons.clone()),
        );
        set.register(
            Collaborator::new("magnetosphere")
                .with_frame(self.magnetosphere.clone())
                .with_quality(self.magnetosphere.clone()),
        );
        set.register(
            Collaborator::new("starfield")
                .with_frame(self.starfield.clone())
                .with_quality(self.starfield.clone()),
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uranus_sim::Phase;

    #[test]
    fn test_km_to_scene_maps_planet_radius() {
        assert!((km_to_scene(URANUS_RADIUS_KM) - PLANET_RADIUS).abs() < 1e-12);
    }

    #[test]
    fn test_circular_period_matches_miranda() {
        // Miranda: a = 129,390 km, P = 1.4135 d.
        let p = circular_period_days(129_390.0);
        assert!((p - 1.4135).abs() < 0.01, "period {p}");
    }

    #[test]
    fn test_system_registers_every_body() {
        let system = UranusSystem::new(&Config::default(), QualityLevel::High);
        let set = system.collaborators();
        assert_eq!(set.len(), 5);
        let simulated: Vec<_> = set
            .iter()
            .filter(|c| c.has_phase(Phase::Simulation))
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(simulated, ["planet", "rings", "moons"]);
        assert!(set.iter().all(|c| c.has_phase(Phase::Quality)));
    }
}
