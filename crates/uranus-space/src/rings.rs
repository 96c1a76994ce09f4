//! The thirteen known rings, each revolving at its Keplerian rate.

use std::f64::consts::TAU;

use uranus_math::normalize_angle;
use uranus_sim::{CollaboratorError, FixedContext, QualityAdjustable, QualityLevel, SimulationStep};

use crate::{circular_period_days, km_to_scene};

/// Name and orbital radius in km, inner to outer.
const RING_CATALOGUE: [(&str, f64); 13] = [
    ("zeta", 38_000.0),
    ("6", 41_837.0),
    ("5", 42_234.0),
    ("4", 42_571.0),
    ("alpha", 44_718.0),
    ("beta", 45_661.0),
    ("eta", 47_176.0),
    ("gamma", 47_627.0),
    ("delta", 48_300.0),
    ("lambda", 50_023.0),
    ("epsilon", 51_149.0),
    ("nu", 67_300.0),
    ("mu", 97_700.0),
];

#[derive(Clone, Debug)]
pub struct Ring {
    pub name: &'static str,
    /// Radius in scene units.
    pub radius: f64,
    pub period_days: f64,
    /// Current rotation of the ring's particle pattern, in `[0, TAU)`.
    pub angle: f64,
}

#[derive(Clone, Debug)]
pub struct RingSystem {
    pub rings: Vec<Ring>,
    /// Particles drawn per ring.
    pub particles_per_ring: u32,
}

impl RingSystem {
    pub fn new(quality: QualityLevel) -> Self {
        let rings = RING_CATALOGUE
            .iter()
            .map(|&(name, km)| Ring {
                name,
                radius: km_to_scene(km),
                period_days: circular_period_days(km),
                angle: 0.0,
            })
            .collect();
        Self {
            rings,
            particles_per_ring: Self::particles_for(quality),
        }
    }

    pub fn particles_for(quality: QualityLevel) -> u32 {
        match quality {
            QualityLevel::Low => 200,
            QualityLevel::Medium => 800,
            QualityLevel::High => 2000,
        }
    }

    pub fn ring(&self, name: &str) -> Option<&Ring> {
        self.rings.iter().find(|r| r.name == name)
    }
}

impl SimulationStep for RingSystem {
    fn step(&mut self, ctx: &FixedContext) -> Result<(), CollaboratorError> {
        for ring in &mut self.rings {
            ring.angle = normalize_angle(TAU * ctx.simulation_time / ring.period_days);
        }
        Ok(())
    }
}

impl QualityAdjustable for RingSystem {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.particles_per_ring = Self::particles_for(level);
        log::debug!("ring particles per ring -> {}", self.particles_per_ring);
        Ok(())
    }
}
