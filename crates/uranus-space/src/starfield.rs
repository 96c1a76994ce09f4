//! Background starfield: a deterministic catalogue from a seed, with twinkle.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uranus_sim::{CollaboratorError, FrameContext, FrameUpdate, QualityAdjustable, QualityLevel};

/// Distance of the star sphere from the origin, beyond the camera's reach.
pub const STAR_SPHERE_RADIUS: f64 = 2_000.0;

#[derive(Clone, Debug)]
pub struct Star {
    /// Unit direction on the sky sphere.
    pub direction: DVec3,
    /// Base brightness in `[0, 1]`; many dim stars, few bright ones.
    pub brightness: f64,
    /// Twinkle phase offset.
    pub phase: f64,
}

#[derive(Clone, Debug)]
pub struct Starfield {
    /// Full catalogue, sized for the highest quality.
    stars: Vec<Star>,
    visible: usize,
    /// Wall-clock seconds of twinkle animation.
    time: f64,
}

impl Starfield {
    pub fn new(seed: u64, quality: QualityLevel) -> Self {
        let capacity = Self::count_for(QualityLevel::High);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let stars = (0..capacity)
            .map(|_| {
                let theta = rng.random::<f64>() * TAU;
                let cos_phi = 1.0 - 2.0 * rng.random::<f64>();
                let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
                let direction =
                    DVec3::new(sin_phi * theta.sin(), cos_phi, sin_phi * theta.cos());
                Star {
                    direction,
                    brightness: rng.random::<f64>().powf(4.0),
                    phase: rng.random::<f64>() * TAU,
                }
            })
            .collect();
        Self {
            stars,
            visible: Self::count_for(quality),
            time: 0.0,
        }
    }

    pub fn count_for(quality: QualityLevel) -> usize {
        match quality {
            QualityLevel::Low => 1_500,
            QualityLevel::Medium => 4_000,
            QualityLevel::High => 10_000,
        }
    }

    /// Stars drawn at the current quality.
    pub fn visible_stars(&self) -> &[Star] {
        &self.stars[..self.visible]
    }

    /// Brightness of a visible star including twinkle.
    pub fn brightness_at(&self, index: usize) -> Option<f64> {
        self.visible_stars().get(index).map(|star| {
            let twinkle = 0.85 + 0.15 * (self.time * 3.0 + star.phase).sin();
            star.brightness * twinkle
        })
    }
}

impl FrameUpdate for Starfield {
    fn update(&mut self, ctx: &FrameContext) -> Result<(), CollaboratorError> {
        self.time += ctx.delta;
        Ok(())
    }
}

impl QualityAdjustable for Starfield {
    fn update_quality(&mut self, level: QualityLevel) -> Result<(), CollaboratorError> {
        self.visible = Self::count_for(level).min(self.stars.len());
        log::debug!("visible stars -> {}", self.visible);
        Ok(())
    }
}
