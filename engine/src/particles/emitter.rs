//! Burst emitter: N particles spawned at construction from a declarative
//! config, then left to run out.

use glam::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::{Particle, draw_particle};
use crate::render::Renderer;

/// Declarative description of a particle burst.
///
/// Variances are symmetric: a value is drawn uniformly from
/// `base ± variance`. Zero variance is exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterConfig {
    pub count: usize,
    pub lifetime_ms: f32,
    pub lifetime_variance_ms: f32,
    pub start_size: f32,
    pub end_size: f32,
    /// Scales start and end size together so a particle keeps its profile.
    pub size_variance: f32,
    /// One is picked per particle.
    pub colors: Vec<[f32; 3]>,
    pub start_alpha: f32,
    pub end_alpha: f32,
    /// World units per second.
    pub speed: f32,
    pub speed_variance: f32,
    /// Emission direction in radians (0 = +x, screen-right).
    pub direction_rad: f32,
    /// Half-angle of the emission cone.
    pub spread_rad: f32,
    /// +y is screen-down, so positive gravity pulls particles down.
    pub gravity: f32,
    /// Radians per second; each particle's spin is drawn from `±` this.
    pub rotation_speed: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            count: 12,
            lifetime_ms: 600.0,
            lifetime_variance_ms: 150.0,
            start_size: 5.0,
            end_size: 1.0,
            size_variance: 1.5,
            colors: vec![[1.0, 0.9, 0.6], [1.0, 0.75, 0.4]],
            start_alpha: 0.9,
            end_alpha: 0.0,
            speed: 40.0,
            speed_variance: 15.0,
            direction_rad: -std::f32::consts::FRAC_PI_2,
            spread_rad: std::f32::consts::PI,
            gravity: 30.0,
            rotation_speed: 2.0,
        }
    }
}

/// A one-shot burst of particles.
pub struct EmitterEffect {
    particles: Vec<Particle>,
}

impl EmitterEffect {
    pub fn new(origin: Vec2, config: &EmitterConfig, rng: &mut SmallRng) -> Self {
        let mut particles = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            particles.push(spawn_particle(origin, config, rng));
        }
        Self { particles }
    }

    /// Advance all particles; false once every particle has expired, at
    /// which point `destroy` has already run.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        self.particles.retain_mut(|p| p.integrate(delta_ms));
        if self.particles.is_empty() {
            self.destroy();
            return false;
        }
        true
    }

    pub fn destroy(&mut self) {
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for p in &self.particles {
            draw_particle(renderer, p);
        }
    }
}

fn spawn_particle(origin: Vec2, config: &EmitterConfig, rng: &mut SmallRng) -> Particle {
    let lifetime = (config.lifetime_ms + symmetric(rng, config.lifetime_variance_ms)).max(1.0);
    let angle = config.direction_rad + symmetric(rng, config.spread_rad);
    let speed = (config.speed + symmetric(rng, config.speed_variance)).max(0.0);
    let size_jitter = symmetric(rng, config.size_variance);
    let start_size = (config.start_size + size_jitter).max(0.1);
    let end_size = (config.end_size + size_jitter).max(0.0);
    let color = if config.colors.is_empty() {
        [1.0, 1.0, 1.0]
    } else {
        config.colors[rng.gen_range(0..config.colors.len())]
    };

    Particle {
        position: origin,
        velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
        life_ms: lifetime,
        max_life_ms: lifetime,
        size: start_size,
        start_size,
        end_size,
        color,
        alpha: config.start_alpha,
        start_alpha: config.start_alpha,
        end_alpha: config.end_alpha,
        rotation: symmetric(rng, std::f32::consts::PI),
        rotation_speed: symmetric(rng, config.rotation_speed),
        gravity: config.gravity,
    }
}

/// Uniform draw from `±magnitude`; exact zero when the magnitude is zero.
fn symmetric(rng: &mut SmallRng, magnitude: f32) -> f32 {
    if magnitude <= 0.0 {
        0.0
    } else {
        rng.gen_range(-magnitude..=magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn zero_variance_config() -> EmitterConfig {
        EmitterConfig {
            count: 8,
            lifetime_ms: 400.0,
            lifetime_variance_ms: 0.0,
            size_variance: 0.0,
            speed_variance: 0.0,
            spread_rad: 0.0,
            rotation_speed: 0.0,
            ..EmitterConfig::default()
        }
    }

    #[test]
    fn test_spawns_configured_count() {
        let effect = EmitterEffect::new(Vec2::ZERO, &EmitterConfig::default(), &mut rng());
        assert_eq!(effect.particles().len(), 12);
    }

    #[test]
    fn test_zero_variance_dies_exactly_once_after_max_life() {
        let mut effect = EmitterEffect::new(Vec2::ZERO, &zero_variance_config(), &mut rng());

        // Alive right up to the shared lifetime
        assert!(effect.update(399.0));
        assert_eq!(effect.particles().len(), 8);

        // One more millisecond kills every particle; destroy has run
        assert!(!effect.update(1.0));
        assert!(effect.particles().is_empty());
    }

    #[test]
    fn test_zero_spread_emits_along_direction() {
        let config = EmitterConfig {
            direction_rad: 0.0,
            ..zero_variance_config()
        };
        let effect = EmitterEffect::new(Vec2::ZERO, &config, &mut rng());
        for p in effect.particles() {
            assert!(p.velocity.x > 0.0);
            assert!(p.velocity.y.abs() < 1e-4);
        }
    }

    #[test]
    fn test_empty_color_set_falls_back_to_white() {
        let config = EmitterConfig {
            colors: Vec::new(),
            ..EmitterConfig::default()
        };
        let effect = EmitterEffect::new(Vec2::ZERO, &config, &mut rng());
        assert!(effect.particles().iter().all(|p| p.color == [1.0, 1.0, 1.0]));
    }
}
