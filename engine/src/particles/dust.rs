//! Dust burst: a three-layer radial puff (background, mid, foreground) with
//! per-layer drag and turbulence, used for tile and enemy reveals.

use glam::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::{Particle, draw_particle};
use crate::render::Renderer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DustLayerConfig {
    pub count: usize,
    /// Velocity retained per 60fps frame; applied frame-rate independently.
    pub drag: f32,
    /// Turbulence acceleration magnitude, world units per second squared.
    pub turbulence: f32,
    /// Initial burst speed, world units per second.
    pub speed: f32,
    pub size: f32,
    pub lifetime_ms: f32,
    pub color: [f32; 3],
    pub start_alpha: f32,
    pub gravity: f32,
}

/// Layered burst description. Background particles are big, slow and dim;
/// foreground ones small, fast and bright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DustBurstConfig {
    pub background: DustLayerConfig,
    pub mid: DustLayerConfig,
    pub foreground: DustLayerConfig,
}

impl Default for DustBurstConfig {
    fn default() -> Self {
        Self {
            background: DustLayerConfig {
                count: 18,
                drag: 0.96,
                turbulence: 20.0,
                speed: 25.0,
                size: 7.0,
                lifetime_ms: 900.0,
                color: [0.55, 0.50, 0.42],
                start_alpha: 0.4,
                gravity: 8.0,
            },
            mid: DustLayerConfig {
                count: 12,
                drag: 0.92,
                turbulence: 35.0,
                speed: 40.0,
                size: 5.0,
                lifetime_ms: 700.0,
                color: [0.70, 0.64, 0.52],
                start_alpha: 0.6,
                gravity: 12.0,
            },
            foreground: DustLayerConfig {
                count: 8,
                drag: 0.88,
                turbulence: 55.0,
                speed: 60.0,
                size: 3.5,
                lifetime_ms: 500.0,
                color: [0.88, 0.82, 0.68],
                start_alpha: 0.85,
                gravity: 16.0,
            },
        }
    }
}

struct DustLayer {
    particles: Vec<Particle>,
    drag: f32,
    turbulence: f32,
    /// Per-layer turbulence phase offset so layers never swirl in sync.
    phase: f32,
}

/// Multi-layer dust burst effect.
pub struct DustBurstEffect {
    layers: Vec<DustLayer>,
    elapsed_ms: f32,
}

impl DustBurstEffect {
    pub fn new(origin: Vec2, config: &DustBurstConfig, rng: &mut SmallRng) -> Self {
        let layer_configs = [&config.background, &config.mid, &config.foreground];
        let layers = layer_configs
            .iter()
            .enumerate()
            .map(|(index, layer)| DustLayer {
                particles: spawn_layer(origin, layer, rng),
                drag: layer.drag,
                turbulence: layer.turbulence,
                phase: layer_phase(index),
            })
            .collect();
        Self {
            layers,
            elapsed_ms: 0.0,
        }
    }

    /// Advance all layers; false once every particle has expired, at which
    /// point `destroy` has already run.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        self.elapsed_ms += delta_ms;
        let dt = delta_ms / 1000.0;
        let time = self.elapsed_ms / 1000.0;

        for layer in &mut self.layers {
            // Frame-rate-independent drag, normalized to a 60fps frame
            let retention = layer.drag.powf(dt * 60.0);
            let swirl = time * 3.0 + layer.phase;
            for p in &mut layer.particles {
                p.velocity *= retention;
                p.velocity.x += (swirl + p.position.y * 0.05).sin() * layer.turbulence * dt;
                p.velocity.y += (swirl * 1.3 + p.position.x * 0.05).cos()
                    * layer.turbulence
                    * 0.5
                    * dt;
            }
            layer.particles.retain_mut(|p| p.integrate(delta_ms));
        }

        if self.layers.iter().all(|l| l.particles.is_empty()) {
            self.destroy();
            return false;
        }
        true
    }

    pub fn destroy(&mut self) {
        for layer in &mut self.layers {
            layer.particles.clear();
        }
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.particles.len()).sum()
    }

    /// Background first so the foreground layer is drawn on top.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for layer in &self.layers {
            for p in &layer.particles {
                draw_particle(renderer, p);
            }
        }
    }
}

fn spawn_layer(origin: Vec2, config: &DustLayerConfig, rng: &mut SmallRng) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = config.speed * rng.gen_range(0.4..1.0);
        let lifetime = config.lifetime_ms * rng.gen_range(0.7..1.1);
        particles.push(Particle {
            position: origin,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            life_ms: lifetime,
            max_life_ms: lifetime,
            size: config.size,
            start_size: config.size,
            end_size: config.size * 1.6,
            color: config.color,
            alpha: config.start_alpha,
            start_alpha: config.start_alpha,
            end_alpha: 0.0,
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            rotation_speed: rng.gen_range(-1.5..1.5),
            gravity: config.gravity,
        });
    }
    particles
}

/// Deterministic per-layer phase offset.
fn layer_phase(index: usize) -> f32 {
    ((index as f32 * 12.9898).sin() * 43758.547).fract() * std::f32::consts::TAU
}
