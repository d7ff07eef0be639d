//! Portal: a five-phase entrance effect for dropping a hero onto the board.
//!
//! Phases run `Opening → Hold → Emerging → Breath → Closing`, each with its
//! own duration and easing, transitioning automatically when the phase's
//! duration elapses. `on_hero_emerge` fires exactly once at Hold→Emerging so
//! the scene can place the hero token; `on_complete` fires exactly once at
//! Emerging→Breath, intentionally *before* the visual close finishes, so
//! dependent UI can proceed while the portal winds down asynchronously.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use super::draw_quad;
use crate::render::Renderer;
use crate::tween::easing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalPhase {
    Opening,
    Hold,
    Emerging,
    Breath,
    Closing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    pub opening_ms: f32,
    pub hold_ms: f32,
    pub emerging_ms: f32,
    pub breath_ms: f32,
    pub closing_ms: f32,
    /// Ring radius at full scale, world units.
    pub radius: f32,
    /// Number of motes swirling on the ring.
    pub ring_count: usize,
    pub color: [f32; 3],
    /// Mote orbit speed, radians per second.
    pub swirl_speed: f32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            opening_ms: 450.0,
            hold_ms: 300.0,
            emerging_ms: 500.0,
            breath_ms: 400.0,
            closing_ms: 450.0,
            radius: 26.0,
            ring_count: 24,
            color: [0.55, 0.35, 0.95],
            swirl_speed: 2.5,
        }
    }
}

struct RingMote {
    angle: f32,
    /// Radial wobble offset, fraction of the radius.
    wobble: f32,
    size: f32,
}

/// Five-phase portal state machine.
pub struct PortalEffect {
    origin: Vec2,
    config: PortalConfig,
    phase: PortalPhase,
    phase_elapsed_ms: f32,
    elapsed_s: f32,
    done: bool,
    on_hero_emerge: Option<Box<dyn FnOnce()>>,
    on_complete: Option<Box<dyn FnOnce()>>,
    ring: Vec<RingMote>,
}

impl PortalEffect {
    pub fn new(
        origin: Vec2,
        config: &PortalConfig,
        seed: u64,
        on_hero_emerge: Option<Box<dyn FnOnce()>>,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let ring = (0..config.ring_count)
            .map(|i| RingMote {
                angle: i as f32 / config.ring_count.max(1) as f32 * std::f32::consts::TAU,
                wobble: rng.gen_range(-0.08..0.08),
                size: rng.gen_range(2.0..4.5),
            })
            .collect();
        Self {
            origin,
            config: config.clone(),
            phase: PortalPhase::Opening,
            phase_elapsed_ms: 0.0,
            elapsed_s: 0.0,
            done: false,
            on_hero_emerge,
            on_complete,
            ring,
        }
    }

    pub fn phase(&self) -> PortalPhase {
        self.phase
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn particle_count(&self) -> usize {
        if self.done { 0 } else { self.ring.len() }
    }

    fn phase_duration(&self, phase: PortalPhase) -> f32 {
        match phase {
            PortalPhase::Opening => self.config.opening_ms,
            PortalPhase::Hold => self.config.hold_ms,
            PortalPhase::Emerging => self.config.emerging_ms,
            PortalPhase::Breath => self.config.breath_ms,
            PortalPhase::Closing => self.config.closing_ms,
        }
    }

    /// Advance the state machine; false once the close finishes, at which
    /// point `destroy` has already run.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.done {
            return false;
        }
        self.elapsed_s += delta_ms / 1000.0;
        self.phase_elapsed_ms += delta_ms;

        // A large delta may cross several phases in one tick; transitions
        // (and their one-shot callbacks) still happen in order
        loop {
            let duration = self.phase_duration(self.phase).max(0.0);
            if self.phase_elapsed_ms < duration {
                break;
            }
            self.phase_elapsed_ms -= duration;
            match self.phase {
                PortalPhase::Opening => self.phase = PortalPhase::Hold,
                PortalPhase::Hold => {
                    if let Some(on_hero_emerge) = self.on_hero_emerge.take() {
                        on_hero_emerge();
                    }
                    self.phase = PortalPhase::Emerging;
                }
                PortalPhase::Emerging => {
                    if let Some(on_complete) = self.on_complete.take() {
                        on_complete();
                    }
                    self.phase = PortalPhase::Breath;
                }
                PortalPhase::Breath => self.phase = PortalPhase::Closing,
                PortalPhase::Closing => {
                    self.destroy();
                    return false;
                }
            }
        }
        true
    }

    /// Settle pending one-shot callbacks (in order) and drop the ring.
    ///
    /// A portal torn down early still owes its transitions to dependent work.
    pub fn destroy(&mut self) {
        if let Some(on_hero_emerge) = self.on_hero_emerge.take() {
            on_hero_emerge();
        }
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
        self.ring.clear();
        self.done = true;
    }

    /// Current ring scale in `[0, ~1.15]`, eased per phase.
    pub fn ring_scale(&self) -> f32 {
        let duration = self.phase_duration(self.phase);
        let t = if duration <= 0.0 {
            1.0
        } else {
            (self.phase_elapsed_ms / duration).clamp(0.0, 1.0)
        };
        match self.phase {
            PortalPhase::Opening => easing::ease_out_cubic(t),
            PortalPhase::Hold => 1.0,
            PortalPhase::Emerging => 1.0 + 0.15 * easing::half_sine(t),
            PortalPhase::Breath => 1.0 + 0.08 * easing::half_sine(t),
            PortalPhase::Closing => 1.0 - easing::ease_in_quad(t),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        if self.done {
            return;
        }
        let scale = self.ring_scale();
        let radius = self.config.radius * scale;
        if radius <= 0.0 {
            return;
        }
        let color = self.config.color;
        let alpha = scale.min(1.0) * 0.9;

        // Ring outline
        let segments = 32;
        let mut outline = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            outline.push(self.origin + Vec2::new(a.cos(), a.sin()) * radius);
        }
        renderer.stroke_polyline(&outline, 2.0, [color[0], color[1], color[2], alpha]);

        // Swirling motes
        let swirl = self.elapsed_s * self.config.swirl_speed;
        for mote in &self.ring {
            let angle = mote.angle + swirl;
            let r = radius * (1.0 + mote.wobble);
            let pos = self.origin + Vec2::new(angle.cos(), angle.sin()) * r;
            draw_quad(
                renderer,
                pos,
                mote.size * scale.min(1.0),
                angle,
                [color[0], color[1], color[2], alpha],
            );
        }
    }
}
