//! Tracer: draws a growing partial outline around a region, sparking at the
//! leading point, then pulses briefly once the loop closes.
//!
//! Completion is signaled when the trace closes, *before* the pulse and the
//! spark fade finish, so dependent work (a tile drop, an enemy reveal) can
//! start while the tracer is still lingering visually.

use glam::Vec2;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::{Particle, draw_particle};
use crate::render::Renderer;
use crate::tween::easing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracerConfig {
    /// Time to draw the full outline.
    pub duration_ms: f32,
    /// Length of the pulse sub-phase after the loop closes.
    pub pulse_duration_ms: f32,
    pub line_width: f32,
    /// Extra width at the pulse peak.
    pub pulse_width_boost: f32,
    pub color: [f32; 3],
    /// One spark is spawned at the leading point this often.
    pub spark_interval_ms: f32,
    pub spark_lifetime_ms: f32,
    pub spark_size: f32,
    pub spark_speed: f32,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            duration_ms: 900.0,
            pulse_duration_ms: 350.0,
            line_width: 2.0,
            pulse_width_boost: 3.0,
            color: [1.0, 0.85, 0.35],
            spark_interval_ms: 30.0,
            spark_lifetime_ms: 350.0,
            spark_size: 2.5,
            spark_speed: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TracerPhase {
    Tracing,
    Pulsing,
    /// Outline done, sparks still decaying.
    Fading,
}

/// Partial polygon-outline tracer.
pub struct TracerEffect {
    /// Closed loop: the last point connects back to the first.
    outline: Vec<Vec2>,
    /// Arc length from point 0 to each point, plus the closing segment.
    cumulative: Vec<f32>,
    total_len: f32,
    config: TracerConfig,
    phase: TracerPhase,
    /// Elapsed within the current phase.
    elapsed_ms: f32,
    on_complete: Option<Box<dyn FnOnce()>>,
    completion_fired: bool,
    sparks: Vec<Particle>,
    spark_timer_ms: f32,
    rng: SmallRng,
}

impl TracerEffect {
    pub fn new(
        outline: Vec<Vec2>,
        config: &TracerConfig,
        seed: u64,
        on_complete: Option<Box<dyn FnOnce()>>,
    ) -> Self {
        let mut cumulative = Vec::with_capacity(outline.len() + 1);
        let mut total = 0.0;
        cumulative.push(0.0);
        for i in 0..outline.len() {
            let next = outline[(i + 1) % outline.len()];
            total += outline[i].distance(next);
            cumulative.push(total);
        }
        Self {
            outline,
            cumulative,
            total_len: total,
            config: config.clone(),
            phase: TracerPhase::Tracing,
            elapsed_ms: 0.0,
            on_complete,
            completion_fired: false,
            sparks: Vec::new(),
            spark_timer_ms: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Drawn fraction of the outline, clamped to 1.
    pub fn progress(&self) -> f32 {
        match self.phase {
            TracerPhase::Tracing => {
                if self.config.duration_ms <= 0.0 {
                    1.0
                } else {
                    (self.elapsed_ms / self.config.duration_ms).min(1.0)
                }
            }
            _ => 1.0,
        }
    }

    /// Whether the trace has closed (completion has been signaled).
    pub fn completed(&self) -> bool {
        self.completion_fired
    }

    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    /// The point currently being drawn toward.
    pub fn leading_point(&self) -> Vec2 {
        let points = self.drawn_points();
        points.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// The partial outline up to the current progress, ready to stroke.
    pub fn drawn_points(&self) -> Vec<Vec2> {
        if self.outline.len() < 2 || self.total_len <= 0.0 {
            return self.outline.clone();
        }
        let target = self.progress() * self.total_len;
        let mut points = vec![self.outline[0]];
        for i in 0..self.outline.len() {
            let seg_start = self.cumulative[i];
            let seg_end = self.cumulative[i + 1];
            let a = self.outline[i];
            let b = self.outline[(i + 1) % self.outline.len()];
            if target >= seg_end {
                points.push(b);
            } else {
                let seg_len = seg_end - seg_start;
                if seg_len > 0.0 {
                    let t = (target - seg_start) / seg_len;
                    points.push(a.lerp(b, t));
                }
                break;
            }
        }
        points
    }

    /// Advance; false once the pulse is over and every spark has decayed,
    /// at which point `destroy` has already run.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        self.sparks.retain_mut(|p| p.integrate(delta_ms));

        match self.phase {
            TracerPhase::Tracing => {
                self.elapsed_ms += delta_ms;
                self.spawn_sparks(delta_ms);
                if self.progress() >= 1.0 {
                    self.fire_completion();
                    self.phase = TracerPhase::Pulsing;
                    self.elapsed_ms = 0.0;
                }
            }
            TracerPhase::Pulsing => {
                self.elapsed_ms += delta_ms;
                if self.elapsed_ms >= self.config.pulse_duration_ms {
                    self.phase = TracerPhase::Fading;
                }
            }
            TracerPhase::Fading => {
                if self.sparks.is_empty() {
                    self.destroy();
                    return false;
                }
            }
        }
        true
    }

    pub fn destroy(&mut self) {
        // Completion is owed even if the effect is torn down early
        self.fire_completion();
        self.sparks.clear();
    }

    fn fire_completion(&mut self) {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
        self.completion_fired = true;
    }

    fn spawn_sparks(&mut self, delta_ms: f32) {
        self.spark_timer_ms += delta_ms;
        while self.spark_timer_ms >= self.config.spark_interval_ms {
            self.spark_timer_ms -= self.config.spark_interval_ms;
            let origin = self.leading_point();
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.config.spark_speed * self.rng.gen_range(0.3..1.0);
            self.sparks.push(Particle {
                position: origin,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                life_ms: self.config.spark_lifetime_ms,
                max_life_ms: self.config.spark_lifetime_ms,
                size: self.config.spark_size,
                start_size: self.config.spark_size,
                end_size: 0.0,
                color: self.config.color,
                alpha: 1.0,
                start_alpha: 1.0,
                end_alpha: 0.0,
                rotation: 0.0,
                rotation_speed: 0.0,
                gravity: 0.0,
            });
        }
    }

    /// Pulse intensity in `[0, 1]`: a half-sine bump during the pulse
    /// sub-phase, zero otherwise.
    pub fn pulse_intensity(&self) -> f32 {
        match self.phase {
            TracerPhase::Pulsing if self.config.pulse_duration_ms > 0.0 => {
                easing::half_sine(self.elapsed_ms / self.config.pulse_duration_ms)
            }
            _ => 0.0,
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        if self.phase != TracerPhase::Fading && self.outline.len() >= 2 {
            let pulse = self.pulse_intensity();
            let width = self.config.line_width + self.config.pulse_width_boost * pulse;
            let alpha = 0.9 + 0.1 * pulse;
            let color = [self.config.color[0], self.config.color[1], self.config.color[2], alpha];
            renderer.stroke_polyline(&self.drawn_points(), width, color);
        }
        for spark in &self.sparks {
            draw_particle(renderer, spark);
        }
    }
}
