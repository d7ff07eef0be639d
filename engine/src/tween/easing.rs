//! Easing curves used across the animation stack.
//!
//! Every function maps `t` in `[0, 1]` to `[0, 1]` with `f(0) = 0` and
//! `f(1) = 1`, except [`half_sine`], which is the pulse profile used by the
//! tracer effect (rises and returns to zero).

use std::f32::consts::PI;

/// Signature shared by all easing curves.
pub type EasingFn = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let u = t - 1.0;
    u * u * u + 1.0
}

/// Half-sine pulse: 0 at both ends, 1 at `t = 0.5`. Drives the tracer's
/// line-width/alpha oscillation and the portal's breath phase.
pub fn half_sine(t: f32) -> f32 {
    (t.clamp(0.0, 1.0) * PI).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_endpoints() {
        let curves: [EasingFn; 5] = [
            linear,
            ease_in_quad,
            ease_out_quad,
            ease_in_out_quad,
            ease_out_cubic,
        ];
        for curve in curves {
            assert_approx_eq!(curve(0.0), 0.0, 1e-6);
            assert_approx_eq!(curve(1.0), 1.0, 1e-6);
        }
    }

    #[test]
    fn test_half_sine_pulse() {
        assert_approx_eq!(half_sine(0.0), 0.0, 1e-6);
        assert_approx_eq!(half_sine(0.5), 1.0, 1e-6);
        assert_approx_eq!(half_sine(1.0), 0.0, 1e-5);
    }
}
