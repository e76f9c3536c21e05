//! Easing curves for visual smoothing
//!
//! Two curves are used by the engine: a cubic ease-out for blending away
//! reconciliation corrections, and a smoothstep for remote-sample
//! interpolation. Both clamp their input to [0, 1].

/// Linear blend between two scalars
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Cubic ease-out: fast at first, settling gently into the target
///
/// `1 - (1 - t)^3`, clamped to [0, 1].
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Hermite smoothstep `3t^2 - 2t^3`, clamped to [0, 1]
///
/// Zero slope at both ends, which hides sample boundaries when chaining
/// interpolation segments.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
