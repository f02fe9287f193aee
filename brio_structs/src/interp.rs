//! Scalar interpolation helpers used by the animation timeline.

/// Clamp `value` into `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Linear interpolation from `start` to `end`; `t` is clamped to `[0, 1]`.
pub fn linear(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * clamp01(t)
}

/// Where `value` falls between `start` and `end`, clamped to `[0, 1]`.
pub fn inverse_linear(start: f64, end: f64, value: f64) -> f64 {
    clamp01((value - start) / (end - start))
}

/// Hermite-smoothed interpolation from `start` to `end`.
pub fn smoothstep(start: f64, end: f64, t: f64) -> f64 {
    let x = clamp01(t);
    linear(start, end, x * x * (3.0 - 2.0 * x))
}
