//! Linear rescaling of raw metrics onto the unit interval.

/// Maps `value` onto `[0, 1]` given the observed `min`/`max` of its metric.
///
/// When `min == max` every candidate is tied on this metric, so it cannot
/// differentiate them: the function returns `1.0` unconditionally and the
/// metric contributes full credit to everyone. Otherwise the value is
/// rescaled linearly, and flipped when `invert` is set (for metrics where
/// smaller is better, latency and cost).
///
/// Pure function of its four inputs.
#[must_use]
pub fn normalize(value: f64, min: f64, max: f64, invert: bool) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return 1.0;
    }

    let scaled = (value - min) / range;
    if invert { 1.0 - scaled } else { scaled }
}
