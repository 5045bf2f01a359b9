use std::f64::consts::TAU;

/// Linearly re-map `v` from `[in_min, in_max]` onto `[out_min, out_max]` without clamping.
///
/// A zero-width input span is treated as a span of one so degenerate counts never produce
/// NaN or infinities.
pub fn map_range(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    let span = if span == 0.0 { 1.0 } else { span };
    out_min + (v - in_min) / span * (out_max - out_min)
}

/// Interpolate from `a` to `b` by `t`, unclamped.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Angle of vertex `j` out of `count` evenly spaced around a full turn.
pub fn ring_angle(j: usize, count: usize) -> f64 {
    map_range(j as f64, 0.0, count as f64, 0.0, TAU)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
