//! Scalar helpers shared by the generation and simulation stages.

/// Linear remap of `v` from `[in_start, in_end]` to `[out_start, out_end]`.
///
/// Not clamped. A degenerate input range yields `out_start`.
#[inline]
pub fn remap(v: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    let span = in_end - in_start;
    if span.abs() <= f32::EPSILON || !span.is_finite() {
        return out_start;
    }
    out_start + (out_end - out_start) * (v - in_start) / span
}

/// Linear interpolation, `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
