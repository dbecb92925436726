//! Interpolation helpers:
//! - lerp_f32 / lerp_rgb / lerp_color (component-wise linear blend)
//! - inverse_lerp (position of a value inside a range)
//! - hermite (cubic Hermite segment with per-end tangents)

use reactive_api_core::ColorRgba;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_color(a: ColorRgba, b: ColorRgba, t: f32) -> ColorRgba {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// Normalized position of `v` in `[a, b]`, clamped to `[0, 1]`. A degenerate range yields 0.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    let denom = b - a;
    if denom.abs() <= f32::EPSILON {
        return 0.0;
    }
    ((v - a) / denom).clamp(0.0, 1.0)
}

/// Cubic Hermite segment.
///
/// `p0`/`p1` are the end values, `m0`/`m1` the slopes (value per unit time) leaving `p0`
/// and arriving at `p1`, `t` the local parameter in `[0, 1]` and `dt` the segment length
/// in time units (slopes are scaled by it).
#[inline]
pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32, dt: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * p0 + h10 * m0 * dt + h01 * p1 + h11 * m1 * dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_hits_endpoints() {
        assert_eq!(hermite(2.0, 5.0, 7.0, -3.0, 0.0, 1.0), 2.0);
        assert!((hermite(2.0, 5.0, 7.0, -3.0, 1.0, 1.0) - 7.0).abs() < 1e-6);
    }

    #[test]
    fn hermite_with_linear_slopes_is_linear() {
        // slope 1 over a segment of length 2: 0 -> 2
        let mid = hermite(0.0, 1.0, 2.0, 1.0, 0.5, 2.0);
        assert!((mid - 1.0).abs() < 1e-6);
    }

    #[test]
    fn inverse_lerp_handles_degenerate_range() {
        assert_eq!(inverse_lerp(1.0, 1.0, 5.0), 0.0);
        assert_eq!(inverse_lerp(0.0, 4.0, 1.0), 0.25);
        assert_eq!(inverse_lerp(0.0, 4.0, 9.0), 1.0);
    }
}
