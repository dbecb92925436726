//! Curve and gradient sampling.
//!
//! Model:
//! - Curve keys are ordered by time. Segment [Ki -> K(i+1)] is a cubic Hermite using
//!   Ki.out_tangent and K(i+1).in_tangent; an infinite tangent on either end steps.
//! - Outside the keyed range the boundary key's value holds (constant extrapolation).
//! - Gradients sample color and alpha keys separately over a clamped [0, 1] domain.

use crate::data::{AlphaKey, ColorKey, Gradient, GradientMode, Keyframe};
use crate::interp::functions::{hermite, inverse_lerp, lerp_f32, lerp_rgb};
use reactive_api_core::ColorRgba;

/// Find the segment [i, i+1] that contains `time`, and return (i, i+1, local_t).
/// Edge cases:
/// - If time <= first.time, returns (0, 0, 0) and the caller picks keys[0].
/// - If time >= last.time, returns (last, last, 0) and the caller picks keys[last].
fn find_segment(keys: &[Keyframe], time: f32) -> (usize, usize, f32) {
    let n = keys.len();
    if n == 0 {
        return (0, 0, 0.0);
    }
    if n == 1 || time <= keys[0].time {
        return (0, 0, 0.0);
    }
    if time >= keys[n - 1].time {
        return (n - 1, n - 1, 0.0);
    }
    // first key strictly after `time`; it exists and is not keys[0] given the checks above
    let right = keys.partition_point(|k| k.time <= time);
    let left = right - 1;
    let lt = inverse_lerp(keys[left].time, keys[right].time, time);
    (left, right, lt)
}

/// Sample ordered curve keys at `time`.
pub fn sample_curve(keys: &[Keyframe], time: f32) -> f32 {
    match keys.len() {
        // No keys: neutral 0.0 (fail-soft).
        0 => 0.0,
        1 => keys[0].value,
        _ => {
            // NaN input: no meaningful segment, let it flow.
            if time.is_nan() {
                return f32::NAN;
            }
            let (i0, i1, lt) = find_segment(keys, time);
            if i0 == i1 {
                return keys[i0].value;
            }
            let left = &keys[i0];
            let right = &keys[i1];
            if left.out_tangent.is_infinite() || right.in_tangent.is_infinite() {
                return left.value;
            }
            let dt = right.time - left.time;
            hermite(
                left.value,
                left.out_tangent,
                right.value,
                right.in_tangent,
                lt,
                dt,
            )
        }
    }
}

fn sample_rgb(keys: &[ColorKey], mode: GradientMode, t: f32) -> [f32; 3] {
    let Some(first) = keys.first() else {
        return [1.0, 1.0, 1.0];
    };
    if t <= first.time {
        return first.color;
    }
    let right = keys.partition_point(|k| k.time < t);
    if right >= keys.len() {
        return keys[keys.len() - 1].color;
    }
    match mode {
        GradientMode::Fixed => keys[right].color,
        GradientMode::Blend => {
            let (a, b) = (&keys[right - 1], &keys[right]);
            lerp_rgb(a.color, b.color, inverse_lerp(a.time, b.time, t))
        }
    }
}

fn sample_alpha(keys: &[AlphaKey], mode: GradientMode, t: f32) -> f32 {
    let Some(first) = keys.first() else {
        return 1.0;
    };
    if t <= first.time {
        return first.alpha;
    }
    let right = keys.partition_point(|k| k.time < t);
    if right >= keys.len() {
        return keys[keys.len() - 1].alpha;
    }
    match mode {
        GradientMode::Fixed => keys[right].alpha,
        GradientMode::Blend => {
            let (a, b) = (&keys[right - 1], &keys[right]);
            lerp_f32(a.alpha, b.alpha, inverse_lerp(a.time, b.time, t))
        }
    }
}

/// Sample a gradient at `time`, clamped to `[0, 1]`.
pub fn sample_gradient(gradient: &Gradient, time: f32) -> ColorRgba {
    let t = if time.is_nan() { 0.0 } else { time.clamp(0.0, 1.0) };
    let rgb = sample_rgb(&gradient.color_keys, gradient.mode, t);
    let a = sample_alpha(&gradient.alpha_keys, gradient.mode, t);
    [rgb[0], rgb[1], rgb[2], a]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AnimationCurve;

    #[test]
    fn find_segment_brackets_time() {
        let keys = vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0),
            Keyframe::new(3.0, 0.0),
        ];
        assert_eq!(find_segment(&keys, -1.0), (0, 0, 0.0));
        assert_eq!(find_segment(&keys, 5.0), (2, 2, 0.0));
        let (i0, i1, lt) = find_segment(&keys, 2.0);
        assert_eq!((i0, i1), (1, 2));
        assert!((lt - 0.5).abs() < 1e-6);
    }

    #[test]
    fn stepped_segment_holds_left_value() {
        let curve = AnimationCurve::new(vec![
            Keyframe::with_tangents(0.0, 2.0, 0.0, f32::INFINITY),
            Keyframe::new(1.0, 8.0),
        ]);
        assert_eq!(curve.evaluate(0.5), 2.0);
        assert_eq!(curve.evaluate(1.0), 8.0);
    }

    #[test]
    fn empty_and_single_key_curves() {
        assert_eq!(sample_curve(&[], 3.0), 0.0);
        assert_eq!(sample_curve(&[Keyframe::new(4.0, 7.0)], -10.0), 7.0);
    }

    #[test]
    fn nan_input_flows_through() {
        let curve = AnimationCurve::linear(0.0, 0.0, 1.0, 1.0);
        assert!(curve.evaluate(f32::NAN).is_nan());
    }
}
