//! Curve and gradient data model.
//!
//! Both types keep their keys ordered by time; deserialization sorts them so a stored
//! asset with out-of-order keys still samples predictably.

use reactive_api_core::{json_float, ColorRgba};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by [`AnimationCurve::validate`] and [`Gradient::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("key {index} has a non-finite time or value")]
    NonFinite { index: usize },
    #[error("key {index} is earlier than the key before it")]
    Unordered { index: usize },
    #[error("gradient key {index} time {time} is outside [0, 1]")]
    OutOfRange { index: usize, time: f32 },
}

/// A single curve key. Tangents are slopes (value per unit time); an infinite tangent on
/// either end of a segment makes that segment hold its left value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    #[serde(with = "json_float")]
    pub time: f32,
    #[serde(with = "json_float")]
    pub value: f32,
    #[serde(default, with = "json_float")]
    pub in_tangent: f32,
    #[serde(default, with = "json_float")]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(time: f32, value: f32, in_tangent: f32, out_tangent: f32) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Scalar → scalar curve with constant extrapolation outside its keys.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "CurveRepr")]
pub struct AnimationCurve {
    pub keys: Vec<Keyframe>,
}

#[derive(Deserialize)]
struct CurveRepr {
    #[serde(default)]
    keys: Vec<Keyframe>,
}

impl From<CurveRepr> for AnimationCurve {
    fn from(repr: CurveRepr) -> Self {
        AnimationCurve::new(repr.keys)
    }
}

impl AnimationCurve {
    /// Build a curve, ordering the keys by time (stable for equal times).
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Flat curve holding `value` between `t0` and `t1`.
    pub fn constant(t0: f32, t1: f32, value: f32) -> Self {
        Self::new(vec![Keyframe::new(t0, value), Keyframe::new(t1, value)])
    }

    /// Straight line from `(t0, v0)` to `(t1, v1)`.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        let slope = if (t1 - t0).abs() > f32::EPSILON {
            (v1 - v0) / (t1 - t0)
        } else {
            0.0
        };
        Self::new(vec![
            Keyframe::with_tangents(t0, v0, slope, slope),
            Keyframe::with_tangents(t1, v1, slope, slope),
        ])
    }

    /// S-shaped curve from `(t0, v0)` to `(t1, v1)` with flat ends.
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        Self::new(vec![Keyframe::new(t0, v0), Keyframe::new(t1, v1)])
    }

    /// Insert a key keeping time order; returns its index.
    pub fn add_key(&mut self, key: Keyframe) -> usize {
        let idx = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(idx, key);
        idx
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the curve at `time`.
    pub fn evaluate(&self, time: f32) -> f32 {
        crate::sampling::sample_curve(&self.keys, time)
    }

    /// Check basic invariants (finite key data, non-decreasing times).
    pub fn validate(&self) -> Result<(), CurveError> {
        let mut last = f32::NEG_INFINITY;
        for (index, key) in self.keys.iter().enumerate() {
            if !key.time.is_finite() || !key.value.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if key.time < last {
                return Err(CurveError::Unordered { index });
            }
            last = key.time;
        }
        Ok(())
    }
}

/// How a gradient blends between keys.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradientMode {
    /// Linear blend between neighbouring keys.
    #[default]
    Blend,
    /// Hard steps: each key's value holds up to and including its time.
    Fixed,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ColorKey {
    #[serde(with = "json_float::array")]
    pub color: [f32; 3],
    #[serde(with = "json_float")]
    pub time: f32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AlphaKey {
    #[serde(with = "json_float")]
    pub alpha: f32,
    #[serde(with = "json_float")]
    pub time: f32,
}

/// Color gradient over a normalized `[0, 1]` domain. Color and alpha are keyed
/// independently.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "GradientRepr")]
pub struct Gradient {
    pub mode: GradientMode,
    pub color_keys: Vec<ColorKey>,
    pub alpha_keys: Vec<AlphaKey>,
}

#[derive(Deserialize)]
struct GradientRepr {
    #[serde(default)]
    mode: GradientMode,
    #[serde(default)]
    color_keys: Vec<ColorKey>,
    #[serde(default)]
    alpha_keys: Vec<AlphaKey>,
}

impl From<GradientRepr> for Gradient {
    fn from(repr: GradientRepr) -> Self {
        Gradient::new(repr.mode, repr.color_keys, repr.alpha_keys)
    }
}

impl Default for Gradient {
    /// Opaque white across the whole range.
    fn default() -> Self {
        Self::two_color([1.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0])
    }
}

impl Gradient {
    pub fn new(mode: GradientMode, mut color_keys: Vec<ColorKey>, mut alpha_keys: Vec<AlphaKey>) -> Self {
        color_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        alpha_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            mode,
            color_keys,
            alpha_keys,
        }
    }

    /// Blend from `start` at 0 to `end` at 1.
    pub fn two_color(start: ColorRgba, end: ColorRgba) -> Self {
        Self::new(
            GradientMode::Blend,
            vec![
                ColorKey {
                    color: [start[0], start[1], start[2]],
                    time: 0.0,
                },
                ColorKey {
                    color: [end[0], end[1], end[2]],
                    time: 1.0,
                },
            ],
            vec![
                AlphaKey {
                    alpha: start[3],
                    time: 0.0,
                },
                AlphaKey {
                    alpha: end[3],
                    time: 1.0,
                },
            ],
        )
    }

    /// A single color across the whole range.
    pub fn solid(color: ColorRgba) -> Self {
        Self::two_color(color, color)
    }

    /// Sample the gradient at `time` (clamped to `[0, 1]`).
    pub fn evaluate(&self, time: f32) -> ColorRgba {
        crate::sampling::sample_gradient(self, time)
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        let times = self
            .color_keys
            .iter()
            .map(|k| k.time)
            .chain(self.alpha_keys.iter().map(|k| k.time));
        for (index, time) in times.enumerate() {
            if !time.is_finite() {
                return Err(CurveError::NonFinite { index });
            }
            if !(0.0..=1.0).contains(&time) {
                return Err(CurveError::OutOfRange { index, time });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_sorts_keys() {
        let curve: AnimationCurve = serde_json::from_str(
            r#"{ "keys": [ { "time": 1.0, "value": 5.0 }, { "time": 0.0, "value": 1.0 } ] }"#,
        )
        .unwrap();
        assert_eq!(curve.keys[0].time, 0.0);
        assert_eq!(curve.keys[1].value, 5.0);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn infinite_tangents_survive_json() {
        let curve = AnimationCurve::new(vec![
            Keyframe::with_tangents(0.0, 0.0, 0.0, f32::INFINITY),
            Keyframe::new(1.0, 1.0),
        ]);
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.contains("\"inf\""));
        let back: AnimationCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }

    #[test]
    fn non_finite_keys_survive_json() {
        let curve = AnimationCurve {
            keys: vec![Keyframe::new(0.0, f32::NEG_INFINITY), Keyframe::new(f32::INFINITY, 1.0)],
        };
        let json = serde_json::to_string(&curve).unwrap();
        assert!(!json.contains("null"), "{json}");
        let back: AnimationCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
        assert_eq!(back.validate(), Err(CurveError::NonFinite { index: 0 }));

        let gradient = Gradient::new(
            GradientMode::Fixed,
            vec![ColorKey {
                color: [f32::INFINITY, 0.0, 0.0],
                time: 0.5,
            }],
            vec![AlphaKey {
                alpha: 1.0,
                time: f32::NAN,
            }],
        );
        let back: Gradient = serde_json::from_str(&serde_json::to_string(&gradient).unwrap()).unwrap();
        assert_eq!(back.color_keys, gradient.color_keys);
        assert!(back.alpha_keys[0].time.is_nan());
    }

    #[test]
    fn add_key_keeps_order() {
        let mut curve = AnimationCurve::linear(0.0, 0.0, 2.0, 2.0);
        let idx = curve.add_key(Keyframe::new(1.0, 9.0));
        assert_eq!(idx, 1);
        assert_eq!(curve.len(), 3);
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn validate_reports_bad_keys() {
        let curve = AnimationCurve {
            keys: vec![Keyframe::new(1.0, 0.0), Keyframe::new(0.0, 0.0)],
        };
        assert_eq!(curve.validate(), Err(CurveError::Unordered { index: 1 }));

        let gradient = Gradient::new(
            GradientMode::Blend,
            vec![ColorKey {
                color: [1.0, 0.0, 0.0],
                time: 1.5,
            }],
            vec![],
        );
        assert!(matches!(
            gradient.validate(),
            Err(CurveError::OutOfRange { index: 0, .. })
        ));
    }
}
