//! Value: the small set of runtime quantities processors write into a target.
//! All numeric types use f32, matching the scalar threaded through a graph.

use serde::{Deserialize, Serialize};

/// 2D vector (authoring positions, curve tangent handles).
pub type Vec2 = [f32; 2];

/// 3D vector (local position, Euler angles in degrees, local scale).
pub type Vec3 = [f32; 3];

/// RGBA color (linear by convention).
pub type ColorRgba = [f32; 4];

pub const VEC3_ZERO: Vec3 = [0.0, 0.0, 0.0];
pub const VEC3_ONE: Vec3 = [1.0, 1.0, 1.0];

pub const WHITE: ColorRgba = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: ColorRgba = [0.0, 0.0, 0.0, 1.0];
pub const CLEAR: ColorRgba = [0.0, 0.0, 0.0, 0.0];

/// Component-wise sum.
#[inline]
pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Scale every component by `s`.
#[inline]
pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Lightweight kind enum for quick dispatch on a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Vec3,
    ColorRgba,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// 3D vector
    Vec3(Vec3),

    /// RGBA color
    ColorRgba(ColorRgba),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<ColorRgba> {
        match self {
            Value::ColorRgba(c) => Some(*c),
            _ => None,
        }
    }
}
