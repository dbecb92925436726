//! Reactive Animation Core (host-agnostic)
//!
//! Scalar animation curves and color gradients, the two keyed data types node
//! parameters sample every tick. Sampling never allocates.

pub mod data;
pub mod interp;
pub mod sampling;

pub use data::{AlphaKey, AnimationCurve, ColorKey, CurveError, Gradient, GradientMode, Keyframe};
pub use sampling::{sample_curve, sample_gradient};
