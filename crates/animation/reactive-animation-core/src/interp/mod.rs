//! Interpolation helpers shared by curves and gradients.

pub mod functions;

pub use functions::{hermite, lerp_color, lerp_f32, lerp_rgb, inverse_lerp};
