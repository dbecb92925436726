//! Capabilities a host object exposes to processors.
//!
//! A target is the object whose properties a graph modifies. Each capability is optional;
//! processors that need an absent capability simply do nothing.

use crate::{ColorRgba, Vec3};

/// Opaque handle for a material property, resolved once from its name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyId(pub u32);

/// Local-space transform of the target.
pub trait TransformAccess {
    fn local_position(&self) -> Vec3;
    fn set_local_position(&mut self, value: Vec3);
    /// Local rotation as Euler angles in degrees.
    fn local_euler_angles(&self) -> Vec3;
    fn set_local_euler_angles(&mut self, value: Vec3);
    fn local_scale(&self) -> Vec3;
    fn set_local_scale(&mut self, value: Vec3);
}

/// The single material bound to a target.
pub trait MaterialAccess {
    /// Set the material's base color.
    fn set_color(&mut self, color: ColorRgba);
    /// Resolve a property name to a handle usable with [`MaterialAccess::set_color_by_id`].
    fn property_id(&mut self, name: &str) -> PropertyId;
    fn set_color_by_id(&mut self, id: PropertyId, color: ColorRgba);
    fn set_color_named(&mut self, name: &str, color: ColorRgba);
}

/// Named float parameters (animator-like).
pub trait AnimatorAccess {
    fn set_float(&mut self, name: &str, value: f32);
}

/// An object processors can read from and write into.
pub trait Target {
    fn transform(&self) -> Option<&dyn TransformAccess> {
        None
    }

    fn transform_mut(&mut self) -> Option<&mut dyn TransformAccess> {
        None
    }

    fn material_mut(&mut self) -> Option<&mut dyn MaterialAccess> {
        None
    }

    fn animator_mut(&mut self) -> Option<&mut dyn AnimatorAccess> {
        None
    }
}
