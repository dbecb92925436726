//! In-memory reference target.
//!
//! `SceneObject` implements every capability over plain data and keeps a [`WriteBatch`]
//! of each write in application order. Hosts without their own object model (tools,
//! headless previews, tests) can drive a graph against it and replay the writes.

use hashbrown::HashMap;

use crate::target::{AnimatorAccess, MaterialAccess, PropertyId, Target, TransformAccess};
use crate::write_ops::{Channel, WriteBatch, WriteOp};
use crate::{ColorRgba, Value, Vec3, VEC3_ONE, VEC3_ZERO, WHITE};

/// Name of the emission color property on standard materials.
pub const EMISSION_COLOR_PROPERTY: &str = "_EmissionColor";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub euler_angles: Vec3,
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: VEC3_ZERO,
            euler_angles: VEC3_ZERO,
            scale: VEC3_ONE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaterialState {
    pub color: ColorRgba,
    colors: HashMap<String, ColorRgba>,
    /// Interned property names; a `PropertyId` indexes into this list.
    property_names: Vec<String>,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            color: WHITE,
            colors: HashMap::new(),
            property_names: Vec::new(),
        }
    }
}

impl MaterialState {
    pub fn get_color(&self, name: &str) -> Option<ColorRgba> {
        self.colors.get(name).copied()
    }

    fn intern(&mut self, name: &str) -> PropertyId {
        if let Some(idx) = self.property_names.iter().position(|n| n == name) {
            return PropertyId(idx as u32);
        }
        self.property_names.push(name.to_string());
        PropertyId((self.property_names.len() - 1) as u32)
    }

    fn name_of(&self, id: PropertyId) -> Option<&str> {
        self.property_names.get(id.0 as usize).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default)]
pub struct AnimatorState {
    floats: HashMap<String, f32>,
}

impl AnimatorState {
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }
}

/// A target over plain data.
///
/// Every write is appended to a log until [`take_writes`](Self::take_writes) drains it.
/// Hosts that tick for a long time must drain it regularly, or bound it with
/// [`with_write_limit`](Self::with_write_limit) / [`without_write_log`](Self::without_write_log).
/// Writes past the limit still update the state; they are only counted, not logged.
#[derive(Clone, Debug, Default)]
pub struct SceneObject {
    pub name: String,
    pub transform: Option<LocalTransform>,
    pub material: Option<MaterialState>,
    pub animator: Option<AnimatorState>,
    writes: WriteBatch,
    write_limit: Option<usize>,
    dropped_writes: usize,
}

impl SceneObject {
    /// An object with no capabilities at all.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// An object with a default transform, a white material and an animator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Some(LocalTransform::default()),
            material: Some(MaterialState::default()),
            animator: Some(AnimatorState::default()),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: LocalTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn without_material(mut self) -> Self {
        self.material = None;
        self
    }

    pub fn without_animator(mut self) -> Self {
        self.animator = None;
        self
    }

    /// Log at most `limit` writes between drains.
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Apply writes without logging them.
    pub fn without_write_log(self) -> Self {
        self.with_write_limit(0)
    }

    pub fn writes(&self) -> &WriteBatch {
        &self.writes
    }

    /// Writes applied but not logged since the last drain.
    pub fn dropped_writes(&self) -> usize {
        self.dropped_writes
    }

    /// Drain the write log, e.g. once per tick.
    pub fn take_writes(&mut self) -> WriteBatch {
        self.dropped_writes = 0;
        std::mem::take(&mut self.writes)
    }

    /// The channel is built only when the write is logged.
    fn record(&mut self, channel: impl FnOnce() -> Channel, value: Value) {
        if self.write_limit.is_some_and(|limit| self.writes.len() >= limit) {
            self.dropped_writes += 1;
            return;
        }
        self.writes.push(WriteOp::new(channel(), value));
    }

    fn local(&self) -> LocalTransform {
        self.transform.unwrap_or_default()
    }
}

impl TransformAccess for SceneObject {
    fn local_position(&self) -> Vec3 {
        self.local().position
    }

    fn set_local_position(&mut self, value: Vec3) {
        if let Some(t) = self.transform.as_mut() {
            t.position = value;
            self.record(|| Channel::LocalPosition, Value::Vec3(value));
        }
    }

    fn local_euler_angles(&self) -> Vec3 {
        self.local().euler_angles
    }

    fn set_local_euler_angles(&mut self, value: Vec3) {
        if let Some(t) = self.transform.as_mut() {
            t.euler_angles = value;
            self.record(|| Channel::LocalRotation, Value::Vec3(value));
        }
    }

    fn local_scale(&self) -> Vec3 {
        self.local().scale
    }

    fn set_local_scale(&mut self, value: Vec3) {
        if let Some(t) = self.transform.as_mut() {
            t.scale = value;
            self.record(|| Channel::LocalScale, Value::Vec3(value));
        }
    }
}

impl MaterialAccess for SceneObject {
    fn set_color(&mut self, color: ColorRgba) {
        if let Some(m) = self.material.as_mut() {
            m.color = color;
            self.record(|| Channel::MaterialColor, Value::ColorRgba(color));
        }
    }

    fn property_id(&mut self, name: &str) -> PropertyId {
        match self.material.as_mut() {
            Some(m) => m.intern(name),
            None => PropertyId(u32::MAX),
        }
    }

    fn set_color_by_id(&mut self, id: PropertyId, color: ColorRgba) {
        let Some(name) = self
            .material
            .as_ref()
            .and_then(|m| m.name_of(id))
            .map(str::to_string)
        else {
            return;
        };
        self.set_color_named(&name, color);
    }

    fn set_color_named(&mut self, name: &str, color: ColorRgba) {
        if let Some(m) = self.material.as_mut() {
            m.colors.insert(name.to_string(), color);
            self.record(
                || Channel::MaterialProperty(name.to_string()),
                Value::ColorRgba(color),
            );
        }
    }
}

impl AnimatorAccess for SceneObject {
    fn set_float(&mut self, name: &str, value: f32) {
        if let Some(a) = self.animator.as_mut() {
            a.floats.insert(name.to_string(), value);
            self.record(|| Channel::AnimatorFloat(name.to_string()), Value::Float(value));
        }
    }
}

impl Target for SceneObject {
    fn transform(&self) -> Option<&dyn TransformAccess> {
        if self.transform.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn transform_mut(&mut self) -> Option<&mut dyn TransformAccess> {
        if self.transform.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn material_mut(&mut self) -> Option<&mut dyn MaterialAccess> {
        if self.material.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn animator_mut(&mut self) -> Option<&mut dyn AnimatorAccess> {
        if self.animator.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_ids_are_stable_per_name() {
        let mut obj = SceneObject::new("cube");
        let a = obj.property_id(EMISSION_COLOR_PROPERTY);
        let b = obj.property_id("_Tint");
        assert_ne!(a, b);
        assert_eq!(obj.property_id(EMISSION_COLOR_PROPERTY), a);

        obj.set_color_by_id(a, [0.5, 0.5, 0.5, 1.0]);
        let material = obj.material.as_ref().unwrap();
        assert_eq!(
            material.get_color(EMISSION_COLOR_PROPERTY),
            Some([0.5, 0.5, 0.5, 1.0])
        );
    }

    #[test]
    fn missing_capabilities_are_reported_and_ignored() {
        let mut obj = SceneObject::empty("ghost");
        assert!(obj.transform().is_none());
        assert!(obj.material_mut().is_none());
        assert!(obj.animator_mut().is_none());

        obj.set_local_position([1.0, 0.0, 0.0]);
        obj.set_float("speed", 1.0);
        assert!(obj.writes().is_empty());
    }

    #[test]
    fn writes_are_logged_in_order() {
        let mut obj = SceneObject::new("cube");
        obj.set_local_scale([2.0, 2.0, 2.0]);
        obj.set_float("speed", 0.25);
        obj.set_color(crate::BLACK);

        let writes = obj.take_writes().into_vec();
        let channels: Vec<_> = writes.iter().map(|w| w.channel.clone()).collect();
        assert_eq!(
            channels,
            vec![
                Channel::LocalScale,
                Channel::AnimatorFloat("speed".into()),
                Channel::MaterialColor
            ]
        );
        assert!(obj.writes().is_empty());
    }

    #[test]
    fn write_log_can_be_bounded() {
        let mut obj = SceneObject::new("cube").with_write_limit(2);
        for i in 0..5 {
            obj.set_float("speed", i as f32);
        }
        assert_eq!(obj.writes().len(), 2);
        assert_eq!(obj.dropped_writes(), 3);
        assert_eq!(obj.animator.as_ref().unwrap().get_float("speed"), Some(4.0));

        assert_eq!(obj.take_writes().len(), 2);
        assert_eq!(obj.dropped_writes(), 0);
        obj.set_local_position([1.0, 0.0, 0.0]);
        assert_eq!(obj.writes().len(), 1);

        let mut silent = SceneObject::new("quiet").without_write_log();
        silent.set_color(crate::BLACK);
        assert!(silent.writes().is_empty());
        assert_eq!(silent.dropped_writes(), 1);
        assert_eq!(silent.material.as_ref().unwrap().color, crate::BLACK);
    }
}
