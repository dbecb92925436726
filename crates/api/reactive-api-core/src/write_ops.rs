//! Write operations recorded while processors mutate a target.
//!
//! WriteOp serializes to JSON as:
//!   { "channel": { "material_property": "_EmissionColor" }, "value": { "type": "colorrgba", "data": [1,0,0,1] } }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers. Hosts can replay a batch onto
//! their own scene objects; tests use it to observe every side effect of a tick.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The target property a write lands on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    LocalPosition,
    LocalRotation,
    LocalScale,
    /// The material's base color.
    MaterialColor,
    /// A named color property on the material.
    MaterialProperty(String),
    /// A named float parameter on the animator.
    AnimatorFloat(String),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::LocalPosition => write!(f, "transform.localPosition"),
            Channel::LocalRotation => write!(f, "transform.localEulerAngles"),
            Channel::LocalScale => write!(f, "transform.localScale"),
            Channel::MaterialColor => write!(f, "material.color"),
            Channel::MaterialProperty(name) => write!(f, "material.{name}"),
            Channel::AnimatorFloat(name) => write!(f, "animator.{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    pub channel: Channel,
    pub value: Value,
}

impl WriteOp {
    pub fn new(channel: Channel, value: Value) -> Self {
        Self { channel, value }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val = serde_json::to_string(&self.value).map_err(|_| fmt::Error)?;
        write!(f, "{{ channel: {}, value: {} }}", self.channel, val)
    }
}

/// A batch of write operations, in the order they were applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch(Vec::new())
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = WriteOp>) {
        self.0.extend(other);
    }

    pub fn into_vec(self) -> Vec<WriteOp> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes that landed on `channel`, oldest first.
    pub fn on<'a>(&'a self, channel: &'a Channel) -> impl Iterator<Item = &'a WriteOp> + 'a {
        self.0.iter().filter(move |op| &op.channel == channel)
    }

    pub fn append(&mut self, mut other: WriteBatch) {
        self.0.append(&mut other.0)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writeop_roundtrip_json() {
        let op = WriteOp::new(
            Channel::MaterialProperty("_EmissionColor".into()),
            Value::ColorRgba([1.0, 0.0, 0.0, 1.0]),
        );
        let s = serde_json::to_string(&op).unwrap();
        let parsed: WriteOp = serde_json::from_str(&s).unwrap();
        assert_eq!(op, parsed);
    }

    #[test]
    fn writebatch_filters_by_channel() {
        let mut b = WriteBatch::new();
        b.push(WriteOp::new(Channel::LocalScale, Value::Vec3([1.0; 3])));
        b.push(WriteOp::new(
            Channel::AnimatorFloat("speed".into()),
            Value::Float(0.5),
        ));
        b.push(WriteOp::new(Channel::LocalScale, Value::Vec3([2.0; 3])));
        assert_eq!(b.on(&Channel::LocalScale).count(), 2);
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn display_uses_channel_path() {
        let op = WriteOp::new(Channel::AnimatorFloat("blend".into()), Value::Float(1.0));
        assert_eq!(
            op.to_string(),
            r#"{ channel: animator.blend, value: {"type":"float","data":1.0} }"#
        );
    }
}
