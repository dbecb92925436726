//! reactive-api-core: value types and target capabilities (core, host-agnostic)

pub mod json_float;
pub mod scene;
pub mod target;
pub mod value;
pub mod write_ops;

pub use scene::{AnimatorState, LocalTransform, MaterialState, SceneObject, EMISSION_COLOR_PROPERTY};
pub use target::{AnimatorAccess, MaterialAccess, PropertyId, Target, TransformAccess};
pub use value::{
    vec3_add, vec3_scale, ColorRgba, Value, ValueKind, Vec2, Vec3, BLACK, CLEAR, VEC3_ONE,
    VEC3_ZERO, WHITE,
};
pub use write_ops::{Channel, WriteBatch, WriteOp};
