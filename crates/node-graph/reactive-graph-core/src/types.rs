//! Node data model.
//!
//! A node carries an id, a kind, an editor position and the parameters its kind needs.
//! On the wire a node is a flat JSON object:
//!
//! ```json
//! { "id": "n1", "kind": "math", "graph_position": [120.0, 40.0],
//!   "function": "add", "param1": 2.0, "param2": 1.0 }
//! ```
//!
//! Kind names that this build does not know load as pass-through nodes so an asset
//! authored by a newer editor still evaluates.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use reactive_animation_core::{AnimationCurve, Gradient};
use reactive_api_core::{json_float, Vec2, Vec3, VEC3_ZERO};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::error::GraphError;
use crate::processors::ProcessorKey;

pub type NodeId = String;

/// Id of the synthetic START node. It never appears in `nodes`; links whose `from` is this
/// id are the graph's entry points.
pub const ENTRY_NODE_ID: &str = "__baseNode__";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Entry,
    PassThrough,
    Material,
    TransformPosition,
    TransformRotation,
    TransformScale,
    Curve,
    Math,
    Animator,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::Entry,
        NodeKind::PassThrough,
        NodeKind::Material,
        NodeKind::TransformPosition,
        NodeKind::TransformRotation,
        NodeKind::TransformScale,
        NodeKind::Curve,
        NodeKind::Math,
        NodeKind::Animator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Entry => "entry",
            NodeKind::PassThrough => "pass_through",
            NodeKind::Material => "material",
            NodeKind::TransformPosition => "transform_position",
            NodeKind::TransformRotation => "transform_rotation",
            NodeKind::TransformScale => "transform_scale",
            NodeKind::Curve => "curve",
            NodeKind::Math => "math",
            NodeKind::Animator => "animator",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn is_transform(self) -> bool {
        matches!(
            self,
            NodeKind::TransformPosition | NodeKind::TransformRotation | NodeKind::TransformScale
        )
    }

    /// Effect nodes write to the target and have no output port in the editor.
    pub fn is_effect(self) -> bool {
        self.is_transform() || matches!(self, NodeKind::Material | NodeKind::Animator)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Abs,
    Floor,
    Ceil,
    Round,
    Sqrt,
    Pow,
    Log,
    Log10,
    Clamp,
    Clamp01,
    Min,
    Max,
    Add,
    Multiply,
}

impl MathFunction {
    pub const ALL: [MathFunction; 17] = [
        MathFunction::Sin,
        MathFunction::Cos,
        MathFunction::Tan,
        MathFunction::Abs,
        MathFunction::Floor,
        MathFunction::Ceil,
        MathFunction::Round,
        MathFunction::Sqrt,
        MathFunction::Pow,
        MathFunction::Log,
        MathFunction::Log10,
        MathFunction::Clamp,
        MathFunction::Clamp01,
        MathFunction::Min,
        MathFunction::Max,
        MathFunction::Add,
        MathFunction::Multiply,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MathFunction::Sin => "sin",
            MathFunction::Cos => "cos",
            MathFunction::Tan => "tan",
            MathFunction::Abs => "abs",
            MathFunction::Floor => "floor",
            MathFunction::Ceil => "ceil",
            MathFunction::Round => "round",
            MathFunction::Sqrt => "sqrt",
            MathFunction::Pow => "pow",
            MathFunction::Log => "log",
            MathFunction::Log10 => "log10",
            MathFunction::Clamp => "clamp",
            MathFunction::Clamp01 => "clamp01",
            MathFunction::Min => "min",
            MathFunction::Max => "max",
            MathFunction::Add => "add",
            MathFunction::Multiply => "multiply",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Whether `param1` feeds the formula (exponent, bound, comparand, operand).
    pub fn uses_param1(self) -> bool {
        matches!(
            self,
            MathFunction::Pow
                | MathFunction::Clamp
                | MathFunction::Min
                | MathFunction::Max
                | MathFunction::Add
                | MathFunction::Multiply
        )
    }

    /// Only `Clamp` reads `param2` (its upper bound).
    pub fn uses_param2(self) -> bool {
        matches!(self, MathFunction::Clamp)
    }
}

/// Which material channels a material node drives. Stored as integer bits on the wire.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MaterialProperties(u32);

impl MaterialProperties {
    pub const NONE: Self = Self(0);
    pub const COLOR: Self = Self(1 << 0);
    pub const EMISSION: Self = Self(1 << 1);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for MaterialProperties {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MaterialProperties {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A named shader color driven by its own gradient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomProperty {
    pub name: String,
    #[serde(default)]
    pub gradient: Gradient,
}

impl CustomProperty {
    pub fn new(name: impl Into<String>, gradient: Gradient) -> Self {
        Self {
            name: name.into(),
            gradient,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MaterialParams {
    #[serde(default)]
    pub properties: MaterialProperties,
    #[serde(default)]
    pub color: Gradient,
    #[serde(default)]
    pub custom_properties: Vec<CustomProperty>,
}

/// Shared by the position, rotation and scale nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TransformParams {
    #[serde(default = "zero_vec3", with = "json_float::array")]
    pub direction: Vec3,
    /// Offset from the values captured at load instead of the live ones.
    #[serde(default)]
    pub anchor: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            direction: VEC3_ZERO,
            anchor: false,
        }
    }
}

fn zero_vec3() -> Vec3 {
    VEC3_ZERO
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurveParams {
    #[serde(default)]
    pub curve: AnimationCurve,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MathParams {
    /// `None` when the stored function name is not recognised; such a node passes its
    /// input through.
    #[serde(default = "default_function", with = "function_name")]
    pub function: Option<MathFunction>,
    #[serde(default, with = "json_float")]
    pub param1: f32,
    #[serde(default = "one", with = "json_float")]
    pub param2: f32,
}

impl Default for MathParams {
    fn default() -> Self {
        Self {
            function: default_function(),
            param1: 0.0,
            param2: 1.0,
        }
    }
}

fn default_function() -> Option<MathFunction> {
    Some(MathFunction::Sin)
}

fn one() -> f32 {
    1.0
}

mod function_name {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    use super::MathFunction;

    pub fn serialize<S: Serializer>(
        function: &Option<MathFunction>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match function {
            Some(f) => serializer.serialize_str(f.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<MathFunction>, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.and_then(|name| {
            let function = MathFunction::from_name(&name);
            if function.is_none() {
                warn!(function = %name, "unknown math function; node will pass its input through");
            }
            function
        }))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnimatorParams {
    /// Float parameters to set, in order. Repeats are written again.
    #[serde(default)]
    pub parameter_names: Vec<String>,
}

/// Kind-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeParams {
    PassThrough,
    Material(MaterialParams),
    Transform(TransformParams),
    Curve(CurveParams),
    Math(MathParams),
    Animator(AnimatorParams),
}

impl NodeParams {
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Entry | NodeKind::PassThrough => NodeParams::PassThrough,
            NodeKind::Material => NodeParams::Material(MaterialParams::default()),
            NodeKind::TransformPosition | NodeKind::TransformRotation | NodeKind::TransformScale => {
                NodeParams::Transform(TransformParams::default())
            }
            NodeKind::Curve => NodeParams::Curve(CurveParams::default()),
            NodeKind::Math => NodeParams::Math(MathParams::default()),
            NodeKind::Animator => NodeParams::Animator(AnimatorParams::default()),
        }
    }

    /// Which processor handles this variant.
    pub fn processor_key(&self) -> ProcessorKey {
        match self {
            NodeParams::PassThrough => ProcessorKey::PassThrough,
            NodeParams::Material(_) => ProcessorKey::Material,
            NodeParams::Transform(_) => ProcessorKey::Transform,
            NodeParams::Curve(_) => ProcessorKey::Curve,
            NodeParams::Math(_) => ProcessorKey::Math,
            NodeParams::Animator(_) => ProcessorKey::Animator,
        }
    }

    /// True when this variant is the one `kind` expects.
    pub fn matches_kind(&self, kind: NodeKind) -> bool {
        self.processor_key() == NodeParams::default_for(kind).processor_key()
    }

    fn from_fields(kind: NodeKind, fields: Map<String, JsonValue>) -> Result<Self, serde_json::Error> {
        let value = JsonValue::Object(fields);
        Ok(match kind {
            NodeKind::Entry | NodeKind::PassThrough => NodeParams::PassThrough,
            NodeKind::Material => NodeParams::Material(serde_json::from_value(value)?),
            NodeKind::TransformPosition | NodeKind::TransformRotation | NodeKind::TransformScale => {
                NodeParams::Transform(serde_json::from_value(value)?)
            }
            NodeKind::Curve => NodeParams::Curve(serde_json::from_value(value)?),
            NodeKind::Math => NodeParams::Math(serde_json::from_value(value)?),
            NodeKind::Animator => NodeParams::Animator(serde_json::from_value(value)?),
        })
    }

    fn to_fields(&self) -> Map<String, JsonValue> {
        let value = match self {
            NodeParams::PassThrough => return Map::new(),
            NodeParams::Material(p) => serde_json::to_value(p),
            NodeParams::Transform(p) => serde_json::to_value(p),
            NodeParams::Curve(p) => serde_json::to_value(p),
            NodeParams::Math(p) => serde_json::to_value(p),
            NodeParams::Animator(p) => serde_json::to_value(p),
        };
        match value {
            Ok(JsonValue::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// One node of a reactive graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct NodeData {
    id: NodeId,
    kind: NodeKind,
    /// Editor canvas position. No effect on evaluation.
    pub graph_position: Vec2,
    pub params: NodeParams,
}

impl NodeData {
    /// A node of `kind` with default parameters.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self::with_params(id, kind, NodeParams::default_for(kind))
    }

    /// Pair arbitrary parameters with a kind. A mismatched pair is allowed; such a node
    /// evaluates as pass-through and [`ReactiveGraph::validate`] reports it.
    pub fn with_params(id: impl Into<NodeId>, kind: NodeKind, params: NodeParams) -> Self {
        Self {
            id: id.into(),
            kind,
            graph_position: [0.0, 0.0],
            params,
        }
    }

    /// A fresh random (uuid v4) node id.
    pub fn new_id() -> NodeId {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn pass_through(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::PassThrough)
    }

    pub fn math(id: impl Into<NodeId>, function: MathFunction, param1: f32, param2: f32) -> Self {
        Self::with_params(
            id,
            NodeKind::Math,
            NodeParams::Math(MathParams {
                function: Some(function),
                param1,
                param2,
            }),
        )
    }

    pub fn curve(id: impl Into<NodeId>, curve: AnimationCurve) -> Self {
        Self::with_params(id, NodeKind::Curve, NodeParams::Curve(CurveParams { curve }))
    }

    pub fn material(id: impl Into<NodeId>, params: MaterialParams) -> Self {
        Self::with_params(id, NodeKind::Material, NodeParams::Material(params))
    }

    /// A position, rotation or scale node. Any other `kind` yields a node with default
    /// parameters for that kind.
    pub fn transform(id: impl Into<NodeId>, kind: NodeKind, direction: Vec3, anchor: bool) -> Self {
        if !kind.is_transform() {
            return Self::new(id, kind);
        }
        Self::with_params(
            id,
            kind,
            NodeParams::Transform(TransformParams { direction, anchor }),
        )
    }

    pub fn animator<I, S>(id: impl Into<NodeId>, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_params(
            id,
            NodeKind::Animator,
            NodeParams::Animator(AnimatorParams {
                parameter_names: parameter_names.into_iter().map(Into::into).collect(),
            }),
        )
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.graph_position = [x, y];
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn processor_key(&self) -> ProcessorKey {
        self.params.processor_key()
    }
}

/// Flat wire form of a node; parameter fields sit beside `id` and `kind`.
#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    kind: String,
    #[serde(default, with = "json_float::array")]
    graph_position: Vec2,
    #[serde(flatten)]
    fields: Map<String, JsonValue>,
}

impl TryFrom<NodeRecord> for NodeData {
    type Error = GraphError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let Some(kind) = NodeKind::from_name(&record.kind) else {
            warn!(
                node = %record.id,
                kind = %record.kind,
                "unknown node kind; loading as pass-through"
            );
            return Ok(NodeData {
                id: record.id,
                kind: NodeKind::PassThrough,
                graph_position: record.graph_position,
                params: NodeParams::PassThrough,
            });
        };
        let params = NodeParams::from_fields(kind, record.fields).map_err(|e| GraphError::InvalidNode {
            id: record.id.clone(),
            reason: e.to_string(),
        })?;
        Ok(NodeData {
            id: record.id,
            kind,
            graph_position: record.graph_position,
            params,
        })
    }
}

impl From<NodeData> for NodeRecord {
    fn from(node: NodeData) -> Self {
        NodeRecord {
            fields: node.params.to_fields(),
            id: node.id,
            kind: node.kind.as_str().to_string(),
            graph_position: node.graph_position,
        }
    }
}
