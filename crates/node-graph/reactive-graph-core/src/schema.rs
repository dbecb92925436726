use crate::types::{MathFunction, NodeKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Entry,
    Signal,
    Effect,
}

/// How many links an output port accepts.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PortCapacity {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Float,
    Bool,
    Vec3,
    Gradient,
    Curve,
    Flags,
    Enum,
    StringList,
    CustomProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamSpec {
    pub id: &'static str,
    pub ty: ParamType,
    pub label: &'static str,
    pub doc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_json: Option<serde_json::Value>,
    /// Allowed values for `Enum` and `Flags` params.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSignature {
    pub kind: NodeKind,
    pub title: &'static str,
    pub menu_path: &'static str,
    pub category: NodeCategory,
    pub has_input: bool,
    pub has_output: bool,
    pub output_capacity: PortCapacity,
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    pub version: &'static str,
    pub nodes: Vec<NodeSignature>,
}

impl Registry {
    pub fn get(&self, kind: NodeKind) -> Option<&NodeSignature> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    /// Catalog entries an editor offers in its create menu (everything but START).
    pub fn creatable(&self) -> impl Iterator<Item = &NodeSignature> + '_ {
        self.nodes.iter().filter(|n| n.category != NodeCategory::Entry)
    }
}

// Helpers
fn param(id: &'static str, ty: ParamType, label: &'static str, doc: &'static str) -> ParamSpec {
    ParamSpec {
        id,
        ty,
        label,
        doc,
        default_json: None,
        options: Vec::new(),
    }
}

fn transform_params(verb: &'static str) -> Vec<ParamSpec> {
    vec![
        ParamSpec {
            default_json: Some(serde_json::json!([0.0, 0.0, 0.0])),
            ..param("direction", ParamType::Vec3, "Direction", verb)
        },
        ParamSpec {
            default_json: Some(serde_json::json!(false)),
            ..param(
                "anchor",
                ParamType::Bool,
                "Anchor",
                "Offset from the transform captured at load instead of the live one.",
            )
        },
    ]
}

fn effect(kind: NodeKind, title: &'static str, menu_path: &'static str, params: Vec<ParamSpec>) -> NodeSignature {
    NodeSignature {
        kind,
        title,
        menu_path,
        category: NodeCategory::Effect,
        has_input: true,
        has_output: false,
        output_capacity: PortCapacity::Single,
        params,
    }
}

fn signal(kind: NodeKind, title: &'static str, menu_path: &'static str, params: Vec<ParamSpec>) -> NodeSignature {
    NodeSignature {
        kind,
        title,
        menu_path,
        category: NodeCategory::Signal,
        has_input: true,
        has_output: true,
        output_capacity: PortCapacity::Multi,
        params,
    }
}

/// Catalog entry for one kind.
pub fn signature(kind: NodeKind) -> NodeSignature {
    match kind {
        NodeKind::Entry => NodeSignature {
            kind,
            title: "START",
            menu_path: "START",
            category: NodeCategory::Entry,
            has_input: false,
            has_output: true,
            output_capacity: PortCapacity::Multi,
            params: vec![],
        },
        NodeKind::PassThrough => signal(kind, "Pass-through", "Signal/Pass-through", vec![]),
        NodeKind::Curve => signal(
            kind,
            "Curve",
            "Signal/Curve",
            vec![param(
                "curve",
                ParamType::Curve,
                "Curve",
                "Sampled at the input; holds the end values outside its keys.",
            )],
        ),
        NodeKind::Math => signal(
            kind,
            "Function",
            "Signal/Function",
            vec![
                ParamSpec {
                    default_json: Some(serde_json::json!(MathFunction::Sin.as_str())),
                    options: MathFunction::ALL.iter().map(|f| f.as_str()).collect(),
                    ..param("function", ParamType::Enum, "Function", "")
                },
                ParamSpec {
                    default_json: Some(serde_json::json!(0.0)),
                    ..param(
                        "param1",
                        ParamType::Float,
                        "Parameter 1",
                        "Exponent, lower bound, comparand or operand, depending on the function.",
                    )
                },
                ParamSpec {
                    default_json: Some(serde_json::json!(1.0)),
                    ..param("param2", ParamType::Float, "Parameter 2", "Upper bound for clamp.")
                },
            ],
        ),
        NodeKind::Material => effect(
            kind,
            "Material",
            "Effects/Material",
            vec![
                ParamSpec {
                    default_json: Some(serde_json::json!(0)),
                    options: vec!["color", "emission"],
                    ..param("properties", ParamType::Flags, "Properties", "")
                },
                param(
                    "color",
                    ParamType::Gradient,
                    "Color",
                    "Drives the base color and/or emission.",
                ),
                param(
                    "custom_properties",
                    ParamType::CustomProperties,
                    "Custom properties",
                    "Named shader colors, each with its own gradient.",
                ),
            ],
        ),
        NodeKind::TransformPosition => effect(
            kind,
            "Position",
            "Effects/Transform/Position",
            transform_params("Local position offset per unit of input."),
        ),
        NodeKind::TransformRotation => effect(
            kind,
            "Rotation",
            "Effects/Transform/Rotation",
            transform_params("Euler angle offset (degrees) per unit of input."),
        ),
        NodeKind::TransformScale => effect(
            kind,
            "Scale",
            "Effects/Transform/Scale",
            transform_params("Scale per unit of input; without anchor the scale is replaced."),
        ),
        NodeKind::Animator => effect(
            kind,
            "Animator",
            "Effects/Animator",
            vec![param(
                "parameter_names",
                ParamType::StringList,
                "Parameters",
                "Animator floats set to the input.",
            )],
        ),
    }
}

pub fn registry() -> Registry {
    Registry {
        version: "1.0.0",
        nodes: NodeKind::ALL.into_iter().map(signature).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_listed_once() {
        let reg = registry();
        assert_eq!(reg.nodes.len(), NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            assert_eq!(reg.nodes.iter().filter(|n| n.kind == kind).count(), 1);
        }
        assert_eq!(reg.creatable().count(), NodeKind::ALL.len() - 1);
    }

    #[test]
    fn effects_have_no_output() {
        for sig in registry().nodes {
            assert_eq!(sig.kind.is_effect(), sig.category == NodeCategory::Effect);
            if sig.category == NodeCategory::Effect {
                assert!(!sig.has_output);
                assert_eq!(sig.output_capacity, PortCapacity::Single);
            } else {
                assert!(sig.has_output);
                assert_eq!(sig.output_capacity, PortCapacity::Multi);
            }
        }
    }

    #[test]
    fn titles_and_menu_paths() {
        let reg = registry();
        let math = reg.get(NodeKind::Math).unwrap();
        assert_eq!(math.title, "Function");
        assert_eq!(math.menu_path, "Signal/Function");
        assert_eq!(math.params[0].options.len(), 17);
        let scale = reg.get(NodeKind::TransformScale).unwrap();
        assert_eq!(scale.menu_path, "Effects/Transform/Scale");
        assert_eq!(reg.get(NodeKind::Entry).unwrap().title, "START");
    }

    #[test]
    fn param_usage_table() {
        assert!(MathFunction::Pow.uses_param1());
        assert!(!MathFunction::Pow.uses_param2());
        assert!(MathFunction::Clamp.uses_param1() && MathFunction::Clamp.uses_param2());
        assert!(!MathFunction::Clamp01.uses_param1());
        assert!(!MathFunction::Sqrt.uses_param1());
    }

    #[test]
    fn registry_serializes() {
        let json = serde_json::to_value(registry()).unwrap();
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["nodes"][3]["kind"], "transform_position");
        assert_eq!(json["nodes"][3]["category"], "effect");
    }
}
