//! Graph container, authoring helpers and load-time validation.

use hashbrown::{HashMap, HashSet};
use reactive_animation_core::CurveError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GraphError;
use crate::processors::ProcessorKey;
use crate::types::{NodeData, NodeId, NodeKind, NodeParams, ENTRY_NODE_ID};

/// A directed edge. The source's output value becomes the destination's input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeLink {
    pub from: NodeId,
    pub to: NodeId,
}

impl NodeLink {
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_entry(to: impl Into<NodeId>) -> Self {
        Self::new(ENTRY_NODE_ID, to)
    }

    pub fn is_entry(&self) -> bool {
        self.from == ENTRY_NODE_ID
    }
}

/// Nodes plus links. Link order is significant: it is the order branches run in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactiveGraph {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub links: Vec<NodeLink>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(GraphError::Parse)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string(self).map_err(GraphError::Serialize)
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(GraphError::Serialize)
    }

    /// First node with `id`.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeData> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Links leaving `id`, in authoring order.
    pub fn links_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a NodeLink> + 'a {
        self.links.iter().filter(move |l| l.from == id)
    }

    pub fn entry_links(&self) -> impl Iterator<Item = &NodeLink> + '_ {
        self.links_from(ENTRY_NODE_ID)
    }

    /// Distinct processor keys in first-seen node order.
    pub fn processor_keys(&self) -> Vec<ProcessorKey> {
        let mut keys = Vec::new();
        for node in &self.nodes {
            let key = node.processor_key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn add_node(&mut self, node: NodeData) -> Result<(), GraphError> {
        if node.id() == ENTRY_NODE_ID {
            return Err(GraphError::EntryNodeId(node.id().to_string()));
        }
        if self.contains(node.id()) {
            return Err(GraphError::DuplicateNodeId(node.id().to_string()));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Append a link. `from` may be [`ENTRY_NODE_ID`]; both ends must otherwise exist.
    pub fn link(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        if from != ENTRY_NODE_ID && !self.contains(from) {
            return Err(GraphError::UnknownNode(from.to_string()));
        }
        if !self.contains(to) {
            return Err(GraphError::UnknownNode(to.to_string()));
        }
        self.links.push(NodeLink::new(from, to));
        Ok(())
    }

    /// Remove the first matching link. Returns whether one was found.
    pub fn unlink(&mut self, from: &str, to: &str) -> bool {
        match self.links.iter().position(|l| l.from == from && l.to == to) {
            Some(idx) => {
                self.links.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove a node together with every link touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<NodeData> {
        let idx = self.nodes.iter().position(|n| n.id() == id)?;
        self.links.retain(|l| l.from != id && l.to != id);
        Some(self.nodes.remove(idx))
    }

    /// Everything suspicious about this graph. None of it stops evaluation.
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut kinds: HashMap<&str, NodeKind> = HashMap::new();
        for node in &self.nodes {
            if node.id() == ENTRY_NODE_ID {
                issues.push(GraphIssue::ReservedId);
            }
            if !seen.insert(node.id()) {
                issues.push(GraphIssue::DuplicateNodeId {
                    id: node.id().to_string(),
                });
            }
            kinds.entry(node.id()).or_insert(node.kind());

            if !node.params.matches_kind(node.kind()) {
                issues.push(GraphIssue::KindParamsMismatch {
                    id: node.id().to_string(),
                    kind: node.kind(),
                });
            }
            check_params(node, &mut issues);
        }

        for (index, link) in self.links.iter().enumerate() {
            if link.to == ENTRY_NODE_ID {
                issues.push(GraphIssue::LinkIntoEntry { index });
                continue;
            }
            if !link.is_entry() && !kinds.contains_key(link.from.as_str()) {
                issues.push(GraphIssue::DanglingLink {
                    index,
                    missing: link.from.clone(),
                });
            }
            if !kinds.contains_key(link.to.as_str()) {
                issues.push(GraphIssue::DanglingLink {
                    index,
                    missing: link.to.clone(),
                });
            }
            if let Some(kind) = kinds.get(link.from.as_str()) {
                if kind.is_effect() {
                    issues.push(GraphIssue::OutputFromEffect {
                        index,
                        id: link.from.clone(),
                        kind: *kind,
                    });
                }
            }
        }

        issues
    }
}

fn check_params(node: &NodeData, issues: &mut Vec<GraphIssue>) {
    let id = || node.id().to_string();
    match &node.params {
        NodeParams::Material(p) => {
            if let Err(error) = p.color.validate() {
                issues.push(GraphIssue::InvalidGradient { id: id(), error });
            }
            for (index, cp) in p.custom_properties.iter().enumerate() {
                if cp.name.trim().is_empty() {
                    issues.push(GraphIssue::EmptyPropertyName { id: id(), index });
                }
                if let Err(error) = cp.gradient.validate() {
                    issues.push(GraphIssue::InvalidGradient { id: id(), error });
                }
            }
        }
        NodeParams::Curve(p) => {
            if let Err(error) = p.curve.validate() {
                issues.push(GraphIssue::InvalidCurve { id: id(), error });
            }
        }
        NodeParams::Animator(p) => {
            for (index, name) in p.parameter_names.iter().enumerate() {
                if name.trim().is_empty() {
                    issues.push(GraphIssue::EmptyPropertyName { id: id(), index });
                }
            }
        }
        NodeParams::PassThrough | NodeParams::Transform(_) | NodeParams::Math(_) => {}
    }
}

/// A finding from [`ReactiveGraph::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphIssue {
    #[error("a node uses the reserved entry id '{}'", ENTRY_NODE_ID)]
    ReservedId,
    #[error("node id '{id}' is not unique; links in reach the first copy, links out leave every copy")]
    DuplicateNodeId { id: NodeId },
    #[error("node '{id}' is a {kind} node but carries parameters for another kind")]
    KindParamsMismatch { id: NodeId, kind: NodeKind },
    #[error("link #{index} points into the entry node")]
    LinkIntoEntry { index: usize },
    #[error("link #{index} references missing node '{missing}'")]
    DanglingLink { index: usize, missing: NodeId },
    #[error("link #{index} leaves effect node '{id}' ({kind}), which has no output port")]
    OutputFromEffect {
        index: usize,
        id: NodeId,
        kind: NodeKind,
    },
    #[error("node '{id}' entry #{index} has an empty name")]
    EmptyPropertyName { id: NodeId, index: usize },
    #[error("node '{id}' has an invalid curve: {error}")]
    InvalidCurve { id: NodeId, error: CurveError },
    #[error("node '{id}' has an invalid gradient: {error}")]
    InvalidGradient { id: NodeId, error: CurveError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomProperty, MaterialParams, MathFunction};
    use reactive_animation_core::{AnimationCurve, ColorKey, Gradient, GradientMode, Keyframe};

    fn chain() -> ReactiveGraph {
        let mut g = ReactiveGraph::new();
        g.add_node(NodeData::pass_through("a")).unwrap();
        g.add_node(NodeData::math("b", MathFunction::Add, 1.0, 1.0)).unwrap();
        g.link(ENTRY_NODE_ID, "a").unwrap();
        g.link("a", "b").unwrap();
        g
    }

    #[test]
    fn authoring_rejects_bad_ids() {
        let mut g = chain();
        assert!(matches!(
            g.add_node(NodeData::pass_through("a")),
            Err(GraphError::DuplicateNodeId(id)) if id == "a"
        ));
        assert!(matches!(
            g.add_node(NodeData::pass_through(ENTRY_NODE_ID)),
            Err(GraphError::EntryNodeId(_))
        ));
        assert!(matches!(
            g.link("a", "zzz"),
            Err(GraphError::UnknownNode(id)) if id == "zzz"
        ));
        assert!(matches!(g.link("zzz", "a"), Err(GraphError::UnknownNode(_))));
    }

    #[test]
    fn remove_node_drops_its_links() {
        let mut g = chain();
        let removed = g.remove_node("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert!(g.links.is_empty());
        assert!(g.remove_node("a").is_none());
    }

    #[test]
    fn unlink_removes_one_link() {
        let mut g = chain();
        g.link("a", "b").unwrap();
        assert!(g.unlink("a", "b"));
        assert_eq!(g.links_from("a").count(), 1);
        assert!(g.unlink("a", "b"));
        assert!(!g.unlink("a", "b"));
    }

    #[test]
    fn entry_links_keep_order() {
        let mut g = chain();
        g.link(ENTRY_NODE_ID, "b").unwrap();
        let targets: Vec<_> = g.entry_links().map(|l| l.to.as_str()).collect();
        assert_eq!(targets, vec!["a", "b"]);
    }

    #[test]
    fn clean_graph_has_no_issues() {
        assert!(chain().validate().is_empty());
    }

    #[test]
    fn validate_reports_structure_problems() {
        let mut g = chain();
        g.nodes.push(NodeData::pass_through("a"));
        g.nodes.push(NodeData::animator("anim", ["speed"]));
        g.links.push(NodeLink::new("a", "ghost"));
        g.links.push(NodeLink::new("b", ENTRY_NODE_ID));
        g.links.push(NodeLink::new("anim", "b"));

        let issues = g.validate();
        assert!(issues.contains(&GraphIssue::DuplicateNodeId { id: "a".into() }));
        assert!(issues.contains(&GraphIssue::DanglingLink {
            index: 2,
            missing: "ghost".into()
        }));
        assert!(issues.contains(&GraphIssue::LinkIntoEntry { index: 3 }));
        assert!(issues.contains(&GraphIssue::OutputFromEffect {
            index: 4,
            id: "anim".into(),
            kind: NodeKind::Animator
        }));
    }

    #[test]
    fn validate_reports_param_problems() {
        let mut g = ReactiveGraph::new();
        g.nodes.push(NodeData::material(
            "mat",
            MaterialParams {
                custom_properties: vec![CustomProperty::new(" ", Gradient::default())],
                ..Default::default()
            },
        ));
        g.nodes
            .push(NodeData::with_params("odd", NodeKind::Curve, NodeParams::PassThrough));
        g.nodes.push(NodeData::pass_through(ENTRY_NODE_ID));
        g.nodes.push(NodeData::curve(
            "backwards",
            AnimationCurve {
                keys: vec![Keyframe::new(1.0, 0.0), Keyframe::new(0.0, 0.0)],
            },
        ));
        g.nodes.push(NodeData::curve(
            "nan",
            AnimationCurve::new(vec![Keyframe::new(0.0, f32::NAN)]),
        ));
        g.nodes.push(NodeData::material(
            "wide",
            MaterialParams {
                color: Gradient::new(
                    GradientMode::Blend,
                    vec![ColorKey {
                        color: [1.0, 0.0, 0.0],
                        time: 1.5,
                    }],
                    vec![],
                ),
                ..Default::default()
            },
        ));

        let issues = g.validate();
        assert!(issues.contains(&GraphIssue::ReservedId));
        assert!(issues.contains(&GraphIssue::InvalidCurve {
            id: "backwards".into(),
            error: CurveError::Unordered { index: 1 }
        }));
        assert!(issues.contains(&GraphIssue::InvalidCurve {
            id: "nan".into(),
            error: CurveError::NonFinite { index: 0 }
        }));
        assert!(issues.contains(&GraphIssue::InvalidGradient {
            id: "wide".into(),
            error: CurveError::OutOfRange { index: 0, time: 1.5 }
        }));
        assert!(!issues
            .iter()
            .any(|i| matches!(i, GraphIssue::InvalidGradient { id, .. } if id == "mat")));
        assert!(issues.contains(&GraphIssue::EmptyPropertyName {
            id: "mat".into(),
            index: 0
        }));
        assert!(issues.contains(&GraphIssue::KindParamsMismatch {
            id: "odd".into(),
            kind: NodeKind::Curve
        }));
    }

    #[test]
    fn processor_keys_are_distinct() {
        let mut g = chain();
        g.add_node(NodeData::math("c", MathFunction::Multiply, 2.0, 1.0))
            .unwrap();
        assert_eq!(
            g.processor_keys(),
            vec![ProcessorKey::PassThrough, ProcessorKey::Math]
        );
    }
}
