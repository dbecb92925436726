use hashbrown::HashMap;
use tracing::warn;

use crate::graph::ReactiveGraph;
use crate::types::ENTRY_NODE_ID;

/// Adjacency for evaluation, built once per graph. Node references are indices into
/// `ReactiveGraph::nodes`; outgoing lists keep link order.
#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    entry: Vec<usize>,
    outgoing: Vec<Vec<usize>>,
    positions: HashMap<String, usize>,
    dangling: usize,
}

impl LinkIndex {
    pub fn build(graph: &ReactiveGraph) -> Self {
        // id -> every node index carrying it; the first one is the link target
        let mut by_id: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, node) in graph.nodes.iter().enumerate() {
            by_id.entry(node.id()).or_default().push(idx);
        }

        let mut index = LinkIndex {
            entry: Vec::new(),
            outgoing: vec![Vec::new(); graph.nodes.len()],
            positions: by_id
                .iter()
                .map(|(id, indices)| (id.to_string(), indices[0]))
                .collect(),
            dangling: 0,
        };

        for link in &graph.links {
            let Some(&to) = by_id.get(link.to.as_str()).and_then(|v| v.first()) else {
                warn!(from = %link.from, to = %link.to, "link target missing; skipped");
                index.dangling += 1;
                continue;
            };
            if link.from == ENTRY_NODE_ID {
                index.entry.push(to);
            } else if let Some(sources) = by_id.get(link.from.as_str()) {
                for &src in sources {
                    index.outgoing[src].push(to);
                }
            } else {
                index.dangling += 1;
            }
        }
        index
    }

    /// Entry branch roots in link order.
    pub fn entry(&self) -> &[usize] {
        &self.entry
    }

    pub fn outgoing(&self, node: usize) -> &[usize] {
        self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Links skipped because an endpoint is missing.
    pub fn dangling(&self) -> usize {
        self.dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeLink;
    use crate::types::NodeData;

    #[test]
    fn indexes_links_in_order() {
        let graph = ReactiveGraph {
            nodes: vec![
                NodeData::pass_through("a"),
                NodeData::pass_through("b"),
                NodeData::pass_through("c"),
            ],
            links: vec![
                NodeLink::from_entry("b"),
                NodeLink::new("b", "c"),
                NodeLink::new("b", "a"),
                NodeLink::from_entry("a"),
                NodeLink::new("b", "missing"),
                NodeLink::new("ghost", "a"),
            ],
        };
        let index = LinkIndex::build(&graph);
        assert_eq!(index.entry(), &[1, 0]);
        assert_eq!(index.outgoing(1), &[2, 0]);
        assert!(index.outgoing(0).is_empty());
        assert!(index.outgoing(99).is_empty());
        assert_eq!(index.dangling(), 2);
        assert_eq!(index.position("c"), Some(2));
    }

    #[test]
    fn duplicate_ids_join_first_and_leave_every_copy() {
        let graph = ReactiveGraph {
            nodes: vec![
                NodeData::pass_through("dup"),
                NodeData::pass_through("out"),
                NodeData::pass_through("dup"),
            ],
            links: vec![NodeLink::from_entry("dup"), NodeLink::new("dup", "out")],
        };
        let index = LinkIndex::build(&graph);
        assert_eq!(index.entry(), &[0]);
        assert_eq!(index.outgoing(0), &[1]);
        assert_eq!(index.outgoing(2), &[1]);
        assert_eq!(index.position("dup"), Some(0));

        let issue = crate::graph::GraphIssue::DuplicateNodeId { id: "dup".into() };
        assert!(issue.to_string().contains("leave every copy"));
    }
}
