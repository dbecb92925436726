use reactive_api_core::Target;

use super::{NodeProcessor, ProcessorKey};
use crate::types::{NodeData, NodeKind, NodeParams};

/// Samples the node's curve at the input. Outside the keyed range the boundary value holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurveProcessor;

impl NodeProcessor for CurveProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::Curve
    }

    fn process(&mut self, node: &NodeData, input: f32, _target: &mut dyn Target) -> f32 {
        match (node.kind(), &node.params) {
            (NodeKind::Curve, NodeParams::Curve(params)) => params.curve.evaluate(input),
            _ => input,
        }
    }
}
