use reactive_api_core::Target;

use super::{NodeProcessor, ProcessorKey};
use crate::types::{NodeData, NodeKind, NodeParams};

/// Sets every listed animator float to the input, in list order.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimatorProcessor;

impl NodeProcessor for AnimatorProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::Animator
    }

    fn process(&mut self, node: &NodeData, input: f32, target: &mut dyn Target) -> f32 {
        let (NodeKind::Animator, NodeParams::Animator(params)) = (node.kind(), &node.params) else {
            return input;
        };
        if let Some(animator) = target.animator_mut() {
            for name in &params.parameter_names {
                animator.set_float(name, input);
            }
        }
        input
    }
}
