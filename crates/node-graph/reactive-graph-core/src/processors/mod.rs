//! Node processors.
//!
//! A processor turns a node's input scalar into its output scalar and may write to the
//! target on the way. One processor instance serves every node of its data variant; any
//! state it keeps (cached property ids, the transform baseline) is per target, captured
//! when the engine builds it.

use std::fmt;

use hashbrown::HashMap;
use reactive_api_core::Target;
use serde::{Deserialize, Serialize};

use crate::types::NodeData;

mod animator;
mod curve;
mod factory;
mod material;
mod math;
mod transform;

pub use animator::AnimatorProcessor;
pub use curve::CurveProcessor;
pub use factory::create_processor;
pub use material::MaterialProcessor;
pub use math::{apply_math, MathProcessor};
pub use transform::{TransformBaseline, TransformProcessor};

/// One key per concrete parameter variant of [`NodeParams`](crate::NodeParams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKey {
    PassThrough,
    Material,
    Transform,
    Curve,
    Math,
    Animator,
}

impl ProcessorKey {
    pub const ALL: [ProcessorKey; 6] = [
        ProcessorKey::PassThrough,
        ProcessorKey::Material,
        ProcessorKey::Transform,
        ProcessorKey::Curve,
        ProcessorKey::Math,
        ProcessorKey::Animator,
    ];
}

pub trait NodeProcessor: fmt::Debug {
    fn key(&self) -> ProcessorKey;

    /// Compute the node's output for `input`, applying side effects to `target`.
    /// The default forwards the input untouched.
    fn process(&mut self, node: &NodeData, input: f32, target: &mut dyn Target) -> f32 {
        let _ = (node, target);
        input
    }
}

/// Forwards its input. Used for pass-through and entry nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughProcessor;

impl NodeProcessor for PassThroughProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::PassThrough
    }
}

/// Processors keyed by data variant, built once per target.
#[derive(Debug, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<ProcessorKey, Box<dyn NodeProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One processor for each key in `keys`; repeats are ignored.
    pub fn build<I>(keys: I, target: &mut dyn Target) -> Self
    where
        I: IntoIterator<Item = ProcessorKey>,
    {
        let mut registry = Self::new();
        for key in keys {
            if !registry.contains(key) {
                let processor = create_processor(key, target);
                registry.processors.insert(key, processor);
            }
        }
        registry
    }

    /// Install or replace the processor for `key`; returns the previous one.
    pub fn register(
        &mut self,
        key: ProcessorKey,
        processor: Box<dyn NodeProcessor>,
    ) -> Option<Box<dyn NodeProcessor>> {
        self.processors.insert(key, processor)
    }

    pub fn contains(&self, key: ProcessorKey) -> bool {
        self.processors.contains_key(&key)
    }

    pub fn get_mut(&mut self, key: ProcessorKey) -> Option<&mut (dyn NodeProcessor + 'static)> {
        self.processors.get_mut(&key).map(|p| p.as_mut())
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = ProcessorKey> + '_ {
        self.processors.keys().copied()
    }

    /// Run the processor registered for the node's variant. Unregistered variants pass
    /// their input through.
    pub fn process(&mut self, node: &NodeData, input: f32, target: &mut dyn Target) -> f32 {
        match self.processors.get_mut(&node.processor_key()) {
            Some(processor) => processor.process(node, input, target),
            None => input,
        }
    }
}
