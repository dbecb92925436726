use reactive_api_core::{PropertyId, Target, EMISSION_COLOR_PROPERTY};
use tracing::trace;

use super::{NodeProcessor, ProcessorKey};
use crate::types::{MaterialParams, MaterialProperties, NodeData, NodeKind, NodeParams};

/// Drives material colors from gradients sampled at the input.
///
/// Write order per node: base color (if flagged), emission (if flagged), then each custom
/// property in list order.
#[derive(Debug, Default, Clone)]
pub struct MaterialProcessor {
    /// Emission property id, resolved once from the target's material.
    emission: Option<PropertyId>,
}

impl MaterialProcessor {
    pub fn new(target: &mut dyn Target) -> Self {
        let emission = target
            .material_mut()
            .map(|material| material.property_id(EMISSION_COLOR_PROPERTY));
        Self { emission }
    }

    fn apply(&self, params: &MaterialParams, input: f32, target: &mut dyn Target) {
        let Some(material) = target.material_mut() else {
            return;
        };
        if params.properties.contains(MaterialProperties::COLOR) {
            material.set_color(params.color.evaluate(input));
        }
        if params.properties.contains(MaterialProperties::EMISSION) {
            let color = params.color.evaluate(input);
            match self.emission {
                Some(id) => material.set_color_by_id(id, color),
                None => material.set_color_named(EMISSION_COLOR_PROPERTY, color),
            }
        }
        for property in &params.custom_properties {
            material.set_color_named(&property.name, property.gradient.evaluate(input));
        }
        trace!(
            flags = params.properties.bits(),
            custom = params.custom_properties.len(),
            "material updated"
        );
    }
}

impl NodeProcessor for MaterialProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::Material
    }

    fn process(&mut self, node: &NodeData, input: f32, target: &mut dyn Target) -> f32 {
        if let (NodeKind::Material, NodeParams::Material(params)) = (node.kind(), &node.params) {
            self.apply(params, input, target);
        }
        input
    }
}
