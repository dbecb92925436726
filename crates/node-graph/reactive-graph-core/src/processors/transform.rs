use reactive_api_core::{vec3_add, vec3_scale, Target, TransformAccess, Vec3, VEC3_ZERO};

use super::{NodeProcessor, ProcessorKey};
use crate::types::{NodeData, NodeKind, NodeParams, TransformParams};

/// Local transform captured when the processor is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformBaseline {
    pub position: Vec3,
    pub euler_angles: Vec3,
    pub scale: Vec3,
}

impl TransformBaseline {
    pub fn capture(transform: &dyn TransformAccess) -> Self {
        Self {
            position: transform.local_position(),
            euler_angles: transform.local_euler_angles(),
            scale: transform.local_scale(),
        }
    }
}

/// Moves, rotates or scales the target by `direction * input`.
///
/// Anchored nodes offset from the baseline, so the result depends only on this tick's
/// input. Non-anchored position and rotation offset from the live value and accumulate
/// across ticks. Non-anchored scale offsets from zero, i.e. the scale becomes
/// `direction * input`.
#[derive(Debug, Default, Clone)]
pub struct TransformProcessor {
    baseline: Option<TransformBaseline>,
}

impl TransformProcessor {
    pub fn new(target: &dyn Target) -> Self {
        Self {
            baseline: target.transform().map(TransformBaseline::capture),
        }
    }

    pub fn baseline(&self) -> Option<&TransformBaseline> {
        self.baseline.as_ref()
    }
}

impl NodeProcessor for TransformProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::Transform
    }

    fn process(&mut self, node: &NodeData, input: f32, target: &mut dyn Target) -> f32 {
        let NodeParams::Transform(params) = &node.params else {
            return input;
        };
        if !node.kind().is_transform() {
            return input;
        }
        let Some(transform) = target.transform_mut() else {
            return input;
        };
        let baseline = match self.baseline {
            Some(b) => b,
            None => TransformBaseline::capture(&*transform),
        };
        apply(node.kind(), params, input, &baseline, transform);
        input
    }
}

fn apply(
    kind: NodeKind,
    params: &TransformParams,
    input: f32,
    baseline: &TransformBaseline,
    transform: &mut dyn TransformAccess,
) {
    let delta = vec3_scale(params.direction, input);
    match kind {
        NodeKind::TransformPosition => {
            let origin = if params.anchor {
                baseline.position
            } else {
                transform.local_position()
            };
            transform.set_local_position(vec3_add(origin, delta));
        }
        NodeKind::TransformRotation => {
            let origin = if params.anchor {
                baseline.euler_angles
            } else {
                transform.local_euler_angles()
            };
            transform.set_local_euler_angles(vec3_add(origin, delta));
        }
        NodeKind::TransformScale => {
            let origin = if params.anchor {
                baseline.scale
            } else {
                VEC3_ZERO
            };
            transform.set_local_scale(vec3_add(origin, delta));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactive_api_core::{LocalTransform, SceneObject};

    fn start() -> SceneObject {
        SceneObject::new("t").with_transform(LocalTransform {
            position: [1.0, 2.0, 3.0],
            euler_angles: [0.0, 90.0, 0.0],
            scale: [2.0, 2.0, 2.0],
        })
    }

    fn local(target: &SceneObject) -> LocalTransform {
        target.transform.unwrap()
    }

    #[test]
    fn anchored_position_is_idempotent() {
        let mut target = start();
        let mut p = TransformProcessor::new(&target);
        let node = NodeData::transform("p", NodeKind::TransformPosition, [1.0, 0.0, 0.0], true);
        p.process(&node, 0.5, &mut target);
        p.process(&node, 0.5, &mut target);
        assert_eq!(local(&target).position, [1.5, 2.0, 3.0]);
    }

    #[test]
    fn free_position_accumulates() {
        let mut target = start();
        let mut p = TransformProcessor::new(&target);
        let node = NodeData::transform("p", NodeKind::TransformPosition, [0.0, 1.0, 0.0], false);
        for _ in 0..3 {
            p.process(&node, 1.0, &mut target);
        }
        assert_eq!(local(&target).position, [1.0, 5.0, 3.0]);
    }

    #[test]
    fn rotation_offsets_euler_angles() {
        let mut target = start();
        let mut p = TransformProcessor::new(&target);
        let anchored = NodeData::transform("r", NodeKind::TransformRotation, [0.0, 10.0, 0.0], true);
        p.process(&anchored, 2.0, &mut target);
        p.process(&anchored, 2.0, &mut target);
        assert_eq!(local(&target).euler_angles, [0.0, 110.0, 0.0]);

        let free = NodeData::transform("r2", NodeKind::TransformRotation, [0.0, 10.0, 0.0], false);
        p.process(&free, 1.0, &mut target);
        p.process(&free, 1.0, &mut target);
        assert_eq!(local(&target).euler_angles, [0.0, 130.0, 0.0]);
    }

    #[test]
    fn scale_origin_is_baseline_or_zero() {
        let mut target = start();
        let mut p = TransformProcessor::new(&target);

        let anchored = NodeData::transform("s", NodeKind::TransformScale, [1.0, 1.0, 1.0], true);
        p.process(&anchored, 0.5, &mut target);
        assert_eq!(local(&target).scale, [2.5, 2.5, 2.5]);

        let free = NodeData::transform("s2", NodeKind::TransformScale, [1.0, 1.0, 1.0], false);
        p.process(&free, 0.5, &mut target);
        p.process(&free, 0.5, &mut target);
        assert_eq!(local(&target).scale, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn baseline_is_taken_at_construction() {
        let mut target = start();
        let mut p = TransformProcessor::new(&target);
        target.set_local_position([100.0, 100.0, 100.0]);
        let node = NodeData::transform("p", NodeKind::TransformPosition, [1.0, 0.0, 0.0], true);
        p.process(&node, 1.0, &mut target);
        assert_eq!(local(&target).position, [2.0, 2.0, 3.0]);
        assert_eq!(p.baseline().unwrap().scale, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn missing_transform_or_wrong_kind_is_a_no_op() {
        let mut bare = SceneObject::empty("bare");
        let mut p = TransformProcessor::new(&bare);
        assert!(p.baseline().is_none());
        let node = NodeData::transform("p", NodeKind::TransformPosition, [1.0, 0.0, 0.0], false);
        assert_eq!(p.process(&node, 4.0, &mut bare), 4.0);
        assert!(bare.writes().is_empty());

        let mut target = start();
        let mut p = TransformProcessor::new(&target);
        let odd = NodeData::with_params(
            "x",
            NodeKind::Animator,
            NodeParams::Transform(TransformParams {
                direction: [1.0, 1.0, 1.0],
                anchor: false,
            }),
        );
        assert_eq!(p.process(&odd, 4.0, &mut target), 4.0);
        assert!(target.writes().is_empty());
    }
}
