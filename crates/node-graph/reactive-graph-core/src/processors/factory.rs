use reactive_api_core::Target;

use super::{
    AnimatorProcessor, CurveProcessor, MaterialProcessor, MathProcessor, NodeProcessor,
    PassThroughProcessor, ProcessorKey, TransformProcessor,
};

/// Build the processor for `key`, bound to `target`.
///
/// Processors that cache per-target state read it here: the material processor resolves
/// the emission property id and the transform processor captures the baseline transform.
pub fn create_processor(key: ProcessorKey, target: &mut dyn Target) -> Box<dyn NodeProcessor> {
    match key {
        ProcessorKey::PassThrough => Box::new(PassThroughProcessor),
        ProcessorKey::Material => Box::new(MaterialProcessor::new(target)),
        ProcessorKey::Transform => Box::new(TransformProcessor::new(&*target)),
        ProcessorKey::Curve => Box::new(CurveProcessor),
        ProcessorKey::Math => Box::new(MathProcessor),
        ProcessorKey::Animator => Box::new(AnimatorProcessor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactive_api_core::SceneObject;

    #[test]
    fn every_key_has_a_processor() {
        let mut target = SceneObject::new("t");
        for key in ProcessorKey::ALL {
            let processor = create_processor(key, &mut target);
            assert_eq!(processor.key(), key);
        }
    }

    #[test]
    fn works_against_a_bare_target() {
        let mut target = SceneObject::empty("bare");
        for key in ProcessorKey::ALL {
            let _ = create_processor(key, &mut target);
        }
        assert!(target.writes().is_empty());
    }
}
