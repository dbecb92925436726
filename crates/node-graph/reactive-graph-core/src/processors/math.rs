use reactive_api_core::Target;

use super::{NodeProcessor, ProcessorKey};
use crate::types::{MathFunction, MathParams, NodeData, NodeKind, NodeParams};

/// Applies a [`MathFunction`] to its input. Domain errors are not intercepted: a
/// negative square root is NaN, `log(0)` is negative infinity, and both flow downstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathProcessor;

impl NodeProcessor for MathProcessor {
    fn key(&self) -> ProcessorKey {
        ProcessorKey::Math
    }

    fn process(&mut self, node: &NodeData, input: f32, _target: &mut dyn Target) -> f32 {
        match (node.kind(), &node.params) {
            (NodeKind::Math, NodeParams::Math(params)) => apply_params(params, input),
            _ => input,
        }
    }
}

fn apply_params(params: &MathParams, input: f32) -> f32 {
    match params.function {
        Some(function) => apply_math(function, input, params.param1, params.param2),
        None => input,
    }
}

/// Evaluate `function` on `input`. See [`MathFunction::uses_param1`] for which
/// parameters matter.
pub fn apply_math(function: MathFunction, input: f32, param1: f32, param2: f32) -> f32 {
    match function {
        MathFunction::Sin => input.sin(),
        MathFunction::Cos => input.cos(),
        MathFunction::Tan => input.tan(),
        MathFunction::Abs => input.abs(),
        MathFunction::Floor => input.floor(),
        MathFunction::Ceil => input.ceil(),
        // halves go to the even neighbour
        MathFunction::Round => input.round_ties_even(),
        MathFunction::Sqrt => input.sqrt(),
        MathFunction::Pow => input.powf(param1),
        MathFunction::Log => input.ln(),
        MathFunction::Log10 => input.log10(),
        MathFunction::Clamp => clamp(input, param1, param2),
        MathFunction::Clamp01 => clamp(input, 0.0, 1.0),
        MathFunction::Min => {
            if input < param1 {
                input
            } else {
                param1
            }
        }
        MathFunction::Max => {
            if input > param1 {
                input
            } else {
                param1
            }
        }
        MathFunction::Add => input + param1,
        MathFunction::Multiply => input * param1,
    }
}

/// Lower bound checked first, then upper. Unlike `f32::clamp` this accepts `min > max`;
/// NaN stays NaN.
fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactive_api_core::SceneObject;

    fn run(function: MathFunction, input: f32, p1: f32, p2: f32) -> f32 {
        let mut target = SceneObject::new("t");
        let node = NodeData::math("m", function, p1, p2);
        MathProcessor.process(&node, input, &mut target)
    }

    #[test]
    fn arithmetic() {
        assert_eq!(run(MathFunction::Add, 3.0, 2.0, 1.0), 5.0);
        assert_eq!(run(MathFunction::Multiply, 3.0, 2.0, 1.0), 6.0);
        assert_eq!(run(MathFunction::Pow, 3.0, 2.0, 1.0), 9.0);
    }

    #[test]
    fn unary_functions_ignore_params() {
        assert_eq!(run(MathFunction::Abs, -2.5, 100.0, 100.0), 2.5);
        assert_eq!(run(MathFunction::Floor, 2.7, 9.0, 9.0), 2.0);
        assert_eq!(run(MathFunction::Ceil, 2.1, 9.0, 9.0), 3.0);
        assert_eq!(run(MathFunction::Sqrt, 16.0, 9.0, 9.0), 4.0);
        assert_eq!(run(MathFunction::Sin, 0.0, 9.0, 9.0), 0.0);
        assert_eq!(run(MathFunction::Cos, 0.0, 9.0, 9.0), 1.0);
        assert!((run(MathFunction::Log, std::f32::consts::E, 0.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((run(MathFunction::Log10, 1000.0, 0.0, 1.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn round_to_even() {
        assert_eq!(run(MathFunction::Round, 2.5, 0.0, 1.0), 2.0);
        assert_eq!(run(MathFunction::Round, 3.5, 0.0, 1.0), 4.0);
        assert_eq!(run(MathFunction::Round, -1.4, 0.0, 1.0), -1.0);
    }

    #[test]
    fn clamps() {
        assert_eq!(run(MathFunction::Clamp, 5.0, 0.0, 2.0), 2.0);
        assert_eq!(run(MathFunction::Clamp, -5.0, 0.0, 2.0), 0.0);
        assert_eq!(run(MathFunction::Clamp, 1.0, 0.0, 2.0), 1.0);
        assert_eq!(run(MathFunction::Clamp01, 1.7, 0.0, 0.0), 1.0);
        assert_eq!(run(MathFunction::Clamp01, -0.2, 0.0, 0.0), 0.0);
        // inverted bounds do not panic
        assert_eq!(run(MathFunction::Clamp, 5.0, 3.0, 1.0), 1.0);
        assert_eq!(run(MathFunction::Clamp, 0.0, 3.0, 1.0), 3.0);
    }

    #[test]
    fn min_max_compare_with_param1() {
        assert_eq!(run(MathFunction::Min, 3.0, 1.0, 0.0), 1.0);
        assert_eq!(run(MathFunction::Min, -3.0, 1.0, 0.0), -3.0);
        assert_eq!(run(MathFunction::Max, 3.0, 1.0, 0.0), 3.0);
        assert_eq!(run(MathFunction::Max, -3.0, 1.0, 0.0), 1.0);
    }

    #[test]
    fn domain_errors_propagate() {
        assert!(run(MathFunction::Sqrt, -1.0, 0.0, 1.0).is_nan());
        assert_eq!(run(MathFunction::Log, 0.0, 0.0, 1.0), f32::NEG_INFINITY);
        assert!(run(MathFunction::Log10, -2.0, 0.0, 1.0).is_nan());
        assert!(run(MathFunction::Clamp, f32::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn unknown_function_and_wrong_kind_pass_through() {
        let mut target = SceneObject::new("t");
        let unknown = NodeData::with_params(
            "u",
            NodeKind::Math,
            NodeParams::Math(MathParams {
                function: None,
                param1: 5.0,
                param2: 5.0,
            }),
        );
        assert_eq!(MathProcessor.process(&unknown, 1.25, &mut target), 1.25);

        let curve_kind = NodeData::with_params(
            "c",
            NodeKind::Curve,
            NodeParams::Math(MathParams {
                function: Some(MathFunction::Add),
                param1: 5.0,
                param2: 1.0,
            }),
        );
        assert_eq!(MathProcessor.process(&curve_kind, 1.0, &mut target), 1.0);
    }
}
