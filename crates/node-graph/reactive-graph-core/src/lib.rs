//! reactive-graph-core: scalar-driven node graphs that animate a target.
//!
//! A [`ReactiveGraph`] is authored once and stored as JSON. At runtime a
//! [`ReactiveObject`] binds it to a [`Target`](reactive_api_core::Target) and an input
//! source, then each tick pushes the input through the graph.

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod input;
pub mod processors;
pub mod schema;
pub mod types;

pub use config::{ConfigError, EngineConfig};
pub use engine::{LinkIndex, ReactiveObject, TickReport};
pub use error::{EvalError, GraphError, InitError};
pub use graph::{GraphIssue, NodeLink, ReactiveGraph};
pub use input::{
    float_members, ConstantInput, InputFn, InputSpec, MemberInfo, MemberKind, MemberSource,
    MemberType, ReactiveInput, ResolvedInput,
};
pub use processors::{
    create_processor, NodeProcessor, PassThroughProcessor, ProcessorKey, ProcessorRegistry,
};
pub use schema::{registry, signature, NodeSignature};
pub use types::*;
