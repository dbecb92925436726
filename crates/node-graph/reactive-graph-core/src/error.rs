//! Error types for graph loading, engine initialisation and evaluation.

use thiserror::Error;

use crate::config::ConfigError;
use crate::input::MemberType;
use crate::types::NodeId;

/// Failures while building, loading or saving a [`ReactiveGraph`](crate::ReactiveGraph).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph JSON could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("graph could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("node id '{0}' is already used in this graph")]
    DuplicateNodeId(NodeId),
    #[error("node '{0}' does not exist")]
    UnknownNode(NodeId),
    #[error("'{0}' is reserved for the entry node")]
    EntryNodeId(NodeId),
    #[error("node '{id}' is invalid: {reason}")]
    InvalidNode { id: NodeId, reason: String },
}

/// Why a [`ReactiveObject`](crate::ReactiveObject) came up disabled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("no graph assigned")]
    MissingGraph,
    #[error("no input source assigned")]
    MissingInput,
    #[error("type '{type_name}' has no member named '{member}'")]
    UnknownMember { type_name: String, member: String },
    #[error("member '{member}' is {found:?}, expected a float")]
    NonFloatMember { member: String, found: MemberType },
    #[error("method '{member}' takes {arity} argument(s); only zero-argument methods can feed a graph")]
    MethodTakesArguments { member: String, arity: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures during a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("branch depth exceeded {limit} at node '{node}' (is there a cycle?)")]
    DepthExceeded { node: NodeId, limit: usize },
}
