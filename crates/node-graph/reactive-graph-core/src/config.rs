//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_depth must be at least 1")]
    ZeroDepth,
}

/// Knobs for a [`ReactiveObject`](crate::ReactiveObject).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest branch a tick may descend before it is aborted. Only a cycle should reach
    /// the default; the walk does not recurse, so a large value costs no call stack.
    pub max_depth: usize,
    /// Run [`ReactiveGraph::validate`](crate::ReactiveGraph::validate) on awake and log
    /// every issue found.
    pub validate_graph: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 16_384,
            validate_graph: true,
        }
    }
}

impl EngineConfig {
    /// Shallow depth limit, validation on.
    pub fn strict() -> Self {
        Self {
            max_depth: 64,
            validate_graph: true,
        }
    }

    /// Deep chains allowed, no load-time validation.
    pub fn permissive() -> Self {
        Self {
            max_depth: 1 << 20,
            validate_graph: false,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}
