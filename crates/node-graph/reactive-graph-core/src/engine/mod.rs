//! Per-object evaluation engine.
//!
//! A [`ReactiveObject`] binds one graph to one target. Waking it up resolves the input,
//! builds one processor per parameter variant present in the graph and indexes the
//! links. Each [`evaluate`](ReactiveObject::evaluate) then reads the input once and
//! pushes it down every branch from the entry node, depth first, in link order.
//!
//! There is no memoisation: a node reachable along two paths runs twice, once per path,
//! each time with that path's value.

use std::sync::Arc;

use reactive_api_core::Target;
use tracing::{debug, error, trace, warn};

use crate::config::EngineConfig;
use crate::error::{EvalError, InitError};
use crate::graph::ReactiveGraph;
use crate::input::{InputSpec, ResolvedInput};
use crate::processors::ProcessorRegistry;

mod link_index;

pub use link_index::LinkIndex;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// False when the object is disabled and nothing ran.
    pub evaluated: bool,
    /// The scalar fed into the entry branches.
    pub input: f32,
    /// Processor invocations, counting repeats.
    pub visits: usize,
}

#[derive(Debug)]
struct Runtime {
    graph: Arc<ReactiveGraph>,
    input: ResolvedInput,
    registry: ProcessorRegistry,
    index: LinkIndex,
    stack: Vec<Frame>,
}

/// A node waiting to run with the value its parent produced.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    input: f32,
    depth: usize,
}

#[derive(Debug)]
enum State {
    Disabled(InitError),
    Enabled(Runtime),
}

/// A graph driving a target.
#[derive(Debug)]
pub struct ReactiveObject<T: Target> {
    target: T,
    config: EngineConfig,
    state: State,
}

impl<T: Target> ReactiveObject<T> {
    /// Bind `graph` and `input` to `target`.
    ///
    /// Never fails. A missing graph, a missing or unresolvable input, or an invalid
    /// config leaves the object disabled; see [`init_error`](Self::init_error).
    pub fn awake(
        graph: Option<Arc<ReactiveGraph>>,
        input: Option<InputSpec>,
        mut target: T,
        config: EngineConfig,
    ) -> Self {
        let state = match Self::init(graph, input, &mut target, &config) {
            Ok(runtime) => State::Enabled(runtime),
            Err(err) => {
                warn!(error = %err, "reactive object disabled");
                State::Disabled(err)
            }
        };
        Self {
            target,
            config,
            state,
        }
    }

    fn init(
        graph: Option<Arc<ReactiveGraph>>,
        input: Option<InputSpec>,
        target: &mut T,
        config: &EngineConfig,
    ) -> Result<Runtime, InitError> {
        config.validate()?;
        let input = input.ok_or(InitError::MissingInput)?;
        let graph = graph.ok_or(InitError::MissingGraph)?;
        let input = input.resolve()?;

        if config.validate_graph {
            for issue in graph.validate() {
                warn!(%issue, "graph issue");
            }
        }

        let registry = ProcessorRegistry::build(graph.processor_keys(), target);
        let index = LinkIndex::build(&graph);
        debug!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            processors = registry.len(),
            input = input.label(),
            "reactive object awake"
        );
        Ok(Runtime {
            graph,
            input,
            registry,
            index,
            stack: Vec::new(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, State::Enabled(_))
    }

    pub fn init_error(&self) -> Option<&InitError> {
        match &self.state {
            State::Disabled(err) => Some(err),
            State::Enabled(_) => None,
        }
    }

    /// Run one tick. Disabled objects return an empty report and touch nothing.
    ///
    /// On [`EvalError::DepthExceeded`] the tick stops where it is; writes already made
    /// stay made.
    pub fn evaluate(&mut self) -> Result<TickReport, EvalError> {
        let State::Enabled(runtime) = &mut self.state else {
            return Ok(TickReport::default());
        };
        let input = runtime.input.value();
        let mut report = TickReport {
            evaluated: true,
            input,
            visits: 0,
        };
        let mut walk = Walk {
            graph: &runtime.graph,
            index: &runtime.index,
            registry: &mut runtime.registry,
            stack: &mut runtime.stack,
            target: &mut self.target,
            max_depth: self.config.max_depth,
            visits: 0,
        };
        walk.run(runtime.index.entry(), input)?;
        report.visits = walk.visits;
        trace!(input, visits = report.visits, "tick");
        Ok(report)
    }

    /// Run the branch rooted at `node_id` with `input`, as if it hung off the entry node.
    /// Unknown ids and disabled objects do nothing.
    pub fn process_branch(&mut self, node_id: &str, input: f32) -> Result<TickReport, EvalError> {
        let State::Enabled(runtime) = &mut self.state else {
            return Ok(TickReport::default());
        };
        let Some(root) = runtime.index.position(node_id) else {
            return Ok(TickReport::default());
        };
        let mut walk = Walk {
            graph: &runtime.graph,
            index: &runtime.index,
            registry: &mut runtime.registry,
            stack: &mut runtime.stack,
            target: &mut self.target,
            max_depth: self.config.max_depth,
            visits: 0,
        };
        walk.run(&[root], input)?;
        Ok(TickReport {
            evaluated: true,
            input,
            visits: walk.visits,
        })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn graph(&self) -> Option<&Arc<ReactiveGraph>> {
        match &self.state {
            State::Enabled(runtime) => Some(&runtime.graph),
            State::Disabled(_) => None,
        }
    }

    pub fn registry(&self) -> Option<&ProcessorRegistry> {
        match &self.state {
            State::Enabled(runtime) => Some(&runtime.registry),
            State::Disabled(_) => None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Borrowed pieces of one depth-first pass.
struct Walk<'a> {
    graph: &'a ReactiveGraph,
    index: &'a LinkIndex,
    registry: &'a mut ProcessorRegistry,
    stack: &'a mut Vec<Frame>,
    target: &'a mut dyn Target,
    max_depth: usize,
    visits: usize,
}

impl Walk<'_> {
    /// Run every branch under `roots` (depth 1) with `input`, in order. Children are
    /// pushed in reverse so they pop in link order, which keeps the visit order of a
    /// recursive pre-order walk.
    fn run(&mut self, roots: &[usize], input: f32) -> Result<(), EvalError> {
        self.stack.clear();
        self.stack.extend(roots.iter().rev().map(|&node| Frame {
            node,
            input,
            depth: 1,
        }));

        let index = self.index;
        while let Some(frame) = self.stack.pop() {
            let Some(data) = self.graph.nodes.get(frame.node) else {
                continue;
            };
            if frame.depth > self.max_depth {
                self.stack.clear();
                error!(node = %data.id(), limit = self.max_depth, "branch too deep; tick aborted");
                return Err(EvalError::DepthExceeded {
                    node: data.id().to_string(),
                    limit: self.max_depth,
                });
            }
            let output = self.registry.process(data, frame.input, &mut *self.target);
            self.visits += 1;

            self.stack.extend(index.outgoing(frame.node).iter().rev().map(|&node| Frame {
                node,
                input: output,
                depth: frame.depth + 1,
            }));
        }
        Ok(())
    }
}
