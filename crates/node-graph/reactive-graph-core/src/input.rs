//! Input sources.
//!
//! A graph is driven by one scalar per tick. It comes either from a [`ReactiveInput`]
//! or from a named float member of some object ([`MemberSource`]). Member lookups are
//! resolved once, when the engine wakes up, into a [`ResolvedInput`]; a bad member name
//! is an initialisation error rather than a per-tick failure.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InitError;

/// Anything that can produce the per-tick scalar.
pub trait ReactiveInput {
    fn value(&self) -> f32;
}

impl ReactiveInput for Cell<f32> {
    fn value(&self) -> f32 {
        self.get()
    }
}

impl<T: ReactiveInput + ?Sized> ReactiveInput for Rc<T> {
    fn value(&self) -> f32 {
        (**self).value()
    }
}

/// Always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantInput(pub f32);

impl ReactiveInput for ConstantInput {
    fn value(&self) -> f32 {
        self.0
    }
}

/// Wraps a closure as an input.
pub struct InputFn<F>(pub F);

impl<F: Fn() -> f32> ReactiveInput for InputFn<F> {
    fn value(&self) -> f32 {
        (self.0)()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
    Method { arity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Float,
    Int,
    Bool,
    Text,
    Other,
}

/// One readable member of a [`MemberSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub value_type: MemberType,
}

impl MemberInfo {
    pub fn field(name: impl Into<String>, value_type: MemberType) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            value_type,
        }
    }

    pub fn property(name: impl Into<String>, value_type: MemberType) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            value_type,
        }
    }

    pub fn method(name: impl Into<String>, arity: usize, value_type: MemberType) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method { arity },
            value_type,
        }
    }

    /// Float-typed and callable without arguments.
    pub fn is_float_accessor(&self) -> bool {
        self.value_type == MemberType::Float
            && !matches!(self.kind, MemberKind::Method { arity } if arity > 0)
    }

    /// Picker label, e.g. `Rig/wobble` or `Rig/Speed()` for methods.
    pub fn display_label(&self, type_name: &str) -> String {
        match self.kind {
            MemberKind::Method { .. } => format!("{type_name}/{}()", self.name),
            MemberKind::Field | MemberKind::Property => format!("{type_name}/{}", self.name),
        }
    }
}

/// An object whose members can be read by name.
pub trait MemberSource {
    fn type_name(&self) -> &str;

    /// All members, in a stable order. `read_float` indexes into this list.
    fn members(&self) -> Vec<MemberInfo>;

    /// Read the float member at `index`. Only called for members that passed
    /// resolution.
    fn read_float(&self, index: usize) -> f32;
}

/// Members of `source` that can drive a graph.
pub fn float_members(source: &dyn MemberSource) -> Vec<MemberInfo> {
    source
        .members()
        .into_iter()
        .filter(MemberInfo::is_float_accessor)
        .collect()
}

/// Where the engine should read its scalar from.
#[derive(Clone)]
pub enum InputSpec {
    Source(Rc<dyn ReactiveInput>),
    Member {
        object: Rc<dyn MemberSource>,
        member: String,
    },
}

impl InputSpec {
    pub fn source(input: impl ReactiveInput + 'static) -> Self {
        InputSpec::Source(Rc::new(input))
    }

    pub fn member(object: Rc<dyn MemberSource>, member: impl Into<String>) -> Self {
        InputSpec::Member {
            object,
            member: member.into(),
        }
    }

    /// Bind to a concrete reader. Fails if the member is missing, not a float, or a
    /// method that needs arguments.
    pub fn resolve(self) -> Result<ResolvedInput, InitError> {
        match self {
            InputSpec::Source(source) => Ok(ResolvedInput {
                label: "source".to_string(),
                read: Box::new(move || source.value()),
            }),
            InputSpec::Member { object, member } => {
                let members = object.members();
                let Some(index) = members.iter().position(|m| m.name == member) else {
                    return Err(InitError::UnknownMember {
                        type_name: object.type_name().to_string(),
                        member,
                    });
                };
                let info = &members[index];
                if info.value_type != MemberType::Float {
                    return Err(InitError::NonFloatMember {
                        member,
                        found: info.value_type,
                    });
                }
                if let MemberKind::Method { arity } = info.kind {
                    if arity > 0 {
                        return Err(InitError::MethodTakesArguments { member, arity });
                    }
                }
                let label = info.display_label(object.type_name());
                debug!(input = %label, "input member resolved");
                Ok(ResolvedInput {
                    label,
                    read: Box::new(move || object.read_float(index)),
                })
            }
        }
    }
}

impl fmt::Debug for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSpec::Source(_) => f.write_str("InputSpec::Source(..)"),
            InputSpec::Member { object, member } => f
                .debug_struct("InputSpec::Member")
                .field("type_name", &object.type_name())
                .field("member", member)
                .finish(),
        }
    }
}

/// A bound input reader.
pub struct ResolvedInput {
    label: String,
    read: Box<dyn Fn() -> f32>,
}

impl ResolvedInput {
    pub fn value(&self) -> f32 {
        (self.read)()
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for ResolvedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedInput")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
