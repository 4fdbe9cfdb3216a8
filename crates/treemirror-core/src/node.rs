//! Local nodes: read-only views of objects in the local tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::LocalId;

/// The value type of a variable.
///
/// Encoded on the wire by its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VariableType {
    Boolean = 0,
    Integer = 1,
    Float = 2,
    String = 3,
}

impl VariableType {
    /// Wire code of this type.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Boolean),
            1 => Some(Self::Integer),
            2 => Some(Self::Float),
            3 => Some(Self::String),
            _ => None,
        }
    }
}

impl From<VariableType> for u8 {
    fn from(t: VariableType) -> Self {
        t.code()
    }
}

impl TryFrom<u8> for VariableType {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(CoreError::InvalidVariableType(code))
    }
}

/// What kind of object a local node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A value-holding leaf.
    Variable(VariableType),
    /// Any structural object (category, instance, folder).
    Container,
}

/// A read-only snapshot of one object in the local tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNode {
    pub id: LocalId,
    pub name: String,
    /// `None` for the tree root or a detached object.
    pub parent_id: Option<LocalId>,
    pub kind: NodeKind,
    /// Standard (shared) profile name. Empty when unset.
    #[serde(default)]
    pub profile_name: String,
    /// Per-variable override. Empty when unset.
    #[serde(default)]
    pub custom_profile_name: String,
}

impl LocalNode {
    /// The variable type, if this node is a variable.
    pub fn variable_type(&self) -> Option<VariableType> {
        match self.kind {
            NodeKind::Variable(t) => Some(t),
            NodeKind::Container => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }
}

/// A typed variable value.
///
/// Serialized as the bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// The variable type this value belongs to.
    pub fn variable_type(&self) -> VariableType {
        match self {
            Value::Bool(_) => VariableType::Boolean,
            Value::Int(_) => VariableType::Integer,
            Value::Float(_) => VariableType::Float,
            Value::String(_) => VariableType::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
