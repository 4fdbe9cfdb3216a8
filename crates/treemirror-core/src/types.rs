//! Strong type definitions for object identities.
//!
//! Local and remote identifiers share a representation but never mix: a
//! `LocalId` cannot be passed where a `RemoteId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an object in the local tree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(pub u32);

impl LocalId {
    /// Create a new LocalId from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LocalId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identifier of an object on the remote system.
///
/// The mirror never holds a remote object model, only identities it has
/// looked up or created.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub u32);

impl RemoteId {
    /// Create a new RemoteId from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteId({})", self.0)
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RemoteId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
