//! Error types for the mirror engine.
//!
//! None of these reach the host as faults: the engine's public entry points
//! turn them into `bool`/status results and log them. They stay public for
//! callers of the `try_*` variants.

use thiserror::Error;

use treemirror_core::{CoreError, LocalId, RemoteId};
use treemirror_creds::CredentialError;
use treemirror_rpc::RpcError;

/// Why a connection could not be established.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("credentials unavailable: {0}")]
    Credentials(#[from] CredentialError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] RpcError),
}

/// Why a local object could not be mapped to a remote one.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Local hierarchy problem: missing node, detached branch, the root itself.
    #[error(transparent)]
    Tree(#[from] CoreError),

    #[error("local object {0} is not a variable")]
    NotAVariable(LocalId),

    /// A segment is missing remotely and auto-create is off.
    #[error("no remote object named {segment:?} under {parent}")]
    Missing { segment: String, parent: RemoteId },

    /// More than one remote sibling carries the segment name.
    #[error("{} remote objects named {segment:?} under {parent}", .candidates.len())]
    Ambiguous {
        segment: String,
        parent: RemoteId,
        candidates: Vec<RemoteId>,
    },

    #[error("lookup of {segment:?} under {parent} failed: {source}")]
    Lookup {
        segment: String,
        parent: RemoteId,
        #[source]
        source: RpcError,
    },

    #[error("creating mirror for {segment:?} under {parent} failed: {source}")]
    Create {
        segment: String,
        parent: RemoteId,
        #[source]
        source: RpcError,
    },
}

/// Why a profile could not be synchronized. Always logged, never raised.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile existence check for {name:?} failed: {source}")]
    ExistenceCheck {
        name: String,
        #[source]
        source: RpcError,
    },

    #[error("profile {0:?} is not defined locally")]
    NotDefinedLocally(String),

    #[error("defining profile {name:?} remotely failed: {source}")]
    Define {
        name: String,
        #[source]
        source: RpcError,
    },

    #[error("assigning profile {name:?} to {remote} failed: {source}")]
    Assign {
        name: String,
        remote: RemoteId,
        #[source]
        source: RpcError,
    },
}

/// Errors from a value push.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// No valid configuration has been applied.
    #[error("mirror is inactive")]
    Inactive,

    #[error("connection unavailable: {0}")]
    Connection(#[from] ConnectionError),

    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("pushing value of {local} to {remote} failed: {source}")]
    Push {
        local: LocalId,
        remote: RemoteId,
        #[source]
        source: RpcError,
    },
}

/// Result type for mirror operations.
pub type Result<T> = std::result::Result<T, MirrorError>;
