//! Error types for the Tree Mirror Core.

use thiserror::Error;

use crate::types::LocalId;

/// Errors raised while reading the local tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("local object {0} does not exist")]
    NodeNotFound(LocalId),

    #[error("local object {node} is detached from the configured root (stopped at {stopped_at})")]
    Detached { node: LocalId, stopped_at: LocalId },

    #[error("local object {0} is the configured root and has no mirror path")]
    IsRoot(LocalId),

    #[error("invalid variable type code: {0}")]
    InvalidVariableType(u8),
}

/// Configuration errors, detected when a configuration is applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no local root configured")]
    MissingLocalRoot,

    #[error("configured local root {0} does not exist")]
    InvalidLocalRoot(LocalId),

    #[error("no remote root configured")]
    MissingRemoteRoot,

    #[error("no remote endpoint selected")]
    MissingEndpoint,

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
