//! Error types for the RPC transport.

use thiserror::Error;

/// Errors that can occur during a remote call.
///
/// Callers above the transport only distinguish "call succeeded" from
/// "call failed"; the variants exist for logging.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Network or HTTP client failure, including timeouts.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// The remote answered with an error payload.
    #[error("remote error in {method}: {message}")]
    Remote { method: String, message: String },

    /// The response body was not a JSON-RPC response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The result did not have the shape the operation expects.
    #[error("unexpected result from {method}: {result}")]
    UnexpectedResult { method: String, result: String },

    /// Injected or simulated failure (in-memory remote).
    #[error("simulated failure in {0}")]
    Simulated(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            RpcError::Status(status.as_u16())
        } else {
            RpcError::Transport(e.to_string())
        }
    }
}

/// Result type for remote calls.
pub type Result<T> = std::result::Result<T, RpcError>;
