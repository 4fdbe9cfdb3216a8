//! Error types for credential resolution.

use thiserror::Error;

/// Errors that can occur while resolving stored credentials.
///
/// All of these are normal operational states (not configured yet, wrong
/// key pasted) rather than faults.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Ciphertext or keyring not stored.
    #[error("credentials not configured")]
    Missing,

    /// A stored value is not valid hex.
    #[error("invalid hex encoding: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The keyring document could not be parsed.
    #[error("malformed keyring: {0}")]
    MalformedKeyring(String),

    /// Key or IV has the wrong length for the cipher.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Authenticated decryption failed (wrong key, IV, tag, or tampered data).
    #[error("decryption failed")]
    DecryptionFailed,

    /// Encryption error.
    #[error("encryption error: {0}")]
    EncryptionError(String),

    /// The decrypted payload is not an endpoint set.
    #[error("malformed credential payload: {0}")]
    MalformedPayload(String),

    /// The selected endpoint index is not in the decrypted set.
    #[error("no endpoint with index {0}")]
    UnknownEndpoint(u32),
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;
