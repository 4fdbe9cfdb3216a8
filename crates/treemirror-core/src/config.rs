//! Persisted mirror configuration.
//!
//! The host stores these values and hands them over on every apply. They are
//! validated once per apply into a [`ValidatedConfig`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::tree::LocalTree;
use crate::types::{LocalId, RemoteId};

/// Default per-call RPC timeout.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 5_000;

fn default_rpc_timeout_ms() -> u64 {
    DEFAULT_RPC_TIMEOUT_MS
}

/// One user-selected local object eligible for mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntry {
    pub object_id: LocalId,
    #[serde(default)]
    pub active: bool,
}

impl SyncEntry {
    pub fn active(object_id: LocalId) -> Self {
        Self {
            object_id,
            active: true,
        }
    }

    pub fn inactive(object_id: LocalId) -> Self {
        Self {
            object_id,
            active: false,
        }
    }
}

/// The two stored credential values, both hex.
///
/// Either may be absent when the mirror has not been set up yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default)]
    pub ciphertext: Option<String>,
    #[serde(default)]
    pub keyring: Option<String>,
}

impl StoredCredentials {
    pub fn new(ciphertext: impl Into<String>, keyring: impl Into<String>) -> Self {
        Self {
            ciphertext: Some(ciphertext.into()),
            keyring: Some(keyring.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.as_deref().map_or(true, str::is_empty)
            || self.keyring.as_deref().map_or(true, str::is_empty)
    }
}

/// Mirror configuration as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Local anchor: objects below it are mirrored.
    #[serde(default)]
    pub local_root: Option<LocalId>,
    /// Remote anchor: mirrors are created below it.
    #[serde(default)]
    pub remote_root: Option<RemoteId>,
    /// Index into the decrypted endpoint set.
    #[serde(default)]
    pub endpoint_index: Option<u32>,
    /// Create missing remote nodes instead of failing.
    #[serde(default)]
    pub auto_create: bool,
    /// Emit diagnostic logs.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Ordered selection list.
    #[serde(default)]
    pub entries: Vec<SyncEntry>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            local_root: None,
            remote_root: None,
            endpoint_index: None,
            auto_create: false,
            debug: false,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
            entries: Vec::new(),
        }
    }
}

impl MirrorConfig {
    /// Parse a persisted JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Check anchors and endpoint selection against the local tree.
    pub fn validate<T: LocalTree + ?Sized>(&self, tree: &T) -> Result<ValidatedConfig, ConfigError> {
        let local_root = self.local_root.ok_or(ConfigError::MissingLocalRoot)?;
        if !tree.exists(local_root) {
            return Err(ConfigError::InvalidLocalRoot(local_root));
        }
        let remote_root = self.remote_root.ok_or(ConfigError::MissingRemoteRoot)?;
        let endpoint_index = self.endpoint_index.ok_or(ConfigError::MissingEndpoint)?;

        Ok(ValidatedConfig {
            local_root,
            remote_root,
            endpoint_index,
            auto_create: self.auto_create,
            debug: self.debug,
            rpc_timeout: Duration::from_millis(self.rpc_timeout_ms),
        })
    }

    /// Active entries in list order.
    pub fn active_entries(&self) -> impl Iterator<Item = &SyncEntry> {
        self.entries.iter().filter(|e| e.active)
    }
}

/// A configuration whose anchors and endpoint are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub local_root: LocalId,
    pub remote_root: RemoteId,
    pub endpoint_index: u32,
    pub auto_create: bool,
    pub debug: bool,
    pub rpc_timeout: Duration,
}
