//! Session-scoped state.
//!
//! A session spans one configuration apply. Everything here is created fresh
//! at apply and dropped at the next one; nothing crosses session boundaries.

use std::collections::{HashMap, HashSet};

use treemirror_core::{LocalId, RemoteId, StoredCredentials, ValidatedConfig};
use treemirror_creds::CredentialResolver;

use crate::connection::ConnectionManager;

/// `LocalId → RemoteId` hints.
///
/// An entry was verified or created at some point during the session. It
/// may be stale if the remote object was deleted out of band; a failed push
/// invalidates it.
#[derive(Debug, Default, Clone)]
pub struct IdentityCache {
    entries: HashMap<LocalId, RemoteId>,
}

impl IdentityCache {
    pub fn get(&self, local: LocalId) -> Option<RemoteId> {
        self.entries.get(&local).copied()
    }

    pub fn insert(&mut self, local: LocalId, remote: RemoteId) {
        self.entries.insert(local, remote);
    }

    /// Drop the mapping for `local`. Returns whether one existed.
    pub fn invalidate(&mut self, local: LocalId) -> bool {
        self.entries.remove(&local).is_some()
    }

    pub fn contains(&self, local: LocalId) -> bool {
        self.entries.contains_key(&local)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Profile names known to exist remotely.
///
/// Once a name is recorded its definition is not sent again this session,
/// even if the local definition changes.
#[derive(Debug, Default, Clone)]
pub struct ProfileSyncRecord {
    names: HashSet<String>,
}

impl ProfileSyncRecord {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn record(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Counters for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Full path walks (cache misses).
    pub resolutions: u64,
    pub cache_hits: u64,
    /// Remote containers and variables created.
    pub created_nodes: u64,
    /// Successful value pushes.
    pub pushes: u64,
    pub failed_pushes: u64,
    /// Mappings dropped after a failed push.
    pub invalidations: u64,
}

/// The mutable caches of a session.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub mappings: IdentityCache,
    pub profiles: ProfileSyncRecord,
    pub stats: SessionStats,
}

/// Everything scoped to one activation.
pub struct Session<R> {
    pub config: ValidatedConfig,
    pub connection: ConnectionManager<R>,
    pub state: SessionState,
}

impl<R> Session<R> {
    /// Start a session with empty caches and no connection.
    pub fn new(config: ValidatedConfig, credentials: StoredCredentials) -> Self {
        let connection = ConnectionManager::new(
            CredentialResolver::new(credentials),
            config.endpoint_index,
            config.rpc_timeout,
        );
        Self {
            config,
            connection,
            state: SessionState::default(),
        }
    }
}
