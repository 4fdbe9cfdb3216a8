//! The host-facing mirror.
//!
//! [`Mirror`] owns the session and is driven by two host triggers:
//! configuration apply and value-change notification. Every entry point
//! takes `&mut self`, so invocations never overlap.

use treemirror_core::{
    collect_variables, ConfigError, LocalId, LocalTree, MirrorConfig, RemoteId, StoredCredentials,
    Value,
};
use treemirror_creds::CredentialResolver;

use crate::connection::Connector;
use crate::error::{MirrorError, Result};
use crate::notify::Notifier;
use crate::resolver::MirrorResolver;
use crate::session::{Session, SessionStats};
use crate::sync::ValueSynchronizer;

/// Whether a valid configuration is in effect with at least one object
/// registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    Active,
    Inactive,
}

/// One-way mirror of a local subtree onto a remote system.
pub struct Mirror<T, N, C: Connector> {
    tree: T,
    notifier: N,
    connector: C,
    config: MirrorConfig,
    credentials: StoredCredentials,
    session: Option<Session<C::Remote>>,
    registered: Vec<LocalId>,
    config_error: Option<ConfigError>,
}

impl<T, N, C> Mirror<T, N, C>
where
    T: LocalTree,
    N: Notifier,
    C: Connector,
{
    /// An inactive mirror. Call [`apply`](Self::apply) to start a session.
    pub fn new(tree: T, notifier: N, connector: C) -> Self {
        Self {
            tree,
            notifier,
            connector,
            config: MirrorConfig::default(),
            credentials: StoredCredentials::default(),
            session: None,
            registered: Vec::new(),
            config_error: None,
        }
    }

    /// Apply a configuration and start a fresh session.
    ///
    /// Drops all previous registrations and caches. A valid configuration
    /// registers every active entry and pushes current values in list order
    /// until the first failed push; later entries are registered only.
    /// The result is `Inactive` when nothing ended up registered.
    pub async fn apply(
        &mut self,
        config: MirrorConfig,
        credentials: StoredCredentials,
    ) -> MirrorStatus {
        for id in self.registered.drain(..) {
            self.notifier.unregister(id);
        }
        self.session = None;
        self.config_error = None;
        self.config = config;
        self.credentials = credentials;

        let validated = match self.config.validate(&self.tree) {
            Ok(validated) => validated,
            Err(err) => {
                debug_log!(self.config.debug, warn, error = %err, "configuration rejected");
                self.config_error = Some(err);
                return MirrorStatus::Inactive;
            }
        };

        debug_log!(
            self.config.debug,
            info,
            local_root = %validated.local_root,
            remote_root = %validated.remote_root,
            endpoint = validated.endpoint_index,
            auto_create = validated.auto_create,
            "session started"
        );
        self.session = Some(Session::new(validated, self.credentials.clone()));
        self.resync().await;
        if self.registered.is_empty() {
            debug_log!(self.config.debug, info, "no objects registered");
        }
        self.status()
    }

    async fn resync(&mut self) {
        let entries: Vec<LocalId> = self
            .config
            .active_entries()
            .map(|entry| entry.object_id)
            .collect();
        let verbose = self.config.debug;

        let mut halted = false;
        for id in entries {
            if !self.tree.exists(id) {
                debug_log!(verbose, warn, local = %id, "selected object no longer exists");
                continue;
            }
            if self.registered.contains(&id) {
                continue;
            }
            self.notifier.register(id);
            self.registered.push(id);

            if halted {
                continue;
            }
            let pushed = match self.tree.value(id) {
                Some(value) => self.push(id, &value).await,
                None => false,
            };
            if !pushed {
                debug_log!(verbose, warn, local = %id, "initial sync halted");
                halted = true;
            }
        }
    }

    /// Host callback for a value change. Unregistered senders are ignored.
    pub async fn on_value_changed(&mut self, sender: LocalId, value: &Value) -> bool {
        if !self.registered.contains(&sender) {
            return false;
        }
        self.push(sender, value).await
    }

    /// Push a value. Returns whether it landed; failures are logged.
    pub async fn push(&mut self, local: LocalId, value: &Value) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        ValueSynchronizer::new(&self.tree, &self.connector)
            .push(session, local, value)
            .await
    }

    /// Push a value and report why it failed.
    pub async fn try_push(&mut self, local: LocalId, value: &Value) -> Result<RemoteId> {
        let session = self.session.as_mut().ok_or(MirrorError::Inactive)?;
        ValueSynchronizer::new(&self.tree, &self.connector)
            .try_push(session, local, value)
            .await
    }

    /// Resolve the remote mirror of `local` without pushing a value.
    pub async fn resolve(&mut self, local: LocalId) -> Option<RemoteId> {
        let Session {
            config,
            connection,
            state,
        } = self.session.as_mut()?;

        let remote = match connection.ensure(&self.connector) {
            Ok(remote) => remote,
            Err(err) => {
                debug_log!(config.debug, warn, error = %err, "connection unavailable");
                return None;
            }
        };
        match MirrorResolver::new(&self.tree, remote, config)
            .resolve(state, local)
            .await
        {
            Ok(id) => Some(id),
            Err(err) => {
                debug_log!(config.debug, warn, %local, error = %err, "resolution failed");
                None
            }
        }
    }

    /// Establish the session's connection if needed.
    pub fn ensure_connection(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.connection.ensure(&self.connector) {
            Ok(_) => true,
            Err(err) => {
                debug_log!(session.config.debug, warn, error = %err, "connection unavailable");
                false
            }
        }
    }

    pub fn status(&self) -> MirrorStatus {
        if self.session.is_some() && !self.registered.is_empty() {
            MirrorStatus::Active
        } else {
            MirrorStatus::Inactive
        }
    }

    /// Why the last apply left the mirror inactive.
    pub fn config_error(&self) -> Option<&ConfigError> {
        self.config_error.as_ref()
    }

    /// Counters of the current session; zero when inactive.
    pub fn stats(&self) -> SessionStats {
        self.session
            .as_ref()
            .map(|session| session.state.stats)
            .unwrap_or_default()
    }

    pub fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.connection.is_connected())
    }

    /// Objects registered for change notification, in registration order.
    pub fn registered(&self) -> &[LocalId] {
        &self.registered
    }

    pub fn cached_mapping(&self, local: LocalId) -> Option<RemoteId> {
        self.session
            .as_ref()
            .and_then(|session| session.state.mappings.get(local))
    }

    /// `(index, name)` of every stored endpoint.
    pub fn endpoints(&self) -> Vec<(u32, String)> {
        CredentialResolver::new(self.credentials.clone()).endpoint_names()
    }

    /// Variables below the configured local root, for the selection list.
    pub fn candidates(&self) -> Vec<LocalId> {
        match self.config.local_root {
            Some(root) if self.tree.exists(root) => collect_variables(&self.tree, root),
            _ => Vec::new(),
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}
