//! Value pushes.

use treemirror_core::{LocalId, LocalTree, RemoteId, Value};
use treemirror_rpc::RemoteApi;

use crate::connection::Connector;
use crate::error::{MirrorError, Result};
use crate::resolver::MirrorResolver;
use crate::session::Session;

/// Pushes local values to their remote mirrors.
///
/// A failed `SetValue` drops the cached mapping so the next push walks the
/// full path again and recreates the mirror if it was deleted remotely.
pub struct ValueSynchronizer<'a, T: ?Sized, C> {
    tree: &'a T,
    connector: &'a C,
}

impl<'a, T, C> ValueSynchronizer<'a, T, C>
where
    T: LocalTree + ?Sized,
    C: Connector,
{
    pub fn new(tree: &'a T, connector: &'a C) -> Self {
        Self { tree, connector }
    }

    /// Push `value`, logging any failure. Returns whether it landed.
    pub async fn push(
        &self,
        session: &mut Session<C::Remote>,
        local: LocalId,
        value: &Value,
    ) -> bool {
        let verbose = session.config.debug;
        match self.try_push(session, local, value).await {
            Ok(remote) => {
                debug_log!(verbose, debug, %local, %remote, %value, "value pushed");
                true
            }
            Err(err) => {
                debug_log!(verbose, warn, %local, error = %err, "push failed");
                false
            }
        }
    }

    /// Push `value` and report why it failed.
    pub async fn try_push(
        &self,
        session: &mut Session<C::Remote>,
        local: LocalId,
        value: &Value,
    ) -> Result<RemoteId> {
        let result = self.attempt(session, local, value).await;
        let stats = &mut session.state.stats;
        match result {
            Ok(_) => stats.pushes += 1,
            Err(_) => stats.failed_pushes += 1,
        }
        result
    }

    async fn attempt(
        &self,
        session: &mut Session<C::Remote>,
        local: LocalId,
        value: &Value,
    ) -> Result<RemoteId> {
        let Session {
            config,
            connection,
            state,
        } = session;

        let remote = connection.ensure(self.connector)?;
        let target = MirrorResolver::new(self.tree, remote, config)
            .resolve(state, local)
            .await?;

        if let Err(source) = remote.set_value(target, value).await {
            if state.mappings.invalidate(local) {
                state.stats.invalidations += 1;
            }
            return Err(MirrorError::Push {
                local,
                remote: target,
                source,
            });
        }
        Ok(target)
    }
}
