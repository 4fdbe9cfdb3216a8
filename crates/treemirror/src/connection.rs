//! Connection management: one transport handle per session.

use std::time::Duration;

use treemirror_core::Endpoint;
use treemirror_creds::CredentialResolver;
use treemirror_rpc::{JsonRpcClient, RemoteApi, RpcError};

use crate::error::ConnectionError;

/// Builds a transport handle for an endpoint.
pub trait Connector {
    type Remote: RemoteApi;

    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<Self::Remote, RpcError>;
}

/// Connects over HTTPS JSON-RPC.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Remote = JsonRpcClient;

    fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<JsonRpcClient, RpcError> {
        JsonRpcClient::new(endpoint, timeout)
    }
}

/// Lazily establishes and then reuses the session's transport handle.
///
/// Once established, the handle is never re-validated; failures show up as
/// individual call errors. A failed attempt is not remembered, so the next
/// call tries again.
pub struct ConnectionManager<R> {
    credentials: CredentialResolver,
    endpoint_index: u32,
    timeout: Duration,
    remote: Option<R>,
}

impl<R> ConnectionManager<R> {
    pub fn new(credentials: CredentialResolver, endpoint_index: u32, timeout: Duration) -> Self {
        Self {
            credentials,
            endpoint_index,
            timeout,
            remote: None,
        }
    }

    /// Return the handle, establishing it on first use.
    pub fn ensure<C>(&mut self, connector: &C) -> Result<&R, ConnectionError>
    where
        C: Connector<Remote = R>,
    {
        let remote = match self.remote.take() {
            Some(remote) => remote,
            None => {
                let endpoint = self.credentials.endpoint(self.endpoint_index)?;
                connector.connect(&endpoint, self.timeout)?
            }
        };
        Ok(self.remote.insert(remote))
    }

    /// The handle, if already established.
    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.remote.is_some()
    }
}

/// An in-memory connector for testing.
///
/// Hands out clones of one [`MemoryRemote`](treemirror_rpc::MemoryRemote)
/// and records every endpoint it was asked to connect to.
pub mod memory {
    use super::*;
    use std::sync::{Arc, Mutex};
    use treemirror_rpc::MemoryRemote;

    #[derive(Clone)]
    pub struct MemoryConnector {
        remote: MemoryRemote,
        connected: Arc<Mutex<Vec<Endpoint>>>,
        refuse: bool,
    }

    impl MemoryConnector {
        pub fn new(remote: MemoryRemote) -> Self {
            Self {
                remote,
                connected: Arc::new(Mutex::new(Vec::new())),
                refuse: false,
            }
        }

        /// A connector whose every connect attempt fails.
        pub fn refusing(remote: MemoryRemote) -> Self {
            Self {
                refuse: true,
                ..Self::new(remote)
            }
        }

        /// Endpoints connected to, in order.
        pub fn connected(&self) -> Vec<Endpoint> {
            self.connected.lock().unwrap().clone()
        }

        pub fn remote(&self) -> &MemoryRemote {
            &self.remote
        }
    }

    impl Connector for MemoryConnector {
        type Remote = MemoryRemote;

        fn connect(&self, endpoint: &Endpoint, _timeout: Duration) -> Result<MemoryRemote, RpcError> {
            if self.refuse {
                return Err(RpcError::Transport(format!("{} refused", endpoint.host)));
            }
            self.connected.lock().unwrap().push(endpoint.clone());
            Ok(self.remote.clone())
        }
    }
}
