//! HTTP JSON-RPC client.
//!
//! Posts one [`RpcRequest`] per call to `https://<host>/api/` with basic
//! credentials. Certificate validation is disabled because remote systems
//! typically run with self-signed certificates. There is no retry at this
//! layer; a timeout is an ordinary call failure.
//!
//! `IPS_GetObjectIDByName` answers with a single id even when several
//! siblings share the name, so a hit is checked against the parent's
//! children before it is trusted.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value as Json;

use treemirror_core::{Association, Endpoint, RemoteId, Value, VariableType};

use crate::api::RemoteApi;
use crate::error::{Result, RpcError};
use crate::messages::{
    decode_bool, decode_id, decode_ids, decode_lookup, decode_str, ChildLookup, RemoteCall,
    RpcRequest, RpcResponse,
};

/// JSON-RPC client bound to one endpoint.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: String,
    username: String,
    password: String,
    last_id: AtomicU64,
}

impl JsonRpcClient {
    /// Build a client for `endpoint` with a per-call `timeout`.
    pub fn new(endpoint: &Endpoint, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: endpoint.api_url(),
            username: endpoint.username.clone(),
            password: endpoint.password.clone(),
            last_id: AtomicU64::new(0),
        })
    }

    /// The URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one call and return its raw `result`.
    pub async fn call(&self, call: &RemoteCall) -> Result<Json> {
        let request = RpcRequest::new(call, self.next_request_id());
        tracing::trace!(method = request.method, id = request.id, "rpc call");

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status.as_u16()));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        body.into_result(call.method())
    }

    async fn call_unit(&self, call: RemoteCall) -> Result<()> {
        self.call(&call).await.map(|_| ())
    }

    /// Millisecond timestamp, bumped when two calls land in the same
    /// millisecond so ids stay strictly increasing.
    fn next_request_id(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        let mut last = self.last_id.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self
                .last_id
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Look up `name` under `parent` and reject duplicate sibling names.
async fn lookup_unique<F, Fut>(call: F, parent: RemoteId, name: &str) -> Result<ChildLookup>
where
    F: Fn(RemoteCall) -> Fut,
    Fut: Future<Output = Result<Json>>,
{
    let result = call(RemoteCall::LookupChild {
        parent,
        name: name.to_string(),
    })
    .await?;
    let found = match decode_lookup(&result)? {
        ChildLookup::Found(id) => id,
        other => return Ok(other),
    };

    let listing = RemoteCall::GetChildren { parent };
    let method = listing.method();
    let children = decode_ids(method, &call(listing).await?)?;

    let mut matches = Vec::new();
    for child in children {
        let query = RemoteCall::GetName { id: child };
        let method = query.method();
        if decode_str(method, &call(query).await?)? == name {
            matches.push(child);
        }
    }

    if matches.len() > 1 {
        Ok(ChildLookup::Ambiguous(matches))
    } else {
        Ok(ChildLookup::Found(found))
    }
}

#[async_trait]
impl RemoteApi for JsonRpcClient {
    async fn lookup_child(&self, parent: RemoteId, name: &str) -> Result<ChildLookup> {
        lookup_unique(|call| async move { self.call(&call).await }, parent, name).await
    }

    async fn create_container(&self) -> Result<RemoteId> {
        let call = RemoteCall::CreateContainer;
        let result = self.call(&call).await?;
        decode_id(call.method(), &result)
    }

    async fn create_variable(&self, variable_type: VariableType) -> Result<RemoteId> {
        let call = RemoteCall::CreateVariable { variable_type };
        let result = self.call(&call).await?;
        decode_id(call.method(), &result)
    }

    async fn set_parent(&self, id: RemoteId, parent: RemoteId) -> Result<()> {
        self.call_unit(RemoteCall::SetParent { id, parent }).await
    }

    async fn set_name(&self, id: RemoteId, name: &str) -> Result<()> {
        self.call_unit(RemoteCall::SetName {
            id,
            name: name.to_string(),
        })
        .await
    }

    async fn profile_exists(&self, name: &str) -> Result<bool> {
        let call = RemoteCall::ProfileExists {
            name: name.to_string(),
        };
        let result = self.call(&call).await?;
        decode_bool(call.method(), &result)
    }

    async fn create_profile(&self, name: &str, variable_type: VariableType) -> Result<()> {
        self.call_unit(RemoteCall::CreateProfile {
            name: name.to_string(),
            variable_type,
        })
        .await
    }

    async fn set_profile_text(&self, name: &str, prefix: &str, suffix: &str) -> Result<()> {
        self.call_unit(RemoteCall::SetProfileText {
            name: name.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
        .await
    }

    async fn set_profile_values(&self, name: &str, min: f64, max: f64, step: f64) -> Result<()> {
        self.call_unit(RemoteCall::SetProfileValues {
            name: name.to_string(),
            min,
            max,
            step,
        })
        .await
    }

    async fn set_profile_digits(&self, name: &str, digits: u32) -> Result<()> {
        self.call_unit(RemoteCall::SetProfileDigits {
            name: name.to_string(),
            digits,
        })
        .await
    }

    async fn set_profile_icon(&self, name: &str, icon: &str) -> Result<()> {
        self.call_unit(RemoteCall::SetProfileIcon {
            name: name.to_string(),
            icon: icon.to_string(),
        })
        .await
    }

    async fn add_profile_association(&self, name: &str, association: &Association) -> Result<()> {
        self.call_unit(RemoteCall::AddProfileAssociation {
            name: name.to_string(),
            association: association.clone(),
        })
        .await
    }

    async fn set_custom_profile(&self, id: RemoteId, name: &str) -> Result<()> {
        self.call_unit(RemoteCall::SetCustomProfile {
            id,
            name: name.to_string(),
        })
        .await
    }

    async fn set_value(&self, id: RemoteId, value: &Value) -> Result<()> {
        self.call_unit(RemoteCall::SetValue {
            id,
            value: value.clone(),
        })
        .await
    }
}
