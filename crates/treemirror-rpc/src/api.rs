//! The typed remote interface.
//!
//! One method per remote operation the mirror uses. Implementations are the
//! HTTP [`JsonRpcClient`](crate::client::JsonRpcClient) and the in-memory
//! [`MemoryRemote`](crate::memory::MemoryRemote).

use std::sync::Arc;

use async_trait::async_trait;

use treemirror_core::{Association, RemoteId, Value, VariableType};

use crate::error::Result;
use crate::messages::ChildLookup;

/// Remote object-tree operations.
///
/// Every call either succeeds with a typed value or fails with an
/// [`RpcError`](crate::error::RpcError). Implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait RemoteApi: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Structure
    // ─────────────────────────────────────────────────────────────────────────

    /// Find the child of `parent` named exactly `name`.
    async fn lookup_child(&self, parent: RemoteId, name: &str) -> Result<ChildLookup>;

    /// Create a structural placeholder node. It starts unparented and unnamed.
    async fn create_container(&self) -> Result<RemoteId>;

    /// Create a variable of the given type. It starts unparented and unnamed.
    async fn create_variable(&self, variable_type: VariableType) -> Result<RemoteId>;

    async fn set_parent(&self, id: RemoteId, parent: RemoteId) -> Result<()>;

    async fn set_name(&self, id: RemoteId, name: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Profiles
    // ─────────────────────────────────────────────────────────────────────────

    async fn profile_exists(&self, name: &str) -> Result<bool>;

    async fn create_profile(&self, name: &str, variable_type: VariableType) -> Result<()>;

    async fn set_profile_text(&self, name: &str, prefix: &str, suffix: &str) -> Result<()>;

    async fn set_profile_values(&self, name: &str, min: f64, max: f64, step: f64) -> Result<()>;

    async fn set_profile_digits(&self, name: &str, digits: u32) -> Result<()>;

    async fn set_profile_icon(&self, name: &str, icon: &str) -> Result<()>;

    async fn add_profile_association(&self, name: &str, association: &Association) -> Result<()>;

    /// Assign `name` to the custom-profile slot of variable `id`.
    async fn set_custom_profile(&self, id: RemoteId, name: &str) -> Result<()>;

    // ─────────────────────────────────────────────────────────────────────────
    // Values
    // ─────────────────────────────────────────────────────────────────────────

    async fn set_value(&self, id: RemoteId, value: &Value) -> Result<()>;
}

#[async_trait]
impl<R: RemoteApi + ?Sized> RemoteApi for Arc<R> {
    async fn lookup_child(&self, parent: RemoteId, name: &str) -> Result<ChildLookup> {
        (**self).lookup_child(parent, name).await
    }

    async fn create_container(&self) -> Result<RemoteId> {
        (**self).create_container().await
    }

    async fn create_variable(&self, variable_type: VariableType) -> Result<RemoteId> {
        (**self).create_variable(variable_type).await
    }

    async fn set_parent(&self, id: RemoteId, parent: RemoteId) -> Result<()> {
        (**self).set_parent(id, parent).await
    }

    async fn set_name(&self, id: RemoteId, name: &str) -> Result<()> {
        (**self).set_name(id, name).await
    }

    async fn profile_exists(&self, name: &str) -> Result<bool> {
        (**self).profile_exists(name).await
    }

    async fn create_profile(&self, name: &str, variable_type: VariableType) -> Result<()> {
        (**self).create_profile(name, variable_type).await
    }

    async fn set_profile_text(&self, name: &str, prefix: &str, suffix: &str) -> Result<()> {
        (**self).set_profile_text(name, prefix, suffix).await
    }

    async fn set_profile_values(&self, name: &str, min: f64, max: f64, step: f64) -> Result<()> {
        (**self).set_profile_values(name, min, max, step).await
    }

    async fn set_profile_digits(&self, name: &str, digits: u32) -> Result<()> {
        (**self).set_profile_digits(name, digits).await
    }

    async fn set_profile_icon(&self, name: &str, icon: &str) -> Result<()> {
        (**self).set_profile_icon(name, icon).await
    }

    async fn add_profile_association(&self, name: &str, association: &Association) -> Result<()> {
        (**self).add_profile_association(name, association).await
    }

    async fn set_custom_profile(&self, id: RemoteId, name: &str) -> Result<()> {
        (**self).set_custom_profile(id, name).await
    }

    async fn set_value(&self, id: RemoteId, value: &Value) -> Result<()> {
        (**self).set_value(id, value).await
    }
}
