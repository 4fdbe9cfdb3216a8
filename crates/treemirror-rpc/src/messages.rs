//! Remote call vocabulary and JSON-RPC envelopes.
//!
//! Every remote operation the mirror uses is one [`RemoteCall`] variant. The
//! variant knows its wire method name and positional parameters, so the HTTP
//! client and the in-memory remote agree on a single vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};

use treemirror_core::{Association, RemoteId, Value, VariableType};

use crate::error::{Result, RpcError};

/// JSON-RPC protocol version tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// Module identifier of the lightweight placeholder instance used as a
/// remote container.
pub const CONTAINER_MODULE_ID: &str = "{485D0419-BE97-4548-AA9C-C083EB82E61E}";

/// One typed remote operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    LookupChild { parent: RemoteId, name: String },
    GetChildren { parent: RemoteId },
    GetName { id: RemoteId },
    CreateContainer,
    CreateVariable { variable_type: VariableType },
    SetParent { id: RemoteId, parent: RemoteId },
    SetName { id: RemoteId, name: String },
    ProfileExists { name: String },
    CreateProfile { name: String, variable_type: VariableType },
    SetProfileText { name: String, prefix: String, suffix: String },
    SetProfileValues { name: String, min: f64, max: f64, step: f64 },
    SetProfileDigits { name: String, digits: u32 },
    SetProfileIcon { name: String, icon: String },
    AddProfileAssociation { name: String, association: Association },
    SetCustomProfile { id: RemoteId, name: String },
    SetValue { id: RemoteId, value: Value },
}

impl RemoteCall {
    /// Wire method name.
    pub fn method(&self) -> &'static str {
        match self {
            RemoteCall::LookupChild { .. } => "IPS_GetObjectIDByName",
            RemoteCall::GetChildren { .. } => "IPS_GetChildrenIDs",
            RemoteCall::GetName { .. } => "IPS_GetName",
            RemoteCall::CreateContainer => "IPS_CreateInstance",
            RemoteCall::CreateVariable { .. } => "IPS_CreateVariable",
            RemoteCall::SetParent { .. } => "IPS_SetParent",
            RemoteCall::SetName { .. } => "IPS_SetName",
            RemoteCall::ProfileExists { .. } => "IPS_VariableProfileExists",
            RemoteCall::CreateProfile { .. } => "IPS_CreateVariableProfile",
            RemoteCall::SetProfileText { .. } => "IPS_SetVariableProfileText",
            RemoteCall::SetProfileValues { .. } => "IPS_SetVariableProfileValues",
            RemoteCall::SetProfileDigits { .. } => "IPS_SetVariableProfileDigits",
            RemoteCall::SetProfileIcon { .. } => "IPS_SetVariableProfileIcon",
            RemoteCall::AddProfileAssociation { .. } => "IPS_SetVariableProfileAssociation",
            RemoteCall::SetCustomProfile { .. } => "IPS_SetVariableCustomProfile",
            RemoteCall::SetValue { .. } => "SetValue",
        }
    }

    /// Positional parameters, in wire order.
    pub fn params(&self) -> Vec<Json> {
        match self {
            RemoteCall::LookupChild { parent, name } => vec![json!(name), json!(parent)],
            RemoteCall::GetChildren { parent } => vec![json!(parent)],
            RemoteCall::GetName { id } => vec![json!(id)],
            RemoteCall::CreateContainer => vec![json!(CONTAINER_MODULE_ID)],
            RemoteCall::CreateVariable { variable_type } => vec![json!(variable_type)],
            RemoteCall::SetParent { id, parent } => vec![json!(id), json!(parent)],
            RemoteCall::SetName { id, name } => vec![json!(id), json!(name)],
            RemoteCall::ProfileExists { name } => vec![json!(name)],
            RemoteCall::CreateProfile {
                name,
                variable_type,
            } => vec![json!(name), json!(variable_type)],
            RemoteCall::SetProfileText {
                name,
                prefix,
                suffix,
            } => vec![json!(name), json!(prefix), json!(suffix)],
            RemoteCall::SetProfileValues {
                name,
                min,
                max,
                step,
            } => vec![json!(name), json!(min), json!(max), json!(step)],
            RemoteCall::SetProfileDigits { name, digits } => vec![json!(name), json!(digits)],
            RemoteCall::SetProfileIcon { name, icon } => vec![json!(name), json!(icon)],
            RemoteCall::AddProfileAssociation { name, association } => vec![
                json!(name),
                json!(association.value),
                json!(association.label),
                json!(association.icon),
                json!(association.color),
            ],
            RemoteCall::SetCustomProfile { id, name } => vec![json!(id), json!(name)],
            RemoteCall::SetValue { id, value } => vec![json!(id), json!(value)],
        }
    }

    /// Whether this call belongs to a profile definition sequence.
    pub fn is_profile_definition(&self) -> bool {
        matches!(
            self,
            RemoteCall::CreateProfile { .. }
                | RemoteCall::SetProfileText { .. }
                | RemoteCall::SetProfileValues { .. }
                | RemoteCall::SetProfileDigits { .. }
                | RemoteCall::SetProfileIcon { .. }
                | RemoteCall::AddProfileAssociation { .. }
        )
    }

    /// Whether this call creates a remote node.
    pub fn is_node_creation(&self) -> bool {
        matches!(
            self,
            RemoteCall::CreateContainer | RemoteCall::CreateVariable { .. }
        )
    }
}

/// A JSON-RPC request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: Vec<Json>,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(call: &'a RemoteCall, id: u64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: call.method(),
            params: call.params(),
            id,
        }
    }
}

/// Error payload of a JSON-RPC response.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorPayload {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

/// A JSON-RPC response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Json>,
    #[serde(default)]
    pub error: Option<RpcErrorPayload>,
}

impl RpcResponse {
    /// The result of `method`, or the remote error.
    ///
    /// A missing or null result is returned as `Json::Null`.
    pub fn into_result(self, method: &str) -> Result<Json> {
        if let Some(error) = self.error {
            return Err(RpcError::Remote {
                method: method.to_string(),
                message: error.message,
            });
        }
        Ok(self.result.unwrap_or(Json::Null))
    }
}

/// Outcome of looking up a named child under a remote parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildLookup {
    Found(RemoteId),
    NotFound,
    /// More than one child carries the name.
    Ambiguous(Vec<RemoteId>),
}

/// Decode the result of a child lookup.
///
/// A positive integer is an identity; `false`, `null` and `0` mean not found.
pub fn decode_lookup(result: &Json) -> Result<ChildLookup> {
    match result {
        Json::Null | Json::Bool(false) => Ok(ChildLookup::NotFound),
        Json::Number(n) => match n.as_u64() {
            Some(0) => Ok(ChildLookup::NotFound),
            Some(raw) => u32::try_from(raw)
                .map(|raw| ChildLookup::Found(RemoteId::new(raw)))
                .map_err(|_| unexpected("IPS_GetObjectIDByName", result)),
            None => Err(unexpected("IPS_GetObjectIDByName", result)),
        },
        _ => Err(unexpected("IPS_GetObjectIDByName", result)),
    }
}

/// Decode a freshly created object identity.
pub fn decode_id(method: &str, result: &Json) -> Result<RemoteId> {
    result
        .as_u64()
        .filter(|raw| *raw > 0)
        .and_then(|raw| u32::try_from(raw).ok())
        .map(RemoteId::new)
        .ok_or_else(|| unexpected(method, result))
}

/// Decode a list of object identities.
pub fn decode_ids(method: &str, result: &Json) -> Result<Vec<RemoteId>> {
    result
        .as_array()
        .ok_or_else(|| unexpected(method, result))?
        .iter()
        .map(|raw| decode_id(method, raw))
        .collect()
}

/// Decode a string answer.
pub fn decode_str<'a>(method: &str, result: &'a Json) -> Result<&'a str> {
    result.as_str().ok_or_else(|| unexpected(method, result))
}

/// Decode a boolean answer.
pub fn decode_bool(method: &str, result: &Json) -> Result<bool> {
    result.as_bool().ok_or_else(|| unexpected(method, result))
}

fn unexpected(method: &str, result: &Json) -> RpcError {
    RpcError::UnexpectedResult {
        method: method.to_string(),
        result: result.to_string(),
    }
}
