//! # Tree Mirror RPC
//!
//! Typed access to the remote object tree over JSON-RPC.
//!
//! ## Overview
//!
//! The remote system exposes its object tree through a generic JSON-RPC
//! endpoint that accepts arbitrary method names. This crate narrows that to
//! the [`RemoteApi`] trait: one typed method per operation the mirror uses,
//! each returning a [`Result`] instead of raising.
//!
//! ## Key Types
//!
//! - [`RemoteApi`] - The async trait the mirror engine talks to
//! - [`JsonRpcClient`] - HTTPS implementation with basic credentials
//! - [`MemoryRemote`] - Simulated remote system for tests
//! - [`RemoteCall`] - The call vocabulary shared by both implementations
//! - [`ChildLookup`] - Outcome of a by-name child lookup
//!
//! ## Wire Format
//!
//! ```text
//! POST https://<host>/api/
//! {"jsonrpc":"2.0","method":"IPS_GetObjectIDByName","params":["House",0],"id":1700000000000}
//!
//! {"jsonrpc":"2.0","id":1700000000000,"result":41234}
//! {"jsonrpc":"2.0","id":1700000000000,"error":{"code":-32603,"message":"..."}}
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod memory;
pub mod messages;

pub use api::RemoteApi;
pub use client::JsonRpcClient;
pub use error::{Result, RpcError};
pub use memory::{MemoryRemote, RemoteKind, RemoteObject, MEMORY_ROOT};
pub use messages::{ChildLookup, RemoteCall, CONTAINER_MODULE_ID, JSONRPC_VERSION};
