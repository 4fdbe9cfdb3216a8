//! # Tree Mirror Core
//!
//! Pure data model for the Tree Mirror: identifiers, local nodes, value
//! profiles, and mirror configuration.
//!
//! This crate contains no I/O and no networking. The local object tree is
//! reached only through the read-only [`LocalTree`] oracle, which the host
//! implements.
//!
//! ## Key Types
//!
//! - [`LocalId`] / [`RemoteId`] - Object identities on either side of the mirror
//! - [`LocalNode`] - A read-only view of one object in the local tree
//! - [`Value`] - A typed variable value
//! - [`ProfileDefinition`] - A value-formatting definition attached to variables
//! - [`MirrorConfig`] - Persisted mirror settings, validated at apply time
//! - [`Endpoint`] - Connection details of one remote system
//!
//! ## Paths
//!
//! [`path_to_root`] turns a local object into the ordered list of names that
//! leads from the configured local root down to it. See [`tree`] module.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod node;
pub mod profile;
pub mod tree;
pub mod types;

pub use config::{MirrorConfig, StoredCredentials, SyncEntry, ValidatedConfig};
pub use endpoint::Endpoint;
pub use error::{ConfigError, CoreError, Result};
pub use node::{LocalNode, NodeKind, Value, VariableType};
pub use profile::{
    effective_profile_name, is_reserved_profile, Association, ProfileDefinition, NO_COLOR,
    RESERVED_PROFILE_PREFIX,
};
pub use tree::{collect_variables, path_to_root, LocalTree};
pub use types::{LocalId, RemoteId};
