//! # Tree Mirror
//!
//! One-way mirroring of a local object tree onto a remote system over
//! JSON-RPC.
//!
//! ## Overview
//!
//! A [`Mirror`] watches a user-selected set of local variables below a local
//! root. When one changes, the mirror finds (or creates) the remote variable
//! at the same relative path below a remote root and writes the new value
//! there:
//!
//! ```text
//! local                               remote
//! Root/House/LivingRoom/Temperature → Target/House/LivingRoom/Temperature
//! ```
//!
//! Resolved identities are cached for the session. Variable profiles are
//! defined remotely once per session and assigned to every mirror. Nothing
//! is ever read back and nothing is deleted remotely.
//!
//! ## Components
//!
//! - [`MirrorResolver`]: local object → remote identity, with auto-create
//! - [`ProfileSynchronizer`]: profile definition and assignment
//! - [`ValueSynchronizer`]: value pushes with cache invalidation on failure
//! - [`ConnectionManager`]: lazy, session-scoped transport handle
//!
//! ## Failure model
//!
//! Nothing escapes to the host as a fault. Public entry points return `bool`,
//! `Option` or [`MirrorStatus`]; the `try_*` variants expose the underlying
//! [`MirrorError`]. Diagnostics go through `tracing` and are only emitted
//! when the configuration's `debug` flag is set.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use treemirror::{HttpConnector, Mirror, MirrorStatus};
//!
//! let mut mirror = Mirror::new(tree, notifier, HttpConnector);
//! if mirror.apply(config, credentials).await == MirrorStatus::Active {
//!     mirror.on_value_changed(sender, &value).await;
//! }
//! ```

/// `tracing` event gated on the configuration's debug flag.
macro_rules! debug_log {
    ($enabled:expr, $level:ident, $($arg:tt)+) => {
        if $enabled {
            tracing::$level!($($arg)+);
        }
    };
}

pub mod connection;
pub mod error;
pub mod mirror;
pub mod notify;
pub mod profile;
pub mod resolver;
pub mod session;
pub mod sync;

pub use connection::{memory::MemoryConnector, ConnectionManager, Connector, HttpConnector};
pub use error::{ConnectionError, MirrorError, ProfileError, ResolveError, Result};
pub use mirror::{Mirror, MirrorStatus};
pub use notify::{Notifier, RecordingNotifier, Registration};
pub use profile::{ProfileOutcome, ProfileSynchronizer};
pub use resolver::MirrorResolver;
pub use session::{IdentityCache, ProfileSyncRecord, Session, SessionState, SessionStats};
pub use sync::ValueSynchronizer;
