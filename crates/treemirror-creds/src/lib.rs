//! # Tree Mirror Credentials
//!
//! Authenticated decryption of the stored remote endpoint credentials.
//!
//! ## Overview
//!
//! The host stores two values: an AEAD ciphertext and a keyring holding the
//! key, IV, detached tag, and cipher identifier. Opening the ciphertext
//! yields a set of endpoints keyed by selection index:
//!
//! ```text
//! {"0": {"name": "Main House", "host": "10.0.0.2:3777", "username": "…", "password": "…"}}
//! ```
//!
//! Missing or undecryptable credentials are an expected state (the mirror
//! has not been set up yet), reported as [`CredentialError`] and never as a
//! panic.
//!
//! ## Usage
//!
//! ```rust
//! use treemirror_core::Endpoint;
//! use treemirror_creds::{seal_endpoints, Cipher, CredentialResolver, EndpointSet};
//!
//! let mut set = EndpointSet::new();
//! set.insert(0, Endpoint::new("Cabin", "cabin.example.net", "mirror", "secret"));
//!
//! let stored = seal_endpoints(&set, Cipher::Aes128Gcm).unwrap();
//! let endpoint = CredentialResolver::new(stored).endpoint(0).unwrap();
//! assert_eq!(endpoint.name, "Cabin");
//! ```

pub mod crypto;
pub mod error;
pub mod keyring;
pub mod resolver;

pub use crypto::{generate_iv, Cipher, IV_LEN, TAG_LEN};
pub use error::{CredentialError, Result};
pub use keyring::Keyring;
pub use resolver::{seal_endpoints, CredentialResolver, EndpointSet};
