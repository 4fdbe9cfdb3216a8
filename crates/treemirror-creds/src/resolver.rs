//! Credential resolution: stored values → endpoint records.

use std::collections::BTreeMap;

use treemirror_core::{Endpoint, StoredCredentials};

use crate::crypto::{generate_iv, Cipher};
use crate::error::{CredentialError, Result};
use crate::keyring::Keyring;

/// Decrypted endpoints, keyed by their selection index.
pub type EndpointSet = BTreeMap<u32, Endpoint>;

/// Resolves stored credentials into endpoint records.
///
/// Nothing is cached: every call decrypts again, so a resolver built from
/// stale stored values never outlives the configuration it came from.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    stored: StoredCredentials,
}

impl CredentialResolver {
    pub fn new(stored: StoredCredentials) -> Self {
        Self { stored }
    }

    /// Decrypt the full endpoint set.
    pub fn endpoints(&self) -> Result<EndpointSet> {
        let (ciphertext, keyring) = match (&self.stored.ciphertext, &self.stored.keyring) {
            (Some(c), Some(k)) if !c.is_empty() && !k.is_empty() => (c, k),
            _ => return Err(CredentialError::Missing),
        };

        let keyring = Keyring::from_hex(keyring)?;
        let ciphertext = hex::decode(ciphertext.trim())?;
        let plaintext = keyring.open(&ciphertext)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| CredentialError::MalformedPayload(e.to_string()))
    }

    /// Decrypt and select the endpoint at `index`.
    pub fn endpoint(&self, index: u32) -> Result<Endpoint> {
        self.endpoints()?
            .remove(&index)
            .ok_or(CredentialError::UnknownEndpoint(index))
    }

    /// `(index, display name)` pairs for configuration forms.
    ///
    /// Empty when credentials are missing or cannot be opened.
    pub fn endpoint_names(&self) -> Vec<(u32, String)> {
        self.endpoints()
            .map(|set| set.into_iter().map(|(i, e)| (i, e.name)).collect())
            .unwrap_or_default()
    }
}

/// Encrypt an endpoint set into the two stored values.
///
/// A fresh key and IV are generated for every call.
pub fn seal_endpoints(endpoints: &EndpointSet, cipher: Cipher) -> Result<StoredCredentials> {
    let plaintext = serde_json::to_vec(endpoints)
        .map_err(|e| CredentialError::EncryptionError(e.to_string()))?;

    let key = cipher.generate_key();
    let iv = generate_iv();
    let (ciphertext, tag) = cipher.seal(&key, &iv, &plaintext)?;

    let keyring = Keyring {
        key,
        iv: iv.to_vec(),
        tag,
        cipher,
    };

    Ok(StoredCredentials::new(hex::encode(ciphertext), keyring.to_hex()?))
}
