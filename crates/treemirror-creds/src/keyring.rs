//! The stored keyring: key material needed to open the credential ciphertext.
//!
//! Stored as hex of a JSON document whose byte fields are themselves hex:
//!
//! ```text
//! {"key":"…","iv":"…","tag":"…","cipher":"aes-128-gcm"}
//! ```

use serde::{Deserialize, Serialize};

use crate::crypto::Cipher;
use crate::error::{CredentialError, Result};

/// Key material for one sealed credential blob.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyring {
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    #[serde(with = "hex")]
    pub iv: Vec<u8>,
    #[serde(with = "hex")]
    pub tag: Vec<u8>,
    pub cipher: Cipher,
}

impl Keyring {
    /// Parse the stored hex form.
    pub fn from_hex(stored: &str) -> Result<Self> {
        let document = hex::decode(stored.trim())?;
        serde_json::from_slice(&document).map_err(|e| CredentialError::MalformedKeyring(e.to_string()))
    }

    /// Encode into the stored hex form.
    pub fn to_hex(&self) -> Result<String> {
        let document = serde_json::to_vec(self)
            .map_err(|e| CredentialError::MalformedKeyring(e.to_string()))?;
        Ok(hex::encode(document))
    }

    /// Open `ciphertext` with this keyring.
    pub fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher.open(&self.key, &self.iv, ciphertext, &self.tag)
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keyring")
            .field("cipher", &self.cipher)
            .field("key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
