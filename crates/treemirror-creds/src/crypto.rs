//! Authenticated encryption for stored credentials.
//!
//! Supports AES-GCM (128 and 256 bit) and ChaCha20-Poly1305, all with a
//! 96-bit IV and a detached 128-bit authentication tag.

use aes_gcm::{Aes128Gcm, Aes256Gcm};
use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    ChaCha20Poly1305,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CredentialError, Result};

/// IV length shared by all supported ciphers.
pub const IV_LEN: usize = 12;

/// Authentication tag length shared by all supported ciphers.
pub const TAG_LEN: usize = 16;

/// Cipher identifier, as stored in the keyring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cipher {
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl Cipher {
    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Cipher::Aes128Gcm => 16,
            Cipher::Aes256Gcm | Cipher::ChaCha20Poly1305 => 32,
        }
    }

    /// Generate a random key for this cipher.
    pub fn generate_key(self) -> Vec<u8> {
        let mut key = vec![0u8; self.key_len()];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    /// Decrypt `ciphertext` and verify its detached `tag`.
    pub fn open(self, key: &[u8], iv: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
        check_lengths(self, key, iv)?;
        if tag.len() != TAG_LEN {
            return Err(CredentialError::InvalidKeyMaterial(format!(
                "tag must be {} bytes, got {}",
                TAG_LEN,
                tag.len()
            )));
        }

        let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(ciphertext);
        sealed.extend_from_slice(tag);

        match self {
            Cipher::Aes128Gcm => open_with::<Aes128Gcm>(key, iv, &sealed),
            Cipher::Aes256Gcm => open_with::<Aes256Gcm>(key, iv, &sealed),
            Cipher::ChaCha20Poly1305 => open_with::<ChaCha20Poly1305>(key, iv, &sealed),
        }
    }

    /// Encrypt `plaintext`, returning the ciphertext and its detached tag.
    pub fn seal(self, key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        check_lengths(self, key, iv)?;

        let mut sealed = match self {
            Cipher::Aes128Gcm => seal_with::<Aes128Gcm>(key, iv, plaintext)?,
            Cipher::Aes256Gcm => seal_with::<Aes256Gcm>(key, iv, plaintext)?,
            Cipher::ChaCha20Poly1305 => seal_with::<ChaCha20Poly1305>(key, iv, plaintext)?,
        };

        let tag = sealed.split_off(sealed.len() - TAG_LEN);
        Ok((sealed, tag))
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cipher::Aes128Gcm => "aes-128-gcm",
            Cipher::Aes256Gcm => "aes-256-gcm",
            Cipher::ChaCha20Poly1305 => "chacha20-poly1305",
        };
        f.write_str(name)
    }
}

/// Generate a random IV.
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

fn check_lengths(cipher: Cipher, key: &[u8], iv: &[u8]) -> Result<()> {
    if key.len() != cipher.key_len() {
        return Err(CredentialError::InvalidKeyMaterial(format!(
            "{} key must be {} bytes, got {}",
            cipher,
            cipher.key_len(),
            key.len()
        )));
    }
    if iv.len() != IV_LEN {
        return Err(CredentialError::InvalidKeyMaterial(format!(
            "IV must be {} bytes, got {}",
            IV_LEN,
            iv.len()
        )));
    }
    Ok(())
}

fn open_with<C: Aead + KeyInit>(key: &[u8], iv: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| CredentialError::InvalidKeyMaterial(e.to_string()))?;
    cipher
        .decrypt(GenericArray::from_slice(iv), sealed)
        .map_err(|_| CredentialError::DecryptionFailed)
}

fn seal_with<C: Aead + KeyInit>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = C::new_from_slice(key)
        .map_err(|e| CredentialError::InvalidKeyMaterial(e.to_string()))?;
    cipher
        .encrypt(GenericArray::from_slice(iv), plaintext)
        .map_err(|e| CredentialError::EncryptionError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Cipher; 3] = [Cipher::Aes128Gcm, Cipher::Aes256Gcm, Cipher::ChaCha20Poly1305];

    #[test]
    fn test_seal_open() {
        for cipher in ALL {
            let key = cipher.generate_key();
            let iv = generate_iv();
            let (ciphertext, tag) = cipher.seal(&key, &iv, b"endpoint data").unwrap();

            assert_eq!(tag.len(), TAG_LEN);
            assert_ne!(ciphertext, b"endpoint data");

            let plaintext = cipher.open(&key, &iv, &ciphertext, &tag).unwrap();
            assert_eq!(plaintext, b"endpoint data");
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = Cipher::Aes128Gcm;
        let iv = generate_iv();
        let (ciphertext, tag) = cipher.seal(&cipher.generate_key(), &iv, b"secret").unwrap();

        let result = cipher.open(&cipher.generate_key(), &iv, &ciphertext, &tag);
        assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let cipher = Cipher::ChaCha20Poly1305;
        let key = cipher.generate_key();
        let iv = generate_iv();
        let (ciphertext, mut tag) = cipher.seal(&key, &iv, b"secret").unwrap();
        tag[0] ^= 0x01;

        let result = cipher.open(&key, &iv, &ciphertext, &tag);
        assert!(matches!(result, Err(CredentialError::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        let cipher = Cipher::Aes256Gcm;
        let short_key = vec![0u8; 16];
        let result = cipher.open(&short_key, &[0u8; IV_LEN], b"x", &[0u8; TAG_LEN]);
        assert!(matches!(result, Err(CredentialError::InvalidKeyMaterial(_))));

        let key = cipher.generate_key();
        let result = cipher.open(&key, &[0u8; 16], b"x", &[0u8; TAG_LEN]);
        assert!(matches!(result, Err(CredentialError::InvalidKeyMaterial(_))));

        let result = cipher.open(&key, &[0u8; IV_LEN], b"x", &[0u8; 8]);
        assert!(matches!(result, Err(CredentialError::InvalidKeyMaterial(_))));
    }

    #[test]
    fn test_cipher_identifiers() {
        let json = serde_json::to_string(&Cipher::Aes128Gcm).unwrap();
        assert_eq!(json, "\"aes-128-gcm\"");
        let parsed: Cipher = serde_json::from_str("\"chacha20-poly1305\"").unwrap();
        assert_eq!(parsed, Cipher::ChaCha20Poly1305);
        assert!(serde_json::from_str::<Cipher>("\"des-cbc\"").is_err());
    }
}
