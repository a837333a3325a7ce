//! AES-256-GCM authenticated encryption of secret values.
//!
//! Each call to `Engine::encrypt` generates a fresh random 12-byte nonce
//! and prepends it to the ciphertext.  `Engine::decrypt` splits the nonce
//! back out before decrypting.  No associated data is used.
//!
//! Layout of a blob (before hex encoding):
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use zeroize::Zeroize;

use super::keys::MasterKey;
use crate::errors::{Result, VeilError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Encrypts and decrypts secret values under a single master key.
///
/// The key is validated once, when the engine is built.
pub struct Engine {
    cipher: Aes256Gcm,
}

impl Engine {
    /// Build an engine from a hex-encoded 32-byte master key.
    pub fn new(key_hex: &str) -> Result<Self> {
        let key = MasterKey::from_hex(key_hex)?;
        Ok(Self::from_key(&key))
    }

    /// Build an engine from an already parsed master key.
    pub fn from_key(key: &MasterKey) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes())),
        }
    }

    /// Encrypt `plaintext` and return `hex(nonce || ciphertext || tag)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        // Never reuse a nonce under the same key.
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| VeilError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(hex::encode(blob))
    }

    /// Decrypt a blob produced by `encrypt`.
    ///
    /// Malformed hex, a blob shorter than the nonce, and a failed tag check
    /// are reported as distinct errors.
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let data = hex::decode(blob).map_err(|e| VeilError::Decode(format!("invalid hex: {e}")))?;

        if data.len() < NONCE_LEN {
            return Err(VeilError::TruncatedCiphertext {
                len: data.len(),
                min: NONCE_LEN,
            });
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        // Covers both tampering and the wrong key.
        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| VeilError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VeilError::Decode("plaintext is not valid UTF-8".to_string())
        })
    }
}
