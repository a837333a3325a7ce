//! Master key handling.
//!
//! The master key is 32 raw bytes, carried around as a 64-character hex
//! string in configuration.  Parsing happens once at start-up; the raw
//! bytes live in a `MasterKey` that wipes itself on drop.

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, VeilError};

/// Length of the master key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// A wrapper around a 32-byte master key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Parse a hex-encoded key (upper or lower case).
    ///
    /// Fails with `KeyFormat` if the string is not hex and with
    /// `KeyLength` if it does not decode to exactly 32 bytes.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            hex::decode(key_hex.trim()).map_err(|e| VeilError::KeyFormat(e.to_string()))?,
        );

        let bytes: [u8; KEY_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| VeilError::KeyLength(decoded.len()))?;

        Ok(Self::new(bytes))
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Generate a fresh random master key and return it hex-encoded.
///
/// Used for first-time setup (`veil keygen`).
pub fn generate_key() -> String {
    let key = Aes256Gcm::generate_key(&mut OsRng);
    hex::encode(key)
}
