//! Cryptographic primitives for Veil.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption of secret values (`encryption`)
//! - Master key parsing and generation (`keys`)

pub mod encryption;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Engine, generate_key};
pub use encryption::{Engine, NONCE_LEN};
pub use keys::{generate_key, MasterKey, KEY_LEN};
