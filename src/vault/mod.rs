//! Vault module: plaintext-level secret operations.
//!
//! `VaultService` ties the encryption engine to a secret store and is
//! the entry point for set/get/list/export.

pub mod service;

pub use service::{validate_name, VaultService};
