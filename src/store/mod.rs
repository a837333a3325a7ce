//! Secret store: durable mapping of (vault, name) to encrypted blob.
//!
//! The store only ever sees ciphertext.  Encryption happens one layer up
//! in `VaultService`.
//!
//! Backends:
//! - `SqliteStore`: the persistent default (`sqlite`)
//! - `MemoryStore`: a process-local map for tests and embedding

pub mod memory;
pub mod sqlite;

use std::path::Path;

use tracing::debug;

use crate::errors::{Result, VeilError};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage capability consumed by `VaultService`.
pub trait SecretStore {
    /// Short backend name, e.g. "sqlite".
    fn name(&self) -> &str;

    /// Insert or replace the blob stored under (vault, name).
    fn save(&mut self, vault: &str, name: &str, encrypted_value: &str) -> Result<()>;

    /// Fetch a blob, failing with `SecretNotFound` if it is absent.
    fn get(&self, vault: &str, name: &str) -> Result<String>;

    /// Remove a blob, failing with `SecretNotFound` if it is absent.
    fn delete(&mut self, vault: &str, name: &str) -> Result<()>;

    /// Secret names in a vault, sorted.
    fn list(&self, vault: &str) -> Result<Vec<String>>;

    /// Every vault that holds at least one secret, sorted.
    fn list_vaults(&self) -> Result<Vec<String>>;

    /// Irreversibly wipe every vault.
    fn nuke(&mut self) -> Result<()>;

    /// Release the backend.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Open the store backend named by `store_type`.
pub fn open_store(store_type: &str, db_path: &Path) -> Result<Box<dyn SecretStore>> {
    debug!(store_type, path = %db_path.display(), "opening secret store");
    match store_type {
        "sqlite" => Ok(Box::new(SqliteStore::open(db_path)?)),
        other => Err(VeilError::UnsupportedStore(other.to_string())),
    }
}
