//! In-memory secret store.
//!
//! Useful for tests and for embedding the vault without touching disk.
//! All data is lost on drop.

use std::collections::BTreeMap;

use super::SecretStore;
use crate::errors::{Result, VeilError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    /// (vault, name) -> encrypted blob.  BTreeMap keeps listings sorted.
    entries: BTreeMap<(String, String), String>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(vault: &str, name: &str) -> VeilError {
        VeilError::SecretNotFound {
            vault: vault.to_string(),
            name: name.to_string(),
        }
    }
}

impl SecretStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn save(&mut self, vault: &str, name: &str, encrypted_value: &str) -> Result<()> {
        self.entries.insert(
            (vault.to_string(), name.to_string()),
            encrypted_value.to_string(),
        );
        Ok(())
    }

    fn get(&self, vault: &str, name: &str) -> Result<String> {
        self.entries
            .get(&(vault.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Self::not_found(vault, name))
    }

    fn delete(&mut self, vault: &str, name: &str) -> Result<()> {
        self.entries
            .remove(&(vault.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(vault, name))
    }

    fn list(&self, vault: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|(v, _)| v == vault)
            .map(|(_, name)| name.clone())
            .collect())
    }

    fn list_vaults(&self) -> Result<Vec<String>> {
        let mut vaults: Vec<String> = self.entries.keys().map(|(v, _)| v.clone()).collect();
        vaults.dedup();
        Ok(vaults)
    }

    fn nuke(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
