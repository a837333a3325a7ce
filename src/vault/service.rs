//! High-level vault operations used by CLI commands.
//!
//! `VaultService` wraps the secret store and the encryption engine so
//! that the rest of the application works with plaintext values, e.g.
//! `service.set("app", "DB_URL", "postgres://...")`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::crypto::Engine;
use crate::errors::{Result, VeilError};
use crate::export::{self, ExportOptions, Preview};
use crate::store::SecretStore;

/// Maximum length of a vault or secret name.
const MAX_NAME_LEN: usize = 256;

/// The main vault handle.  Built once at start-up from an engine and a
/// store; nothing here reads global state.
pub struct VaultService {
    store: Box<dyn SecretStore>,
    engine: Engine,
}

impl VaultService {
    pub fn new(store: Box<dyn SecretStore>, engine: Engine) -> Self {
        Self { store, engine }
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Encrypt `value` and store it under (vault, name), replacing any
    /// previous value.
    pub fn set(&mut self, vault: &str, name: &str, value: &str) -> Result<()> {
        validate_name("vault", vault)?;
        validate_name("secret", name)?;

        let encrypted = self.engine.encrypt(value)?;
        self.store.save(vault, name, &encrypted)?;
        debug!(%vault, %name, "secret set");
        Ok(())
    }

    /// Load and decrypt a single secret.
    pub fn get(&self, vault: &str, name: &str) -> Result<String> {
        let encrypted = self.store.get(vault, name)?;
        self.engine.decrypt(&encrypted)
    }

    /// Remove a secret from a vault.
    pub fn delete(&mut self, vault: &str, name: &str) -> Result<()> {
        self.store.delete(vault, name)
    }

    /// Secret names in a vault, sorted.
    pub fn list(&self, vault: &str) -> Result<Vec<String>> {
        self.store.list(vault)
    }

    /// All vault names, sorted.
    pub fn list_vaults(&self) -> Result<Vec<String>> {
        self.store.list_vaults()
    }

    /// Wipe every vault.  Irreversible.
    pub fn reset(&mut self) -> Result<()> {
        self.store.nuke()
    }

    /// Decrypt every secret in a vault and return a name -> plaintext map.
    ///
    /// All-or-nothing: the first secret that fails to decrypt aborts the
    /// whole call.
    pub fn get_all_secrets(&self, vault: &str) -> Result<BTreeMap<String, String>> {
        let names = self.store.list(vault)?;
        let mut secrets = BTreeMap::new();

        for name in names {
            let value = self.get(vault, &name)?;
            secrets.insert(name, value);
        }

        debug!(%vault, count = secrets.len(), "decrypted vault");
        Ok(secrets)
    }

    /// Export a vault according to `opts` and return what changed (or
    /// would change, for a dry run).
    pub fn export(&self, vault: &str, opts: &ExportOptions) -> Result<Preview> {
        let secrets = self.get_all_secrets(vault)?;
        export::run(&secrets, opts)
    }

    /// Close the underlying store.
    pub fn close(self) -> Result<()> {
        self.store.close()
    }
}

/// Validate that a vault or secret name is safe.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most 256 characters.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VeilError::InvalidName(format!("{kind} name cannot be empty")));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(VeilError::InvalidName(format!(
            "{kind} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(VeilError::InvalidName(format!(
            "{kind} name '{name}' contains invalid characters (allowed: ASCII letters, digits, '_', '-', '.')"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> VaultService {
        let engine = Engine::new(&"42".repeat(32)).unwrap();
        VaultService::new(Box::new(MemoryStore::new()), engine)
    }

    #[test]
    fn set_then_get() {
        let mut svc = service();
        svc.set("app", "DB_URL", "postgres://localhost/db").unwrap();
        assert_eq!(svc.get("app", "DB_URL").unwrap(), "postgres://localhost/db");
    }

    #[test]
    fn get_missing_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get("app", "NOPE").unwrap_err(),
            VeilError::SecretNotFound { .. }
        ));
    }

    #[test]
    fn get_all_secrets_decrypts_everything() {
        let mut svc = service();
        svc.set("app", "B", "2").unwrap();
        svc.set("app", "A", "1").unwrap();
        svc.set("other", "C", "3").unwrap();

        let all = svc.get_all_secrets("app").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["A"], "1");
        assert_eq!(all["B"], "2");
    }

    #[test]
    fn get_all_secrets_aborts_on_corrupt_entry() {
        let engine = Engine::new(&"42".repeat(32)).unwrap();
        let mut store = MemoryStore::new();
        store.save("app", "GOOD", &engine.encrypt("ok").unwrap()).unwrap();
        store.save("app", "BAD", "zz-not-hex").unwrap();

        let svc = VaultService::new(Box::new(store), engine);
        assert!(matches!(
            svc.get_all_secrets("app").unwrap_err(),
            VeilError::Decode(_)
        ));
    }

    #[test]
    fn reset_wipes_all_vaults() {
        let mut svc = service();
        svc.set("a", "X", "1").unwrap();
        svc.set("b", "Y", "2").unwrap();
        assert_eq!(svc.list_vaults().unwrap(), vec!["a", "b"]);

        svc.reset().unwrap();
        assert!(svc.list_vaults().unwrap().is_empty());
    }

    #[test]
    fn set_rejects_bad_names() {
        let mut svc = service();
        assert!(matches!(
            svc.set("", "KEY", "v").unwrap_err(),
            VeilError::InvalidName(_)
        ));
        assert!(svc.set("app", "HAS SPACE", "v").is_err());
        assert!(svc.set("app", "A=B", "v").is_err());
        assert!(svc.set("app", &"K".repeat(257), "v").is_err());
        assert!(svc.list_vaults().unwrap().is_empty());
    }

    #[test]
    fn valid_names() {
        assert!(validate_name("secret", "DATABASE_URL").is_ok());
        assert!(validate_name("secret", "api.key-2").is_ok());
        assert!(validate_name("vault", "prod").is_ok());
    }
}
