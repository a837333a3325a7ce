//! SQLite-backed secret store.
//!
//! One table keyed by (vault, name).  The database file is created on
//! first use with owner-only permissions.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::debug;

use super::SecretStore;
use crate::errors::{Result, VeilError};

/// Map a rusqlite error into a `StoreError` with some context.
fn db_err(context: &'static str) -> impl Fn(rusqlite::Error) -> VeilError {
    move |e| VeilError::StoreError(format!("{context}: {e}"))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path).map_err(db_err("open database"))?;

        // Set restrictive permissions on the database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(db_path, perms)?;
        }

        Self::init(conn)
    }

    /// Open a throwaway database that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err("open database"))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS secrets (
                vault      TEXT NOT NULL,
                name       TEXT NOT NULL,
                value      TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (vault, name)
            );",
        )
        .map_err(db_err("create schema"))?;

        Ok(Self { conn })
    }

    fn query_names(&self, sql: &str, vault: Option<&str>) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_err("query prepare"))?;

        let rows = stmt
            .query_map(params_from_iter(vault), |row| row.get::<_, String>(0))
            .map_err(db_err("query exec"))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row.map_err(db_err("row parse"))?);
        }
        Ok(names)
    }
}

impl SecretStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn save(&mut self, vault: &str, name: &str, encrypted_value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO secrets (vault, name, value, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (vault, name)
                 DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![vault, name, encrypted_value, now],
            )
            .map_err(db_err("save secret"))?;
        debug!(%vault, %name, "saved secret");
        Ok(())
    }

    fn get(&self, vault: &str, name: &str) -> Result<String> {
        self.conn
            .query_row(
                "SELECT value FROM secrets WHERE vault = ?1 AND name = ?2",
                params![vault, name],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err("get secret"))?
            .ok_or_else(|| VeilError::SecretNotFound {
                vault: vault.to_string(),
                name: name.to_string(),
            })
    }

    fn delete(&mut self, vault: &str, name: &str) -> Result<()> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM secrets WHERE vault = ?1 AND name = ?2",
                params![vault, name],
            )
            .map_err(db_err("delete secret"))?;

        if removed == 0 {
            return Err(VeilError::SecretNotFound {
                vault: vault.to_string(),
                name: name.to_string(),
            });
        }
        debug!(%vault, %name, "deleted secret");
        Ok(())
    }

    fn list(&self, vault: &str) -> Result<Vec<String>> {
        self.query_names(
            "SELECT name FROM secrets WHERE vault = ?1 ORDER BY name",
            Some(vault),
        )
    }

    fn list_vaults(&self) -> Result<Vec<String>> {
        self.query_names("SELECT DISTINCT vault FROM secrets ORDER BY vault", None)
    }

    fn nuke(&mut self) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM secrets", [])
            .map_err(db_err("wipe secrets"))?;
        debug!(removed, "wiped all vaults");
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| VeilError::StoreError(format!("close database: {e}")))
    }
}
