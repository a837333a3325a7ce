use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::MasterKey;
use crate::errors::{Result, VeilError};

/// Environment variable holding the hex-encoded master key.
pub const MASTER_KEY_VAR: &str = "MASTER_KEY";

/// Environment variable pointing at an explicit config file.
pub const CONFIG_VAR: &str = "VEIL_CONFIG";

/// Environment variable overriding `db_path`.
pub const DB_PATH_VAR: &str = "VEIL_DB_PATH";

/// Environment variable overriding `store_type`.
pub const STORE_TYPE_VAR: &str = "VEIL_STORE_TYPE";

/// Runtime configuration.
///
/// Every field has a sensible default so Veil works out-of-the-box
/// without any config file at all.  The master key is deliberately not
/// part of this struct; see `master_key_from`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Location of the secret database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Which store backend to use (currently only "sqlite").
    #[serde(default = "default_store_type")]
    pub store_type: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".veil.db"))
        .unwrap_or_else(|| PathBuf::from(".veil.db"))
}

fn default_store_type() -> String {
    "sqlite".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            store_type: default_store_type(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Layering, lowest first: defaults, the config file (`$VEIL_CONFIG`
    /// or `<config dir>/veil/config.toml`), then `VEIL_DB_PATH` and
    /// `VEIL_STORE_TYPE`.
    pub fn load() -> Result<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Same as `load`, reading variables through `lookup`.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = non_empty(&lookup, CONFIG_VAR)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("veil").join("config.toml")));

        let mut settings = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env(lookup);
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| {
            VeilError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Override fields from environment variables.  Empty values are
    /// treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = non_empty(&lookup, DB_PATH_VAR) {
            self.db_path = PathBuf::from(path);
        }
        if let Some(store_type) = non_empty(&lookup, STORE_TYPE_VAR) {
            self.store_type = store_type;
        }
    }

    /// Check that the required fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(VeilError::ConfigError("database path is required".into()));
        }
        if self.store_type.is_empty() {
            return Err(VeilError::ConfigError(format!("{STORE_TYPE_VAR} is required")));
        }
        Ok(())
    }
}

/// Read the master key from the process environment.
pub fn master_key() -> Result<Zeroizing<String>> {
    master_key_from(|name| std::env::var(name).ok())
}

/// Read `MASTER_KEY` through `lookup` and check it decodes to a 32-byte key.
///
/// Non-hex input fails with `KeyFormat`; any other byte count with
/// `KeyLength` carrying the decoded length.
pub fn master_key_from<F>(lookup: F) -> Result<Zeroizing<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let key = non_empty(&lookup, MASTER_KEY_VAR)
        .map(|k| Zeroizing::new(k.trim().to_string()))
        .ok_or(VeilError::MissingMasterKey)?;

    MasterKey::from_hex(&key)?;
    Ok(key)
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

// ── Tests ────────────────────────────────────────────────────────────
