use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Veil.
#[derive(Debug, Error)]
pub enum VeilError {
    // --- Master key errors ---
    #[error("Invalid master key format (must be hex): {0}")]
    KeyFormat(String),

    #[error("Invalid master key length: expected 32 bytes, got {0}")]
    KeyLength(usize),

    #[error("MASTER_KEY is not set")]
    MissingMasterKey,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Malformed ciphertext: {0}")]
    Decode(String),

    #[error("Ciphertext too short: {len} bytes, expected at least {min}")]
    TruncatedCiphertext { len: usize, min: usize },

    #[error("Decryption failed: wrong master key or tampered data")]
    AuthenticationFailed,

    // --- Store errors ---
    #[error("Secret '{name}' not found in vault '{vault}'")]
    SecretNotFound { vault: String, name: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Unsupported store type '{0}' (supported: sqlite)")]
    UnsupportedStore(String),

    #[error("Store error: {0}")]
    StoreError(String),

    // --- Export errors ---
    #[error("File {0} already exists (use --force to overwrite or --append to add to it)")]
    DestinationExists(PathBuf),

    #[error("Unsupported export format '{0}' (supported: env, json)")]
    UnsupportedFormat(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Value of '{0}' contains a line break, which env files cannot represent")]
    MultilineValue(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VeilError {
    /// A one-line remediation hint for the CLI, if there is an obvious one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingMasterKey => Some("run `veil keygen` and export the result as MASTER_KEY"),
            Self::KeyFormat(_) | Self::KeyLength(_) => {
                Some("MASTER_KEY must be 64 hexadecimal characters")
            }
            Self::Decode(_) | Self::TruncatedCiphertext { .. } | Self::AuthenticationFailed => {
                Some("check that MASTER_KEY is the key these secrets were stored with")
            }
            Self::DestinationExists(_) => {
                Some("pass --append to merge, --force to overwrite, or choose another --output")
            }
            Self::UnsupportedStore(_) => Some("set VEIL_STORE_TYPE=sqlite"),
            _ => None,
        }
    }
}

/// Convenience type alias for Veil results.
pub type Result<T> = std::result::Result<T, VeilError>;
