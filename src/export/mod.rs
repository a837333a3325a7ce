//! Export engine: render a vault into a file, merging safely with
//! whatever is already there.
//!
//! Every export runs the same pipeline:
//!
//! 1. **Filter** the decrypted secrets by include/exclude patterns.
//! 2. **Check preconditions**: an existing destination is only touched
//!    when `append` or `force` is set.
//! 3. **Preview**: classify each key as new, updated or skipped and
//!    render the content, without side effects.
//! 4. **Write** the result with a safe replace, unless `dry_run` is set.
//!
//! Supported formats:
//! - `env` (default, alias `dotenv`): `KEY=value`, one per line
//! - `json`: a JSON object of string values

pub mod env;
pub mod filter;
pub mod json;
pub mod write;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{Result, VeilError};

pub use env::EnvExporter;
pub use filter::filter_secrets;
pub use json::JsonExporter;
pub use write::safe_write_file;

/// Options recognised by every exporter.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Target rendering: "env" or "json".
    pub format: String,

    /// Destination file.
    pub target_path: PathBuf,

    /// Allow-list of exact names or glob patterns.  Empty means all.
    pub include: Vec<String>,

    /// Deny-list applied after `include`.
    pub exclude: Vec<String>,

    /// Merge into an existing destination instead of refusing.
    pub append: bool,

    /// Overwrite existing values (or the whole file, when not appending).
    pub force: bool,

    /// Copy the destination aside before replacing it.
    pub backup: bool,

    /// Where backups go.  Defaults to the destination's directory.
    pub backup_dir: Option<PathBuf>,

    /// Compute the preview only; never touch the filesystem.
    pub dry_run: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: "env".to_string(),
            target_path: PathBuf::from(".env"),
            include: Vec::new(),
            exclude: Vec::new(),
            append: false,
            force: false,
            backup: false,
            backup_dir: None,
            dry_run: false,
        }
    }
}

/// What an export changes (or would change).
///
/// Every exported name appears in exactly one of the three lists, each
/// in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub new_keys: Vec<String>,
    pub updated_keys: Vec<String>,
    pub skipped_keys: Vec<String>,

    /// Rendered content: the whole file for a fresh export, or the part
    /// that gets appended when merging (see the individual exporters).
    pub content: String,
}

impl Preview {
    /// `true` when writing would not change the destination.
    pub fn is_noop(&self) -> bool {
        self.new_keys.is_empty() && self.updated_keys.is_empty()
    }
}

/// A target file format.
pub trait Exporter {
    /// Canonical format name.
    fn format(&self) -> &'static str;

    /// Classify and render `secrets` without touching the filesystem.
    ///
    /// `now` stamps any marker written into the output.
    fn preview(
        &self,
        secrets: &BTreeMap<String, String>,
        opts: &ExportOptions,
        now: DateTime<Utc>,
    ) -> Result<Preview>;

    /// Apply a preview computed by `preview` with the same inputs.
    fn write(
        &self,
        secrets: &BTreeMap<String, String>,
        preview: &Preview,
        opts: &ExportOptions,
    ) -> Result<()>;
}

/// Look up the exporter for a format name.
pub fn exporter_for(format: &str) -> Result<Box<dyn Exporter>> {
    match format.to_lowercase().as_str() {
        "env" | "dotenv" => Ok(Box::new(EnvExporter)),
        "json" => Ok(Box::new(JsonExporter)),
        _ => Err(VeilError::UnsupportedFormat(format.to_string())),
    }
}

/// Run the full export pipeline for an already decrypted vault.
pub fn run(secrets: &BTreeMap<String, String>, opts: &ExportOptions) -> Result<Preview> {
    run_at(secrets, opts, Utc::now())
}

/// Same as `run`, with an explicit timestamp for the append marker.
pub fn run_at(
    secrets: &BTreeMap<String, String>,
    opts: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<Preview> {
    let filtered = filter_secrets(secrets, &opts.include, &opts.exclude)?;
    let exporter = exporter_for(&opts.format)?;

    check_destination(opts)?;

    let preview = exporter.preview(&filtered, opts, now)?;
    debug!(
        export_format = exporter.format(),
        new = preview.new_keys.len(),
        updated = preview.updated_keys.len(),
        skipped = preview.skipped_keys.len(),
        "export preview computed"
    );

    if opts.dry_run {
        debug!(path = %opts.target_path.display(), "dry run, nothing written");
        return Ok(preview);
    }

    exporter.write(&filtered, &preview, opts)?;
    info!(path = %opts.target_path.display(), "export complete");
    Ok(preview)
}

/// Refuse to clobber an existing destination unless asked to.
fn check_destination(opts: &ExportOptions) -> Result<()> {
    if !opts.append && !opts.force && opts.target_path.exists() {
        return Err(VeilError::DestinationExists(opts.target_path.clone()));
    }
    Ok(())
}

/// `true` when the export merges into a file that already exists.
pub(crate) fn is_merge(opts: &ExportOptions) -> bool {
    opts.append && opts.target_path.exists()
}

/// Sort keys into new / updated / skipped.
///
/// With no existing content every key is new.  Otherwise a key missing
/// from `existing` is new; a present key is updated when `force` is set
/// (even if its value is unchanged) and skipped when it is not.
pub(crate) fn classify(
    secrets: &BTreeMap<String, String>,
    existing: Option<&HashMap<String, String>>,
    force: bool,
) -> Preview {
    let mut preview = Preview::default();

    for key in secrets.keys() {
        match existing {
            Some(map) if map.contains_key(key) => {
                if force {
                    preview.updated_keys.push(key.clone());
                } else {
                    preview.skipped_keys.push(key.clone());
                }
            }
            _ => preview.new_keys.push(key.clone()),
        }
    }

    preview
}
