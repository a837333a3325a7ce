//! JSON exporter: a single object of `"KEY": "value"` pairs.
//!
//! JSON cannot be appended to, so a merge rewrites the whole document:
//! existing entries are kept (including non-string values), new keys are
//! added and updated keys replaced.  Keys come out sorted.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::{classify, is_merge, safe_write_file, ExportOptions, Exporter, Preview};
use crate::errors::{Result, VeilError};

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> &'static str {
        "json"
    }

    /// `content` is always the full document that would be written.
    fn preview(
        &self,
        secrets: &BTreeMap<String, String>,
        opts: &ExportOptions,
        _now: DateTime<Utc>,
    ) -> Result<Preview> {
        if !is_merge(opts) {
            let mut preview = classify(secrets, None, opts.force);
            preview.content = to_pretty(secrets)?;
            return Ok(preview);
        }

        let mut document = parse_json_file(&opts.target_path)?;
        let existing: HashMap<String, String> = document
            .iter()
            .map(|(k, v)| (k.clone(), value_to_string(v)))
            .collect();

        let mut preview = classify(secrets, Some(&existing), opts.force);
        for key in preview.new_keys.iter().chain(&preview.updated_keys) {
            if let Some(value) = secrets.get(key) {
                document.insert(key.clone(), Value::String(value.clone()));
            }
        }
        preview.content = to_pretty(&document)?;
        Ok(preview)
    }

    fn write(
        &self,
        _secrets: &BTreeMap<String, String>,
        preview: &Preview,
        opts: &ExportOptions,
    ) -> Result<()> {
        if is_merge(opts) && preview.is_noop() {
            debug!(path = %opts.target_path.display(), "nothing to merge, file untouched");
            return Ok(());
        }

        safe_write_file(
            &opts.target_path,
            preview.content.as_bytes(),
            opts.backup,
            opts.backup_dir.as_deref(),
        )?;
        Ok(())
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)
        .map_err(|e| VeilError::SerializationError(format!("JSON export: {e}")))?;
    out.push('\n');
    Ok(out)
}

/// Strings compare by content; anything else by its JSON text.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read an existing JSON export.  The top level must be an object.
fn parse_json_file(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(VeilError::SerializationError(format!(
            "{} does not contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(VeilError::SerializationError(format!(
            "invalid JSON in {}: {e}",
            path.display()
        ))),
    }
}
