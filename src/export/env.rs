//! `.env` exporter.
//!
//! File format: one `KEY=VALUE` per line.  Blank lines and lines starting
//! with `#` are ignored on read, as is a leading byte-order mark.  An
//! optional `export` prefix followed by whitespace is accepted.  A value is wrapped in double quotes when it contains
//! whitespace, quotes, `\` or `#`; inside the quotes `\` and `"` are
//! backslash-escaped.  Parsing reverses this exactly, so any value without
//! a line break survives a write/read cycle unchanged.
//!
//! Values with line breaks cannot be represented one-per-line and are
//! rejected with `MultilineValue`.
//!
//! Merging into an existing file never reorders or reformats lines that
//! are not being updated, and keeps the file's line endings.  New keys go
//! at the end, after a `# Added by veil on <timestamp>` marker.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{classify, is_merge, safe_write_file, ExportOptions, Exporter, Preview};
use crate::errors::{Result, VeilError};

/// Prefix of the comment line written before every appended block.
pub const MARKER_PREFIX: &str = "# Added by veil on";

pub struct EnvExporter;

impl Exporter for EnvExporter {
    fn format(&self) -> &'static str {
        "env"
    }

    /// Fresh export: `content` is the whole file.  Merge: `content` is
    /// only the block appended for new keys (empty when there are none);
    /// updated keys are rewritten in place by `write`.
    fn preview(
        &self,
        secrets: &BTreeMap<String, String>,
        opts: &ExportOptions,
        now: DateTime<Utc>,
    ) -> Result<Preview> {
        check_single_line(secrets)?;

        if !is_merge(opts) {
            let mut preview = classify(secrets, None, opts.force);
            preview.content = render(secrets.iter());
            return Ok(preview);
        }

        let existing = parse_env_file(&opts.target_path)?;
        let mut preview = classify(secrets, Some(&existing), opts.force);
        preview.content = render_block(&preview.new_keys, secrets, now);
        Ok(preview)
    }

    fn write(
        &self,
        secrets: &BTreeMap<String, String>,
        preview: &Preview,
        opts: &ExportOptions,
    ) -> Result<()> {
        if !is_merge(opts) {
            safe_write_file(
                &opts.target_path,
                preview.content.as_bytes(),
                opts.backup,
                opts.backup_dir.as_deref(),
            )?;
            return Ok(());
        }

        if preview.is_noop() {
            debug!(path = %opts.target_path.display(), "nothing to merge, file untouched");
            return Ok(());
        }

        let existing = fs::read_to_string(&opts.target_path)?;
        let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };

        let mut body = if preview.updated_keys.is_empty() {
            existing
        } else {
            let updates: HashMap<&str, &str> = preview
                .updated_keys
                .iter()
                .filter_map(|k| secrets.get(k).map(|v| (k.as_str(), v.as_str())))
                .collect();
            rewrite_values(&existing, &updates)
        };

        if !preview.new_keys.is_empty() {
            if !body.is_empty() {
                if !body.ends_with('\n') {
                    body.push_str(newline);
                }
                body.push_str(newline);
            }
            body.push_str(&preview.content.replace('\n', newline));
        }

        safe_write_file(
            &opts.target_path,
            body.as_bytes(),
            opts.backup,
            opts.backup_dir.as_deref(),
        )?;
        Ok(())
    }
}

fn check_single_line(secrets: &BTreeMap<String, String>) -> Result<()> {
    match secrets
        .iter()
        .find(|(_, value)| value.contains(['\n', '\r']))
    {
        Some((key, _)) => Err(VeilError::MultilineValue(key.clone())),
        None => Ok(()),
    }
}

/// Render `KEY=VALUE` lines in the order given.
fn render<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        let _ = writeln!(out, "{key}={}", escape_value(value));
    }
    out
}

/// The block appended for new keys: marker line plus one line per key.
fn render_block(
    new_keys: &[String],
    secrets: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> String {
    if new_keys.is_empty() {
        return String::new();
    }

    let mut out = format!("{MARKER_PREFIX} {}\n", now.format("%Y-%m-%dT%H:%M:%SZ"));
    out.push_str(&render(
        new_keys
            .iter()
            .filter_map(|k| secrets.get_key_value(k)),
    ));
    out
}

/// Replace the value of every line whose key is in `updates`, keeping
/// all other lines byte-for-byte.  Every occurrence of a key is replaced.
///
/// A rewritten line keeps its indentation, `export` prefix and line ending.
fn rewrite_values(existing: &str, updates: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(existing.len());
    let mut rewritten = HashSet::new();

    let body = strip_bom(existing);
    out.push_str(&existing[..existing.len() - body.len()]);

    for raw in body.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\r', '\n']);
        let ending = &raw[line.len()..];
        match parse_env_line(line) {
            Some((key, _)) if updates.contains_key(key) => {
                let prefix = &line[..line.len() - strip_export(line.trim_start()).len()];
                let _ = write!(out, "{prefix}{key}={}{ending}", escape_value(updates[key]));
                rewritten.insert(key);
            }
            _ => out.push_str(raw),
        }
    }

    debug!(count = rewritten.len(), "rewrote existing values in place");
    out
}

/// Quote and escape a value if it would not survive a bare `KEY=VALUE`.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#'));

    if !needs_quotes {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}

/// Reverse `escape_value`.
///
/// Surrounding whitespace is dropped.  Double-quoted values are
/// unescaped; single-quoted values have their quotes stripped and are
/// otherwise taken literally.
pub fn unescape_value(raw: &str) -> String {
    let value = raw.trim();

    if let Some(inner) = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        }
        return out;
    }

    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
        .to_string()
}

/// Parse a single `.env` line into a (key, value) pair.
///
/// Returns `None` for blank lines, comments, and lines without `=`.
pub fn parse_env_line(line: &str) -> Option<(&str, String)> {
    let trimmed = line.trim();

    // Skip empty lines and comments.
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let trimmed = strip_export(trimmed);

    // Split on the first '=' to get KEY and VALUE.
    let (key, value) = trimmed.split_once('=')?;
    let key = key.trim();

    if key.is_empty() {
        return None;
    }

    Some((key, unescape_value(value)))
}

/// Drop an optional `export` keyword and the whitespace after it.
fn strip_export(line: &str) -> &str {
    line.strip_prefix("export")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .unwrap_or(line)
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Parse `.env` content into a key-value map.  Later duplicates win.
pub fn parse_env(content: &str) -> HashMap<String, String> {
    strip_bom(content)
        .lines()
        .filter_map(parse_env_line)
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Parse a `.env` file into a key-value map.
pub fn parse_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_env(&content))
}
