//! Include/exclude filtering of secret names.
//!
//! A pattern containing `*`, `?` or `[` is treated as a glob; anything
//! else must match the name exactly.

use std::collections::BTreeMap;

use crate::errors::{Result, VeilError};

enum Matcher {
    Exact(String),
    Glob(glob::Pattern),
}

impl Matcher {
    fn new(pattern: &str) -> Result<Self> {
        if pattern.contains(['*', '?', '[']) {
            glob::Pattern::new(pattern)
                .map(Matcher::Glob)
                .map_err(|e| VeilError::InvalidPattern(format!("'{pattern}': {e}")))
        } else {
            Ok(Matcher::Exact(pattern.to_string()))
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Exact(exact) => exact == name,
            Matcher::Glob(pattern) => pattern.matches(name),
        }
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Matcher>> {
    patterns.iter().map(|p| Matcher::new(p)).collect()
}

/// Keep the secrets selected by `include` (all, when empty) and not
/// matched by `exclude`.
pub fn filter_secrets(
    secrets: &BTreeMap<String, String>,
    include: &[String],
    exclude: &[String],
) -> Result<BTreeMap<String, String>> {
    let include = compile(include)?;
    let exclude = compile(exclude)?;

    Ok(secrets
        .iter()
        .filter(|(name, _)| include.is_empty() || include.iter().any(|m| m.matches(name)))
        .filter(|(name, _)| !exclude.iter().any(|m| m.matches(name)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect())
}
