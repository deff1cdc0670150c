#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Translation catalog model: a nested JSON key/value tree with the
//! maintenance operations the rest of the workspace builds on.
//!
//! # Design
//! - Key order is preserved across load/save so diffs stay reviewable.
//! - Every transform is a plain in-memory pass; callers decide when to write.
//! - Removal and pruning are idempotent so maintenance runs can be repeated.

use crate::error::{CatalogError, CatalogResult};
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub mod error;

/// Pattern matching `{{shared.*}}` interpolation placeholders inside leaves.
const PLACEHOLDER_PATTERN: &str = r"\{\{shared\.[^}]+\}\}";

/// Counts reported by [`Catalog::strip_shared_placeholders`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StripOutcome {
    /// Leaves that had one or more placeholders removed and kept text.
    pub stripped: usize,
    /// Leaves removed because their value ended up empty.
    pub pruned: usize,
}

/// A translation table rooted at a JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or its
    /// root is not an object.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::io("load", path, source))?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| CatalogError::json("load", path, source))?;
        Self::from_value(value)
    }

    /// Build a catalog from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::RootNotObject`] when the value is not an object.
    pub fn from_value(value: Value) -> CatalogResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(CatalogError::RootNotObject {
                kind: json_kind(&other),
            }),
        }
    }

    /// Write the catalog as two-space-indented JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or the write fails.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let mut rendered = serde_json::to_string_pretty(&self.root)
            .map_err(|source| CatalogError::json("save", path, source))?;
        rendered.push('\n');
        fs::write(path, rendered).map_err(|source| CatalogError::io("save", path, source))
    }

    /// The catalog as a plain JSON value.
    #[must_use]
    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Whether the catalog has no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Flatten the tree into `(dotted key, value)` pairs in document order.
    ///
    /// Non-string leaves are rendered via their JSON representation.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        flatten_into(&self.root, "", &mut entries);
        entries
    }

    /// Remove one dotted key path, returning whether anything was removed.
    ///
    /// Removing an absent path, or a path whose intermediate segment is not an
    /// object, is a no-op. Emptied parent objects are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidKeyPath`] when the path is blank or
    /// contains an empty segment.
    pub fn remove_path(&mut self, dotted: &str) -> CatalogResult<bool> {
        if dotted.is_empty() || dotted.split('.').any(str::is_empty) {
            return Err(CatalogError::InvalidKeyPath {
                path: dotted.to_string(),
                reason: "empty segment",
            });
        }

        let mut segments: Vec<&str> = dotted.split('.').collect();
        let leaf = segments.pop().unwrap_or(dotted);

        let mut current = &mut self.root;
        for segment in segments {
            match current.get_mut(segment) {
                Some(Value::Object(child)) => current = child,
                _ => return Ok(false),
            }
        }

        Ok(current.remove(leaf).is_some())
    }

    /// Remove `{{shared.*}}` placeholder substrings from every string leaf,
    /// trim the remainder, and prune leaves that ended up empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder pattern fails to compile.
    pub fn strip_shared_placeholders(&mut self) -> CatalogResult<StripOutcome> {
        let pattern =
            Regex::new(PLACEHOLDER_PATTERN).map_err(|source| CatalogError::RegexCompile {
                pattern: PLACEHOLDER_PATTERN,
                source,
            })?;
        let mut outcome = StripOutcome::default();
        strip_in_map(&mut self.root, &pattern, &mut outcome);
        Ok(outcome)
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, entries: &mut Vec<(String, String)>) {
    for (key, value) in map {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(child) => flatten_into(child, &dotted, entries),
            Value::String(text) => entries.push((dotted, text.clone())),
            other => entries.push((dotted, other.to_string())),
        }
    }
}

fn strip_in_map(map: &mut Map<String, Value>, pattern: &Regex, outcome: &mut StripOutcome) {
    let mut emptied = Vec::new();
    for (key, value) in map.iter_mut() {
        match value {
            Value::Object(child) => strip_in_map(child, pattern, outcome),
            Value::String(text) => {
                let matched = pattern.is_match(text);
                let cleaned = pattern.replace_all(text, "").trim().to_string();
                if cleaned.is_empty() {
                    emptied.push(key.clone());
                } else {
                    if matched {
                        outcome.stripped += 1;
                    }
                    if &cleaned != text {
                        *text = cleaned;
                    }
                }
            }
            _ => {}
        }
    }
    for key in &emptied {
        map.remove(key);
        outcome.pruned += 1;
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;
    use tempfile::TempDir;

    fn sample() -> CatalogResult<Catalog> {
        Catalog::from_value(json!({
            "auth": {
                "signIn": {
                    "email": "Email",
                    "password": "Password"
                }
            },
            "shared": {
                "common": { "email": "Email" }
            },
            "landing": { "hero": { "title": "Kingdom Training" } }
        }))
    }

    #[test]
    fn flatten_emits_dotted_keys_in_document_order() -> Result<(), Box<dyn Error>> {
        let catalog = sample()?;
        let flattened = catalog.flatten();
        let keys: Vec<&str> = flattened.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "auth.signIn.email",
                "auth.signIn.password",
                "shared.common.email",
                "landing.hero.title",
            ]
        );
        assert_eq!(flattened[0].1, "Email");
        Ok(())
    }

    #[test]
    fn flatten_renders_non_string_leaves_as_json() -> Result<(), Box<dyn Error>> {
        let catalog = Catalog::from_value(json!({
            "count": 3,
            "enabled": true,
            "nothing": null
        }))?;
        let flattened = catalog.flatten();
        assert_eq!(flattened[0], ("count".to_string(), "3".to_string()));
        assert_eq!(flattened[1], ("enabled".to_string(), "true".to_string()));
        assert_eq!(flattened[2], ("nothing".to_string(), "null".to_string()));
        Ok(())
    }

    #[test]
    fn flatten_of_empty_catalog_is_empty() -> Result<(), Box<dyn Error>> {
        let catalog = Catalog::from_value(json!({}))?;
        assert!(catalog.is_empty());
        assert!(catalog.flatten().is_empty());
        Ok(())
    }

    #[test]
    fn from_value_rejects_non_object_roots() {
        let err = Catalog::from_value(json!([1, 2, 3])).expect_err("array root should fail");
        assert!(matches!(err, CatalogError::RootNotObject { kind: "array" }));
    }

    #[test]
    fn remove_path_deletes_leaves_and_is_idempotent() -> Result<(), Box<dyn Error>> {
        let mut catalog = sample()?;
        assert!(catalog.remove_path("auth.signIn.email")?);
        assert!(!catalog.remove_path("auth.signIn.email")?);
        let keys: Vec<String> = catalog.flatten().into_iter().map(|(key, _)| key).collect();
        assert!(!keys.contains(&"auth.signIn.email".to_string()));
        // The emptied-out parent is not pruned.
        assert!(keys.contains(&"auth.signIn.password".to_string()));
        Ok(())
    }

    #[test]
    fn remove_path_removes_whole_subtrees() -> Result<(), Box<dyn Error>> {
        let mut catalog = sample()?;
        assert!(catalog.remove_path("auth.signIn")?);
        assert!(catalog.flatten().iter().all(|(key, _)| !key.starts_with("auth.")));
        Ok(())
    }

    #[test]
    fn remove_path_ignores_non_object_intermediates() -> Result<(), Box<dyn Error>> {
        let mut catalog = sample()?;
        assert!(!catalog.remove_path("landing.hero.title.extra")?);
        assert!(!catalog.remove_path("missing.branch.leaf")?);
        Ok(())
    }

    #[test]
    fn remove_path_rejects_blank_segments() -> Result<(), Box<dyn Error>> {
        let mut catalog = sample()?;
        let err = catalog.remove_path("").expect_err("blank path should fail");
        assert!(matches!(err, CatalogError::InvalidKeyPath { .. }));
        let err = catalog.remove_path("auth..email").expect_err("empty segment should fail");
        assert!(matches!(err, CatalogError::InvalidKeyPath { .. }));
        Ok(())
    }

    #[test]
    fn strip_placeholders_trims_and_prunes() -> Result<(), Box<dyn Error>> {
        let mut catalog = Catalog::from_value(json!({
            "session": {
                "title": "{{shared.roles.speaker}} speaks",
                "empty": "{{shared.roles.listener}}",
                "plain": "  Untouched  "
            }
        }))?;
        let outcome = catalog.strip_shared_placeholders()?;
        assert_eq!(outcome.stripped, 1);
        assert_eq!(outcome.pruned, 1);

        let flattened = catalog.flatten();
        assert_eq!(
            flattened,
            vec![
                ("session.title".to_string(), "speaks".to_string()),
                ("session.plain".to_string(), "Untouched".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn strip_placeholders_prunes_preexisting_empty_leaves() -> Result<(), Box<dyn Error>> {
        let mut catalog = Catalog::from_value(json!({ "blank": "", "kept": "text" }))?;
        let outcome = catalog.strip_shared_placeholders()?;
        assert_eq!(outcome.stripped, 0);
        assert_eq!(outcome.pruned, 1);
        assert_eq!(catalog.flatten().len(), 1);
        Ok(())
    }

    #[test]
    fn strip_placeholders_leaves_empty_parents_in_place() -> Result<(), Box<dyn Error>> {
        let mut catalog = Catalog::from_value(json!({
            "branch": { "only": "{{shared.common.email}}" }
        }))?;
        catalog.strip_shared_placeholders()?;
        assert_eq!(catalog.as_value(), json!({ "branch": {} }));
        Ok(())
    }

    #[test]
    fn save_and_load_round_trip_preserves_key_order() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("en.json");
        let catalog = Catalog::from_value(json!({
            "zebra": "last in alphabet, first in document",
            "alpha": { "nested": "value" }
        }))?;
        catalog.save(&path)?;

        let raw = fs::read_to_string(&path)?;
        assert!(raw.ends_with('\n'));
        assert!(raw.find("zebra").ok_or("zebra missing")? < raw.find("alpha").ok_or("alpha missing")?);

        let reloaded = Catalog::load(&path)?;
        assert_eq!(reloaded, catalog);
        Ok(())
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let missing = temp.path().join("missing.json");
        let err = Catalog::load(&missing).expect_err("missing file should fail");
        assert!(matches!(err, CatalogError::Io { operation: "load", .. }));

        let invalid = temp.path().join("invalid.json");
        fs::write(&invalid, "not json")?;
        let err = Catalog::load(&invalid).expect_err("invalid json should fail");
        assert!(matches!(err, CatalogError::Json { operation: "load", .. }));
        Ok(())
    }
}
