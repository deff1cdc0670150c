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

//! Duplicate analysis over translation catalogs: flattens the tree, groups
//! non-shared leaves by exact value, and emits a machine-readable report.
//!
//! # Design
//! - Pure report construction; IO only happens in [`write_report`].
//! - Keys under the `shared.*` namespace and values that already reference a
//!   shared component never count as duplicates.
//! - Group order is deterministic: descending count, document order on ties.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tidyloc_catalog::Catalog;

use crate::error::{AnalyzeError, AnalyzeResult};

pub mod error;

/// Namespace prefix identifying shared-component keys.
const SHARED_PREFIX: &str = "shared.";
/// Substring identifying values that interpolate a shared component.
const SHARED_REFERENCE: &str = "{{shared.";

/// One group of leaves carrying the exact same value.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// The duplicated value.
    pub value: String,
    /// Number of leaves carrying the value.
    pub count: usize,
    /// Dotted keys of those leaves, in document order.
    pub keys: Vec<String>,
}

/// Full analysis report for one catalog.
#[derive(Serialize, Clone, Debug)]
pub struct Report {
    /// Tool version that produced the report.
    pub version: String,
    /// RFC 3339 timestamp of report generation.
    pub generated: String,
    /// Total flattened leaf entries in the catalog.
    pub total_entries: usize,
    /// Leaves whose value references a shared component.
    pub shared_references: usize,
    /// Duplicate groups, largest first.
    pub groups: Vec<DuplicateGroup>,
}

impl Report {
    /// Total number of leaves involved in duplicate groups.
    #[must_use]
    pub fn duplicate_leaves(&self) -> usize {
        self.groups.iter().map(|group| group.count).sum()
    }
}

/// Build the duplicate report for a catalog.
#[must_use]
pub fn build_report(catalog: &Catalog) -> Report {
    let flattened = catalog.flatten();
    let shared_references = flattened
        .iter()
        .filter(|(_, value)| value.contains(SHARED_REFERENCE))
        .count();

    // Group by value while remembering first-appearance order.
    let mut order: Vec<&str> = Vec::new();
    let mut keys_by_value: HashMap<&str, Vec<&str>> = HashMap::new();
    for (key, value) in &flattened {
        if key.starts_with(SHARED_PREFIX) || value.contains(SHARED_REFERENCE) {
            continue;
        }
        let keys = keys_by_value.entry(value.as_str()).or_default();
        if keys.is_empty() {
            order.push(value.as_str());
        }
        keys.push(key.as_str());
    }

    let mut groups: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|value| {
            let keys = keys_by_value.get(value)?;
            if keys.len() < 2 {
                return None;
            }
            Some(DuplicateGroup {
                value: value.to_string(),
                count: keys.len(),
                keys: keys.iter().map(|key| (*key).to_string()).collect(),
            })
        })
        .collect();
    // Stable sort keeps document order within equal counts.
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    Report {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated: Utc::now().to_rfc3339(),
        total_entries: flattened.len(),
        shared_references,
        groups,
    }
}

/// Render a human-readable summary showing at most `limit` groups.
#[must_use]
pub fn render_text(report: &Report, limit: usize) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "total entries: {}", report.total_entries);
    let _ = writeln!(
        text,
        "shared component references: {}",
        report.shared_references
    );

    if report.groups.is_empty() {
        let _ = writeln!(text, "no exact duplicates found");
        return text;
    }

    let _ = writeln!(
        text,
        "duplicate groups: {} ({} duplicate leaves)",
        report.groups.len(),
        report.duplicate_leaves()
    );
    for group in report.groups.iter().take(limit) {
        let _ = writeln!(text);
        let _ = writeln!(text, "'{}' appears {} times:", group.value, group.count);
        let _ = writeln!(text, "  keys: {}", group.keys.join(", "));
    }
    if report.groups.len() > limit {
        let _ = writeln!(text);
        let _ = writeln!(text, "{} more groups not shown", report.groups.len() - limit);
    }
    text
}

/// Write the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn write_report(report: &Report, path: &Path) -> AnalyzeResult<()> {
    let mut rendered = serde_json::to_string_pretty(report)
        .map_err(|source| AnalyzeError::SerializeReport { source })?;
    rendered.push('\n');
    fs::write(path, rendered).map_err(|source| AnalyzeError::WriteReport {
        path: path.to_path_buf(),
        source,
    })
}
