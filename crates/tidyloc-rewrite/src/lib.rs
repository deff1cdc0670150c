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

//! Plan-driven rewriting of translation call sites across a source tree.
//!
//! # Design
//! - Matches `t('key')`-style call expressions with a configurable lookup
//!   function name, preserving the quote character the call already uses.
//! - Replacements are applied back-to-front so byte offsets stay valid.
//! - Replacement output never contains an old key, so repeated runs are
//!   no-ops.
//! - A file whose rewritten content has unbalanced braces is skipped with a
//!   warning instead of being written; the run continues.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{RewriteError, RewriteResult};
use crate::plan::{RewritePlan, Target};

pub mod error;
pub mod plan;

/// Default translation lookup function name.
pub const DEFAULT_FUNCTION: &str = "t";

/// Source file extensions visited when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &["node_modules", "dist", "build", ".git"];

/// One applied key replacement.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Key found at the call site.
    pub old_key: String,
    /// Key written in its place.
    pub new_key: String,
}

/// What happened to a single file.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// No mapped call sites were found.
    Unchanged,
    /// The file was rewritten (or would be, under dry run).
    Updated,
    /// The file had mapped call sites but failed the brace sanity check.
    Skipped,
}

/// Per-file rewrite outcome.
#[derive(Serialize, Clone, Debug)]
pub struct FileOutcome {
    /// File the outcome refers to.
    pub path: PathBuf,
    /// Outcome classification.
    pub status: FileStatus,
    /// Replacements applied, in document order.
    pub changes: Vec<Change>,
}

impl FileOutcome {
    fn new(path: &Path, status: FileStatus, changes: Vec<Change>) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            changes,
        }
    }
}

/// Accounting for one batch run over a source tree.
#[derive(Serialize, Clone, Debug, Default)]
pub struct Summary {
    /// Files visited with a matching extension.
    pub files_scanned: usize,
    /// Files with at least one replacement.
    pub files_updated: usize,
    /// Files skipped by the brace sanity check.
    pub files_skipped: usize,
    /// Total replacements across all files.
    pub total_changes: usize,
    /// Outcomes for updated and skipped files, in walk order.
    pub outcomes: Vec<FileOutcome>,
}

/// Compiled call-site matcher for one rewrite plan.
#[derive(Debug)]
pub struct RewriteEngine {
    plan: RewritePlan,
    pattern: Regex,
    function: String,
}

impl RewriteEngine {
    /// Compile a matcher for `function('key')` call expressions.
    ///
    /// # Errors
    ///
    /// Returns an error if the function name is blank or the derived pattern
    /// fails to compile.
    pub fn new(plan: RewritePlan, function: &str) -> RewriteResult<Self> {
        if function.trim().is_empty() {
            return Err(RewriteError::InvalidFunction {
                reason: "function name is blank",
            });
        }
        let pattern_text = format!(r#"{}\((['"`])([^'"`]+)['"`]\)"#, regex::escape(function));
        let pattern = Regex::new(&pattern_text).map_err(|source| RewriteError::RegexCompile {
            pattern: pattern_text.clone(),
            source,
        })?;
        Ok(Self {
            plan,
            pattern,
            function: function.to_string(),
        })
    }

    /// Rewrite mapped call sites in a string, returning the new content and
    /// the replacements made (in document order).
    #[must_use]
    pub fn rewrite_content(&self, content: &str) -> (String, Vec<Change>) {
        struct Hit<'a> {
            start: usize,
            end: usize,
            quote: &'a str,
            target: &'a Target,
            old_key: &'a str,
        }

        let mut hits: Vec<Hit<'_>> = Vec::new();
        for caps in self.pattern.captures_iter(content) {
            let Some(full) = caps.get(0) else { continue };
            let (Some(quote), Some(key)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if let Some(target) = self.plan.target(key.as_str()) {
                hits.push(Hit {
                    start: full.start(),
                    end: full.end(),
                    quote: quote.as_str(),
                    target,
                    old_key: key.as_str(),
                });
            }
        }

        let mut updated = content.to_string();
        let mut changes = Vec::with_capacity(hits.len());
        // Back-to-front so earlier offsets stay valid after edits.
        for hit in hits.iter().rev() {
            let quote = hit.quote;
            let mut replacement = format!("{}({quote}{}{quote})", self.function, hit.target.key());
            if let Some(suffix) = hit.target.suffix() {
                replacement.push_str(&format!(" + {quote}{suffix}{quote}"));
            }
            updated.replace_range(hit.start..hit.end, &replacement);
            changes.push(Change {
                old_key: hit.old_key.to_string(),
                new_key: hit.target.key().to_string(),
            });
        }
        changes.reverse();
        (updated, changes)
    }

    /// Rewrite a single file in place.
    ///
    /// Unchanged files are never written. A changed file is only written when
    /// its rewritten content passes the brace sanity check and `dry_run` is
    /// off.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn apply_file(&self, path: &Path, dry_run: bool) -> RewriteResult<FileOutcome> {
        let content = fs::read_to_string(path)
            .map_err(|source| RewriteError::io("read_source", path, source))?;
        let (updated, changes) = self.rewrite_content(&content);
        if changes.is_empty() {
            return Ok(FileOutcome::new(path, FileStatus::Unchanged, changes));
        }

        if !braces_balanced(&updated) {
            warn!(
                path = %path.display(),
                "unbalanced braces after rewrite; skipping file"
            );
            return Ok(FileOutcome::new(path, FileStatus::Skipped, changes));
        }

        if !dry_run {
            fs::write(path, &updated)
                .map_err(|source| RewriteError::io("write_source", path, source))?;
        }
        Ok(FileOutcome::new(path, FileStatus::Updated, changes))
    }

    /// Rewrite every matching file under `root`.
    ///
    /// Only files with one of `extensions` are visited; `node_modules`,
    /// `dist`, `build`, and `.git` directories are never descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing, traversal fails, or a file
    /// cannot be read or written.
    pub fn apply_tree(
        &self,
        root: &Path,
        extensions: &[String],
        dry_run: bool,
    ) -> RewriteResult<Summary> {
        if !root.exists() {
            return Err(RewriteError::RootMissing {
                path: root.to_path_buf(),
            });
        }

        let mut summary = Summary::default();
        for entry in WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        {
            let entry = entry.map_err(|source| RewriteError::Walkdir {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !has_wanted_extension(path, extensions) {
                continue;
            }

            summary.files_scanned += 1;
            let outcome = self.apply_file(path, dry_run)?;
            match outcome.status {
                FileStatus::Unchanged => {}
                FileStatus::Updated => {
                    info!(
                        path = %path.display(),
                        changes = outcome.changes.len(),
                        dry_run,
                        "rewrote translation call sites"
                    );
                    summary.files_updated += 1;
                    summary.total_changes += outcome.changes.len();
                    summary.outcomes.push(outcome);
                }
                FileStatus::Skipped => {
                    summary.files_skipped += 1;
                    summary.outcomes.push(outcome);
                }
            }
        }
        Ok(summary)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn has_wanted_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

fn braces_balanced(content: &str) -> bool {
    let mut balance: i64 = 0;
    for ch in content.chars() {
        match ch {
            '{' => balance += 1,
            '}' => balance -= 1,
            _ => {}
        }
    }
    balance == 0
}
