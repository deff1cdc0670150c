//! # Design
//!
//! - Provide structured, constant-message errors for the rewrite pipeline.
//! - Capture operation context (paths, keys, patterns) so a failed batch run
//!   can be reproduced on a single file.
//! - Preserve source errors without interpolating context into messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for rewrite operations.
pub type RewriteResult<T> = Result<T, RewriteError>;

/// Errors produced while loading plans or rewriting source trees.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// IO failures while reading plans or source files.
    #[error("rewrite io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The plan file was not valid JSON for the expected shape.
    #[error("failed to parse rewrite plan")]
    PlanParse {
        /// Plan file path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The plan contained no mappings at all.
    #[error("rewrite plan has no mappings")]
    PlanEmpty,
    /// A single mapping failed validation.
    #[error("rewrite plan mapping is invalid")]
    InvalidMapping {
        /// Old key of the offending mapping.
        key: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// The lookup function name failed validation.
    #[error("lookup function name is invalid")]
    InvalidFunction {
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// The call-site pattern failed to compile.
    #[error("failed to compile call-site pattern")]
    RegexCompile {
        /// Regex pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The source root to rewrite does not exist.
    #[error("source root missing")]
    RootMissing {
        /// Missing root path.
        path: PathBuf,
    },
    /// Walkdir traversal failures.
    #[error("rewrite walk failure")]
    Walkdir {
        /// Root being walked when the failure occurred.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
}

impl RewriteError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_mapping(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidMapping {
            key: key.into(),
            reason,
        }
    }
}
