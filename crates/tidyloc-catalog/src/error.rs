//! # Design
//!
//! - Provide structured, constant-message errors for catalog operations.
//! - Capture operation context (paths, key paths) to make failures
//!   reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors produced while loading, transforming, or saving a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO failures while reading or writing catalog files.
    #[error("catalog io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// JSON parsing or serialisation failures.
    #[error("catalog json failure")]
    Json {
        /// Operation that triggered the JSON failure.
        operation: &'static str,
        /// Path involved in the JSON failure.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The catalog document root was not a JSON object.
    #[error("catalog root is not an object")]
    RootNotObject {
        /// JSON type actually found at the root.
        kind: &'static str,
    },
    /// A dotted key path failed validation.
    #[error("invalid key path")]
    InvalidKeyPath {
        /// Offending key path.
        path: String,
        /// Static reason for the failure.
        reason: &'static str,
    },
    /// A regex failed to compile.
    #[error("failed to compile regex")]
    RegexCompile {
        /// Regex pattern.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
}

impl CatalogError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    fn io_error() -> io::Error {
        io::Error::other("io")
    }

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("invalid").expect_err("json must be invalid")
    }

    #[test]
    fn error_helpers_build_variants() {
        let io_err = CatalogError::io("load", "en.json", io_error());
        assert!(matches!(io_err, CatalogError::Io { .. }));
        assert!(io_err.source().is_some());
        assert_eq!(io_err.to_string(), "catalog io failure");

        let json_err = CatalogError::json("load", "en.json", json_error());
        assert!(matches!(json_err, CatalogError::Json { .. }));
        assert!(json_err.source().is_some());
        assert_eq!(json_err.to_string(), "catalog json failure");
    }

    #[test]
    fn context_variants_have_constant_messages() {
        let root = CatalogError::RootNotObject { kind: "array" };
        assert_eq!(root.to_string(), "catalog root is not an object");
        assert!(root.source().is_none());

        let key = CatalogError::InvalidKeyPath {
            path: "a..b".to_string(),
            reason: "empty segment",
        };
        assert_eq!(key.to_string(), "invalid key path");
        assert!(key.source().is_none());
    }
}
