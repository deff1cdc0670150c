//! Error types for duplicate-analysis report generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Errors raised while serialising or writing analysis reports.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Failed to serialise the report payload.
    #[error("failed to serialise analysis report")]
    SerializeReport {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Failed to write the report file.
    #[error("failed to write analysis report")]
    WriteReport {
        /// Report output path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn variants_expose_sources() {
        let json_source =
            serde_json::from_str::<serde_json::Value>("oops").expect_err("json must be invalid");
        let err = AnalyzeError::SerializeReport {
            source: json_source,
        };
        assert_eq!(err.to_string(), "failed to serialise analysis report");
        assert!(err.source().is_some());

        let err = AnalyzeError::WriteReport {
            path: PathBuf::from("report.json"),
            source: io::Error::other("io"),
        };
        assert_eq!(err.to_string(), "failed to write analysis report");
        assert!(err.source().is_some());
    }
}
