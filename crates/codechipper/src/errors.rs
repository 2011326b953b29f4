//! # Error Types

use std::path::PathBuf;

/// Errors from codechipper operations.
#[derive(Debug, thiserror::Error)]
pub enum CodechipperError {
    /// A row or file is malformed (missing header, wrong column count, bad field).
    #[error("parse error: {0}")]
    Parse(String),

    /// The file extension is not one of the supported dataset formats.
    #[error("unsupported dataset format: {0} (expected .csv or .ndjson)")]
    UnsupportedFormat(String),

    /// A required reference file does not exist.
    #[error("required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// An example index past the end of a dataset.
    #[error("index {index} out of range for dataset of {len} examples")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The dataset length.
        len: usize,
    },

    /// Assembled lookups or batch inputs are inconsistent.
    #[error("{0}")]
    Invariant(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for codechipper operations.
pub type CCResult<T> = core::result::Result<T, CodechipperError>;
