//! Error types for the Sheetforge transform engine.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`LoadError`] - table loading/parsing errors
//! - [`OpError`] - transform operation errors
//! - [`StoreError`] - result store errors
//! - [`ExportError`] - workbook/archive serialization errors
//! - [`EngineError`] - top-level errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. Every error is
//! recoverable at the call boundary: [`EngineError::report`] turns any
//! failure into a structured kind + message pair.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while loading a byte stream into a [`Table`](crate::table::Table).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The claimed extension maps to no known parser.
    #[error("Unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    /// Malformed content for the selected format.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The input has no header row / no data at all.
    #[error("The file is empty")]
    EmptyInput,

    /// Failed to decode bytes with the detected encoding.
    #[error("Failed to decode content: {0}")]
    Encoding(String),

    /// Failed to read the underlying file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Operation Errors
// =============================================================================

/// Errors raised by the table operations (compare, merge, split, pivot,
/// analysis).
#[derive(Debug, Error)]
pub enum OpError {
    /// A named column is absent from its table.
    #[error("Column \"{0}\" not found")]
    ColumnNotFound(String),

    /// An operation got fewer input tables than it requires.
    #[error("At least {needed} input files required, got {got}")]
    InsufficientInputs { needed: usize, got: usize },

    /// Unknown aggregation function name.
    #[error("Unknown aggregation function: '{0}'")]
    InvalidAggregate(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the keyed result store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while serializing a table to a download payload.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook writer error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Zip archive error.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("Export IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Engine Errors (top-level)
// =============================================================================

/// Top-level engine errors.
///
/// This is the main error type returned by the [`crate::pipeline`] flows.
/// It wraps all lower-level errors and adds flow-specific variants.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Table loading error.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// Operation error.
    #[error("{0}")]
    Op(#[from] OpError),

    /// Store error.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Export error.
    #[error("{0}")]
    Export(#[from] ExportError),

    /// An export was requested but nothing is stored for this slot.
    #[error("No {0} data available")]
    NoStoredData(&'static str),

    /// Format conversion failed or is not supported.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),
}

impl EngineError {
    /// Stable error kind, matching the engine taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Load(LoadError::UnsupportedFormat(_)) => "UnsupportedFormat",
            EngineError::Load(LoadError::EmptyInput) => "EmptyInput",
            EngineError::Load(_) => "ParseError",
            EngineError::Op(OpError::ColumnNotFound(_)) => "ColumnNotFound",
            EngineError::Op(OpError::InsufficientInputs { .. }) => "InsufficientInputs",
            EngineError::Op(OpError::InvalidAggregate(_)) => "ParseError",
            EngineError::Store(_) | EngineError::Export(_) => "ParseError",
            EngineError::NoStoredData(_) => "EmptyInput",
            EngineError::ConversionFailed(_) => "ConversionFailed",
        }
    }

    /// Structured report for the request boundary.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

/// Structured error report: stable kind + human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for table operations.
pub type OpResult<T> = Result<T, OpError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for engine flows.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // LoadError -> EngineError
        let load_err = LoadError::EmptyInput;
        let engine_err: EngineError = load_err.into();
        assert!(engine_err.to_string().contains("empty"));
        assert_eq!(engine_err.kind(), "EmptyInput");

        // OpError -> EngineError
        let op_err = OpError::ColumnNotFound("Region".into());
        let engine_err: EngineError = op_err.into();
        assert!(engine_err.to_string().contains("Region"));
        assert_eq!(engine_err.kind(), "ColumnNotFound");
    }

    #[test]
    fn test_insufficient_inputs_format() {
        let err = OpError::InsufficientInputs { needed: 2, got: 1 };
        let msg = err.to_string();
        assert!(msg.contains("At least 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn test_report_shape() {
        let err: EngineError = LoadError::UnsupportedFormat("pdf".into()).into();
        let report = err.report();
        assert_eq!(report.kind, "UnsupportedFormat");
        assert!(report.message.contains("pdf"));
    }

    #[test]
    fn test_conversion_failed_kind() {
        let err = EngineError::ConversionFailed("target 'pdf' not supported".into());
        assert_eq!(err.kind(), "ConversionFailed");
    }
}
