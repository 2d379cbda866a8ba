//! # Sheetforge - server-side spreadsheet operations
//!
//! Sheetforge loads tabular files (CSV, Excel, HTML, XML) into an in-memory
//! table and performs routine spreadsheet transformations on them:
//! key-based comparison, column-aligned merging, grouped splitting into a
//! zip of per-group workbooks, pivot aggregation, duplicate detection,
//! lookup, search and filtering, plus CSV↔Excel conversion.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Upload    │────▶│   Loader    │────▶│  Transform  │────▶│  Preview /  │
//! │ (bytes+name)│     │ (csv/xlsx/  │     │ (compare,   │     │  Download   │
//! │             │     │  html/xml)  │     │  merge, ...)│     │  payload    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Full results persist in a keyed [`store::ResultStore`] under an explicit
//! caller scope, so a later export request can serialize the previous
//! transform without recomputing it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetforge::{Config, Engine, Upload};
//!
//! let engine = Engine::new(Config::default());
//! let a = Upload::from_path("a.csv").unwrap();
//! let b = Upload::from_path("b.csv").unwrap();
//! let summary = engine.compare("cli", &a, "id", &b, "id").unwrap();
//! println!("{} common rows", summary.stats.common);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`table`] - Cell and Table data model, JSON-safe projection
//! - [`loader`] - Format detection and parsing
//! - [`ingress`] - Uploads and spooled temp files
//! - [`ops`] - The transform operations
//! - [`store`] - Keyed result store
//! - [`export`] - Workbook / archive / CSV payloads
//! - [`pipeline`] - End-to-end operation flows
//! - [`logs`] - Structured progress logging

// Core modules
pub mod config;
pub mod error;
pub mod table;

// Ingestion
pub mod ingress;
pub mod loader;

// Transformation
pub mod ops;

// Persistence
pub mod store;

// Egress
pub mod export;

// Flows
pub mod pipeline;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    EngineError,
    EngineResult,
    ErrorReport,
    ExportError,
    LoadError,
    OpError,
    StoreError,
};

// =============================================================================
// Re-exports - Data model
// =============================================================================

pub use table::{Cell, Table};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use ingress::{SpooledUpload, Upload};
pub use loader::{load_bytes, load_path, Format};

// =============================================================================
// Re-exports - Operations
// =============================================================================

pub use ops::{
    compare_tables,
    duplicates,
    filter_by_column,
    global_search,
    lookup,
    merge_tables,
    pivot_table,
    split_by_groups,
    Aggregate,
    Comparison,
    FilterMode,
};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{ResultStore, SlotState};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{csv_payload, workbook_multi, workbook_single, zip_of_workbooks, ExportPayload};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use config::Config;
pub use pipeline::{
    AnalysisSummary,
    ComparisonSummary,
    DatasetSummary,
    Engine,
    LookupSummary,
    MergeSummary,
    PivotSummary,
};
