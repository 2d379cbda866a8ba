//! Engine configuration.
//!
//! Defaults mirror a small deployment: results under a dot-directory in the
//! working directory, uploads spooled to the system temp dir, 20-row
//! previews. Each value can be overridden through the environment
//! (`SHEETFORGE_DATA_DIR`, `SHEETFORGE_SPOOL_DIR`, `SHEETFORGE_PREVIEW_ROWS`).

use std::path::PathBuf;

/// Directory where result blobs are stored (relative to current dir).
pub const DEFAULT_DATA_DIR: &str = ".sheetforge/results";

/// Number of rows in operation previews.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Extensions the loader accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "htm", "html", "xml"];

/// Resolved engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the result store keeps its blobs and session indexes.
    pub data_dir: PathBuf,
    /// Where uploads are spooled before parsing.
    pub spool_dir: PathBuf,
    /// Rows per preview.
    pub preview_rows: usize,
}

impl Config {
    /// Build a configuration from the environment, falling back to
    /// defaults. `.env` loading is the caller's business (the CLI does it).
    pub fn from_env() -> Self {
        let data_dir = std::env::var("SHEETFORGE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let spool_dir = std::env::var("SHEETFORGE_SPOOL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());
        let preview_rows = std::env::var("SHEETFORGE_PREVIEW_ROWS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PREVIEW_ROWS);
        Self {
            data_dir,
            spool_dir,
            preview_rows,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            spool_dir: std::env::temp_dir(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}
