//! Upload ingress.
//!
//! An [`Upload`] is what the outside world hands the engine: raw bytes plus
//! a claimed filename. The extension selects the parser; content is
//! validated by nothing but the parse itself.
//!
//! Parsing goes through a [`SpooledUpload`]: the bytes land in a temporary
//! file that is removed on every exit path — success, validation failure
//! or error — because the guard owns the file and deletes it on drop.

use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::LoadResult;
use crate::loader::{self, Format};
use crate::table::Table;

/// An uploaded byte stream with its claimed filename.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read an upload from disk, claiming the file's own name.
    pub fn from_path(path: impl AsRef<Path>) -> LoadResult<Upload> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Upload {
            filename,
            bytes: std::fs::read(path)?,
        })
    }

    /// Format implied by the claimed filename.
    pub fn format(&self) -> LoadResult<Format> {
        Format::from_filename(&self.filename)
    }

    /// Spool the bytes into a temporary file for parsing.
    pub fn spool(&self, dir: &Path) -> LoadResult<SpooledUpload> {
        let format = self.format()?;
        let file = NamedTempFile::new_in(dir)?;
        std::fs::write(file.path(), &self.bytes)?;
        Ok(SpooledUpload { file, format })
    }

    /// Spool and parse in one step.
    pub fn load(&self, spool_dir: &Path) -> LoadResult<Table> {
        self.spool(spool_dir)?.load()
    }
}

/// A spooled upload: temp file + resolved format. Dropping the guard
/// removes the file.
pub struct SpooledUpload {
    file: NamedTempFile,
    format: Format,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Parse the spooled content with the claimed format.
    pub fn load(&self) -> LoadResult<Table> {
        let bytes = std::fs::read(self.file.path())?;
        loader::load_bytes(&bytes, self.format)
    }
}
