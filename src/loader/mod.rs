//! Table loading with format dispatch and CSV auto-detection.
//!
//! The loader turns an uploaded byte stream plus a claimed extension into a
//! [`Table`]. The extension is trusted to select the parser; nothing about
//! the content is validated beyond "does it parse".
//!
//! - CSV: encoding auto-detected, delimiter auto-detected, first row is the
//!   header, per-column type inference (int → float → string fallback).
//! - Excel: first sheet only, native cell types preserved.
//! - HTML: first `<table>` element.
//! - XML: attribute/tag-based row extraction from the root's children.

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::table::{Cell, Table};

mod excel;
mod markup;

// =============================================================================
// Format tag
// =============================================================================

/// Supported input formats, keyed by claimed file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xlsx,
    Xls,
    Html,
    Xml,
}

impl Format {
    /// Resolve a format from a bare extension (case-insensitive).
    pub fn from_extension(ext: &str) -> LoadResult<Format> {
        match ext.to_lowercase().as_str() {
            "csv" => Ok(Format::Csv),
            "xlsx" => Ok(Format::Xlsx),
            "xls" => Ok(Format::Xls),
            "htm" | "html" => Ok(Format::Html),
            "xml" => Ok(Format::Xml),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Resolve a format from a claimed filename.
    pub fn from_filename(name: &str) -> LoadResult<Format> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat(name.to_string()))?;
        Format::from_extension(ext)
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Load a table from raw bytes with an explicit format tag.
pub fn load_bytes(bytes: &[u8], format: Format) -> LoadResult<Table> {
    match format {
        Format::Csv => load_csv(bytes),
        Format::Xlsx | Format::Xls => excel::load_excel(bytes, format),
        Format::Html => markup::load_html(bytes),
        Format::Xml => markup::load_xml(bytes),
    }
}

/// Load a table from a file path, inferring the format from its extension.
pub fn load_path<P: AsRef<Path>>(path: P) -> LoadResult<Table> {
    let path = path.as_ref();
    let format = Format::from_filename(&path.to_string_lossy())?;
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, format)
}

// =============================================================================
// CSV
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the header line.
/// Comma wins ties.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

fn load_csv(bytes: &[u8]) -> LoadResult<Table> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)
        .map_err(|e| LoadError::Encoding(format!("{} ({})", e, encoding)))?;

    if content.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let delimiter = detect_delimiter(&content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Parse(e.to_string()))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        raw_rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(infer_columns(headers, raw_rows))
}

// =============================================================================
// Column type inference
// =============================================================================

/// Infer per-column cell types from raw string cells: a column where every
/// non-empty value parses as an integer becomes Int, else Float if every
/// value parses as a float, else Str. Empty values become Null either way.
pub(crate) fn infer_columns(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Table {
    #[derive(Clone, Copy, PartialEq)]
    enum ColType {
        Int,
        Float,
        Str,
    }

    let width = headers.len();
    let mut col_types = vec![ColType::Int; width];

    for row in &raw_rows {
        for (j, ty) in col_types.iter_mut().enumerate() {
            let value = row.get(j).map(|s| s.trim()).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            match ty {
                ColType::Int if value.parse::<i64>().is_err() => {
                    *ty = if value.parse::<f64>().is_ok() {
                        ColType::Float
                    } else {
                        ColType::Str
                    };
                }
                ColType::Float if value.parse::<f64>().is_err() => *ty = ColType::Str,
                _ => {}
            }
        }
    }

    let mut table = Table::new(headers);
    for row in raw_rows {
        let cells = (0..width)
            .map(|j| {
                let raw = row.get(j).map(String::as_str).unwrap_or("");
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Cell::Null;
                }
                match col_types[j] {
                    ColType::Int => trimmed
                        .parse::<i64>()
                        .map(Cell::Int)
                        .unwrap_or_else(|_| Cell::Str(raw.to_string())),
                    ColType::Float => trimmed
                        .parse::<f64>()
                        .map(Cell::Float)
                        .unwrap_or_else(|_| Cell::Str(raw.to_string())),
                    ColType::Str => Cell::Str(raw.to_string()),
                }
            })
            .collect();
        table.push_row(cells);
    }
    table
}
