//! Excel workbook loading via calamine.
//!
//! First sheet only, first row is the header, native cell types preserved.
//! Integral floats narrow to `Int` so an exported workbook reloads with the
//! same cell values it was written from.

use std::io::Cursor;

use calamine::{Data, Reader, Xls, Xlsx};

use super::Format;
use crate::error::{LoadError, LoadResult};
use crate::table::{Cell, Table};

pub(crate) fn load_excel(bytes: &[u8], format: Format) -> LoadResult<Table> {
    let range = match format {
        Format::Xls => {
            let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
                .map_err(|e| LoadError::Parse(format!("failed to read xls workbook: {e}")))?;
            workbook
                .worksheet_range_at(0)
                .map(|r| r.map_err(|e| e.to_string()))
        }
        _ => {
            let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
                .map_err(|e| LoadError::Parse(format!("failed to read xlsx workbook: {e}")))?;
            workbook
                .worksheet_range_at(0)
                .map(|r| r.map_err(|e| e.to_string()))
        }
    };

    let range = match range {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(LoadError::Parse(format!("failed to read sheet: {e}"))),
        None => return Err(LoadError::EmptyInput),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_name).collect(),
        None => return Err(LoadError::EmptyInput),
    };

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::EmptyInput);
    }

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }

    Ok(table)
}

fn header_name(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map a calamine cell onto the engine cell type. Integral floats narrow
/// to `Int`; error cells count as missing; date-like cells stringify.
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::Str(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
                Cell::Int(*f as i64)
            } else {
                Cell::Float(*f)
            }
        }
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(_) => Cell::Null,
        other => Cell::Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cell_narrows_integral_floats() {
        assert_eq!(convert_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(convert_cell(&Data::Float(3.5)), Cell::Float(3.5));
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Int(7));
    }

    #[test]
    fn test_convert_cell_empty_and_bool() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Null);
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let err = load_excel(b"not a workbook", Format::Xlsx).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_roundtrip_through_writer() {
        // Written workbook must reload with identical columns and cells.
        let mut table = Table::new(vec!["id".into(), "name".into(), "score".into()]);
        table.push_row(vec![Cell::Int(1), Cell::Str("x".into()), Cell::Float(1.5)]);
        table.push_row(vec![Cell::Int(2), Cell::Str("y".into()), Cell::Null]);

        let payload = crate::export::workbook_single(&table, "Data", "roundtrip.xlsx").unwrap();
        let reloaded = load_excel(&payload.bytes, Format::Xlsx).unwrap();

        assert_eq!(reloaded.columns(), table.columns());
        assert_eq!(reloaded.len(), table.len());
        assert_eq!(reloaded.rows(), table.rows());
    }
}
