//! Download payload generation.
//!
//! Converts tables into transport-ready binary payloads: single- or
//! multi-sheet Excel workbooks, a zip archive of per-group workbooks, or
//! CSV. Each payload carries its bytes, a suggested filename and a content
//! type, leaving delivery to the caller.

use std::io::{Cursor, Write};

use rust_xlsxwriter::Workbook;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, ExportResult};
use crate::ops::split::SplitGroup;
use crate::table::{Cell, Table};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A binary download: bytes plus suggested filename and content type.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Write one table into a worksheet: header row first, then data rows.
/// Missing cells stay blank and round-trip back to null on reload.
fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    table: &Table,
) -> ExportResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    for (col, header) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Null => {}
                Cell::Float(f) if f.is_nan() => {}
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Cell::Int(i) => {
                    worksheet.write_number(r, c, *i as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(r, c, *f)?;
                }
                Cell::Str(s) => {
                    worksheet.write_string(r, c, s)?;
                }
            }
        }
    }
    Ok(())
}

/// Single-sheet workbook payload.
pub fn workbook_single(
    table: &Table,
    sheet_name: &str,
    filename: &str,
) -> ExportResult<ExportPayload> {
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, sheet_name, table)?;
    Ok(ExportPayload {
        bytes: workbook.save_to_buffer()?,
        filename: filename.to_string(),
        content_type: XLSX_CONTENT_TYPE,
    })
}

/// Multi-sheet workbook payload. Empty tables are skipped; a workbook with
/// nothing to show still gets one blank sheet so the file stays openable.
pub fn workbook_multi(
    sheets: &[(&str, &Table)],
    filename: &str,
) -> ExportResult<ExportPayload> {
    let mut workbook = Workbook::new();
    let mut written = 0;
    for (name, table) in sheets {
        if table.is_empty() {
            continue;
        }
        write_sheet(&mut workbook, name, table)?;
        written += 1;
    }
    if written == 0 {
        workbook.add_worksheet();
    }
    Ok(ExportPayload {
        bytes: workbook.save_to_buffer()?,
        filename: filename.to_string(),
        content_type: XLSX_CONTENT_TYPE,
    })
}

/// Zip archive of one single-sheet workbook per split group, each entry
/// named `{group}.xlsx`.
pub fn zip_of_workbooks(
    groups: &[SplitGroup],
    filename: &str,
) -> ExportResult<ExportPayload> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for group in groups {
        let mut workbook = Workbook::new();
        write_sheet(&mut workbook, "Data", &group.table)?;
        zip.start_file(format!("{}.xlsx", group.name), options)?;
        zip.write_all(&workbook.save_to_buffer()?)?;
    }

    let cursor = zip.finish()?;
    Ok(ExportPayload {
        bytes: cursor.into_inner(),
        filename: filename.to_string(),
        content_type: ZIP_CONTENT_TYPE,
    })
}

/// CSV payload. Missing cells render empty.
pub fn csv_payload(table: &Table, filename: &str) -> ExportResult<ExportPayload> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.display()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(ExportPayload {
        bytes,
        filename: filename.to_string(),
        content_type: CSV_CONTENT_TYPE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_bytes, Format};

    fn sample() -> Table {
        let mut t = Table::new(vec!["id".into(), "name".into()]);
        t.push_row(vec![Cell::Int(1), Cell::Str("x".into())]);
        t.push_row(vec![Cell::Int(2), Cell::Str("y".into())]);
        t
    }

    #[test]
    fn test_single_sheet_payload() {
        let payload = workbook_single(&sample(), "Data", "out.xlsx").unwrap();
        assert_eq!(payload.filename, "out.xlsx");
        assert_eq!(payload.content_type, XLSX_CONTENT_TYPE);
        assert!(!payload.bytes.is_empty());

        let reloaded = load_bytes(&payload.bytes, Format::Xlsx).unwrap();
        assert_eq!(reloaded.columns(), sample().columns());
        assert_eq!(reloaded.rows(), sample().rows());
    }

    #[test]
    fn test_multi_sheet_skips_empty_tables() {
        let empty = Table::new(vec!["a".into()]);
        let full = sample();
        let payload =
            workbook_multi(&[("Empty", &empty), ("Full", &full)], "multi.xlsx").unwrap();
        // The first sheet in the workbook is the non-empty one.
        let reloaded = load_bytes(&payload.bytes, Format::Xlsx).unwrap();
        assert_eq!(reloaded.columns(), full.columns());
    }

    #[test]
    fn test_all_empty_multi_sheet_still_saves() {
        let empty = Table::new(vec!["a".into()]);
        let payload = workbook_multi(&[("Empty", &empty)], "multi.xlsx").unwrap();
        assert!(!payload.bytes.is_empty());
    }

    #[test]
    fn test_zip_entries_named_after_groups() {
        let groups = vec![
            SplitGroup { name: "East_Coast".into(), table: sample() },
            SplitGroup { name: "NA".into(), table: sample() },
        ];
        let payload = zip_of_workbooks(&groups, "split_files.zip").unwrap();
        assert_eq!(payload.content_type, ZIP_CONTENT_TYPE);

        let mut archive = zip::ZipArchive::new(Cursor::new(payload.bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["East_Coast.xlsx", "NA.xlsx"]);
    }

    #[test]
    fn test_zip_member_rows_survive() {
        let groups = vec![SplitGroup { name: "g".into(), table: sample() }];
        let payload = zip_of_workbooks(&groups, "split_files.zip").unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(payload.bytes)).unwrap();
        let mut member = archive.by_index(0).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut member, &mut bytes).unwrap();

        let reloaded = load_bytes(&bytes, Format::Xlsx).unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_csv_payload_renders_nulls_empty() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Cell::Int(1), Cell::Null]);
        let payload = csv_payload(&t, "converted_file.csv").unwrap();
        let text = String::from_utf8(payload.bytes).unwrap();
        assert_eq!(text.trim(), "a,b\n1,");
    }
}
