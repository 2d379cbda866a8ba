//! HTML and XML table extraction via quick-xml.
//!
//! HTML: the first `<table>` element, `<tr>` rows, `<th>`/`<td>` cells,
//! first row is the header. XML: the document root's child elements are
//! rows; each row's attributes and child-element texts become columns.
//! Both apply the same column type inference as CSV.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{decode_content, detect_encoding, infer_columns};
use crate::error::{LoadError, LoadResult};
use crate::table::Table;

pub(crate) fn load_html(bytes: &[u8]) -> LoadResult<Table> {
    let content = decode_content(bytes, &detect_encoding(bytes))?;
    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);
    reader.check_end_names(false);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut table_depth = 0usize;
    let mut table_seen = false;
    let mut current_row: Option<Vec<String>> = None;
    let mut current_cell: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        let in_table = table_depth > 0;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref().to_ascii_lowercase().as_slice() {
                b"table" if !table_seen || in_table => {
                    table_seen = true;
                    table_depth += 1;
                }
                b"tr" if in_table => current_row = Some(Vec::new()),
                b"th" | b"td" if in_table && current_row.is_some() => {
                    current_cell = Some(String::new())
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref().to_ascii_lowercase().as_slice() {
                b"table" if in_table => {
                    table_depth -= 1;
                }
                b"tr" if in_table => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                b"th" | b"td" if in_table => {
                    if let (Some(row), Some(cell)) = (current_row.as_mut(), current_cell.take()) {
                        row.push(cell);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if let Some(cell) = current_cell.as_mut() {
                    let text = e
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned());
                    if !cell.is_empty() && !text.is_empty() {
                        cell.push(' ');
                    }
                    cell.push_str(text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LoadError::Parse(format!("invalid HTML: {e}"))),
        }
        buf.clear();
    }

    if !table_seen {
        return Err(LoadError::Parse("no <table> element found".to_string()));
    }

    let mut iter = rows.into_iter();
    let headers: Vec<String> = match iter.next() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(LoadError::EmptyInput),
    };

    Ok(infer_columns(headers, iter.collect()))
}

pub(crate) fn load_xml(bytes: &[u8]) -> LoadResult<Table> {
    let content = decode_content(bytes, &detect_encoding(bytes))?;
    let mut reader = Reader::from_str(&content);
    reader.trim_text(true);

    // Column names in first-seen order, rows as name -> raw value.
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<(String, String)>> = Vec::new();

    let mut depth = 0usize;
    let mut current_field: Option<String> = None;
    let mut buf = Vec::new();

    fn note_column(columns: &mut Vec<String>, name: &str) {
        if !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
    }

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if depth == 2 {
                    // A new row: its attributes are leading columns.
                    let mut row = Vec::new();
                    for attr in e.attributes().flatten() {
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        note_column(&mut columns, &key);
                        row.push((key, value));
                    }
                    rows.push(row);
                } else if depth == 3 {
                    note_column(&mut columns, &name);
                    current_field = Some(name);
                    if let Some(row) = rows.last_mut() {
                        row.push((current_field.clone().unwrap_or_default(), String::new()));
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                if depth == 2 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    note_column(&mut columns, &name);
                    if let Some(row) = rows.last_mut() {
                        row.push((name, String::new()));
                    }
                } else if depth == 1 {
                    let mut row = Vec::new();
                    for attr in e.attributes().flatten() {
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        let value = String::from_utf8_lossy(&attr.value).into_owned();
                        note_column(&mut columns, &key);
                        row.push((key, value));
                    }
                    rows.push(row);
                }
            }
            Ok(Event::End(_)) => {
                if depth == 3 {
                    current_field = None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(ref e)) => {
                if depth >= 3 && current_field.is_some() {
                    let text = e
                        .unescape()
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e.as_ref()).into_owned());
                    if let Some(row) = rows.last_mut() {
                        if let Some(last) = row.last_mut() {
                            last.1.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LoadError::Parse(format!("invalid XML: {e}"))),
        }
        buf.clear();
    }

    if rows.is_empty() {
        return Err(LoadError::EmptyInput);
    }

    let raw_rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| {
                    row.iter()
                        .find(|(name, _)| name == col)
                        .map(|(_, value)| value.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    Ok(infer_columns(columns, raw_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_html_first_table_only() {
        let html = r#"
            <html><body>
            <p>intro</p>
            <table>
              <tr><th>City</th><th>Pop</th></tr>
              <tr><td>Oslo</td><td>700000</td></tr>
              <tr><td>Bergen</td><td>290000</td></tr>
            </table>
            <table><tr><th>other</th></tr><tr><td>ignored</td></tr></table>
            </body></html>"#;
        let table = load_html(html.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["City".to_string(), "Pop".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::Str("Oslo".into()));
        assert_eq!(table.rows()[1][1], Cell::Int(290000));
    }

    #[test]
    fn test_html_without_table_fails() {
        let err = load_html(b"<html><body><p>nothing</p></body></html>").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_html_entities_unescaped() {
        let html = "<table><tr><th>name</th></tr><tr><td>Tom &amp; Jerry</td></tr></table>";
        let table = load_html(html.as_bytes()).unwrap();
        assert_eq!(table.rows()[0][0], Cell::Str("Tom & Jerry".into()));
    }

    #[test]
    fn test_xml_child_elements_become_columns() {
        let xml = r#"<?xml version="1.0"?>
            <rows>
              <row><id>1</id><name>Alice</name></row>
              <row><id>2</id><name>Bob</name></row>
            </rows>"#;
        let table = load_xml(xml.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["id".to_string(), "name".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], Cell::Int(2));
        assert_eq!(table.rows()[1][1], Cell::Str("Bob".into()));
    }

    #[test]
    fn test_xml_attributes_become_columns() {
        let xml = r#"<data><item sku="A1"><qty>5</qty></item><item sku="B2"><qty>7</qty></item></data>"#;
        let table = load_xml(xml.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["sku".to_string(), "qty".to_string()]);
        assert_eq!(table.rows()[0][0], Cell::Str("A1".into()));
        assert_eq!(table.rows()[0][1], Cell::Int(5));
    }

    #[test]
    fn test_xml_without_rows_is_empty_input() {
        let err = load_xml(b"<rows></rows>").unwrap_err();
        assert!(matches!(err, LoadError::EmptyInput));
    }
}
