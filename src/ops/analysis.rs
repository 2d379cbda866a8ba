//! Dataset analysis: duplicate detection, lookup, search, filtering.
//!
//! All four operate on a single loaded table and return row subsets in
//! source order. Matching coerces cells to strings the same way the
//! comparison key does, minus the normalization: lookup and exact filtering
//! compare the raw stringification, search and contains-filtering match
//! case-insensitively.

use regex::RegexBuilder;

use crate::error::OpResult;
use crate::table::{Cell, CellKey, Table};
use std::collections::HashMap;

/// Rows whose value in `column` occurs more than once. Every occurrence is
/// returned, in source order.
pub fn duplicates(table: &Table, column: &str) -> OpResult<Table> {
    let idx = table.require_column(column)?;

    let mut counts: HashMap<CellKey, usize> = HashMap::new();
    for row in table.rows() {
        *counts.entry(row[idx].group_key()).or_insert(0) += 1;
    }

    Ok(table.filter(|row| counts[&row[idx].group_key()] > 1))
}

/// Result of a lookup: whole rows, or the non-null values of one column.
#[derive(Debug, Clone)]
pub enum LookupResult {
    Rows(Table),
    Values(Vec<Cell>),
}

impl LookupResult {
    /// Number of matches.
    pub fn count(&self) -> usize {
        match self {
            LookupResult::Rows(t) => t.len(),
            LookupResult::Values(v) => v.len(),
        }
    }
}

/// XLOOKUP-like search: rows whose `lookup_col`, stringified, equals the
/// needle. With a return column, yields that column's non-null values from
/// the matching rows; otherwise the whole rows.
pub fn lookup(
    table: &Table,
    lookup_col: &str,
    needle: &str,
    return_col: Option<&str>,
) -> OpResult<LookupResult> {
    let idx = table.require_column(lookup_col)?;
    let matches = table.filter(|row| row[idx].coerce_str() == needle);

    match return_col {
        None => Ok(LookupResult::Rows(matches)),
        Some(name) => {
            let ret_idx = table.require_column(name)?;
            let values = matches
                .rows()
                .iter()
                .map(|row| row[ret_idx].clone())
                .filter(|c| !c.is_null())
                .collect();
            Ok(LookupResult::Values(values))
        }
    }
}

/// Case-insensitive substring search across every column. Returns the rows
/// where any cell matches.
pub fn global_search(table: &Table, needle: &str) -> Table {
    let matcher = contains_matcher(needle);
    table.filter(|row| row.iter().any(|cell| matcher(cell)))
}

/// Filtering mode for [`filter_by_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Stringified equality.
    Exact,
    /// Case-insensitive substring; missing cells never match.
    Contains,
}

/// Filter rows on one column by exact value or substring.
pub fn filter_by_column(
    table: &Table,
    column: &str,
    value: &str,
    mode: FilterMode,
) -> OpResult<Table> {
    let idx = table.require_column(column)?;
    Ok(match mode {
        FilterMode::Exact => table.filter(|row| row[idx].coerce_str() == value),
        FilterMode::Contains => {
            let matcher = contains_matcher(value);
            table.filter(|row| !row[idx].is_null() && matcher(&row[idx]))
        }
    })
}

/// Case-insensitive literal containment matcher over stringified cells.
fn contains_matcher(needle: &str) -> impl Fn(&Cell) -> bool {
    let re = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok();
    move |cell: &Cell| match &re {
        Some(re) => re.is_match(&cell.coerce_str()),
        None => false,
    }
}
