//! Core tabular data model.
//!
//! A [`Table`] is an ordered sequence of named columns over rows of typed
//! scalar [`Cell`]s. Column order is significant and preserved end-to-end
//! from source file to output file; row order is source order except where
//! an operation (pivot, group) defines a new one.
//!
//! Cells are a tagged variant with explicit, total conversion rules:
//! every numeric narrows to a plain integer or float on JSON projection,
//! missing/NaN normalizes to `null`, and nothing format-specific leaks out.

use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

use crate::error::{OpError, OpResult};

// =============================================================================
// Cell
// =============================================================================

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    /// Missing check. A NaN float counts as missing everywhere.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view, if any. Non-numeric and missing cells yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    /// Human-facing stringification: missing cells render empty.
    pub fn display(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.is_nan() => String::new(),
            Cell::Float(f) => f.to_string(),
            Cell::Str(s) => s.clone(),
        }
    }

    /// Coercing stringification, the way the engine matches values in
    /// lookups and comparison keys. Missing cells render as `"nan"` so two
    /// missing values compare equal to each other.
    pub fn coerce_str(&self) -> String {
        if self.is_null() {
            return "nan".to_string();
        }
        self.display()
    }

    /// Normalized comparison key: stringify, trim whitespace, lowercase.
    /// Used only for matching, never persisted as output data.
    pub fn comparison_key(&self) -> String {
        self.coerce_str().trim().to_lowercase()
    }

    /// JSON-safe projection of a single cell. Numbers narrow to plain
    /// integers or floats; NaN and infinities become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::Number((*i).into()),
            Cell::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Cell::Str(s) => Value::String(s.clone()),
        }
    }

    /// Total conversion from any JSON value back into a cell.
    pub fn from_json(value: &Value) -> Cell {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Int(i)
                } else {
                    Cell::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Cell::Str(s.clone()),
            other => Cell::Str(other.to_string()),
        }
    }

    /// Grouping key with value-based equality: `2` and `2.0` group
    /// together, NaN normalizes to the missing key.
    pub fn group_key(&self) -> CellKey {
        match self {
            Cell::Null => CellKey::Null,
            Cell::Bool(b) => CellKey::Bool(*b),
            Cell::Int(i) => CellKey::Int(*i),
            Cell::Float(f) => {
                if f.is_nan() {
                    CellKey::Null
                } else if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
                    CellKey::Int(*f as i64)
                } else {
                    CellKey::Float(f.to_bits())
                }
            }
            Cell::Str(s) => CellKey::Str(s.clone()),
        }
    }

    /// Total ordering for operations that sort: booleans, then numbers by
    /// value, then strings, then missing values last.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        fn rank(c: &Cell) -> u8 {
            match c {
                _ if c.is_null() => 3,
                Cell::Bool(_) => 0,
                Cell::Int(_) | Cell::Float(_) => 1,
                Cell::Str(_) => 2,
                Cell::Null => 3,
            }
        }
        match rank(self).cmp(&rank(other)) {
            Ordering::Equal => match (self, other) {
                (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
                (Cell::Str(a), Cell::Str(b)) => a.cmp(b),
                _ => match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                },
            },
            ord => ord,
        }
    }
}

/// Hashable grouping key derived from a [`Cell`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
}

// =============================================================================
// Table
// =============================================================================

/// Ordered columns × ordered rows of typed scalar cells.
///
/// Invariant: every row holds exactly `columns.len()` cells. A table may
/// have zero columns and a positive row count (the merger's empty
/// common-column edge case).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in order.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Append a row, padding with nulls or truncating to the table width.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Null);
        self.rows.push(cells);
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a named column, or [`OpError::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> OpResult<usize> {
        self.column_index(name)
            .ok_or_else(|| OpError::ColumnNotFound(name.to_string()))
    }

    /// New table with the same columns and only the rows matching the
    /// predicate, in source order.
    pub fn filter<P>(&self, mut pred: P) -> Table
    where
        P: FnMut(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| pred(row))
                .cloned()
                .collect(),
        }
    }

    /// New table restricted to the named columns, in the given order.
    /// Columns the table never had come back filled with nulls.
    pub fn select(&self, names: &[String]) -> Table {
        let indices: Vec<Option<usize>> =
            names.iter().map(|n| self.column_index(n)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| match idx {
                        Some(i) => row[*i].clone(),
                        None => Cell::Null,
                    })
                    .collect()
            })
            .collect();
        Table {
            columns: names.to_vec(),
            rows,
        }
    }

    // =========================================================================
    // JSON-safe projection
    // =========================================================================

    /// Project the table into a sequence of `column -> value` row mappings.
    ///
    /// Every numeric narrows to a plain integer or float, every missing/NaN
    /// value becomes `null`. Idempotent: re-absorbing the output with
    /// [`Table::from_json_rows`] and projecting again yields the same rows.
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (name, cell) in self.columns.iter().zip(row) {
                    obj.insert(name.clone(), cell.to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }

    /// Rebuild a table from projected row mappings, with an explicit column
    /// order (row objects carry no reliable ordering of their own).
    pub fn from_json_rows(columns: Vec<String>, rows: &[Value]) -> Table {
        let mut table = Table::new(columns);
        for row in rows {
            let cells = table
                .columns
                .iter()
                .map(|name| {
                    row.get(name)
                        .map(Cell::from_json)
                        .unwrap_or(Cell::Null)
                })
                .collect();
            table.push_row(cells);
        }
        table
    }
}
