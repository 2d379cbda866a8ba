//! Column-aligned table merging.
//!
//! The merged table keeps only the columns common to every input, ordered
//! the way the first table orders them. Rows are concatenated in input
//! order. A table that never had one of the common columns contributes
//! nulls for it.

use std::collections::HashSet;

use crate::error::{OpError, OpResult};
use crate::table::Table;

/// Merge two or more tables on their common columns.
///
/// Fails with [`InsufficientInputs`](OpError::InsufficientInputs) for fewer
/// than two tables. The common column set may be empty; the result then has
/// zero columns but still one row per input row.
pub fn merge_tables(tables: &[Table]) -> OpResult<Table> {
    if tables.len() < 2 {
        return Err(OpError::InsufficientInputs {
            needed: 2,
            got: tables.len(),
        });
    }

    // Intersect column names across every input.
    let mut common: HashSet<&String> = tables[0].columns().iter().collect();
    for table in &tables[1..] {
        let names: HashSet<&String> = table.columns().iter().collect();
        common.retain(|c| names.contains(*c));
    }

    // Order the common set by the first table's column order. This ordering
    // is load-bearing: set iteration order must never leak into the result.
    let ordered: Vec<String> = tables[0]
        .columns()
        .iter()
        .filter(|c| common.contains(c))
        .cloned()
        .collect();

    let mut merged = Table::new(ordered.clone());
    for table in tables {
        let aligned = table.select(&ordered);
        for row in aligned.rows() {
            merged.push_row(row.clone());
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row);
        }
        t
    }

    #[test]
    fn test_common_columns_in_first_table_order() {
        let t1 = table(&["b", "a", "c"], vec![vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]]);
        let t2 = table(&["a", "b"], vec![vec![Cell::Int(4), Cell::Int(5)]]);
        let t3 = table(
            &["a", "c", "b"],
            vec![vec![Cell::Int(6), Cell::Int(7), Cell::Int(8)]],
        );

        let merged = merge_tables(&[t1, t2, t3]).unwrap();
        assert_eq!(merged.columns(), &["b".to_string(), "a".to_string()]);
        assert_eq!(merged.rows()[0], vec![Cell::Int(1), Cell::Int(2)]);
        assert_eq!(merged.rows()[1], vec![Cell::Int(5), Cell::Int(4)]);
        assert_eq!(merged.rows()[2], vec![Cell::Int(8), Cell::Int(6)]);
    }

    #[test]
    fn test_row_count_is_sum_of_inputs() {
        let t1 = table(&["a"], vec![vec![Cell::Int(1)], vec![Cell::Int(2)]]);
        let t2 = table(&["b"], vec![vec![Cell::Int(3)]]);

        let merged = merge_tables(&[t1, t2]).unwrap();
        assert_eq!(merged.width(), 0);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_rows_concatenate_in_input_order() {
        let t1 = table(&["a"], vec![vec![Cell::Str("first".into())]]);
        let t2 = table(&["a"], vec![vec![Cell::Str("second".into())]]);

        let merged = merge_tables(&[t1, t2]).unwrap();
        assert_eq!(merged.rows()[0][0], Cell::Str("first".into()));
        assert_eq!(merged.rows()[1][0], Cell::Str("second".into()));
    }

    #[test]
    fn test_single_input_rejected() {
        let t1 = table(&["a"], vec![]);
        let err = merge_tables(&[t1]).unwrap_err();
        assert!(matches!(
            err,
            OpError::InsufficientInputs { needed: 2, got: 1 }
        ));
    }
}
