//! Key-based table comparison.
//!
//! Rows from two tables are matched on a normalized comparison key
//! (stringified, trimmed, lowercased) built from one designated column per
//! table. The result partitions each table into rows whose key exists in
//! the other table ("common") and rows whose key does not ("unique").
//!
//! This is a set-membership filter, not a join: every row whose key is in
//! the intersection lands on the common side of its own table
//! independently, so duplicate keys can produce different common-side row
//! counts for the two tables.

use std::collections::HashSet;

use crate::error::OpResult;
use crate::table::Table;

/// The four row subsets produced by a comparison. Each retains its source
/// table's full column set and row order; the derived key is never output.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub common_in_first: Table,
    pub common_in_second: Table,
    pub unique_in_first: Table,
    pub unique_in_second: Table,
}

/// Compare two tables on one key column each.
///
/// Fails with [`ColumnNotFound`](crate::error::OpError::ColumnNotFound) if
/// either key column is absent from its table.
pub fn compare_tables(
    first: &Table,
    first_key: &str,
    second: &Table,
    second_key: &str,
) -> OpResult<Comparison> {
    let first_idx = first.require_column(first_key)?;
    let second_idx = second.require_column(second_key)?;

    let first_keys: Vec<String> = first
        .rows()
        .iter()
        .map(|row| row[first_idx].comparison_key())
        .collect();
    let second_keys: Vec<String> = second
        .rows()
        .iter()
        .map(|row| row[second_idx].comparison_key())
        .collect();

    let first_set: HashSet<&String> = first_keys.iter().collect();
    let common: HashSet<&String> = second_keys
        .iter()
        .filter(|k| first_set.contains(k))
        .collect();

    let (common_in_first, unique_in_first) = partition_by_keys(first, &first_keys, &common);
    let (common_in_second, unique_in_second) = partition_by_keys(second, &second_keys, &common);

    Ok(Comparison {
        common_in_first,
        common_in_second,
        unique_in_first,
        unique_in_second,
    })
}

/// Split a table into (key in `common`, key not in `common`) row subsets,
/// both keeping source order.
fn partition_by_keys(table: &Table, keys: &[String], common: &HashSet<&String>) -> (Table, Table) {
    let mut matched = Table::new(table.columns().to_vec());
    let mut unmatched = Table::new(table.columns().to_vec());
    for (row, key) in table.rows().iter().zip(keys) {
        if common.contains(key) {
            matched.push_row(row.clone());
        } else {
            unmatched.push_row(row.clone());
        }
    }
    (matched, unmatched)
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
    fn test_end_to_end_two_csv_scenario() {
        let a = table(
            &["id", "name"],
            vec![
                vec![Cell::Str("1".into()), Cell::Str("x".into())],
                vec![Cell::Str("2".into()), Cell::Str("y".into())],
            ],
        );
        let b = table(
            &["id", "val"],
            vec![
                vec![Cell::Str("2".into()), Cell::Int(9)],
                vec![Cell::Str("3".into()), Cell::Int(7)],
            ],
        );

        let result = compare_tables(&a, "id", &b, "id").unwrap();

        assert_eq!(result.common_in_first.len(), 1);
        assert_eq!(
            result.common_in_first.rows()[0],
            vec![Cell::Str("2".into()), Cell::Str("y".into())]
        );
        assert_eq!(result.unique_in_first.len(), 1);
        assert_eq!(
            result.unique_in_first.rows()[0],
            vec![Cell::Str("1".into()), Cell::Str("x".into())]
        );
        assert_eq!(
            result.common_in_second.rows()[0],
            vec![Cell::Str("2".into()), Cell::Int(9)]
        );
        assert_eq!(
            result.unique_in_second.rows()[0],
            vec![Cell::Str("3".into()), Cell::Int(7)]
        );
    }

    #[test]
    fn test_case_and_whitespace_insensitive_keys() {
        let a = table(&["k"], vec![vec![Cell::Str("Foo ".into())]]);
        let b = table(&["k"], vec![vec![Cell::Str(" FOO".into())]]);

        let result = compare_tables(&a, "k", &b, "k").unwrap();
        assert_eq!(result.common_in_first.len(), 1);
        assert_eq!(result.common_in_second.len(), 1);
        assert!(result.unique_in_first.is_empty());
    }

    #[test]
    fn test_every_row_in_exactly_one_subset() {
        let a = table(
            &["k"],
            vec![
                vec![Cell::Str("a".into())],
                vec![Cell::Str("b".into())],
                vec![Cell::Str("c".into())],
            ],
        );
        let b = table(
            &["k"],
            vec![vec![Cell::Str("b".into())], vec![Cell::Str("d".into())]],
        );

        let result = compare_tables(&a, "k", &b, "k").unwrap();
        assert_eq!(
            result.common_in_first.len() + result.unique_in_first.len(),
            a.len()
        );
        assert_eq!(
            result.common_in_second.len() + result.unique_in_second.len(),
            b.len()
        );
    }

    #[test]
    fn test_duplicate_keys_filter_independently() {
        // Two "x" rows in A, one in B: both A rows are common.
        let a = table(
            &["k", "n"],
            vec![
                vec![Cell::Str("x".into()), Cell::Int(1)],
                vec![Cell::Str("x".into()), Cell::Int(2)],
            ],
        );
        let b = table(&["k"], vec![vec![Cell::Str("x".into())]]);

        let result = compare_tables(&a, "k", &b, "k").unwrap();
        assert_eq!(result.common_in_first.len(), 2);
        assert_eq!(result.common_in_second.len(), 1);
    }

    #[test]
    fn test_numeric_keys_match_string_keys() {
        let a = table(&["k"], vec![vec![Cell::Int(7)]]);
        let b = table(&["k"], vec![vec![Cell::Str(" 7 ".into())]]);

        let result = compare_tables(&a, "k", &b, "k").unwrap();
        assert_eq!(result.common_in_first.len(), 1);
    }

    #[test]
    fn test_missing_key_column() {
        let a = table(&["k"], vec![]);
        let b = table(&["other"], vec![]);
        let err = compare_tables(&a, "k", &b, "k").unwrap_err();
        assert!(err.to_string().contains("\"k\""));
    }
}
