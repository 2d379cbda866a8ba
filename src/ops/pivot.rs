//! Pivot table aggregation.
//!
//! Rows group by an index column, optionally crossed with a pivot column;
//! the values column aggregates per group with a named function. Empty
//! index/pivot combinations fill with the numeric value 0 (an explicit
//! choice, distinct from the null-for-missing convention elsewhere), and a
//! grand-total row and, when pivoted, a grand-total column are appended
//! under the label `Total`. Rows whose index or pivot value is missing are
//! excluded from grouping.

use std::collections::HashMap;

use crate::error::{OpError, OpResult};
use crate::table::{Cell, CellKey, Table};

/// Label used for the grand-total row and column.
pub const TOTAL_LABEL: &str = "Total";

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl Aggregate {
    /// Resolve an aggregation function by name. `None` defaults to sum.
    pub fn parse(name: Option<&str>) -> OpResult<Aggregate> {
        match name.map(|n| n.to_lowercase()) {
            None => Ok(Aggregate::Sum),
            Some(n) => match n.as_str() {
                "sum" => Ok(Aggregate::Sum),
                "mean" => Ok(Aggregate::Mean),
                "count" => Ok(Aggregate::Count),
                "min" => Ok(Aggregate::Min),
                "max" => Ok(Aggregate::Max),
                other => Err(OpError::InvalidAggregate(other.to_string())),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "sum",
            Aggregate::Mean => "mean",
            Aggregate::Count => "count",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
        }
    }

    /// Apply to the value cells of one group. Count counts non-null cells;
    /// the numeric functions ignore non-numeric cells and yield 0 when
    /// nothing numeric remains (the zero-fill convention).
    fn apply(&self, cells: &[&Cell]) -> f64 {
        if let Aggregate::Count = self {
            return cells.iter().filter(|c| !c.is_null()).count() as f64;
        }
        let nums: Vec<f64> = cells.iter().filter_map(|c| c.as_f64()).collect();
        if nums.is_empty() {
            return 0.0;
        }
        let sum: f64 = nums.iter().sum();
        match self {
            Aggregate::Sum => sum,
            Aggregate::Mean => sum / nums.len() as f64,
            Aggregate::Min => nums.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregate::Max => nums.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregate::Count => unreachable!(),
        }
    }
}

/// Narrow an aggregated number to a cell: integral results become Int.
fn narrow(value: f64) -> Cell {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < (i64::MAX as f64) {
        Cell::Int(value as i64)
    } else {
        Cell::Float(value)
    }
}

type Buckets<'a> = HashMap<(CellKey, Option<CellKey>), Vec<&'a Cell>>;

/// Value cells of every group matching the given index and/or pivot key.
/// `None` matches everything, so margins aggregate the underlying rows.
fn collect_matching<'a>(
    buckets: &Buckets<'a>,
    index_key: Option<&CellKey>,
    pivot_key: Option<&CellKey>,
) -> Vec<&'a Cell> {
    buckets
        .iter()
        .filter(|((ik, pk), _)| {
            index_key.map_or(true, |k| ik == k) && pivot_key.map_or(true, |k| pk.as_ref() == Some(k))
        })
        .flat_map(|(_, cells)| cells.iter().copied())
        .collect()
}

/// Distinct cells of one column, in the sorted order pivot output uses,
/// with missing values excluded.
fn distinct_sorted(table: &Table, idx: usize) -> Vec<Cell> {
    let mut seen: HashMap<CellKey, Cell> = HashMap::new();
    let mut out: Vec<Cell> = Vec::new();
    for row in table.rows() {
        let cell = &row[idx];
        if cell.is_null() {
            continue;
        }
        let key = cell.group_key();
        if !seen.contains_key(&key) {
            seen.insert(key, cell.clone());
            out.push(cell.clone());
        }
    }
    out.sort_by(|a, b| a.sort_cmp(b));
    out
}

/// Build a pivot table.
///
/// Fails with [`ColumnNotFound`](OpError::ColumnNotFound) for any named
/// field absent from the table.
pub fn pivot_table(
    table: &Table,
    index: &str,
    pivot: Option<&str>,
    values: &str,
    agg: Aggregate,
) -> OpResult<Table> {
    let index_idx = table.require_column(index)?;
    let values_idx = table.require_column(values)?;
    let pivot_idx = match pivot {
        Some(name) => Some(table.require_column(name)?),
        None => None,
    };

    let index_values = distinct_sorted(table, index_idx);
    let pivot_values = pivot_idx.map(|i| distinct_sorted(table, i));

    // Bucket the value cells per (index, pivot) group.
    let mut buckets: Buckets = HashMap::new();
    for row in table.rows() {
        if row[index_idx].is_null() {
            continue;
        }
        if let Some(pi) = pivot_idx {
            if row[pi].is_null() {
                continue;
            }
        }
        let key = (
            row[index_idx].group_key(),
            pivot_idx.map(|pi| row[pi].group_key()),
        );
        buckets.entry(key).or_default().push(&row[values_idx]);
    }

    match pivot_values {
        Some(pivot_values) => {
            let mut columns = vec![index.to_string()];
            columns.extend(pivot_values.iter().map(|c| c.display()));
            columns.push(TOTAL_LABEL.to_string());

            let mut result = Table::new(columns);
            for iv in &index_values {
                let ik = iv.group_key();
                let mut row = vec![iv.clone()];
                for pv in &pivot_values {
                    let cells = buckets
                        .get(&(ik.clone(), Some(pv.group_key())))
                        .map(Vec::as_slice)
                        .unwrap_or(&[]);
                    row.push(narrow(agg.apply(cells)));
                }
                row.push(narrow(agg.apply(&collect_matching(&buckets, Some(&ik), None))));
                result.push_row(row);
            }

            // Grand-total row: aggregate over the underlying row sets, not
            // over the already-aggregated cells.
            let mut total_row = vec![Cell::Str(TOTAL_LABEL.to_string())];
            for pv in &pivot_values {
                total_row.push(narrow(agg.apply(&collect_matching(&buckets, None, Some(&pv.group_key())))));
            }
            total_row.push(narrow(agg.apply(&collect_matching(&buckets, None, None))));
            result.push_row(total_row);

            Ok(result)
        }
        None => {
            let mut result = Table::new(vec![index.to_string(), values.to_string()]);
            for iv in &index_values {
                let ik = iv.group_key();
                let cells = buckets
                    .get(&(ik, None))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                result.push_row(vec![iv.clone(), narrow(agg.apply(cells))]);
            }
            let total = narrow(agg.apply(&collect_matching(&buckets, None, None)));
            result.push_row(vec![Cell::Str(TOTAL_LABEL.to_string()), total]);
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Table {
        let mut t = Table::new(vec!["region".into(), "quarter".into(), "amount".into()]);
        for (r, q, a) in [
            ("West", "Q1", 10),
            ("West", "Q2", 20),
            ("East", "Q1", 5),
            ("West", "Q1", 30),
        ] {
            t.push_row(vec![
                Cell::Str(r.into()),
                Cell::Str(q.into()),
                Cell::Int(a),
            ]);
        }
        t
    }

    #[test]
    fn test_pivot_sum_with_totals() {
        let p = pivot_table(&sales(), "region", Some("quarter"), "amount", Aggregate::Sum)
            .unwrap();

        assert_eq!(
            p.columns(),
            &[
                "region".to_string(),
                "Q1".to_string(),
                "Q2".to_string(),
                "Total".to_string()
            ]
        );
        // Index values sorted: East before West.
        assert_eq!(p.rows()[0][0], Cell::Str("East".into()));
        assert_eq!(p.rows()[0][1], Cell::Int(5));
        assert_eq!(p.rows()[1][1], Cell::Int(40));
        assert_eq!(p.rows()[1][2], Cell::Int(20));
        assert_eq!(p.rows()[1][3], Cell::Int(60));
        // Grand totals.
        assert_eq!(p.rows()[2][0], Cell::Str("Total".into()));
        assert_eq!(p.rows()[2][1], Cell::Int(45));
        assert_eq!(p.rows()[2][3], Cell::Int(65));
    }

    #[test]
    fn test_empty_combination_fills_zero_not_null() {
        let p = pivot_table(&sales(), "region", Some("quarter"), "amount", Aggregate::Sum)
            .unwrap();
        // East has no Q2 rows.
        assert_eq!(p.rows()[0][2], Cell::Int(0));
    }

    #[test]
    fn test_pivot_without_pivot_column() {
        let p = pivot_table(&sales(), "region", None, "amount", Aggregate::Sum).unwrap();

        assert_eq!(p.columns(), &["region".to_string(), "amount".to_string()]);
        assert_eq!(p.rows()[0], vec![Cell::Str("East".into()), Cell::Int(5)]);
        assert_eq!(p.rows()[1], vec![Cell::Str("West".into()), Cell::Int(60)]);
        assert_eq!(p.rows()[2], vec![Cell::Str("Total".into()), Cell::Int(65)]);
    }

    #[test]
    fn test_mean_stays_float() {
        let p = pivot_table(&sales(), "region", None, "amount", Aggregate::Mean).unwrap();
        // West: (10 + 20 + 30) / 3 = 20 -> integral, narrows to Int.
        assert_eq!(p.rows()[1][1], Cell::Int(20));
        // Grand mean: 65 / 4 = 16.25.
        assert_eq!(p.rows()[2][1], Cell::Float(16.25));
    }

    #[test]
    fn test_count_counts_non_null() {
        let mut t = Table::new(vec!["g".into(), "v".into()]);
        t.push_row(vec![Cell::Str("a".into()), Cell::Int(1)]);
        t.push_row(vec![Cell::Str("a".into()), Cell::Null]);
        t.push_row(vec![Cell::Str("b".into()), Cell::Str("x".into())]);

        let p = pivot_table(&t, "g", None, "v", Aggregate::Count).unwrap();
        assert_eq!(p.rows()[0], vec![Cell::Str("a".into()), Cell::Int(1)]);
        assert_eq!(p.rows()[1], vec![Cell::Str("b".into()), Cell::Int(1)]);
        assert_eq!(p.rows()[2], vec![Cell::Str("Total".into()), Cell::Int(2)]);
    }

    #[test]
    fn test_min_max() {
        let p = pivot_table(&sales(), "region", None, "amount", Aggregate::Max).unwrap();
        assert_eq!(p.rows()[1][1], Cell::Int(30));
        let p = pivot_table(&sales(), "region", None, "amount", Aggregate::Min).unwrap();
        assert_eq!(p.rows()[1][1], Cell::Int(10));
    }

    #[test]
    fn test_unknown_aggregate_rejected() {
        let err = Aggregate::parse(Some("median")).unwrap_err();
        assert!(matches!(err, OpError::InvalidAggregate(_)));
        assert_eq!(Aggregate::parse(None).unwrap(), Aggregate::Sum);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let t = sales();
        assert!(pivot_table(&t, "nope", None, "amount", Aggregate::Sum).is_err());
        assert!(pivot_table(&t, "region", Some("nope"), "amount", Aggregate::Sum).is_err());
        assert!(pivot_table(&t, "region", None, "nope", Aggregate::Sum).is_err());
    }
}
