//! Grouped table splitting.
//!
//! Rows are grouped by one or two columns using type-native value equality,
//! in the order groups are first encountered. Each group becomes one named
//! artifact: all original columns, source row order, and a deterministic
//! name derived from the group's value(s).

use std::collections::HashMap;

use crate::error::OpResult;
use crate::table::{Cell, CellKey, Table};

/// One split artifact: a group name (no extension) and that group's rows.
#[derive(Debug, Clone)]
pub struct SplitGroup {
    pub name: String,
    pub table: Table,
}

/// Stringify a group value into a path-safe artifact name component:
/// `/`, `\` and `:` are replaced with `_`, null renders as `NA`.
pub fn clean_filename(value: &Cell) -> String {
    if value.is_null() {
        return "NA".to_string();
    }
    value
        .display()
        .replace('/', "_")
        .replace('\\', "_")
        .replace(':', "_")
}

/// Split a table into per-group artifacts.
///
/// Fails with [`ColumnNotFound`](crate::error::OpError::ColumnNotFound) if
/// a named column is absent.
pub fn split_by_groups(
    table: &Table,
    primary: &str,
    secondary: Option<&str>,
) -> OpResult<Vec<SplitGroup>> {
    let primary_idx = table.require_column(primary)?;
    let secondary_idx = match secondary {
        Some(name) => Some(table.require_column(name)?),
        None => None,
    };

    let mut order: Vec<(CellKey, Option<CellKey>)> = Vec::new();
    let mut groups: HashMap<(CellKey, Option<CellKey>), SplitGroup> = HashMap::new();

    for row in table.rows() {
        let key = (
            row[primary_idx].group_key(),
            secondary_idx.map(|i| row[i].group_key()),
        );
        let group = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            let name = match secondary_idx {
                Some(i) => format!(
                    "{}_{}",
                    clean_filename(&row[primary_idx]),
                    clean_filename(&row[i])
                ),
                None => clean_filename(&row[primary_idx]),
            };
            SplitGroup {
                name,
                table: Table::new(table.columns().to_vec()),
            }
        });
        group.table.push_row(row.clone());
    }

    Ok(order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect())
}
