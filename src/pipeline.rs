//! High-level operation flows.
//!
//! Each flow mirrors one user-facing operation end to end: load the
//! upload(s), run one transform, project the result to JSON-safe rows,
//! persist the full result under the caller's scope, and hand back a
//! preview. Export flows read the stored result back and serialize it as a
//! download payload.
//!
//! Flows that recompute a stored result (compare, merge, dataset upload)
//! clear their slot before touching any input: a failed attempt leaves the
//! slot empty, never stale. Every flow is synchronous and owns its tables;
//! the store is the only cross-call state.

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{EngineError, EngineResult, OpError};
use crate::export::{self, ExportPayload};
use crate::ingress::Upload;
use crate::logs::{log_info, log_success};
use crate::ops::{self, Aggregate, FilterMode, LookupResult};
use crate::store::ResultStore;
use crate::table::Table;

/// Store kind for the analysis dataset.
pub const KIND_FULL_DATA: &str = "full_data";
/// Store kind for comparison results.
pub const KIND_COMPARISON: &str = "comparison_results";
/// Store kind for merged data.
pub const KIND_MERGED: &str = "merged_data";

/// The engine: configuration plus the keyed result store.
pub struct Engine {
    config: Config,
    store: ResultStore,
}

// =============================================================================
// Summary types
// =============================================================================

/// Preview and stats returned after a dataset upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub filename: String,
    pub columns: Vec<String>,
    pub preview: Vec<Value>,
    pub stats: DatasetStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
    /// Rows identical to an earlier row, over all columns.
    pub duplicates: usize,
}

/// Previews and stats returned by a comparison.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub common_in_first: Vec<Value>,
    pub common_in_second: Vec<Value>,
    pub unique_in_first: Vec<Value>,
    pub unique_in_second: Vec<Value>,
    pub stats: ComparisonStats,
    pub columns_first: Vec<String>,
    pub columns_second: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStats {
    pub common: usize,
    pub unique_in_first: usize,
    pub unique_in_second: usize,
}

/// Preview and stats returned by a merge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub filenames: Vec<String>,
    pub columns: Vec<String>,
    pub preview: Vec<Value>,
    pub stats: MergeStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub files: usize,
    pub rows: usize,
    pub columns: usize,
}

/// Pivot table rendered as headers + JSON rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotSummary {
    pub headers: Vec<String>,
    pub rows: Vec<Value>,
    pub index: String,
    pub pivot: Option<String>,
    pub values: String,
    pub aggregate: String,
}

/// Matching rows from an analysis operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub rows: Vec<Value>,
    pub count: usize,
}

/// Lookup result: whole rows or bare values, plus the match count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupSummary {
    pub result: Value,
    pub count: usize,
}

// =============================================================================
// Engine flows
// =============================================================================

impl Engine {
    pub fn new(config: Config) -> Self {
        let store = ResultStore::open(&config.data_dir);
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    fn preview(&self, table: &Table) -> Vec<Value> {
        table
            .to_json_rows()
            .into_iter()
            .take(self.config.preview_rows)
            .collect()
    }

    fn load(&self, upload: &Upload) -> EngineResult<Table> {
        log_info(format!("Reading {}...", upload.filename));
        let table = upload.load(&self.config.spool_dir)?;
        log_success(format!(
            "Read {} rows, {} columns",
            table.len(),
            table.width()
        ));
        Ok(table)
    }

    // =========================================================================
    // Dataset upload + analysis
    // =========================================================================

    /// Load a dataset and store it for the analysis operations.
    pub fn upload_dataset(&self, scope: &str, upload: &Upload) -> EngineResult<DatasetSummary> {
        self.store.clear(scope, KIND_FULL_DATA)?;

        let table = self.load(upload)?;
        let rows = table.to_json_rows();
        let stats = DatasetStats {
            rows: table.len(),
            columns: table.width(),
            duplicates: count_duplicate_rows(&table),
        };

        let blob = json!({
            "filename": upload.filename,
            "columns": table.columns(),
            "full_data": rows,
            "stats": { "rows": stats.rows, "columns": stats.columns, "duplicates": stats.duplicates },
        });
        self.store.put(scope, KIND_FULL_DATA, &blob)?;
        log_success(format!("Dataset \"{}\" stored", upload.filename));

        Ok(DatasetSummary {
            filename: upload.filename.clone(),
            columns: table.columns().to_vec(),
            preview: self.preview(&table),
            stats,
        })
    }

    /// Rebuild the stored dataset table.
    pub fn dataset(&self, scope: &str) -> EngineResult<Table> {
        let blob = self
            .store
            .get(scope, KIND_FULL_DATA)?
            .ok_or(EngineError::NoStoredData("dataset"))?;
        Ok(table_from_blob(&blob, "columns", "full_data"))
    }

    /// Rows whose value in `column` occurs more than once.
    pub fn find_duplicates(&self, scope: &str, column: &str) -> EngineResult<AnalysisSummary> {
        let table = self.dataset(scope)?;
        let dup = ops::duplicates(&table, column)?;
        Ok(AnalysisSummary {
            count: dup.len(),
            rows: dup.to_json_rows(),
        })
    }

    pub fn export_duplicates(&self, scope: &str, column: &str) -> EngineResult<ExportPayload> {
        let table = self.dataset(scope)?;
        let dup = ops::duplicates(&table, column)?;
        let filename = format!("duplicates_{}.xlsx", sanitize_component(column));
        Ok(export::workbook_single(&dup, "Duplicates", &filename)?)
    }

    /// XLOOKUP-like lookup over the stored dataset.
    pub fn lookup(
        &self,
        scope: &str,
        lookup_col: &str,
        needle: &str,
        return_col: Option<&str>,
    ) -> EngineResult<LookupSummary> {
        let table = self.dataset(scope)?;
        let result = ops::lookup(&table, lookup_col, needle, return_col)?;
        let count = result.count();
        let result = match result {
            LookupResult::Rows(rows) => Value::Array(rows.to_json_rows()),
            LookupResult::Values(values) => {
                Value::Array(values.iter().map(|c| c.to_json()).collect())
            }
        };
        Ok(LookupSummary { result, count })
    }

    /// Case-insensitive search across every column.
    pub fn search(&self, scope: &str, needle: &str) -> EngineResult<AnalysisSummary> {
        let table = self.dataset(scope)?;
        let hits = ops::global_search(&table, needle);
        Ok(AnalysisSummary {
            count: hits.len(),
            rows: hits.to_json_rows(),
        })
    }

    pub fn export_search(&self, scope: &str, needle: &str) -> EngineResult<ExportPayload> {
        let table = self.dataset(scope)?;
        let hits = ops::global_search(&table, needle);
        Ok(export::workbook_single(
            &hits,
            "Search Results",
            "search_results.xlsx",
        )?)
    }

    /// Filter the stored dataset on one column.
    pub fn filter(
        &self,
        scope: &str,
        column: &str,
        value: &str,
        exact: bool,
    ) -> EngineResult<AnalysisSummary> {
        let table = self.dataset(scope)?;
        let mode = if exact { FilterMode::Exact } else { FilterMode::Contains };
        let hits = ops::filter_by_column(&table, column, value, mode)?;
        Ok(AnalysisSummary {
            count: hits.len(),
            rows: hits.to_json_rows(),
        })
    }

    pub fn export_filtered(
        &self,
        scope: &str,
        column: &str,
        value: &str,
        exact: bool,
    ) -> EngineResult<ExportPayload> {
        let table = self.dataset(scope)?;
        let mode = if exact { FilterMode::Exact } else { FilterMode::Contains };
        let hits = ops::filter_by_column(&table, column, value, mode)?;
        let filename = format!(
            "filtered_{}_{}.xlsx",
            sanitize_component(column),
            sanitize_component(value)
        );
        Ok(export::workbook_single(&hits, "Filtered Data", &filename)?)
    }

    /// Pivot the stored dataset.
    pub fn pivot(
        &self,
        scope: &str,
        index: &str,
        pivot: Option<&str>,
        values: &str,
        aggregate: Option<&str>,
    ) -> EngineResult<PivotSummary> {
        let table = self.dataset(scope)?;
        let agg = Aggregate::parse(aggregate)?;
        let result = ops::pivot_table(&table, index, pivot, values, agg)?;
        Ok(PivotSummary {
            headers: result.columns().to_vec(),
            rows: result.to_json_rows(),
            index: index.to_string(),
            pivot: pivot.map(String::from),
            values: values.to_string(),
            aggregate: agg.name().to_string(),
        })
    }

    pub fn export_pivot(
        &self,
        scope: &str,
        index: &str,
        pivot: Option<&str>,
        values: &str,
        aggregate: Option<&str>,
    ) -> EngineResult<ExportPayload> {
        let table = self.dataset(scope)?;
        let agg = Aggregate::parse(aggregate)?;
        let result = ops::pivot_table(&table, index, pivot, values, agg)?;
        Ok(export::workbook_single(
            &result,
            "Pivot Table",
            "pivot_table.xlsx",
        )?)
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Compare two uploads on one key column each and store the full
    /// result for export.
    pub fn compare(
        &self,
        scope: &str,
        first: &Upload,
        first_key: &str,
        second: &Upload,
        second_key: &str,
    ) -> EngineResult<ComparisonSummary> {
        // Clear before loading: a failed attempt leaves the slot empty.
        self.store.clear(scope, KIND_COMPARISON)?;

        let table_first = self.load(first)?;
        let table_second = self.load(second)?;

        log_info(format!(
            "Comparing on \"{}\" / \"{}\"...",
            first_key, second_key
        ));
        let result = ops::compare_tables(&table_first, first_key, &table_second, second_key)?;

        let stats = ComparisonStats {
            common: result.common_in_first.len(),
            unique_in_first: result.unique_in_first.len(),
            unique_in_second: result.unique_in_second.len(),
        };
        log_success(format!(
            "{} common, {} unique in first, {} unique in second",
            stats.common, stats.unique_in_first, stats.unique_in_second
        ));

        let blob = json!({
            "common_in_first": result.common_in_first.to_json_rows(),
            "common_in_second": result.common_in_second.to_json_rows(),
            "unique_in_first": result.unique_in_first.to_json_rows(),
            "unique_in_second": result.unique_in_second.to_json_rows(),
            "filenames": { "file1": first.filename, "file2": second.filename },
            "columns": { "file1": first_key, "file2": second_key },
            "stats": {
                "common": stats.common,
                "unique_in_first": stats.unique_in_first,
                "unique_in_second": stats.unique_in_second,
            },
            "all_columns": {
                "file1": table_first.columns(),
                "file2": table_second.columns(),
            },
        });
        self.store.put(scope, KIND_COMPARISON, &blob)?;

        Ok(ComparisonSummary {
            common_in_first: self.preview(&result.common_in_first),
            common_in_second: self.preview(&result.common_in_second),
            unique_in_first: self.preview(&result.unique_in_first),
            unique_in_second: self.preview(&result.unique_in_second),
            stats,
            columns_first: table_first.columns().to_vec(),
            columns_second: table_second.columns().to_vec(),
        })
    }

    /// Export the stored comparison as a multi-sheet workbook. Empty
    /// subsets get no sheet.
    pub fn export_comparison(&self, scope: &str) -> EngineResult<ExportPayload> {
        let blob = self
            .store
            .get(scope, KIND_COMPARISON)?
            .ok_or(EngineError::NoStoredData("comparison"))?;

        let first_cols = string_list(&blob["all_columns"]["file1"]);
        let second_cols = string_list(&blob["all_columns"]["file2"]);
        let subset = |key: &str, cols: &[String]| {
            Table::from_json_rows(
                cols.to_vec(),
                blob[key].as_array().map(Vec::as_slice).unwrap_or(&[]),
            )
        };

        let common_first = subset("common_in_first", &first_cols);
        let common_second = subset("common_in_second", &second_cols);
        let unique_first = subset("unique_in_first", &first_cols);
        let unique_second = subset("unique_in_second", &second_cols);

        Ok(export::workbook_multi(
            &[
                ("Common in First", &common_first),
                ("Common in Second", &common_second),
                ("Unique in First", &unique_first),
                ("Unique in Second", &unique_second),
            ],
            "comparison_results.xlsx",
        )?)
    }

    // =========================================================================
    // Merge
    // =========================================================================

    /// Merge two or more uploads on their common columns and store the
    /// result for export.
    pub fn merge(&self, scope: &str, uploads: &[Upload]) -> EngineResult<MergeSummary> {
        // Clear before validating inputs, like compare.
        self.store.clear(scope, KIND_MERGED)?;

        if uploads.len() < 2 {
            return Err(OpError::InsufficientInputs {
                needed: 2,
                got: uploads.len(),
            }
            .into());
        }

        let mut tables = Vec::with_capacity(uploads.len());
        for upload in uploads {
            tables.push(self.load(upload)?);
        }

        let merged = ops::merge_tables(&tables)?;
        let stats = MergeStats {
            files: uploads.len(),
            rows: merged.len(),
            columns: merged.width(),
        };
        log_success(format!(
            "Merged {} files into {} rows over {} common columns",
            stats.files, stats.rows, stats.columns
        ));

        let filenames: Vec<String> = uploads.iter().map(|u| u.filename.clone()).collect();
        let blob = json!({
            "filenames": filenames,
            "columns": merged.columns(),
            "merged_data": merged.to_json_rows(),
            "stats": { "files": stats.files, "rows": stats.rows, "columns": stats.columns },
        });
        self.store.put(scope, KIND_MERGED, &blob)?;

        Ok(MergeSummary {
            filenames,
            columns: merged.columns().to_vec(),
            preview: self.preview(&merged),
            stats,
        })
    }

    /// Export the stored merge result as a single-sheet workbook.
    pub fn export_merged(&self, scope: &str) -> EngineResult<ExportPayload> {
        let blob = self
            .store
            .get(scope, KIND_MERGED)?
            .ok_or(EngineError::NoStoredData("merged"))?;
        let columns = string_list(&blob["columns"]);
        let table = Table::from_json_rows(
            columns,
            blob["merged_data"].as_array().map(Vec::as_slice).unwrap_or(&[]),
        );
        Ok(export::workbook_single(
            &table,
            "Merged Data",
            "merged_data.xlsx",
        )?)
    }

    // =========================================================================
    // Split and convert
    // =========================================================================

    /// Split an upload into one workbook per group and package them as a
    /// zip archive. No session slot: the archive is the whole result.
    pub fn split(
        &self,
        upload: &Upload,
        primary: &str,
        secondary: Option<&str>,
    ) -> EngineResult<ExportPayload> {
        let table = self.load(upload)?;
        let groups = ops::split_by_groups(&table, primary, secondary)?;
        log_success(format!("Split into {} parts", groups.len()));
        Ok(export::zip_of_workbooks(&groups, "split_files.zip")?)
    }

    /// Convert an upload to another tabular format.
    pub fn convert(&self, upload: &Upload, target: &str) -> EngineResult<ExportPayload> {
        let table = self.load(upload)?;
        match target.to_lowercase().as_str() {
            "csv" => Ok(export::csv_payload(&table, "converted_file.csv")?),
            "xlsx" => Ok(export::workbook_single(
                &table,
                "Sheet1",
                "converted_file.xlsx",
            )?),
            other => Err(EngineError::ConversionFailed(format!(
                "conversion to '{}' is not supported",
                other
            ))),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Rows identical to an earlier row, over all columns.
fn count_duplicate_rows(table: &Table) -> usize {
    use std::collections::HashSet;
    let mut seen = HashSet::new();
    let mut duplicates = 0;
    for row in table.rows() {
        let key: Vec<_> = row.iter().map(|c| c.group_key()).collect();
        if !seen.insert(key) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Rebuild a table from a stored blob's column-list and row-list fields.
fn table_from_blob(blob: &Value, columns_key: &str, rows_key: &str) -> Table {
    Table::from_json_rows(
        string_list(&blob[columns_key]),
        blob[rows_key].as_array().map(Vec::as_slice).unwrap_or(&[]),
    )
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// Path-safe filename component, the way upload filenames are sanitized.
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SlotState;
    use tempfile::tempdir;

    fn engine(dir: &std::path::Path) -> Engine {
        crate::logs::LOG_SINK.set_quiet(true);
        Engine::new(Config {
            data_dir: dir.join("results"),
            spool_dir: std::env::temp_dir(),
            preview_rows: 20,
        })
    }

    fn csv_upload(name: &str, content: &str) -> Upload {
        Upload::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_upload_dataset_and_analyze() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        let summary = engine
            .upload_dataset(
                "s1",
                &csv_upload("people.csv", "id,name\n1,Alice\n2,Bob\n2,Bob"),
            )
            .unwrap();
        assert_eq!(summary.stats.rows, 3);
        assert_eq!(summary.stats.duplicates, 1);

        let dup = engine.find_duplicates("s1", "id").unwrap();
        assert_eq!(dup.count, 2);

        let hits = engine.search("s1", "alice").unwrap();
        assert_eq!(hits.count, 1);

        let looked = engine.lookup("s1", "id", "2", Some("name")).unwrap();
        assert_eq!(looked.count, 2);
        assert_eq!(looked.result, json!(["Bob", "Bob"]));
    }

    #[test]
    fn test_analysis_without_dataset_fails() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let err = engine.search("s1", "x").unwrap_err();
        assert!(err.to_string().contains("No dataset data available"));
    }

    #[test]
    fn test_compare_stores_and_exports() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        let summary = engine
            .compare(
                "s1",
                &csv_upload("a.csv", "id,name\n1,x\n2,y"),
                "id",
                &csv_upload("b.csv", "id,val\n2,9\n3,7"),
                "id",
            )
            .unwrap();

        assert_eq!(summary.stats.common, 1);
        assert_eq!(summary.common_in_first, vec![json!({"id": 2, "name": "y"})]);
        assert_eq!(summary.unique_in_second, vec![json!({"id": 3, "val": 7})]);
        assert_eq!(
            engine.store().state("s1", KIND_COMPARISON),
            SlotState::Ready
        );

        let payload = engine.export_comparison("s1").unwrap();
        assert_eq!(payload.filename, "comparison_results.xlsx");
        assert!(!payload.bytes.is_empty());
    }

    #[test]
    fn test_failed_compare_leaves_slot_idle() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        engine
            .compare(
                "s1",
                &csv_upload("a.csv", "id\n1"),
                "id",
                &csv_upload("b.csv", "id\n1"),
                "id",
            )
            .unwrap();
        assert_eq!(engine.store().state("s1", KIND_COMPARISON), SlotState::Ready);

        // Retry against a missing column: slot must end up empty, not stale.
        let err = engine
            .compare(
                "s1",
                &csv_upload("a.csv", "id\n1"),
                "nope",
                &csv_upload("b.csv", "id\n1"),
                "id",
            )
            .unwrap_err();
        assert_eq!(err.kind(), "ColumnNotFound");
        assert_eq!(engine.store().state("s1", KIND_COMPARISON), SlotState::Idle);
        assert!(engine.export_comparison("s1").is_err());
    }

    #[test]
    fn test_merge_flow() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());

        let summary = engine
            .merge(
                "s1",
                &[
                    csv_upload("one.csv", "b,a,c\n1,2,3"),
                    csv_upload("two.csv", "a,b\n4,5"),
                ],
            )
            .unwrap();

        assert_eq!(summary.columns, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(summary.stats.rows, 2);

        let payload = engine.export_merged("s1").unwrap();
        assert_eq!(payload.filename, "merged_data.xlsx");
    }

    #[test]
    fn test_merge_requires_two_files() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let err = engine
            .merge("s1", &[csv_upload("one.csv", "a\n1")])
            .unwrap_err();
        assert_eq!(err.kind(), "InsufficientInputs");
    }

    #[test]
    fn test_pivot_flow() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        engine
            .upload_dataset(
                "s1",
                &csv_upload(
                    "sales.csv",
                    "region,quarter,amount\nWest,Q1,10\nWest,Q2,20\nEast,Q1,5",
                ),
            )
            .unwrap();

        let pivot = engine
            .pivot("s1", "region", Some("quarter"), "amount", None)
            .unwrap();
        assert_eq!(pivot.aggregate, "sum");
        assert_eq!(pivot.headers, vec!["region", "Q1", "Q2", "Total"]);
        assert_eq!(
            pivot.rows[0],
            json!({"region": "East", "Q1": 5, "Q2": 0, "Total": 5})
        );
        assert_eq!(
            pivot.rows[2],
            json!({"region": "Total", "Q1": 15, "Q2": 20, "Total": 35})
        );

        let payload = engine
            .export_pivot("s1", "region", None, "amount", Some("mean"))
            .unwrap();
        assert_eq!(payload.filename, "pivot_table.xlsx");
    }

    #[test]
    fn test_split_flow() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let payload = engine
            .split(
                &csv_upload("data.csv", "region,v\nEast/Coast,1\nWest,2"),
                "region",
                None,
            )
            .unwrap();
        assert_eq!(payload.filename, "split_files.zip");
        assert_eq!(payload.content_type, "application/zip");
    }

    #[test]
    fn test_convert_flow() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        let upload = csv_upload("data.csv", "a,b\n1,2");

        let csv = engine.convert(&upload, "csv").unwrap();
        assert_eq!(csv.filename, "converted_file.csv");

        let xlsx = engine.convert(&upload, "xlsx").unwrap();
        assert_eq!(xlsx.filename, "converted_file.xlsx");

        let err = engine.convert(&upload, "pdf").unwrap_err();
        assert_eq!(err.kind(), "ConversionFailed");
    }

    #[test]
    fn test_filter_and_export_names() {
        let dir = tempdir().unwrap();
        let engine = engine(dir.path());
        engine
            .upload_dataset("s1", &csv_upload("d.csv", "city\nOslo\nParis"))
            .unwrap();

        let hits = engine.filter("s1", "city", "oslo", false).unwrap();
        assert_eq!(hits.count, 1);
        let none = engine.filter("s1", "city", "oslo", true).unwrap();
        assert_eq!(none.count, 0);

        let payload = engine
            .export_filtered("s1", "city", "Oslo fjord", true)
            .unwrap();
        assert_eq!(payload.filename, "filtered_city_Oslo_fjord.xlsx");
    }
}
