//! Table transform operations.
//!
//! Every operation is a single pass over in-memory tables: key-based
//! comparison, column-aligned merging, grouped splitting, pivot
//! aggregation, and the dataset analysis suite (duplicates, lookup, search,
//! filter). Operations never mutate their inputs.

pub mod analysis;
pub mod compare;
pub mod merge;
pub mod pivot;
pub mod split;

pub use analysis::{duplicates, filter_by_column, global_search, lookup, FilterMode, LookupResult};
pub use compare::{compare_tables, Comparison};
pub use merge::merge_tables;
pub use pivot::{pivot_table, Aggregate};
pub use split::split_by_groups;
