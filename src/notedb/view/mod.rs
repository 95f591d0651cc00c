//! # Database View Engine
//!
//! Turns a set of documents into a typed, virtual table. Nothing is indexed
//! or cached: every read rebuilds the table from the row snapshot it is given.
//!
//! ```text
//! rows ─► extract ─► filter ─► sort ─────► table
//!                      │
//!                      └─────► group ────► board lanes
//!
//! cell edit ─► cell_patch ─► MetadataPatch ─► store
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`value`] | `CellValue` and `ValueKind` |
//! | [`column`] | column types, kinds, wire format |
//! | [`extract`] | `(row, column) -> CellValue` |
//! | [`filter`] | column-scoped predicates, ANDed |
//! | [`sort`] | kind-aware comparator, absent values last |
//! | [`board`] | lanes, membership, card drops |
//! | [`config`] | the persisted `ViewConfig` snapshot |
//! | [`patch`] | cell edit to metadata patch |
//!
//! The engine is infallible: a missing column, property or unparsable value
//! degrades to an empty cell, a passing filter, an absent sort key or an
//! empty lane list. Only the store can fail.
//!
//! ## Usage
//!
//! ```ignore
//! let rows = filter_rows(rows, &config.columns, &config.filters);
//! let lanes = group_rows(&rows, &config.columns, "status");
//! let cell = drop_value(&row, status_column, &LaneId::value("Done"));
//! let patch = cell_patch(status_column, &cell);
//! ```

pub mod board;
pub mod column;
pub mod config;
pub mod extract;
pub mod filter;
pub mod patch;
pub mod sort;
pub mod value;

pub use board::{drop_value, group_rows, has_lane, membership, Lane, LaneId, EMPTY_LANE};
pub use column::{find_column, Column, ColumnType};
pub use config::{Layout, NewRowDefaults, Source, ViewConfig};
pub use extract::extract;
pub use filter::{filter_rows, matches_all, Filter, FilterOp};
pub use patch::{cell_patch, MetadataPatch};
pub use sort::{compare, compare_rows, sort_rows, Sort, SortDirection};
pub use value::{CellValue, ValueKind};
