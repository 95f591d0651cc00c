//! Kanban grouping.
//!
//! A board partitions rows into lanes by the values of one grouping column.
//! Only `tags` and `property` columns can be grouped by.
//!
//! Membership depends on the column kind:
//!
//! - **list / tags**: every element is a membership value, so a row can sit
//!   in several lanes at once.
//! - **checkbox**: `"false"` or `"true"`; an unset box goes to the empty lane.
//! - **anything else**: the trimmed scalar text, or the empty lane if blank.
//!
//! Checkbox boards always show `[false, true, empty]` in that order. Other
//! boards list lanes in first-seen order, with the empty lane appended last
//! even when no row needs it.
//!
//! Dropping a card is the write-side counterpart: [`drop_value`] computes the
//! cell a row should get when moved into a lane. For multi-value columns the
//! drop appends instead of replacing, so a card with several tags keeps them.

use super::column::{find_column, Column};
use super::extract::extract;
use super::filter::strip_tag;
use super::value::{CellValue, ValueKind};
use crate::model::Row;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Wire id of the empty lane. Cells may not hold this text, so a lane id
/// read back from the wire is never ambiguous.
pub const EMPTY_LANE: &str = "__empty__";

pub const EMPTY_LANE_LABEL: &str = "No value";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LaneId {
    Value(String),
    Empty,
}

impl LaneId {
    pub fn value(v: impl Into<String>) -> Self {
        LaneId::Value(v.into())
    }

    pub fn is_empty_lane(&self) -> bool {
        matches!(self, LaneId::Empty)
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneId::Value(v) => f.write_str(v),
            LaneId::Empty => f.write_str(EMPTY_LANE),
        }
    }
}

impl FromStr for LaneId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LaneId::from(s.to_string()))
    }
}

impl From<String> for LaneId {
    fn from(s: String) -> Self {
        if s == EMPTY_LANE {
            LaneId::Empty
        } else {
            LaneId::Value(s)
        }
    }
}

impl From<LaneId> for String {
    fn from(id: LaneId) -> Self {
        id.to_string()
    }
}

/// A computed grouping bucket. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub id: LaneId,
    pub label: String,
    pub rows: Vec<Row>,
}

impl Lane {
    fn new(id: LaneId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            rows: Vec::new(),
        }
    }

    fn empty() -> Self {
        Self::new(LaneId::Empty, EMPTY_LANE_LABEL)
    }

    pub fn card_count(&self) -> usize {
        self.rows.len()
    }
}

/// The lane values a row belongs to under `column`. Empty means the row
/// belongs to the empty lane.
pub fn membership(row: &Row, column: &Column) -> Vec<String> {
    let cell = extract(row, column);
    match cell {
        CellValue::Checkbox(state) => state.map(|b| b.to_string()).into_iter().collect(),
        CellValue::List(items) | CellValue::Tags(items) => {
            let mut values: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let item = item.trim();
                if !item.is_empty() && !values.iter().any(|v| v == item) {
                    values.push(item.to_string());
                }
            }
            values
        }
        scalar => scalar
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .into_iter()
            .collect(),
    }
}

/// Partition `rows` into lanes by the column `group_by`.
///
/// Returns no lanes when the column is missing or cannot be grouped by;
/// callers fall back to a table.
pub fn group_rows(rows: &[Row], columns: &[Column], group_by: &str) -> Vec<Lane> {
    let Some(column) = find_column(columns, group_by) else {
        tracing::debug!(column = %group_by, "grouping column missing, no lanes");
        return Vec::new();
    };
    if !column.column_type.is_groupable() {
        tracing::debug!(column = %group_by, "column is not groupable, no lanes");
        return Vec::new();
    }

    let mut lanes: Vec<Lane> = if column.kind() == ValueKind::Checkbox {
        vec![
            Lane::new(LaneId::value("false"), "Unchecked"),
            Lane::new(LaneId::value("true"), "Checked"),
        ]
    } else {
        Vec::new()
    };
    let mut empty = Lane::empty();

    for row in rows {
        let values = membership(row, column);
        if values.is_empty() {
            empty.rows.push(row.clone());
            continue;
        }
        for value in values {
            let idx = match lanes.iter().position(|l| l.id == LaneId::Value(value.clone())) {
                Some(idx) => idx,
                None => {
                    lanes.push(Lane::new(LaneId::Value(value.clone()), value));
                    lanes.len() - 1
                }
            };
            lanes[idx].rows.push(row.clone());
        }
    }

    lanes.push(empty);
    lanes
}

/// Whether writing `value` would put a row in a lane whose id reads back as
/// the empty lane.
pub fn holds_reserved_lane(value: &CellValue) -> bool {
    let reserved = |t: &str| strip_tag(t) == EMPTY_LANE;
    value.text().is_some_and(reserved) || value.items().iter().any(|t| reserved(t.as_str()))
}

/// Whether `row` shows up in lane `lane` under `column`.
pub fn has_lane(row: &Row, column: &Column, lane: &LaneId) -> bool {
    let values = membership(row, column);
    match lane {
        LaneId::Empty => values.is_empty(),
        LaneId::Value(v) => values.iter().any(|m| m == v),
    }
}

/// The cell `row` should hold after being dropped onto `target`.
///
/// Multi-value columns append (or clear, for the empty lane). Single-value
/// columns replace.
pub fn drop_value(row: &Row, column: &Column, target: &LaneId) -> CellValue {
    let kind = column.kind();
    if kind.is_multi_value() {
        return match target {
            LaneId::Empty => clear_membership(kind),
            LaneId::Value(v) => append_membership(row, column, v),
        };
    }

    match (kind, target) {
        (ValueKind::Checkbox, LaneId::Empty) => CellValue::Checkbox(None),
        (ValueKind::Checkbox, LaneId::Value(v)) => CellValue::Checkbox(Some(v == "true")),
        (_, LaneId::Empty) => CellValue::empty(kind),
        (_, LaneId::Value(v)) => CellValue::scalar(kind, Some(v.clone())),
    }
}

/// The row's current list with `value` added if it is not already there.
pub fn append_membership(row: &Row, column: &Column, value: &str) -> CellValue {
    let mut items = extract(row, column).items().to_vec();
    if !items.iter().any(|i| i.trim() == value) {
        items.push(value.to_string());
    }
    CellValue::list(column.kind(), items)
}

/// An empty list of `kind`.
pub fn clear_membership(kind: ValueKind) -> CellValue {
    CellValue::list(kind, Vec::new())
}
