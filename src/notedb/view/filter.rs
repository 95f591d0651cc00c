//! Row filtering.
//!
//! A view carries a list of [`Filter`]s, each scoped to one column. A row is
//! shown iff every filter matches (AND, no grouping or OR).
//!
//! Each cell is compared through two surfaces:
//!
//! - **text candidates**: the scalar text, the list joined with `", "`, and
//!   the boolean as `"true"`/`"false"`; case-folded, trimmed, blanks dropped
//! - **list candidates**: each list element, case-folded
//!
//! A filter whose column no longer exists passes. Editing the schema must
//! never hide the whole table behind a dangling filter.
//!
//! Numbers and dates are filtered as text.

use super::column::{find_column, Column};
use super::extract::extract;
use super::value::CellValue;
use crate::model::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Leading marker a tag may be written with.
pub const TAG_MARKER: char = '#';

/// Filter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Any candidate contains the operand as a substring.
    Contains,
    /// Any candidate equals the operand.
    Equals,
    IsEmpty,
    IsNotEmpty,
    /// Checkbox is checked. Non-checkbox cells never match.
    IsTrue,
    /// Checkbox is explicitly unchecked. Unset and non-checkbox cells never match.
    IsFalse,
    /// Every operand tag is one of the cell's list elements, ignoring a
    /// leading `#` on either side.
    TagsContains,
}

impl FilterOp {
    pub const ALL: [FilterOp; 7] = [
        FilterOp::Contains,
        FilterOp::Equals,
        FilterOp::IsEmpty,
        FilterOp::IsNotEmpty,
        FilterOp::IsTrue,
        FilterOp::IsFalse,
        FilterOp::TagsContains,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Contains => "contains",
            FilterOp::Equals => "equals",
            FilterOp::IsEmpty => "is_empty",
            FilterOp::IsNotEmpty => "is_not_empty",
            FilterOp::IsTrue => "is_true",
            FilterOp::IsFalse => "is_false",
            FilterOp::TagsContains => "tags_contains",
        }
    }

    /// Whether the operation reads an operand at all.
    pub fn takes_operand(self) -> bool {
        matches!(
            self,
            FilterOp::Contains | FilterOp::Equals | FilterOp::TagsContains
        )
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        FilterOp::ALL
            .into_iter()
            .find(|op| op.as_str() == wanted)
            .ok_or_else(|| format!("unknown filter operator '{}'", s))
    }
}

/// A predicate over one column.
///
/// Persisted as `{column_id, operator, value_text?, value_bool?, value_list}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub column_id: String,
    pub operator: FilterOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_bool: Option<bool>,
    #[serde(default)]
    pub value_list: Vec<String>,
}

impl Filter {
    pub fn new(column_id: impl Into<String>, operator: FilterOp) -> Self {
        Self {
            column_id: column_id.into(),
            operator,
            value_text: None,
            value_bool: None,
            value_list: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.value_text = Some(text.into());
        self
    }

    pub fn with_list(mut self, items: Vec<String>) -> Self {
        self.value_list = items;
        self
    }

    pub fn contains(column_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::Contains).with_text(text)
    }

    pub fn equals(column_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::Equals).with_text(text)
    }

    pub fn is_empty(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::IsEmpty)
    }

    pub fn is_not_empty(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::IsNotEmpty)
    }

    pub fn is_true(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::IsTrue)
    }

    pub fn is_false(column_id: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::IsFalse)
    }

    pub fn tags_contains(column_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(column_id, FilterOp::TagsContains).with_list(vec![tag.into()])
    }

    /// Check this filter against a row.
    ///
    /// Returns `true` when the filter's column is not in `columns`.
    pub fn matches(&self, row: &Row, columns: &[Column]) -> bool {
        let Some(column) = find_column(columns, &self.column_id) else {
            return true;
        };
        let cell = extract(row, column);
        let surfaces = Surfaces::of(&cell);

        match self.operator {
            FilterOp::Contains => {
                let needle = self.operand_text();
                needle.is_empty() || surfaces.any(|candidate| candidate.contains(&needle))
            }
            FilterOp::Equals => {
                let needle = self.operand_text();
                needle.is_empty() || surfaces.any(|candidate| candidate == needle)
            }
            FilterOp::IsEmpty => surfaces.is_empty(),
            FilterOp::IsNotEmpty => !surfaces.is_empty(),
            FilterOp::IsTrue => cell.boolean() == Some(true),
            FilterOp::IsFalse => cell.boolean() == Some(false),
            FilterOp::TagsContains => {
                let wanted = self.operand_tags();
                let have: Vec<String> = surfaces.list.iter().map(|t| fold_tag(t)).collect();
                wanted.iter().all(|tag| have.contains(tag))
            }
        }
    }

    /// Case-folded operand for `contains`/`equals`: the text, or the list
    /// joined when the text is blank.
    fn operand_text(&self) -> String {
        let text = self.value_text.as_deref().map(str::trim).unwrap_or("");
        if text.is_empty() {
            self.value_list.join(", ").trim().to_lowercase()
        } else {
            text.to_lowercase()
        }
    }

    /// Normalized operand tags: the list, or the text when the list is empty.
    fn operand_tags(&self) -> Vec<String> {
        let raw: Vec<&str> = if self.value_list.is_empty() {
            self.value_text.as_deref().into_iter().collect()
        } else {
            self.value_list.iter().map(String::as_str).collect()
        };
        raw.into_iter()
            .map(fold_tag)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Strip a tag's leading marker. Case is kept.
pub fn strip_tag(tag: &str) -> String {
    tag.trim().trim_start_matches(TAG_MARKER).trim().to_string()
}

/// Comparison form of a tag: marker stripped and case-folded.
pub fn fold_tag(tag: &str) -> String {
    strip_tag(tag).to_lowercase()
}

struct Surfaces {
    text: Vec<String>,
    list: Vec<String>,
}

impl Surfaces {
    fn of(cell: &CellValue) -> Self {
        let joined = (!cell.items().is_empty()).then(|| cell.items().join(", "));
        let rendered_bool = cell.boolean().map(|b| b.to_string());

        let text = [cell.text().map(str::to_string), joined, rendered_bool]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        let list = cell.items().iter().map(|s| s.to_lowercase()).collect();

        Self { text, list }
    }

    fn any(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.text
            .iter()
            .chain(self.list.iter())
            .any(|candidate| predicate(candidate))
    }

    /// No text, no list element, and (through the text surface) no boolean.
    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.list.is_empty()
    }
}

/// True iff the row passes every filter.
pub fn matches_all(row: &Row, columns: &[Column], filters: &[Filter]) -> bool {
    filters.iter().all(|f| f.matches(row, columns))
}

/// Keep the rows passing every filter, preserving order.
pub fn filter_rows(rows: Vec<Row>, columns: &[Column], filters: &[Filter]) -> Vec<Row> {
    if filters.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| matches_all(row, columns, filters))
        .collect()
}
