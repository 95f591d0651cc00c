//! Row ordering.
//!
//! Comparison dispatches on the kind of the extracted cell:
//!
//! | Kind | Key |
//! |------|-----|
//! | checkbox | 0 / 1 |
//! | number | parsed float |
//! | date, datetime | parsed timestamp |
//! | everything else | text (or joined list), natural order |
//!
//! A value that is missing or fails to parse is *absent*. Absent rows always
//! sort after present rows, in both directions; two absent rows tie and keep
//! their relative order.

use super::column::{find_column, Column};
use super::extract::extract;
use super::value::{CellValue, ValueKind};
use crate::model::Row;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// Persisted as `{column_id, direction}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub column_id: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

fn sort_key(cell: &CellValue) -> Option<SortKey> {
    match cell.kind() {
        ValueKind::Checkbox => cell
            .boolean()
            .map(|b| SortKey::Number(if b { 1.0 } else { 0.0 })),
        ValueKind::Number => cell
            .text()
            .and_then(|t| t.trim().parse::<f64>().ok())
            .filter(|n| !n.is_nan())
            .map(SortKey::Number),
        ValueKind::Date | ValueKind::Datetime => cell
            .text()
            .and_then(parse_timestamp)
            .map(|millis| SortKey::Number(millis as f64)),
        _ => {
            let text = match cell.text() {
                Some(t) => t.to_string(),
                None => cell.items().join(", "),
            };
            (!text.trim().is_empty()).then_some(SortKey::Text(text))
        }
    }
}

/// Parse a date or datetime into epoch milliseconds. Naive values are UTC.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn compare_keys(left: &SortKey, right: &SortKey) -> Ordering {
    match (left, right) {
        (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
        (SortKey::Text(a), SortKey::Text(b)) => natural_cmp(a, b),
        // Mixed keys only happen if kinds disagree; numbers first.
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Compare two rows by one column in the given direction.
///
/// The direction only flips present-vs-present comparisons; absent values
/// stay last either way.
pub fn compare_rows(left: &Row, right: &Row, column: &Column, direction: SortDirection) -> Ordering {
    let left_key = sort_key(&extract(left, column));
    let right_key = sort_key(&extract(right, column));

    match (left_key, right_key) {
        (Some(a), Some(b)) => {
            let ord = compare_keys(&a, &b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending comparison.
pub fn compare(left: &Row, right: &Row, column: &Column) -> Ordering {
    compare_rows(left, right, column, SortDirection::Asc)
}

/// Stable sort by the first entry of `sorts`. Rows keep input order when
/// there is no sort or its column is gone.
pub fn sort_rows(rows: &mut [Row], columns: &[Column], sorts: &[Sort]) {
    let Some(sort) = sorts.first() else {
        return;
    };
    let Some(column) = find_column(columns, &sort.column_id) else {
        tracing::debug!(column = %sort.column_id, "sort column missing, keeping input order");
        return;
    };
    rows.sort_by(|a, b| compare_rows(a, b, column, sort.direction));
}

/// Natural, case-insensitive string order: digit runs compare by magnitude,
/// so `"item 2"` < `"item 10"`. Exact ties fall back to byte order.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut a = left.chars().peekable();
    let mut b = right.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let run_a = take_digits(&mut a);
                let run_b = take_digits(&mut b);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }

    left.cmp(right)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
}
