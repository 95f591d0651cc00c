//! # Domain Model: Documents and Rows
//!
//! A database view never owns data. Every row is a snapshot derived from one
//! document in the store:
//!
//! ```text
//! Projects/alpha.md            Row
//! ---                          ├── id:         "Projects/alpha.md"
//! title: Alpha                 ├── title:      "Alpha"
//! tags: [swift, ios]           ├── tags:       ["swift", "ios"]
//! status: Doing                ├── properties: {status: text "Doing",
//! estimate: 3                  │                estimate: number "3"}
//! ---                          ├── created / updated
//! Body text...                 Document.body:  "Body text..."
//! ```
//!
//! Rows are immutable snapshots: a reload produces a fresh set. The only
//! in-place changes are the optimistic updates applied by the API facade
//! after a cell edit or row creation.
//!
//! Row ids are store-relative paths with `/` separators; the parent folder of
//! a root-level document is `""`.

use crate::view::value::{CellValue, ValueKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property as stored in document metadata: `{kind, text?, bool?, list?}`.
///
/// The stored kind is whatever the store inferred or last wrote; it may
/// differ from the kind a column declares for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "bool", default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<String>,
}

impl PropertyValue {
    pub fn from_text(kind: ValueKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Some(text.into()),
            boolean: None,
            list: Vec::new(),
        }
    }

    pub fn from_bool(value: bool) -> Self {
        Self {
            kind: ValueKind::Checkbox,
            text: None,
            boolean: Some(value),
            list: Vec::new(),
        }
    }

    pub fn from_list(kind: ValueKind, items: Vec<String>) -> Self {
        Self {
            kind,
            text: None,
            boolean: None,
            list: items,
        }
    }

    /// A property with a kind but no value.
    pub fn unset(kind: ValueKind) -> Self {
        Self {
            kind,
            text: None,
            boolean: None,
            list: Vec::new(),
        }
    }

    /// Read this stored value as a cell of `kind`, coercing across slots
    /// when the stored kind differs.
    pub fn to_cell(&self, kind: ValueKind) -> CellValue {
        CellValue::coerce(kind, self.text.as_deref(), self.boolean, &self.list)
    }

    /// The stored form of a cell. Only the cell's authoritative slot is kept.
    pub fn from_cell(cell: &CellValue) -> Self {
        Self {
            kind: cell.kind(),
            text: cell.text().map(str::to_string),
            boolean: cell.boolean(),
            list: cell.items().to_vec(),
        }
    }
}

/// One table row, derived from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// The document path; stable across reloads.
    pub id: String,
    pub title: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Row {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            created: now,
            updated: now,
            tags: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_timestamps(mut self, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.created = created;
        self.updated = updated;
        self
    }

    /// The folder containing this row's document.
    pub fn folder(&self) -> &str {
        parent_folder(&self.id)
    }
}

/// A full document: its row snapshot plus the body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub row: Row,
    pub body: String,
    /// True when the document's metadata carries a database view.
    pub owns_view: bool,
}

impl Document {
    pub fn new(row: Row, body: impl Into<String>) -> Self {
        Self {
            row,
            body: body.into(),
            owns_view: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.row.id
    }
}

/// Parent folder of a store-relative path (`""` for the root).
pub fn parent_folder(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Normalize a user-supplied folder: forward slashes, no leading `./` or
/// surrounding slashes.
pub fn normalize_folder(folder: &str) -> String {
    let replaced = folder.replace('\\', "/");
    let trimmed = replaced.trim().trim_start_matches("./").trim_matches('/');
    if trimmed == "." {
        String::new()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_folder_of_nested_and_root_paths() {
        assert_eq!(parent_folder("Projects/alpha.md"), "Projects");
        assert_eq!(parent_folder("a/b/c.md"), "a/b");
        assert_eq!(parent_folder("readme.md"), "");
    }

    #[test]
    fn normalize_folder_variants() {
        assert_eq!(normalize_folder("./Projects/"), "Projects");
        assert_eq!(normalize_folder("a\\b"), "a/b");
        assert_eq!(normalize_folder("."), "");
        assert_eq!(normalize_folder(""), "");
    }

    #[test]
    fn property_to_cell_coerces_to_requested_kind() {
        let stored = PropertyValue::from_text(ValueKind::Text, "yes");
        assert_eq!(
            stored.to_cell(ValueKind::Checkbox),
            CellValue::Checkbox(Some(true))
        );

        let stored = PropertyValue::from_list(ValueKind::List, vec!["a".into(), "b".into()]);
        assert_eq!(
            stored.to_cell(ValueKind::Text),
            CellValue::Text(Some("a, b".into()))
        );
    }

    #[test]
    fn property_from_cell_keeps_single_slot() {
        let prop = PropertyValue::from_cell(&CellValue::Number(Some("4".into())));
        assert_eq!(prop, PropertyValue::from_text(ValueKind::Number, "4"));

        let json = serde_json::to_string(&PropertyValue::from_bool(true)).unwrap();
        assert_eq!(json, r#"{"kind":"checkbox","bool":true}"#);
    }

    #[test]
    fn row_builders() {
        let row = Row::new("Work/a.md", "A")
            .with_tags(["x", "y"])
            .with_property("status", PropertyValue::from_text(ValueKind::Text, "Doing"));
        assert_eq!(row.folder(), "Work");
        assert_eq!(row.tags, vec!["x".to_string(), "y".to_string()]);
        assert!(row.properties.contains_key("status"));
    }
}
