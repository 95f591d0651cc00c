//! Persisted view configuration.
//!
//! A [`ViewConfig`] is the only state a database view persists. The engine
//! treats it as an immutable snapshot: edits always produce a complete new
//! configuration that replaces the old one.

use super::column::{Column, ColumnType};
use super::filter::{fold_tag, strip_tag, Filter};
use super::sort::Sort;
use crate::error::{NotedbError, Result};
use crate::model::{normalize_folder, parent_folder, Document, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Which documents become rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    Folder {
        path: String,
        #[serde(default)]
        recursive: bool,
    },
    Tag {
        tag: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scope: Option<String>,
    },
    Search {
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scope: Option<String>,
    },
}

impl Source {
    pub fn folder(path: &str) -> Self {
        Source::Folder {
            path: normalize_folder(path),
            recursive: false,
        }
    }

    /// Whether `doc` is a row of this source. Documents that own a view are
    /// never rows.
    pub fn selects(&self, doc: &Document) -> bool {
        if doc.owns_view {
            return false;
        }
        match self {
            Source::Folder { path, recursive } => {
                let folder = parent_folder(doc.id());
                let path = normalize_folder(path);
                if *recursive {
                    in_scope(doc.id(), &path)
                } else {
                    folder == path
                }
            }
            Source::Tag { tag, scope } => {
                let wanted = fold_tag(tag);
                scope_allows(scope, doc)
                    && !wanted.is_empty()
                    && doc
                        .row
                        .tags
                        .iter()
                        .any(|t| fold_tag(t) == wanted)
            }
            Source::Search { query, scope } => {
                let needle = query.trim().to_lowercase();
                scope_allows(scope, doc)
                    && (needle.is_empty()
                        || doc.row.title.to_lowercase().contains(&needle)
                        || doc.body.to_lowercase().contains(&needle))
            }
        }
    }

    /// The folder a folder source points at.
    pub fn folder_path(&self) -> Option<&str> {
        match self {
            Source::Folder { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Folder { path, recursive } => {
                let shown = if path.is_empty() { "." } else { path.as_str() };
                write!(f, "folder {}", shown)?;
                if *recursive {
                    f.write_str(" (recursive)")?;
                }
                Ok(())
            }
            Source::Tag { tag, scope } => {
                write!(f, "tag #{}", strip_tag(tag))?;
                scope.iter().try_for_each(|s| write!(f, " in {}", s))
            }
            Source::Search { query, scope } => {
                write!(f, "search \"{}\"", query)?;
                scope.iter().try_for_each(|s| write!(f, " in {}", s))
            }
        }
    }
}

fn scope_allows(scope: &Option<String>, doc: &Document) -> bool {
    match scope {
        Some(scope) => in_scope(doc.id(), &normalize_folder(scope)),
        None => true,
    }
}

/// True when `id` lives in `folder` or any folder below it.
fn in_scope(id: &str, folder: &str) -> bool {
    folder.is_empty()
        || id
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Table,
    Board,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Table => f.write_str("table"),
            Layout::Board => f.write_str("board"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Layout::Table),
            "board" => Ok(Layout::Board),
            other => Err(format!("unknown layout '{}'", other)),
        }
    }
}

/// Where new rows are created and how they are titled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewRowDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default)]
    pub title_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub source: Source,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub sorts: Vec<Sort>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(default)]
    pub new_rows: NewRowDefaults,
}

impl ViewConfig {
    /// Defaults for a folder that is being turned into a database: the
    /// built-in title/tags/updated columns, then one column per property key
    /// found in `rows` (see [`discover_property_columns`] for the order).
    pub fn for_folder(path: &str, rows: &[Row]) -> Self {
        let path = normalize_folder(path);
        let mut columns = vec![Column::title(), Column::tags(), Column::updated()];
        columns.extend(discover_property_columns(rows, &columns));

        Self {
            source: Source::folder(&path),
            columns,
            sorts: Vec::new(),
            filters: Vec::new(),
            layout: Layout::Table,
            group_by: None,
            new_rows: NewRowDefaults {
                folder: Some(path),
                title_prefix: String::new(),
            },
        }
    }

    /// Reject configurations the engine cannot evaluate consistently.
    /// Dangling references are allowed; they degrade at evaluation time.
    pub fn validate(&self) -> Result<()> {
        if self.sorts.len() > 1 {
            return Err(NotedbError::InvalidConfig(format!(
                "at most one sort is supported, got {}",
                self.sorts.len()
            )));
        }
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.id.trim().is_empty() {
                return Err(NotedbError::InvalidConfig("column with empty id".into()));
            }
            if !seen.insert(column.id.as_str()) {
                return Err(NotedbError::InvalidConfig(format!(
                    "duplicate column id '{}'",
                    column.id
                )));
            }
        }
        Ok(())
    }

    pub fn active_sort(&self) -> Option<&Sort> {
        self.sorts.first()
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        super::column::find_column(&self.columns, id)
    }

    /// Folder that receives new rows.
    pub fn new_row_folder(&self) -> String {
        self.new_rows
            .folder
            .as_deref()
            .or_else(|| self.source.folder_path())
            .map(normalize_folder)
            .unwrap_or_default()
    }
}

/// Property columns for keys present in `rows` but not covered by
/// `existing`. Kind is taken from the first row that has the key.
///
/// Keys come out in row order. Within one row they are alphabetical, since
/// `Row::properties` is keyed by name and does not remember where a key sat
/// in the frontmatter.
pub fn discover_property_columns(rows: &[Row], existing: &[Column]) -> Vec<Column> {
    let mut covered: HashSet<String> = existing
        .iter()
        .filter_map(|c| match &c.column_type {
            ColumnType::Property { key, .. } => Some(key.clone()),
            _ => None,
        })
        .collect();
    let taken_ids: HashSet<&str> = existing.iter().map(|c| c.id.as_str()).collect();

    let mut found = Vec::new();
    for row in rows {
        for (key, value) in &row.properties {
            if covered.insert(key.clone()) {
                let mut column = Column::property(key.clone(), value.kind);
                if taken_ids.contains(key.as_str()) {
                    column.id = format!("prop:{}", key);
                }
                found.push(column);
            }
        }
    }
    found
}
