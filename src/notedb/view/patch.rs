//! Write path: turning a cell edit into a metadata patch.
//!
//! The engine never writes documents. It only describes what should change;
//! the store applies the patch to the document's frontmatter.

use super::column::{Column, ColumnType};
use super::value::CellValue;
use crate::model::{PropertyValue, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum MetadataPatch {
    Title { title: String },
    Tags { tags: Vec<String> },
    Property { key: String, value: PropertyValue },
}

impl MetadataPatch {
    /// Apply this patch to an in-memory row snapshot.
    pub fn apply_to(&self, row: &mut Row) {
        match self {
            MetadataPatch::Title { title } => row.title = title.clone(),
            MetadataPatch::Tags { tags } => row.tags = tags.clone(),
            MetadataPatch::Property { key, value } => {
                row.properties.insert(key.clone(), value.clone());
            }
        }
    }

    /// The name of the field this patch touches.
    pub fn target(&self) -> &str {
        match self {
            MetadataPatch::Title { .. } => "title",
            MetadataPatch::Tags { .. } => "tags",
            MetadataPatch::Property { key, .. } => key,
        }
    }
}

/// Describe writing `value` into `column`. Derived columns (path and
/// timestamps) have no patch.
///
/// The value is read through the column's kind first, so a mismatched cell
/// is stored in the column's shape.
pub fn cell_patch(column: &Column, value: &CellValue) -> Option<MetadataPatch> {
    let kind = column.kind();
    let value = if value.kind() == kind {
        value.clone()
    } else {
        CellValue::coerce(kind, value.text(), value.boolean(), value.items())
    };

    match &column.column_type {
        ColumnType::Title => Some(MetadataPatch::Title {
            title: value.text().map(str::trim).unwrap_or_default().to_string(),
        }),
        ColumnType::Tags => Some(MetadataPatch::Tags {
            tags: value.items().to_vec(),
        }),
        ColumnType::Property { key, .. } => Some(MetadataPatch::Property {
            key: key.clone(),
            value: PropertyValue::from_cell(&value),
        }),
        ColumnType::Path | ColumnType::Created | ColumnType::Updated => None,
    }
}
