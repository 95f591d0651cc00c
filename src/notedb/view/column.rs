//! Column schema.
//!
//! A column is a named, typed lens into a row. Its [`ColumnType`] decides
//! where the value comes from and which [`ValueKind`] it has; the kind in turn
//! drives extraction, filtering, comparison and write-back.
//!
//! | Type | Kind | Editable | Groupable |
//! |------|------|----------|-----------|
//! | `title` | text | yes | no |
//! | `tags` | tags | yes | yes |
//! | `path` | text | no | no |
//! | `created` | datetime | no | no |
//! | `updated` | datetime | no | no |
//! | `property` | declared | yes | yes |

use super::value::ValueKind;
use serde::{Deserialize, Serialize};

/// Where a column reads its value from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Title,
    Tags,
    Path,
    Created,
    Updated,
    /// A key/value property from the document metadata.
    Property { key: String, kind: ValueKind },
}

impl ColumnType {
    /// The kind every cell of this column has.
    pub fn kind(&self) -> ValueKind {
        match self {
            ColumnType::Title | ColumnType::Path => ValueKind::Text,
            ColumnType::Created | ColumnType::Updated => ValueKind::Datetime,
            ColumnType::Tags => ValueKind::Tags,
            ColumnType::Property { kind, .. } => *kind,
        }
    }

    /// Whether edits to this column can be written back to the document.
    /// Path and timestamps are derived by the store.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            ColumnType::Title | ColumnType::Tags | ColumnType::Property { .. }
        )
    }

    /// Whether a board can be grouped by this column.
    pub fn is_groupable(&self) -> bool {
        matches!(self, ColumnType::Tags | ColumnType::Property { .. })
    }

    /// The wire name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Title => "title",
            ColumnType::Tags => "tags",
            ColumnType::Path => "path",
            ColumnType::Created => "created",
            ColumnType::Updated => "updated",
            ColumnType::Property { .. } => "property",
        }
    }

    pub fn property_key(&self) -> Option<&str> {
        match self {
            ColumnType::Property { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// One column of a database view.
///
/// `label`, `icon`, `width` and `visible` are presentation metadata; the
/// engine only looks at `id` and `column_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColumnWire", into = "ColumnWire")]
pub struct Column {
    pub id: String,
    pub column_type: ColumnType,
    pub label: String,
    pub icon: Option<String>,
    pub width: Option<u32>,
    pub visible: bool,
}

impl Column {
    pub fn new(id: impl Into<String>, column_type: ColumnType) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            column_type,
            icon: None,
            width: None,
            visible: true,
        }
    }

    pub fn title() -> Self {
        Self::new("title", ColumnType::Title).with_label("Title")
    }

    pub fn tags() -> Self {
        Self::new("tags", ColumnType::Tags).with_label("Tags")
    }

    pub fn path() -> Self {
        Self::new("path", ColumnType::Path).with_label("Path")
    }

    pub fn created() -> Self {
        Self::new("created", ColumnType::Created).with_label("Created")
    }

    pub fn updated() -> Self {
        Self::new("updated", ColumnType::Updated).with_label("Updated")
    }

    /// A property column whose id is the property key.
    pub fn property(key: impl Into<String>, kind: ValueKind) -> Self {
        let key = key.into();
        Self::new(
            key.clone(),
            ColumnType::Property {
                key: key.clone(),
                kind,
            },
        )
        .with_label(key)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn kind(&self) -> ValueKind {
        self.column_type.kind()
    }

    pub fn is_multi_value(&self) -> bool {
        self.kind().is_multi_value()
    }
}

/// Look up a column by id.
pub fn find_column<'a>(columns: &'a [Column], id: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.id == id)
}

/// Persisted shape:
/// `{id, type, label, icon?, width?, visible, property_key?, property_kind?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnWire {
    id: String,
    #[serde(rename = "type")]
    column_type: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    property_kind: Option<ValueKind>,
}

fn default_visible() -> bool {
    true
}

impl TryFrom<ColumnWire> for Column {
    type Error = String;

    fn try_from(wire: ColumnWire) -> Result<Self, Self::Error> {
        let column_type = match wire.column_type.as_str() {
            "title" => ColumnType::Title,
            "tags" => ColumnType::Tags,
            "path" => ColumnType::Path,
            "created" => ColumnType::Created,
            "updated" => ColumnType::Updated,
            "property" => {
                let key = wire
                    .property_key
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| format!("property column '{}' has no property_key", wire.id))?;
                ColumnType::Property {
                    key,
                    kind: wire.property_kind.unwrap_or_default(),
                }
            }
            other => return Err(format!("unknown column type '{}'", other)),
        };

        Ok(Column {
            id: wire.id,
            column_type,
            label: wire.label,
            icon: wire.icon,
            width: wire.width,
            visible: wire.visible,
        })
    }
}

impl From<Column> for ColumnWire {
    fn from(column: Column) -> Self {
        let (property_key, property_kind) = match &column.column_type {
            ColumnType::Property { key, kind } => (Some(key.clone()), Some(*kind)),
            _ => (None, None),
        };
        ColumnWire {
            id: column.id,
            column_type: column.column_type.name().to_string(),
            label: column.label,
            icon: column.icon,
            width: column.width,
            visible: column.visible,
            property_key,
            property_kind,
        }
    }
}
