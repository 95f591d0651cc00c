//! Cell value types.
//!
//! This module defines the runtime representation of a single table cell and
//! the closed set of value kinds a column can declare.
//!
//! A [`CellValue`] carries exactly one payload, chosen by its kind:
//!
//! | Kind | Payload | Wire slot |
//! |------|---------|-----------|
//! | `checkbox` | `Option<bool>` | `value_bool` |
//! | `list`, `tags` | `Vec<String>` | `value_list` |
//! | everything else | `Option<String>` | `value_text` |
//!
//! Because the payload is picked by the variant, a cell can never have more
//! than one slot set, and "unset" is always representable without a null cell.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of value a column (and therefore a cell) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    #[default]
    Text,
    Url,
    Number,
    Date,
    Datetime,
    Checkbox,
    List,
    Tags,
    Yaml,
}

impl ValueKind {
    pub const ALL: [ValueKind; 9] = [
        ValueKind::Text,
        ValueKind::Url,
        ValueKind::Number,
        ValueKind::Date,
        ValueKind::Datetime,
        ValueKind::Checkbox,
        ValueKind::List,
        ValueKind::Tags,
        ValueKind::Yaml,
    ];

    /// List and tags cells hold several values at once.
    pub fn is_multi_value(self) -> bool {
        matches!(self, ValueKind::List | ValueKind::Tags)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Url => "url",
            ValueKind::Number => "number",
            ValueKind::Date => "date",
            ValueKind::Datetime => "datetime",
            ValueKind::Checkbox => "checkbox",
            ValueKind::List => "list",
            ValueKind::Tags => "tags",
            ValueKind::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown value kind '{}'", s))
    }
}

/// The typed content of one (row, column) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CellValueWire", into = "CellValueWire")]
pub enum CellValue {
    Text(Option<String>),
    Url(Option<String>),
    Number(Option<String>),
    Date(Option<String>),
    Datetime(Option<String>),
    Yaml(Option<String>),
    Checkbox(Option<bool>),
    List(Vec<String>),
    Tags(Vec<String>),
}

impl CellValue {
    /// An unset cell of the given kind.
    pub fn empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Checkbox => CellValue::Checkbox(None),
            ValueKind::List => CellValue::List(Vec::new()),
            ValueKind::Tags => CellValue::Tags(Vec::new()),
            scalar => CellValue::scalar(scalar, None),
        }
    }

    /// Build a text-slot cell. Non-scalar kinds fall back to a coercion of
    /// the text into their own slot.
    pub fn scalar(kind: ValueKind, text: Option<String>) -> Self {
        match kind {
            ValueKind::Text => CellValue::Text(text),
            ValueKind::Url => CellValue::Url(text),
            ValueKind::Number => CellValue::Number(text),
            ValueKind::Date => CellValue::Date(text),
            ValueKind::Datetime => CellValue::Datetime(text),
            ValueKind::Yaml => CellValue::Yaml(text),
            ValueKind::Checkbox => CellValue::Checkbox(text.as_deref().and_then(parse_bool)),
            ValueKind::List => CellValue::List(text.as_deref().map(split_list).unwrap_or_default()),
            ValueKind::Tags => CellValue::Tags(text.as_deref().map(split_list).unwrap_or_default()),
        }
    }

    /// Build a list-slot cell for a multi-value kind.
    pub fn list(kind: ValueKind, items: Vec<String>) -> Self {
        match kind {
            ValueKind::Tags => CellValue::Tags(items),
            ValueKind::List => CellValue::List(items),
            other => CellValue::coerce(other, None, None, &items),
        }
    }

    /// Build a cell of `kind` from loosely-typed slots, falling back across
    /// slots when the authoritative one is missing.
    ///
    /// - checkbox: the bool, else the text read as a boolean word
    /// - list/tags: the list, else the text split on commas
    /// - scalars: the text, else the bool as `"true"`/`"false"`, else the
    ///   list joined with `", "`
    pub fn coerce(
        kind: ValueKind,
        text: Option<&str>,
        boolean: Option<bool>,
        list: &[String],
    ) -> Self {
        match kind {
            ValueKind::Checkbox => {
                CellValue::Checkbox(boolean.or_else(|| text.and_then(parse_bool)))
            }
            ValueKind::List | ValueKind::Tags => {
                let items = if !list.is_empty() {
                    list.to_vec()
                } else {
                    text.map(split_list).unwrap_or_default()
                };
                CellValue::list(kind, items)
            }
            scalar => {
                let text = text
                    .map(str::to_string)
                    .or_else(|| boolean.map(|b| b.to_string()))
                    .or_else(|| (!list.is_empty()).then(|| list.join(", ")));
                CellValue::scalar(scalar, text)
            }
        }
    }

    /// Parse user-entered text into a cell of the given kind.
    ///
    /// Blank input yields an unset cell. Checkbox accepts `true/false`,
    /// `yes/no`, `on/off` and `1/0`; list kinds split on commas.
    pub fn from_input(kind: ValueKind, input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellValue::empty(kind);
        }
        CellValue::coerce(kind, Some(trimmed), None, &[])
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            CellValue::Text(_) => ValueKind::Text,
            CellValue::Url(_) => ValueKind::Url,
            CellValue::Number(_) => ValueKind::Number,
            CellValue::Date(_) => ValueKind::Date,
            CellValue::Datetime(_) => ValueKind::Datetime,
            CellValue::Yaml(_) => ValueKind::Yaml,
            CellValue::Checkbox(_) => ValueKind::Checkbox,
            CellValue::List(_) => ValueKind::List,
            CellValue::Tags(_) => ValueKind::Tags,
        }
    }

    /// The `value_text` slot.
    pub fn text(&self) -> Option<&str> {
        match self {
            CellValue::Text(t)
            | CellValue::Url(t)
            | CellValue::Number(t)
            | CellValue::Date(t)
            | CellValue::Datetime(t)
            | CellValue::Yaml(t) => t.as_deref(),
            _ => None,
        }
    }

    /// The `value_bool` slot.
    pub fn boolean(&self) -> Option<bool> {
        match self {
            CellValue::Checkbox(b) => *b,
            _ => None,
        }
    }

    /// The `value_list` slot.
    pub fn items(&self) -> &[String] {
        match self {
            CellValue::List(items) | CellValue::Tags(items) => items,
            _ => &[],
        }
    }

    /// True when the authoritative slot holds nothing meaningful.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Checkbox(b) => b.is_none(),
            CellValue::List(items) | CellValue::Tags(items) => items.is_empty(),
            _ => self.text().map_or(true, |t| t.trim().is_empty()),
        }
    }

    /// Plain-text rendering used by display code.
    pub fn display(&self) -> String {
        match self {
            CellValue::Checkbox(Some(b)) => b.to_string(),
            CellValue::Checkbox(None) => String::new(),
            CellValue::List(items) | CellValue::Tags(items) => items.join(", "),
            _ => self.text().unwrap_or_default().to_string(),
        }
    }
}

/// Read a loose boolean word.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "x" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Wire shape of a cell: `{kind, value_text?, value_bool?, value_list}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CellValueWire {
    kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_bool: Option<bool>,
    #[serde(default)]
    value_list: Vec<String>,
}

impl From<CellValueWire> for CellValue {
    fn from(wire: CellValueWire) -> Self {
        CellValue::coerce(
            wire.kind,
            wire.value_text.as_deref(),
            wire.value_bool,
            &wire.value_list,
        )
    }
}

impl From<CellValue> for CellValueWire {
    fn from(cell: CellValue) -> Self {
        CellValueWire {
            kind: cell.kind(),
            value_text: cell.text().map(str::to_string),
            value_bool: cell.boolean(),
            value_list: cell.items().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_matches_kind() {
        for kind in ValueKind::ALL {
            let cell = CellValue::empty(kind);
            assert_eq!(cell.kind(), kind);
            assert!(cell.is_empty());
            assert_eq!(cell.text(), None);
            assert_eq!(cell.boolean(), None);
            assert!(cell.items().is_empty());
        }
    }

    #[test]
    fn only_authoritative_slot_is_set() {
        let cell = CellValue::coerce(
            ValueKind::Checkbox,
            Some("ignored"),
            Some(true),
            &["x".to_string()],
        );
        assert_eq!(cell.boolean(), Some(true));
        assert_eq!(cell.text(), None);
        assert!(cell.items().is_empty());
    }

    #[test]
    fn coerce_scalar_falls_back_to_bool_then_list() {
        let from_bool = CellValue::coerce(ValueKind::Text, None, Some(false), &[]);
        assert_eq!(from_bool.text(), Some("false"));

        let list = vec!["a".to_string(), "b".to_string()];
        let from_list = CellValue::coerce(ValueKind::Text, None, None, &list);
        assert_eq!(from_list.text(), Some("a, b"));
    }

    #[test]
    fn coerce_list_splits_text() {
        let cell = CellValue::coerce(ValueKind::Tags, Some("rust, cli ,,"), None, &[]);
        assert_eq!(cell, CellValue::Tags(vec!["rust".into(), "cli".into()]));
    }

    #[test]
    fn from_input_parses_checkbox_words() {
        assert_eq!(
            CellValue::from_input(ValueKind::Checkbox, "Yes"),
            CellValue::Checkbox(Some(true))
        );
        assert_eq!(
            CellValue::from_input(ValueKind::Checkbox, "0"),
            CellValue::Checkbox(Some(false))
        );
        assert_eq!(
            CellValue::from_input(ValueKind::Checkbox, "maybe"),
            CellValue::Checkbox(None)
        );
    }

    #[test]
    fn from_input_blank_is_empty() {
        assert_eq!(
            CellValue::from_input(ValueKind::Number, "   "),
            CellValue::Number(None)
        );
    }

    #[test]
    fn wire_shape_uses_slot_names() {
        let cell = CellValue::Tags(vec!["swift".into()]);
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "tags", "value_list": ["swift"]})
        );

        let parsed: CellValue =
            serde_json::from_str(r#"{"kind":"checkbox","value_bool":false}"#).unwrap();
        assert_eq!(parsed, CellValue::Checkbox(Some(false)));
    }

    #[test]
    fn kind_parses_from_str() {
        assert_eq!("datetime".parse::<ValueKind>(), Ok(ValueKind::Datetime));
        assert_eq!(" Checkbox ".parse::<ValueKind>(), Ok(ValueKind::Checkbox));
        assert!("money".parse::<ValueKind>().is_err());
    }
}
