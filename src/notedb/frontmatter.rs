//! YAML frontmatter codec.
//!
//! A document is an optional YAML mapping between `---` lines, followed by
//! the body:
//!
//! ```markdown
//! ---
//! title: Alpha
//! tags: [swift, ios]
//! status: Doing
//! ---
//! Body text
//! ```
//!
//! `title`, `tags`, `created` and `updated` are document-level fields. The
//! `notedb` key holds a view configuration when the document owns one. Every
//! other key is a property whose kind is inferred from its YAML value.
//!
//! The mapping keeps its key order, so rewriting one field leaves the rest of
//! the frontmatter and the body as they were.

use crate::error::{NotedbError, Result};
use crate::model::{PropertyValue, Row};
use crate::view::config::ViewConfig;
use crate::view::filter::strip_tag;
use crate::view::patch::MetadataPatch;
use crate::view::value::{split_list, ValueKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

const DELIMITER: &str = "---";

pub const TITLE_KEY: &str = "title";
pub const TAGS_KEY: &str = "tags";
pub const CREATED_KEY: &str = "created";
pub const UPDATED_KEY: &str = "updated";
/// Frontmatter key holding a database view configuration.
pub const VIEW_KEY: &str = "notedb";

const RESERVED_KEYS: [&str; 5] = [TITLE_KEY, TAGS_KEY, CREATED_KEY, UPDATED_KEY, VIEW_KEY];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frontmatter {
    pub fields: Mapping,
    pub body: String,
}

impl Frontmatter {
    /// Parse a document. Text without a frontmatter block is all body.
    /// `path` is only used in error messages.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let Some((yaml, body)) = split(content) else {
            return Ok(Self {
                fields: Mapping::new(),
                body: content.to_string(),
            });
        };

        let fields = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Mapping(map)) => map,
                Ok(Value::Null) => Mapping::new(),
                Ok(_) => {
                    return Err(NotedbError::Frontmatter {
                        path: path.to_string(),
                        message: "frontmatter is not a mapping".into(),
                    })
                }
                Err(e) => {
                    return Err(NotedbError::Frontmatter {
                        path: path.to_string(),
                        message: e.to_string(),
                    })
                }
            }
        };

        Ok(Self {
            fields,
            body: body.to_string(),
        })
    }

    /// Render back to document text. An empty mapping renders no block.
    pub fn render(&self) -> Result<String> {
        if self.fields.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.fields)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(Value::String(key.to_string()), value);
    }

    pub fn title(&self) -> Option<String> {
        self.get(TITLE_KEY)
            .and_then(scalar_text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Tags from a YAML list or a comma-separated string, marker stripped.
    pub fn tags(&self) -> Vec<String> {
        let raw = match self.get(TAGS_KEY) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(s)) => split_list(s),
            _ => Vec::new(),
        };
        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw {
            let tag = strip_tag(tag.trim());
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key)
            .and_then(scalar_text)
            .and_then(|t| parse_datetime(&t))
    }

    pub fn set_timestamp(&mut self, key: &str, at: DateTime<Utc>) {
        self.set(
            key,
            Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }

    /// All non-reserved keys as typed properties.
    pub fn properties(&self) -> BTreeMap<String, PropertyValue> {
        self.fields
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str()?;
                (!is_reserved_key(key)).then(|| (key.to_string(), infer_property(value)))
            })
            .collect()
    }

    pub fn owns_view(&self) -> bool {
        self.get(VIEW_KEY).is_some()
    }

    pub fn view_config(&self, path: &str) -> Result<Option<ViewConfig>> {
        match self.get(VIEW_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone()).map(Some).map_err(|e| {
                NotedbError::Frontmatter {
                    path: path.to_string(),
                    message: format!("invalid view configuration: {}", e),
                }
            }),
        }
    }

    pub fn set_view_config(&mut self, config: &ViewConfig) -> Result<()> {
        let value = serde_yaml::to_value(config)?;
        self.set(VIEW_KEY, value);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) {
        self.set(TITLE_KEY, Value::String(title.to_string()));
    }

    pub fn set_tags(&mut self, tags: &[String]) {
        self.set(
            TAGS_KEY,
            Value::Sequence(tags.iter().map(|t| Value::String(t.clone())).collect()),
        );
    }

    pub fn set_property(&mut self, key: &str, value: &PropertyValue) {
        self.set(key, render_property(value));
    }

    /// Write a patch into the mapping. Properties cannot shadow document
    /// fields.
    pub fn apply_patch(&mut self, patch: &MetadataPatch) -> Result<()> {
        match patch {
            MetadataPatch::Title { title } => self.set_title(title),
            MetadataPatch::Tags { tags } => self.set_tags(tags),
            MetadataPatch::Property { key, value } => {
                if is_reserved_key(key) {
                    return Err(NotedbError::Store(format!(
                        "'{}' is a reserved field and cannot be written as a property",
                        key
                    )));
                }
                self.set_property(key, value);
            }
        }
        Ok(())
    }

    /// Build the row for this document. Missing title falls back to the
    /// first heading, then `stem`; missing timestamps to `modified`.
    pub fn to_row(&self, id: &str, stem: &str, modified: DateTime<Utc>) -> Row {
        let title = self
            .title()
            .unwrap_or_else(|| title_fallback(&self.body, stem));
        let created = self.timestamp(CREATED_KEY).unwrap_or(modified);
        let updated = self.timestamp(UPDATED_KEY).unwrap_or(modified);

        let mut row = Row::new(id, title)
            .with_tags(self.tags())
            .with_timestamps(created, updated);
        row.properties = self.properties();
        row
    }
}

/// Split `content` into (yaml, body) when it opens with a frontmatter block.
fn split(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// First `# ` heading of the body, else `stem`.
pub fn title_fallback(body: &str, stem: &str) -> String {
    body.lines()
        .find_map(|line| line.trim().strip_prefix("# "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(stem)
        .to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_text(value: &Value) -> String {
    scalar_text(value).unwrap_or_else(|| {
        serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default()
    })
}

pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Infer a property's kind from its YAML value.
pub fn infer_property(value: &Value) -> PropertyValue {
    match value {
        Value::Null => PropertyValue::unset(ValueKind::Text),
        Value::Bool(b) => PropertyValue::from_bool(*b),
        Value::Number(n) => PropertyValue::from_text(ValueKind::Number, n.to_string()),
        Value::String(s) => PropertyValue::from_text(infer_string_kind(s), s.clone()),
        Value::Sequence(items) => {
            PropertyValue::from_list(ValueKind::List, items.iter().map(yaml_text).collect())
        }
        Value::Mapping(_) | Value::Tagged(_) => {
            PropertyValue::from_text(ValueKind::Yaml, yaml_text(value))
        }
    }
}

fn infer_string_kind(s: &str) -> ValueKind {
    let s = s.trim();
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
        ValueKind::Date
    } else if DateTime::parse_from_rfc3339(s).is_ok() {
        ValueKind::Datetime
    } else if s.starts_with("http://") || s.starts_with("https://") {
        ValueKind::Url
    } else {
        ValueKind::Text
    }
}

/// Render a stored property back into YAML, in its kind's natural shape.
pub fn render_property(value: &PropertyValue) -> Value {
    match value.kind {
        ValueKind::Checkbox => value.boolean.map(Value::Bool).unwrap_or(Value::Null),
        ValueKind::List | ValueKind::Tags => {
            Value::Sequence(value.list.iter().cloned().map(Value::String).collect())
        }
        ValueKind::Number => match value.text.as_deref().map(str::trim) {
            None => Value::Null,
            Some(t) => number_value(t).unwrap_or_else(|| Value::String(t.to_string())),
        },
        ValueKind::Yaml => match value.text.as_deref() {
            None => Value::Null,
            Some(t) => serde_yaml::from_str(t).unwrap_or_else(|_| Value::String(t.to_string())),
        },
        _ => value
            .text
            .as_ref()
            .map(|t| Value::String(t.clone()))
            .unwrap_or(Value::Null),
    }
}

/// A YAML number that writes back as exactly `text`. `007` or `3.50` would
/// lose their digits, so they stay strings.
fn number_value(text: &str) -> Option<Value> {
    let number = match text.parse::<i64>() {
        Ok(i) => Value::Number(i.into()),
        Err(_) => Value::Number(text.parse::<f64>().ok()?.into()),
    };
    let rendered = serde_yaml::to_string(&number).ok()?;
    (rendered.trim_end() == text).then_some(number)
}
