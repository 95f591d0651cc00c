//! Cell extraction: `(row, column) -> CellValue`.
//!
//! Extraction is total. A property the row does not have yields an empty cell
//! of the column's declared kind, so filters and comparators never see a
//! missing cell.

use super::column::{Column, ColumnType};
use super::value::CellValue;
use crate::model::Row;

pub fn extract(row: &Row, column: &Column) -> CellValue {
    match &column.column_type {
        ColumnType::Title => CellValue::Text(Some(row.title.clone())),
        ColumnType::Tags => CellValue::Tags(row.tags.clone()),
        ColumnType::Path => CellValue::Text(Some(row.id.clone())),
        ColumnType::Created => CellValue::Datetime(Some(row.created.to_rfc3339())),
        ColumnType::Updated => CellValue::Datetime(Some(row.updated.to_rfc3339())),
        ColumnType::Property { key, kind } => match row.properties.get(key) {
            Some(stored) => stored.to_cell(*kind),
            None => CellValue::empty(*kind),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use crate::view::value::ValueKind;
    use chrono::{TimeZone, Utc};

    fn row() -> Row {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
        Row::new("Projects/alpha.md", "Alpha")
            .with_tags(["swift", "ios"])
            .with_timestamps(created, updated)
            .with_property("status", PropertyValue::from_text(ValueKind::Text, "Doing"))
            .with_property("done", PropertyValue::from_bool(false))
    }

    #[test]
    fn builtin_columns() {
        let row = row();
        assert_eq!(
            extract(&row, &Column::title()),
            CellValue::Text(Some("Alpha".into()))
        );
        assert_eq!(
            extract(&row, &Column::path()),
            CellValue::Text(Some("Projects/alpha.md".into()))
        );
        assert_eq!(
            extract(&row, &Column::tags()),
            CellValue::Tags(vec!["swift".into(), "ios".into()])
        );
        assert_eq!(
            extract(&row, &Column::created()),
            CellValue::Datetime(Some("2024-03-01T09:30:00+00:00".into()))
        );
        assert_eq!(extract(&row, &Column::updated()).kind(), ValueKind::Datetime);
    }

    #[test]
    fn missing_property_uses_declared_kind() {
        let row = row();
        let column = Column::property("estimate", ValueKind::Number);
        assert_eq!(extract(&row, &column), CellValue::Number(None));

        let column = Column::property("labels", ValueKind::List);
        assert_eq!(extract(&row, &column), CellValue::List(vec![]));
    }

    #[test]
    fn present_property_takes_column_kind() {
        let row = row();
        for kind in ValueKind::ALL {
            let cell = extract(&row, &Column::property("status", kind));
            assert_eq!(cell.kind(), kind);
        }
        assert_eq!(
            extract(&row, &Column::property("done", ValueKind::Checkbox)),
            CellValue::Checkbox(Some(false))
        );
    }

    #[test]
    fn never_more_than_one_slot() {
        let row = row();
        for kind in ValueKind::ALL {
            for key in ["status", "done", "missing"] {
                let cell = extract(&row, &Column::property(key, kind));
                let set = [
                    cell.text().is_some(),
                    cell.boolean().is_some(),
                    !cell.items().is_empty(),
                ]
                .into_iter()
                .filter(|s| *s)
                .count();
                assert!(set <= 1, "{:?} has {} slots set", cell, set);
            }
        }
    }
}
