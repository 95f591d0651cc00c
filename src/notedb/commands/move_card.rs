use crate::commands::{set_cell, CmdResult};
use crate::error::{NotedbError, Result};
use crate::model::Row;
use crate::store::DataStore;
use crate::view::board::{drop_value, LaneId};
use crate::view::column::Column;
use crate::view::config::ViewConfig;
use crate::view::value::CellValue;

/// The column a board is grouped by.
pub fn grouping_column(config: &ViewConfig) -> Result<&Column> {
    let group_by = config
        .group_by
        .as_deref()
        .ok_or_else(|| NotedbError::InvalidConfig("view has no grouping column".into()))?;
    let column = config
        .column(group_by)
        .ok_or_else(|| NotedbError::ColumnNotFound(group_by.to_string()))?;
    if !column.column_type.is_groupable() {
        return Err(NotedbError::NotGroupable(group_by.to_string()));
    }
    Ok(column)
}

/// The cell `row` gets when dropped on `lane`, with the column it goes into.
pub fn plan<'a>(config: &'a ViewConfig, row: &Row, lane: &LaneId) -> Result<(&'a Column, CellValue)> {
    let column = grouping_column(config)?;
    Ok((column, drop_value(row, column, lane)))
}

pub fn run<S: DataStore>(
    store: &mut S,
    config: &ViewConfig,
    row_id: &str,
    lane: &LaneId,
) -> Result<CmdResult> {
    let row = store.get_document(row_id)?.row;
    let (column, value) = plan(config, &row, lane)?;
    tracing::debug!(row = row_id, %lane, column = %column.id, "moving card");
    set_cell::run(store, config, row_id, &column.id, &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use crate::store::memory::fixtures::projects_store;
    use crate::view::board::has_lane;
    use crate::view::value::ValueKind;

    fn board_config(group_by: &str) -> (crate::store::memory::InMemoryStore, ViewConfig) {
        let (store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.group_by = Some(group_by.into());
        (store, config)
    }

    #[test]
    fn move_to_status_lane_replaces_value() {
        let (mut store, config) = board_config("status");
        run(&mut store, &config, "Projects/a.md", &LaneId::value("Doing")).unwrap();
        let row = store.get_document("Projects/a.md").unwrap().row;
        assert_eq!(
            row.properties["status"],
            PropertyValue::from_text(ValueKind::Text, "Doing")
        );
    }

    #[test]
    fn move_to_tag_lane_keeps_other_tags() {
        let (mut store, config) = board_config("tags");
        run(&mut store, &config, "Projects/a.md", &LaneId::value("project")).unwrap();
        let row = store.get_document("Projects/a.md").unwrap().row;
        assert_eq!(row.tags, vec!["swift", "ios", "project"]);
    }

    #[test]
    fn empty_lane_text_is_the_empty_lane() {
        let (mut store, config) = board_config("status");
        let lane: LaneId = "__empty__".parse().unwrap();
        assert!(lane.is_empty_lane());
        run(&mut store, &config, "Projects/a.md", &lane).unwrap();
        let row = store.get_document("Projects/a.md").unwrap().row;
        assert!(has_lane(&row, grouping_column(&config).unwrap(), &LaneId::Empty));

        assert!(matches!(
            run(&mut store, &config, "Projects/b.md", &LaneId::Value("__empty__".into())),
            Err(NotedbError::ReservedValue(_))
        ));
    }

    #[test]
    fn tag_drop_keeps_casing_and_lands_in_lane() {
        let (mut store, config) = board_config("tags");
        store.insert("Projects/m.md", "---\ntitle: M\ntags: [Swift, iOS]\n---\n");
        let before = store.get_document("Projects/m.md").unwrap().row;
        assert_eq!(before.tags, vec!["Swift", "iOS"]);

        let lane = LaneId::value("Project");
        run(&mut store, &config, "Projects/m.md", &lane).unwrap();
        let text = store.text("Projects/m.md").unwrap();
        assert!(text.contains("tags:\n- Swift\n- iOS\n- Project\n"));

        let row = store.get_document("Projects/m.md").unwrap().row;
        let column = grouping_column(&config).unwrap();
        assert!(has_lane(&row, column, &lane));
    }

    #[test]
    fn move_to_empty_lane_clears() {
        let (mut store, config) = board_config("tags");
        run(&mut store, &config, "Projects/a.md", &LaneId::Empty).unwrap();
        assert!(store.get_document("Projects/a.md").unwrap().row.tags.is_empty());

        let (mut store, config) = board_config("done");
        run(&mut store, &config, "Projects/a.md", &LaneId::Empty).unwrap();
        let row = store.get_document("Projects/a.md").unwrap().row;
        assert_eq!(row.properties["done"].boolean, None);
    }

    #[test]
    fn requires_a_groupable_column() {
        let (mut store, mut config) = board_config("title");
        assert!(matches!(
            run(&mut store, &config, "Projects/a.md", &LaneId::value("x")),
            Err(NotedbError::NotGroupable(_))
        ));
        config.group_by = None;
        assert!(matches!(
            run(&mut store, &config, "Projects/a.md", &LaneId::value("x")),
            Err(NotedbError::InvalidConfig(_))
        ));
    }
}
