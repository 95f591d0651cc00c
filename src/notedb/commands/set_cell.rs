use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotedbError, Result};
use crate::store::DataStore;
use crate::view::board::{holds_reserved_lane, EMPTY_LANE};
use crate::view::column::Column;
use crate::view::config::ViewConfig;
use crate::view::patch::{cell_patch, MetadataPatch};
use crate::view::value::CellValue;

/// Resolve an editable column.
pub fn editable_column<'a>(config: &'a ViewConfig, column_id: &str) -> Result<&'a Column> {
    let column = config
        .column(column_id)
        .ok_or_else(|| NotedbError::ColumnNotFound(column_id.to_string()))?;
    if !column.column_type.is_editable() {
        return Err(NotedbError::ReadOnlyColumn(column_id.to_string()));
    }
    Ok(column)
}

/// The patch writing `value` into `column_id`.
pub fn plan(config: &ViewConfig, column_id: &str, value: &CellValue) -> Result<MetadataPatch> {
    let column = editable_column(config, column_id)?;
    if holds_reserved_lane(value) {
        return Err(NotedbError::ReservedValue(EMPTY_LANE.to_string()));
    }
    cell_patch(column, value).ok_or_else(|| NotedbError::ReadOnlyColumn(column_id.to_string()))
}

/// Parse user text as a value for `column_id`.
pub fn parse_input(config: &ViewConfig, column_id: &str, input: &str) -> Result<CellValue> {
    let column = editable_column(config, column_id)?;
    Ok(CellValue::from_input(column.kind(), input))
}

pub fn run<S: DataStore>(
    store: &mut S,
    config: &ViewConfig,
    row_id: &str,
    column_id: &str,
    value: &CellValue,
) -> Result<CmdResult> {
    let patch = plan(config, column_id, value)?;
    let doc = store.apply_patch(row_id, &patch)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Set {} on {} to '{}'",
        column_id,
        doc.row.title,
        value.display()
    )));
    Ok(result.with_affected_rows(vec![doc.row]))
}
