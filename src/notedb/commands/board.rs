use crate::commands::{CmdMessage, CmdResult};
use crate::model::Row;
use crate::view::board::group_rows;
use crate::view::config::ViewConfig;
use crate::view::filter::filter_rows;

/// Filter a row snapshot and group it into lanes by `config.group_by`.
/// Sorting does not apply to boards.
pub fn run(rows: Vec<Row>, config: &ViewConfig) -> CmdResult {
    let mut result = CmdResult::default().with_columns(config.columns.clone());
    let Some(group_by) = config.group_by.as_deref() else {
        result.add_message(CmdMessage::warning(
            "No grouping column configured; use --group-by",
        ));
        return result;
    };

    let rows = filter_rows(rows, &config.columns, &config.filters);
    let lanes = group_rows(&rows, &config.columns, group_by);
    tracing::debug!(group_by, lanes = lanes.len(), "evaluated board");

    if lanes.is_empty() {
        tracing::warn!(column = group_by, "board has no lanes");
        result.add_message(CmdMessage::warning(format!(
            "Column '{}' is missing or cannot be grouped by; showing no lanes",
            group_by
        )));
    }
    result.with_lanes(lanes)
}
