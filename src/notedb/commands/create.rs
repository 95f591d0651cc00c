use crate::commands::{move_card, set_cell, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Row;
use crate::store::DataStore;
use crate::view::board::{drop_value, LaneId};
use crate::view::config::ViewConfig;
use crate::view::patch::MetadataPatch;

pub const DEFAULT_TITLE: &str = "Untitled";

/// Title for a new row: the prefix plus the given title, or whichever of the
/// two is present.
pub fn new_row_title(config: &ViewConfig, title: Option<&str>) -> String {
    let prefix = config.new_rows.title_prefix.as_str();
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    match title {
        Some(t) => format!("{}{}", prefix, t),
        None if !prefix.trim().is_empty() => prefix.trim().to_string(),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Metadata that puts a new row into `lane` on the configured board.
pub fn lane_seed(config: &ViewConfig, lane: Option<&LaneId>) -> Result<Vec<MetadataPatch>> {
    let Some(lane) = lane.filter(|l| !l.is_empty_lane()) else {
        return Ok(Vec::new());
    };
    let column = move_card::grouping_column(config)?;
    let blank = Row::new("", "");
    let value = drop_value(&blank, column, lane);
    Ok(vec![set_cell::plan(config, &column.id, &value)?])
}

pub fn run<S: DataStore>(
    store: &mut S,
    config: &ViewConfig,
    title: Option<&str>,
    lane: Option<&LaneId>,
) -> Result<CmdResult> {
    let title = new_row_title(config, title);
    let seed = lane_seed(config, lane)?;
    let folder = config.new_row_folder();
    let doc = store.create_document(&folder, &title, &seed)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created {} ({})",
        doc.row.title, doc.row.id
    )));
    Ok(result.with_affected_rows(vec![doc.row]))
}
