use crate::commands::{CmdMessage, CmdResult};
use crate::model::Row;
use crate::view::config::{discover_property_columns, ViewConfig};

/// Configured columns, plus property columns the rows have that the view
/// does not show yet.
pub fn run(rows: &[Row], config: &ViewConfig) -> CmdResult {
    let suggested = discover_property_columns(rows, &config.columns);

    let mut result = CmdResult::default().with_columns(config.columns.clone());
    if !suggested.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "{} propert{} not shown: {}",
            suggested.len(),
            if suggested.len() == 1 { "y" } else { "ies" },
            suggested
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    result.suggested_columns = suggested;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::set_cell;
    use crate::store::memory::fixtures::projects_store;
    use crate::store::DataStore;
    use crate::view::column::Column;
    use crate::view::value::{CellValue, ValueKind};

    #[test]
    fn nothing_to_suggest_for_fresh_view() {
        let (store, owner) = projects_store();
        let config = store.load_view(&owner).unwrap().unwrap();
        let result = run(&store.rows(&config.source).unwrap(), &config);
        assert_eq!(result.columns.len(), 6);
        assert!(result.suggested_columns.is_empty());
        assert!(result.messages.is_empty());
    }

    #[test]
    fn suggests_new_property_keys() {
        let (mut store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.columns.push(Column::property("owner", ValueKind::Text));
        set_cell::run(
            &mut store,
            &config,
            "Projects/b.md",
            "owner",
            &CellValue::Text(Some("sam".into())),
        )
        .unwrap();

        config.columns.pop();
        let result = run(&store.rows(&config.source).unwrap(), &config);
        let ids: Vec<&str> = result
            .suggested_columns
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["owner"]);
        assert_eq!(result.messages.len(), 1);
    }
}
