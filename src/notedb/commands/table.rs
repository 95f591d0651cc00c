use crate::commands::CmdResult;
use crate::model::Row;
use crate::view::config::ViewConfig;
use crate::view::filter::filter_rows;
use crate::view::sort::sort_rows;

/// Filter then sort a row snapshot under `config`.
pub fn run(rows: Vec<Row>, config: &ViewConfig) -> CmdResult {
    let total = rows.len();
    let mut rows = filter_rows(rows, &config.columns, &config.filters);
    let sort = config.active_sort().map(std::slice::from_ref).unwrap_or_default();
    sort_rows(&mut rows, &config.columns, sort);
    tracing::debug!(total, shown = rows.len(), "evaluated table");

    CmdResult::default()
        .with_rows(rows)
        .with_columns(config.columns.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::projects_store;
    use crate::store::DataStore;
    use crate::view::filter::Filter;
    use crate::view::sort::Sort;

    fn titles(result: &CmdResult) -> Vec<&str> {
        result.rows.iter().map(|r| r.title.as_str()).collect()
    }

    fn evaluate(config: &ViewConfig) -> CmdResult {
        let (store, _) = projects_store();
        run(store.rows(&config.source).unwrap(), config)
    }

    #[test]
    fn unfiltered_table_keeps_store_order() {
        let (store, owner) = projects_store();
        let config = store.load_view(&owner).unwrap().unwrap();
        let result = run(store.rows(&config.source).unwrap(), &config);
        assert_eq!(titles(&result), vec!["A", "B", "C"]);
        assert_eq!(result.columns, config.columns);
    }

    #[test]
    fn is_empty_filter_keeps_only_unset_status() {
        let (store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.filters = vec![Filter::is_empty("status")];
        assert_eq!(titles(&evaluate(&config)), vec!["C"]);
    }

    #[test]
    fn numeric_sort_places_absent_last() {
        let (store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.sorts = vec![Sort::asc("estimate")];
        assert_eq!(titles(&evaluate(&config)), vec!["B", "A", "C"]);
        config.sorts = vec![Sort::desc("estimate")];
        assert_eq!(titles(&evaluate(&config)), vec!["A", "B", "C"]);
    }

    #[test]
    fn filter_and_sort_combine() {
        let (store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.filters = vec![Filter::is_not_empty("status")];
        config.sorts = vec![Sort::desc("title")];
        assert_eq!(titles(&evaluate(&config)), vec!["B", "A"]);
    }

    #[test]
    fn only_the_active_sort_orders_rows() {
        let (store, owner) = projects_store();
        let mut config = store.load_view(&owner).unwrap().unwrap();
        config.sorts = vec![Sort::desc("title"), Sort::asc("estimate")];
        assert_eq!(config.active_sort(), Some(&Sort::desc("title")));
        assert_eq!(titles(&evaluate(&config)), vec!["C", "B", "A"]);
    }
}
