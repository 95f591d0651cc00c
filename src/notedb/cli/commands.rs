use super::print::{print_board, print_columns, print_config, print_messages, print_table};
use super::setup::{Cli, Commands};
use clap::Parser;
use notedb::api::NotedbApi;
use notedb::commands::CmdResult;
use notedb::error::{NotedbError, Result};
use notedb::store::fs::FileStore;
use notedb::store::DataStore;
use notedb::view::{Filter, FilterOp, Layout, LaneId, Sort, SortDirection, ViewConfig};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let store = FileStore::open(root)?;
    tracing::debug!(root = %store.root().display(), "opened notes directory");

    let json = cli.json;
    match cli.command {
        Commands::Init { folder } => {
            let (_, result) = NotedbApi::init(store, &folder)?;
            emit(&result, json, |r| print_messages(&r.messages))
        }
        Commands::Table {
            view,
            filters,
            sort,
            save,
        } => {
            let mut api = open_view(store, &view)?;
            let mut config = api.config().clone();
            override_filters(&mut config, &filters)?;
            if let Some(sort) = sort {
                config.sorts = vec![parse_sort(&sort)?];
            }
            config.layout = Layout::Table;
            commit(&mut api, config, save)?;

            emit(&api.table(), json, |r| {
                print_table(&r.rows, &r.columns);
                print_messages(&r.messages);
            })
        }
        Commands::Board {
            view,
            group_by,
            filters,
            save,
        } => {
            let mut api = open_view(store, &view)?;
            let mut config = api.config().clone();
            override_filters(&mut config, &filters)?;
            if group_by.is_some() {
                config.group_by = group_by;
            }
            config.layout = Layout::Board;
            commit(&mut api, config, save)?;

            emit(&api.board(), json, |r| {
                print_board(&r.lanes);
                print_messages(&r.messages);
            })
        }
        Commands::Set {
            view,
            row,
            column,
            value,
        } => {
            let mut api = open_view(store, &view)?;
            let row = resolve_row(&api, &row)?;
            let result = api.set_cell_input(&row, &column, &value)?;
            emit(&result, json, |r| print_messages(&r.messages))
        }
        Commands::Move { view, row, lane } => {
            let mut api = open_view(store, &view)?;
            let row = resolve_row(&api, &row)?;
            let lane = LaneId::from(lane);
            let result = api.move_card(&row, &lane)?;
            emit(&result, json, |r| print_messages(&r.messages))
        }
        Commands::New { view, title, lane } => {
            let mut api = open_view(store, &view)?;
            let lane = lane.map(LaneId::from);
            let result = api.create_row(title.as_deref(), lane.as_ref())?;
            emit(&result, json, |r| print_messages(&r.messages))
        }
        Commands::Columns { view } => {
            let api = open_view(store, &view)?;
            emit(&api.columns(), json, |r| {
                print_columns(&r.columns, &r.suggested_columns);
                print_messages(&r.messages);
            })
        }
        Commands::Config { view } => {
            let api = open_view(store, &view)?;
            emit(&api.show_config(), json, |r| {
                if let Some(config) = &r.config {
                    print_config(config);
                }
            })
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Keep a subscriber that is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn emit<F>(result: &CmdResult, json: bool, render: F) -> Result<()>
where
    F: FnOnce(&CmdResult),
{
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        render(result);
    }
    Ok(())
}

/// Open a view by folder, or by owner id when the argument names a document.
fn open_view(store: FileStore, view: &str) -> Result<NotedbApi<FileStore>> {
    if view.ends_with(store.file_ext()) {
        NotedbApi::open(store, view)
    } else {
        NotedbApi::open_folder(store, view)
    }
}

fn commit(api: &mut NotedbApi<FileStore>, config: ViewConfig, save: bool) -> Result<()> {
    api.apply_config(config)?;
    if save {
        api.save_config()?;
    }
    Ok(())
}

fn override_filters(config: &mut ViewConfig, args: &[String]) -> Result<()> {
    if !args.is_empty() {
        config.filters = args
            .iter()
            .map(|arg| parse_filter(arg))
            .collect::<Result<_>>()?;
    }
    Ok(())
}

/// Parse `COLUMN:OPERATOR[:VALUE]`. Column ids may themselves contain `:`
/// (`prop:status`), so the operator is the first segment that names one.
fn parse_filter(arg: &str) -> Result<Filter> {
    let parts: Vec<&str> = arg.split(':').collect();
    let (at, operator) = parts
        .iter()
        .enumerate()
        .skip(1)
        .find_map(|(i, part)| FilterOp::from_str(part).ok().map(|op| (i, op)))
        .ok_or_else(|| {
            NotedbError::Api(format!(
                "invalid filter '{}', expected COLUMN:OPERATOR[:VALUE]",
                arg
            ))
        })?;

    let column = parts[..at].join(":");
    let value = parts[at + 1..].join(":");
    let filter = Filter::new(column, operator);

    match (operator.takes_operand(), value.is_empty()) {
        (true, true) => Err(NotedbError::Api(format!(
            "filter operator '{}' needs a value",
            operator
        ))),
        (false, false) => Err(NotedbError::Api(format!(
            "filter operator '{}' takes no value",
            operator
        ))),
        (true, false) if operator == FilterOp::TagsContains => Ok(filter.with_list(
            value
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        )),
        (true, false) => Ok(filter.with_text(value)),
        (false, true) => Ok(filter),
    }
}

/// Parse `COLUMN[:asc|desc]`.
fn parse_sort(arg: &str) -> Result<Sort> {
    if let Some((column, direction)) = arg.rsplit_once(':') {
        if let Ok(direction) = SortDirection::from_str(direction) {
            return Ok(Sort {
                column_id: column.to_string(),
                direction,
            });
        }
    }
    if arg.is_empty() {
        return Err(NotedbError::Api("empty sort column".to_string()));
    }
    Ok(Sort::asc(arg))
}

/// Resolve a row argument against the current snapshot: exact id, then a
/// file stem in the view folder, then a unique case-insensitive title.
fn resolve_row<S: DataStore>(api: &NotedbApi<S>, arg: &str) -> Result<String> {
    let rows = api.rows();
    if rows.iter().any(|r| r.id == arg) {
        return Ok(arg.to_string());
    }

    if let Some(folder) = api.config().source.folder_path() {
        let candidate = if folder.is_empty() {
            format!("{}{}", arg, api.store().file_ext())
        } else {
            format!("{}/{}{}", folder, arg, api.store().file_ext())
        };
        if rows.iter().any(|r| r.id == candidate) {
            return Ok(candidate);
        }
    }

    let by_title: Vec<&str> = rows
        .iter()
        .filter(|r| r.title.eq_ignore_ascii_case(arg))
        .map(|r| r.id.as_str())
        .collect();
    match by_title.as_slice() {
        [id] => Ok(id.to_string()),
        [] => Err(NotedbError::DocumentNotFound(arg.to_string())),
        many => Err(NotedbError::Api(format!(
            "'{}' matches {} rows: {}",
            arg,
            many.len(),
            many.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters() {
        let f = parse_filter("status:is_empty").unwrap();
        assert_eq!(f.column_id, "status");
        assert_eq!(f.operator, FilterOp::IsEmpty);

        let f = parse_filter("title:contains:api:v2").unwrap();
        assert_eq!(f.value_text.as_deref(), Some("api:v2"));

        let f = parse_filter("prop:status:equals:Done").unwrap();
        assert_eq!(f.column_id, "prop:status");
        assert_eq!(f.operator, FilterOp::Equals);

        let f = parse_filter("tags:tags_contains:#rust, cli").unwrap();
        assert_eq!(f.value_list, vec!["#rust", "cli"]);
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(parse_filter("status").is_err());
        assert!(parse_filter("status:between:1").is_err());
        assert!(parse_filter("title:contains").is_err());
        assert!(parse_filter("done:is_true:yes").is_err());
    }

    #[test]
    fn parses_sorts() {
        assert_eq!(parse_sort("estimate:desc").unwrap(), Sort::desc("estimate"));
        assert_eq!(parse_sort("title").unwrap(), Sort::asc("title"));
        assert_eq!(parse_sort("prop:status").unwrap(), Sort::asc("prop:status"));
        assert!(parse_sort("").is_err());
    }
}
