use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notedb")]
#[command(
    about = "Typed table and kanban views over folders of Markdown notes",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Notes directory (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Turn a folder into a database view
    Init {
        /// Folder, relative to the notes directory ("." for the root)
        folder: String,
    },

    /// Show a view as a table
    #[command(alias = "t")]
    Table {
        /// Folder owning the view
        view: String,

        /// Filter rows: COLUMN:OPERATOR[:VALUE] (repeatable, all must match)
        #[arg(short, long = "filter", value_name = "FILTER")]
        filters: Vec<String>,

        /// Sort rows: COLUMN[:asc|desc]
        #[arg(short, long)]
        sort: Option<String>,

        /// Save the filters and sort into the view
        #[arg(long)]
        save: bool,
    },

    /// Show a view as a kanban board
    #[command(alias = "b")]
    Board {
        /// Folder owning the view
        view: String,

        /// Column to group by
        #[arg(short, long)]
        group_by: Option<String>,

        /// Filter cards: COLUMN:OPERATOR[:VALUE] (repeatable)
        #[arg(short, long = "filter", value_name = "FILTER")]
        filters: Vec<String>,

        /// Save the grouping and board layout into the view
        #[arg(long)]
        save: bool,
    },

    /// Set one cell
    Set {
        view: String,
        /// Row id (document path)
        row: String,
        column: String,
        /// New value; empty clears the cell
        value: String,
    },

    /// Move a card to another lane of the board
    #[command(alias = "mv")]
    Move {
        view: String,
        /// Row id (document path)
        row: String,
        /// Target lane ("__empty__" for the no-value lane)
        lane: String,
    },

    /// Create a new row
    #[command(alias = "n")]
    New {
        view: String,
        title: Option<String>,

        /// Put the new card into this board lane
        #[arg(short, long)]
        lane: Option<String>,
    },

    /// List configured columns and properties not shown yet
    Columns { view: String },

    /// Print the view configuration
    Config { view: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_with_filters_and_sort() {
        let cli = Cli::try_parse_from([
            "notedb",
            "--root",
            "/notes",
            "table",
            "Projects",
            "-f",
            "status:is_empty",
            "--filter",
            "title:contains:api",
            "--sort",
            "estimate:desc",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/notes")));
        match cli.command {
            Commands::Table {
                view,
                filters,
                sort,
                save,
            } => {
                assert_eq!(view, "Projects");
                assert_eq!(filters, vec!["status:is_empty", "title:contains:api"]);
                assert_eq!(sort.as_deref(), Some("estimate:desc"));
                assert!(!save);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn counts_verbosity_and_global_json() {
        let cli = Cli::try_parse_from(["notedb", "board", "P", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn move_requires_lane() {
        assert!(Cli::try_parse_from(["notedb", "move", "P", "P/a.md"]).is_err());
    }
}
