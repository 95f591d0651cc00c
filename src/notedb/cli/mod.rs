//! # CLI Layer
//!
//! One client of the notedb library. This is the only place that:
//! - parses arguments (`setup.rs`),
//! - opens a store on the notes directory and wires it into `NotedbApi` (`commands.rs`),
//! - writes to stdout/stderr (`print.rs`).
//!
//! Views are addressed by folder: `notedb table Projects` opens the view stored
//! on `Projects/Projects.md`. Rows are addressed by id (`Projects/alpha.md`),
//! by file stem inside the view folder (`alpha`), or by a unique title.
//!
//! ## Filters and sorts on the command line
//!
//! ```text
//! --filter status:is_empty
//! --filter title:contains:api
//! --filter tags:tags_contains:rust,cli
//! --sort estimate:desc
//! ```
//!
//! Filters and a sort given on the command line replace the saved ones for that
//! invocation; `--save` writes them back into the view.
//!
//! ## Logging
//!
//! `tracing` events go to stderr. The default level is `warn`; `-v` raises it
//! to `debug` and `-vv` to `trace`. `RUST_LOG` takes precedence when set.

mod commands;
mod print;
mod setup;

pub use commands::run;
