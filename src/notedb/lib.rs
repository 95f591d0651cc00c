//! # notedb Architecture
//!
//! notedb turns a folder of Markdown notes into a database: every note is a
//! row, its YAML frontmatter keys are cells, and a folder note carries the
//! view configuration (columns, filters, sort, board grouping). The library
//! is UI-agnostic; the `notedb` binary is one client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints tables and boards               │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One session per view: config + row snapshot + version    │
//! │  - Optimistic edits with revert on write failure            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - init, table, board, set_cell, move_card, create, columns │
//! │  - Returns `CmdResult`, never prints                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  View Engine (view/)                                        │
//! │  - Pure functions: extract, filter, sort, group, patch      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, frontmatter.rs)                     │
//! │  - DataStore trait                                          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout/stderr or exits the process.
//! Diagnostics go through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **View engine** (`view/*.rs`): table-driven unit tests over hand-built rows.
//! 2. **Commands** (`commands/*.rs`): tests against `InMemoryStore` fixtures.
//! 3. **API** (`api.rs`): snapshot, versioning and revert behavior.
//! 4. **Stores**: `FileStore` against a `tempfile` directory.
//! 5. **Binary** (`tests/`): `assert_cmd` runs of the real CLI.
//!
//! ## Module Overview
//!
//! - [`api`]: Session facade over one view
//! - [`commands`]: Business logic for each command
//! - [`view`]: Column model, cell values, filter/sort/board evaluation, patches
//! - [`store`]: Storage abstraction and implementations
//! - [`frontmatter`]: YAML frontmatter parsing and rendering
//! - [`model`]: Rows, property values and documents
//! - [`config`]: Per-directory settings (`.notedb/config.json`)
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod model;
pub mod store;
pub mod view;
