//! # notedb CLI
//!
//! The binary is thin: argument parsing, rendering and process exit live in
//! `cli/`, everything else in the `notedb` library.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  CLI (src/notedb/cli/)                       │
//! │  clap parsing, store setup, terminal output  │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  NotedbApi (api.rs)                          │
//! │  snapshots, config replacement, write-back   │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │  commands/* → view/* → store/*               │
//! └──────────────────────────────────────────────┘
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
