//! # API Facade
//!
//! `NotedbApi` is the caller-side session over one database view. It owns:
//!
//! - the store,
//! - the id of the document owning the view,
//! - the current [`ViewConfig`] snapshot,
//! - the current row snapshot and its request version.
//!
//! ## Snapshots and versions
//!
//! Evaluation ([`NotedbApi::table`], [`NotedbApi::board`]) always runs against
//! the snapshot held here. [`NotedbApi::reload`] fetches a fresh row set and
//! bumps the version; a caller that started work under an older version can
//! check [`NotedbApi::is_current`] and drop its result.
//!
//! ## Configuration
//!
//! [`NotedbApi::apply_config`] takes a complete configuration and replaces the
//! current one. There is no partial update.
//!
//! ## Edits
//!
//! Cell edits and card moves are applied to the cached row first, then
//! written through the store. If the write fails the cached row is restored
//! and the error returned. Writes take `&mut self`, so at most one is in
//! flight per session.
//!
//! Like the command layer, nothing here does terminal I/O.

use crate::commands::{self, CmdResult};
use crate::error::{NotedbError, Result};
use crate::model::Row;
use crate::store::DataStore;
use crate::view::board::LaneId;
use crate::view::config::ViewConfig;
use crate::view::patch::MetadataPatch;
use crate::view::value::CellValue;

pub struct NotedbApi<S: DataStore> {
    store: S,
    owner: String,
    config: ViewConfig,
    rows: Vec<Row>,
    version: u64,
}

impl<S: DataStore> NotedbApi<S> {
    /// Open the view stored on `owner`.
    pub fn open(store: S, owner: impl Into<String>) -> Result<Self> {
        let owner = owner.into();
        let config = store
            .load_view(&owner)?
            .ok_or_else(|| NotedbError::ViewNotFound(owner.clone()))?;
        let mut api = Self {
            store,
            owner,
            config,
            rows: Vec::new(),
            version: 0,
        };
        api.reload()?;
        Ok(api)
    }

    /// Open the view owned by `folder`'s folder note.
    pub fn open_folder(store: S, folder: &str) -> Result<Self> {
        let owner = store.folder_note_id(folder);
        Self::open(store, owner)
    }

    /// Turn `folder` into a database view and open it.
    pub fn init(mut store: S, folder: &str) -> Result<(Self, CmdResult)> {
        let result = commands::init::run(&mut store, folder)?;
        let api = Self::open_folder(store, folder)?;
        Ok((api, result))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the configuration wholesale. Rows are re-fetched when the
    /// source changed.
    pub fn apply_config(&mut self, config: ViewConfig) -> Result<()> {
        config.validate()?;
        let source_changed = config.source != self.config.source;
        self.config = config;
        if source_changed {
            self.reload()?;
        }
        Ok(())
    }

    /// Persist the current configuration on the owner document.
    pub fn save_config(&mut self) -> Result<()> {
        self.store.save_view(&self.owner, &self.config)
    }

    /// Fetch a fresh row snapshot. Returns the new version.
    pub fn reload(&mut self) -> Result<u64> {
        let rows = self.store.rows(&self.config.source)?;
        self.version += 1;
        self.rows = rows;
        tracing::debug!(version = self.version, rows = self.rows.len(), "reloaded rows");
        Ok(self.version)
    }

    /// Whether work started at `version` still matches the snapshot.
    pub fn is_current(&self, version: u64) -> bool {
        version == self.version
    }

    pub fn table(&self) -> CmdResult {
        commands::table::run(self.rows.clone(), &self.config)
    }

    pub fn board(&self) -> CmdResult {
        commands::board::run(self.rows.clone(), &self.config)
    }

    pub fn columns(&self) -> CmdResult {
        commands::columns::run(&self.rows, &self.config)
    }

    pub fn show_config(&self) -> CmdResult {
        CmdResult::default()
            .with_config(self.config.clone())
            .with_columns(self.config.columns.clone())
    }

    /// Parse `input` for `column_id` and write it.
    pub fn set_cell_input(&mut self, row_id: &str, column_id: &str, input: &str) -> Result<CmdResult> {
        let value = commands::set_cell::parse_input(&self.config, column_id, input)?;
        self.set_cell(row_id, column_id, &value)
    }

    pub fn set_cell(&mut self, row_id: &str, column_id: &str, value: &CellValue) -> Result<CmdResult> {
        let patch = commands::set_cell::plan(&self.config, column_id, value)?;
        self.write_optimistic(row_id, &patch, |store, config| {
            commands::set_cell::run(store, config, row_id, column_id, value)
        })
    }

    /// Move a card to `lane` on the configured board.
    pub fn move_card(&mut self, row_id: &str, lane: &LaneId) -> Result<CmdResult> {
        let row = match self.cached(row_id) {
            Some(idx) => self.rows[idx].clone(),
            None => self.store.get_document(row_id)?.row,
        };
        let (column, value) = commands::move_card::plan(&self.config, &row, lane)?;
        let column_id = column.id.clone();
        self.set_cell(row_id, &column_id, &value)
    }

    /// Create a row, optionally seeded into a board lane, and add it to the
    /// snapshot.
    pub fn create_row(&mut self, title: Option<&str>, lane: Option<&LaneId>) -> Result<CmdResult> {
        let result = commands::create::run(&mut self.store, &self.config, title, lane)?;
        self.rows.extend(result.affected_rows.iter().cloned());
        Ok(result)
    }

    fn cached(&self, row_id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == row_id)
    }

    /// Apply `patch` to the cached row, run `write`, then keep the stored row
    /// on success or restore the old one on failure.
    fn write_optimistic<F>(&mut self, row_id: &str, patch: &MetadataPatch, write: F) -> Result<CmdResult>
    where
        F: FnOnce(&mut S, &ViewConfig) -> Result<CmdResult>,
    {
        let idx = self.cached(row_id);
        let previous = idx.map(|i| {
            let before = self.rows[i].clone();
            patch.apply_to(&mut self.rows[i]);
            before
        });

        match write(&mut self.store, &self.config) {
            Ok(result) => {
                if let (Some(i), Some(stored)) = (idx, result.affected_rows.first()) {
                    self.rows[i] = stored.clone();
                }
                Ok(result)
            }
            Err(e) => {
                if let (Some(i), Some(before)) = (idx, previous) {
                    self.rows[i] = before;
                }
                tracing::warn!(row = row_id, error = %e, "write failed, reverted cached row");
                Err(e)
            }
        }
    }
}

pub use crate::commands::{CmdMessage, MessageLevel};
