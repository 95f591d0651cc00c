use crate::model::Row;
use crate::view::board::Lane;
use crate::view::column::Column;
use crate::view::config::ViewConfig;
use serde::Serialize;

pub mod board;
pub mod columns;
pub mod create;
pub mod init;
pub mod move_card;
pub mod set_cell;
pub mod table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// What a command produced. Each command fills the parts it needs.
#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    /// Table rows, filtered and sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lanes: Vec<Lane>,
    /// The columns the rows are shown with.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Property columns found in the rows that no configured column covers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_columns: Vec<Column>,
    /// Rows written or created.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ViewConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_lanes(mut self, lanes: Vec<Lane>) -> Self {
        self.lanes = lanes;
        self
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_affected_rows(mut self, rows: Vec<Row>) -> Self {
        self.affected_rows = rows;
        self
    }

    pub fn with_config(mut self, config: ViewConfig) -> Self {
        self.config = Some(config);
        self
    }
}
