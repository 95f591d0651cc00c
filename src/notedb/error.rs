use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotedbError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No database view found on {0}")]
    ViewNotFound(String),

    #[error("A database view already exists on {0}")]
    ViewExists(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column {0} is derived and cannot be edited")]
    ReadOnlyColumn(String),

    #[error("Column {0} cannot be used to group a board")]
    NotGroupable(String),

    #[error("'{0}' is reserved for the empty lane and cannot be stored")]
    ReservedValue(String),

    #[error("Invalid view configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed frontmatter in {path}: {message}")]
    Frontmatter { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, NotedbError>;
