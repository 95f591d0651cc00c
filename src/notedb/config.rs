use crate::error::{NotedbError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory under the store root holding notedb's own files.
pub const CONFIG_DIR: &str = ".notedb";
const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_FILE_EXT: &str = ".md";

/// Store settings, kept in `.notedb/config.json` under the store root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotedbConfig {
    /// Extension of documents read as rows and used for new documents.
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// Skip files and directories whose name starts with a dot.
    #[serde(default = "default_ignore_hidden")]
    pub ignore_hidden: bool,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_ignore_hidden() -> bool {
    true
}

impl Default for NotedbConfig {
    fn default() -> Self {
        Self {
            file_ext: default_file_ext(),
            ignore_hidden: default_ignore_hidden(),
        }
    }
}

impl NotedbConfig {
    /// Load config from `config_dir`, or defaults if there is none.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotedbError::Io)?;
        let mut config: NotedbConfig =
            serde_json::from_str(&content).map_err(NotedbError::Serialization)?;
        let ext = config.file_ext.clone();
        config.set_file_ext(&ext);
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotedbError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotedbError::Serialization)?;
        fs::write(config_path, content).map_err(NotedbError::Io)?;
        Ok(())
    }

    /// Set the file extension, normalized to start with a dot.
    pub fn set_file_ext(&mut self, ext: &str) {
        let ext = ext.trim();
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    /// Whether `file_name` is a document this store reads.
    pub fn is_document(&self, file_name: &str) -> bool {
        if self.ignore_hidden && file_name.starts_with('.') {
            return false;
        }
        file_name.len() > self.file_ext.len()
            && file_name
                .to_ascii_lowercase()
                .ends_with(&self.file_ext.to_ascii_lowercase())
    }
}
