//! # Storage Layer
//!
//! The view engine never touches storage. Rows come from a [`DataStore`],
//! and edits go back to it as [`MetadataPatch`]es.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: a directory tree of Markdown documents
//!   - Row id = path relative to the root, `/`-separated
//!   - Metadata lives in each document's YAML frontmatter
//!   - Writes are atomic (temp file + rename)
//!
//! - [`memory::InMemoryStore`]: documents held as text in memory, for tests
//!   - Can simulate write failures
//!
//! Both go through the same [`Frontmatter`] codec, so a document behaves the
//! same in either store.
//!
//! ## Layout
//!
//! ```text
//! notes/
//! ├── .notedb/config.json        # store settings
//! ├── Projects/
//! │   ├── Projects.md            # folder note, owns the view (`notedb:` key)
//! │   ├── alpha.md               # row
//! │   └── beta.md                # row
//! └── inbox.md
//! ```

use crate::error::Result;
use crate::frontmatter::{Frontmatter, CREATED_KEY, UPDATED_KEY};
use crate::model::{normalize_folder, Document, Row};
use crate::view::config::{Source, ViewConfig};
use crate::view::patch::MetadataPatch;
use chrono::{DateTime, Utc};

pub mod fs;
pub mod memory;

pub const DEFAULT_EXT: &str = ".md";

/// Abstract interface for document storage.
pub trait DataStore {
    /// All documents, ordered by id.
    fn list_documents(&self) -> Result<Vec<Document>>;

    fn get_document(&self, id: &str) -> Result<Document>;

    /// Write `patch` into the document's metadata and bump its `updated`
    /// timestamp.
    fn apply_patch(&mut self, id: &str, patch: &MetadataPatch) -> Result<Document>;

    /// Create a new document in `folder` with a unique file name derived from
    /// `title`, then apply `initial` to it.
    fn create_document(
        &mut self,
        folder: &str,
        title: &str,
        initial: &[MetadataPatch],
    ) -> Result<Document>;

    /// The view configuration stored on `owner`, if any.
    fn load_view(&self, owner: &str) -> Result<Option<ViewConfig>>;

    /// Store `config` on `owner`, creating the document when it is missing.
    fn save_view(&mut self, owner: &str, config: &ViewConfig) -> Result<()>;

    /// Extension used for new documents.
    fn file_ext(&self) -> &str {
        DEFAULT_EXT
    }

    /// The rows `source` selects, ordered by id.
    fn rows(&self, source: &Source) -> Result<Vec<Row>> {
        let docs = self.list_documents()?;
        let rows: Vec<Row> = docs
            .into_iter()
            .filter(|doc| source.selects(doc))
            .map(|doc| doc.row)
            .collect();
        tracing::debug!(%source, rows = rows.len(), "loaded rows");
        Ok(rows)
    }

    /// Id of the folder note owning `folder`'s view.
    fn folder_note_id(&self, folder: &str) -> String {
        folder_note_id(folder, self.file_ext())
    }
}

/// `<folder>/<folder-name><ext>`; the root's note is `index<ext>`.
pub fn folder_note_id(folder: &str, ext: &str) -> String {
    let folder = normalize_folder(folder);
    if folder.is_empty() {
        return format!("index{}", ext);
    }
    let name = folder.rsplit('/').next().unwrap_or(&folder);
    format!("{}/{}{}", folder, name, ext)
}

/// File-name-safe slug: lowercase alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

/// The first id `<folder>/<slug>[-n]<ext>` for which `taken` is false.
pub fn unique_id(folder: &str, title: &str, ext: &str, taken: impl Fn(&str) -> bool) -> String {
    let folder = normalize_folder(folder);
    let slug = slugify(title);
    let join = |name: &str| {
        if folder.is_empty() {
            format!("{}{}", name, ext)
        } else {
            format!("{}/{}{}", folder, name, ext)
        }
    };

    let mut candidate = join(&slug);
    let mut n = 2;
    while taken(&candidate) {
        candidate = join(&format!("{}-{}", slug, n));
        n += 1;
    }
    candidate
}

/// File stem of a store id.
pub fn stem(id: &str) -> &str {
    let name = id.rsplit('/').next().unwrap_or(id);
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// Parse stored text into a document.
pub fn parse_document(id: &str, text: &str, modified: DateTime<Utc>) -> Result<Document> {
    let fm = Frontmatter::parse(id, text)?;
    Ok(document_from(id, &fm, modified))
}

pub(crate) fn document_from(id: &str, fm: &Frontmatter, modified: DateTime<Utc>) -> Document {
    let mut doc = Document::new(fm.to_row(id, stem(id), modified), fm.body.clone());
    doc.owns_view = fm.owns_view();
    doc
}

/// Frontmatter for a brand-new document.
pub(crate) fn new_document(title: &str, initial: &[MetadataPatch], now: DateTime<Utc>) -> Result<Frontmatter> {
    let mut fm = Frontmatter::default();
    fm.set_title(title);
    fm.set_timestamp(CREATED_KEY, now);
    fm.set_timestamp(UPDATED_KEY, now);
    for patch in initial {
        fm.apply_patch(patch)?;
    }
    Ok(fm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_note_ids() {
        assert_eq!(folder_note_id("Projects", ".md"), "Projects/Projects.md");
        assert_eq!(folder_note_id("./a/b/", ".md"), "a/b/b.md");
        assert_eq!(folder_note_id("", ".md"), "index.md");
    }

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Task: #42  "), "task-42");
        assert_eq!(slugify("???"), "untitled");
        assert_eq!(slugify("Ünïcode Title"), "ünïcode-title");
    }

    #[test]
    fn unique_id_appends_counter() {
        let taken = ["P/task.md", "P/task-2.md"];
        assert_eq!(
            unique_id("P", "Task", ".md", |id| taken.contains(&id)),
            "P/task-3.md"
        );
        assert_eq!(unique_id("", "Note", ".md", |_| false), "note.md");
    }

    #[test]
    fn stems() {
        assert_eq!(stem("P/alpha.md"), "alpha");
        assert_eq!(stem("readme"), "readme");
        assert_eq!(stem("a/.hidden"), ".hidden");
    }
}
