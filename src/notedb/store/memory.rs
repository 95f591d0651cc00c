use super::{document_from, new_document, parse_document, unique_id, DataStore};
use crate::error::{NotedbError, Result};
use crate::frontmatter::{Frontmatter, UPDATED_KEY};
use crate::model::{normalize_folder, Document};
use crate::view::config::ViewConfig;
use crate::view::patch::MetadataPatch;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Clone)]
struct Entry {
    text: String,
    mtime: DateTime<Utc>,
}

/// In-memory document store for testing.
///
/// Documents are kept as raw text and go through the same frontmatter codec
/// as the file store. The write-error switch sits behind a `RefCell` so a
/// test can flip it through a shared reference.
#[derive(Default)]
pub struct InMemoryStore {
    docs: BTreeMap<String, Entry>,
    simulate_write_error: RefCell<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document from raw text.
    pub fn with_document(mut self, id: &str, text: &str) -> Self {
        self.insert(id, text);
        self
    }

    pub fn insert(&mut self, id: &str, text: &str) {
        self.docs.insert(
            id.to_string(),
            Entry {
                text: text.to_string(),
                mtime: Utc::now(),
            },
        );
    }

    /// Raw text of a document.
    pub fn text(&self, id: &str) -> Option<String> {
        self.docs.get(id).map(|e| e.text.clone())
    }

    /// Make every following write fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(NotedbError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Frontmatter> {
        let entry = self
            .docs
            .get(id)
            .ok_or_else(|| NotedbError::DocumentNotFound(id.to_string()))?;
        Frontmatter::parse(id, &entry.text)
    }

    fn write(&mut self, id: &str, fm: &Frontmatter, at: DateTime<Utc>) -> Result<()> {
        self.check_writable()?;
        self.docs.insert(
            id.to_string(),
            Entry {
                text: fm.render()?,
                mtime: at,
            },
        );
        Ok(())
    }
}

impl DataStore for InMemoryStore {
    fn list_documents(&self) -> Result<Vec<Document>> {
        let mut docs = Vec::with_capacity(self.docs.len());
        for (id, entry) in &self.docs {
            match parse_document(id, &entry.text, entry.mtime) {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(%id, error = %e, "skipping unreadable document"),
            }
        }
        Ok(docs)
    }

    fn get_document(&self, id: &str) -> Result<Document> {
        let entry = self
            .docs
            .get(id)
            .ok_or_else(|| NotedbError::DocumentNotFound(id.to_string()))?;
        parse_document(id, &entry.text, entry.mtime)
    }

    fn apply_patch(&mut self, id: &str, patch: &MetadataPatch) -> Result<Document> {
        let mut fm = self.read(id)?;
        fm.apply_patch(patch)?;
        let now = Utc::now();
        fm.set_timestamp(UPDATED_KEY, now);
        self.write(id, &fm, now)?;
        Ok(document_from(id, &fm, now))
    }

    fn create_document(
        &mut self,
        folder: &str,
        title: &str,
        initial: &[MetadataPatch],
    ) -> Result<Document> {
        let folder = normalize_folder(folder);
        let id = unique_id(&folder, title, self.file_ext(), |candidate| {
            self.docs.contains_key(candidate)
        });
        let now = Utc::now();
        let fm = new_document(title, initial, now)?;
        self.write(&id, &fm, now)?;
        Ok(document_from(&id, &fm, now))
    }

    fn load_view(&self, owner: &str) -> Result<Option<ViewConfig>> {
        match self.read(owner) {
            Ok(fm) => fm.view_config(owner),
            Err(NotedbError::DocumentNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save_view(&mut self, owner: &str, config: &ViewConfig) -> Result<()> {
        let now = Utc::now();
        let mut fm = match self.read(owner) {
            Ok(fm) => fm,
            Err(NotedbError::DocumentNotFound(_)) => {
                new_document(super::stem(owner), &[], now)?
            }
            Err(e) => return Err(e),
        };
        fm.set_view_config(config)?;
        self.write(owner, &fm, now)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::projects_store;
    use super::*;
    use crate::model::PropertyValue;
    use crate::view::config::Source;
    use crate::view::value::ValueKind;

    #[test]
    fn fixture_rows_exclude_owner_and_other_folders() {
        let (store, owner) = projects_store();
        let rows = store.rows(&Source::folder("Projects")).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Projects/a.md", "Projects/b.md", "Projects/c.md"]);
        assert!(store.get_document(&owner).unwrap().owns_view);
    }

    #[test]
    fn write_error_simulation() {
        let (mut store, _) = projects_store();
        store.set_simulate_write_error(true);
        let result = store.apply_patch(
            "Projects/a.md",
            &MetadataPatch::Property {
                key: "status".into(),
                value: PropertyValue::from_text(ValueKind::Text, "Done"),
            },
        );
        assert!(matches!(result, Err(NotedbError::Store(_))));
        let doc = store.get_document("Projects/a.md").unwrap();
        assert_eq!(
            doc.row.properties["status"],
            PropertyValue::from_text(ValueKind::Text, "Backlog")
        );

        store.set_simulate_write_error(false);
        assert!(store
            .apply_patch(
                "Projects/a.md",
                &MetadataPatch::Title {
                    title: "A2".into()
                }
            )
            .is_ok());
    }

    #[test]
    fn create_and_view_round_trip() {
        let mut store = InMemoryStore::new();
        let doc = store
            .create_document("Work", "Plan", &[])
            .unwrap();
        assert_eq!(doc.id(), "Work/plan.md");
        assert!(store.text("Work/plan.md").unwrap().contains("title: Plan"));

        let config = ViewConfig::for_folder("Work", &[]);
        store.save_view("Work/Work.md", &config).unwrap();
        assert_eq!(store.load_view("Work/Work.md").unwrap(), Some(config));
        assert_eq!(store.load_view("Work/nothing.md").unwrap(), None);
    }
}
