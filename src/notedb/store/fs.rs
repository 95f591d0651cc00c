use super::{document_from, new_document, unique_id, DataStore};
use crate::config::{NotedbConfig, CONFIG_DIR};
use crate::error::{NotedbError, Result};
use crate::frontmatter::{Frontmatter, UPDATED_KEY};
use crate::model::{normalize_folder, Document};
use crate::view::config::ViewConfig;
use crate::view::patch::MetadataPatch;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Documents on disk under one root directory.
pub struct FileStore {
    root: PathBuf,
    config: NotedbConfig,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: NotedbConfig::default(),
        }
    }

    /// Open `root`, reading `.notedb/config.json` when present.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(NotedbError::Store(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let config = NotedbConfig::load(root.join(CONFIG_DIR))?;
        Ok(Self::new(root).with_config(config))
    }

    pub fn with_config(mut self, config: NotedbConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &NotedbConfig {
        &self.config
    }

    /// Resolve a store id to a path under the root. Ids that would escape
    /// the root are rejected.
    fn path_of(&self, id: &str) -> Result<PathBuf> {
        let relative = Path::new(id);
        let safe = !id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(NotedbError::DocumentNotFound(id.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn read(&self, id: &str) -> Result<(Frontmatter, DateTime<Utc>)> {
        let path = self.path_of(id)?;
        if !path.is_file() {
            return Err(NotedbError::DocumentNotFound(id.to_string()));
        }
        let text = fs::read_to_string(&path).map_err(NotedbError::Io)?;
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        Ok((Frontmatter::parse(id, &text)?, modified))
    }

    /// Render and write atomically, creating parent folders as needed.
    fn write(&self, id: &str, fm: &Frontmatter) -> Result<()> {
        let path = self.path_of(id)?;
        let parent = path.parent().unwrap_or(&self.root).to_path_buf();
        if !parent.exists() {
            fs::create_dir_all(&parent).map_err(NotedbError::Io)?;
        }

        let content = fm.render()?;
        let tmp_path = parent.join(format!(".doc-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(NotedbError::Io)?;
        fs::rename(&tmp_path, &path).map_err(NotedbError::Io)?;
        Ok(())
    }

    fn collect_ids(&self, dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(NotedbError::Io)?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path");
                continue;
            };
            let id = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            let file_type = entry.file_type().map_err(NotedbError::Io)?;

            if file_type.is_dir() {
                if name == CONFIG_DIR || (self.config.ignore_hidden && name.starts_with('.')) {
                    continue;
                }
                self.collect_ids(&entry.path(), &id, out)?;
            } else if file_type.is_file() && self.config.is_document(&name) {
                out.push(id);
            }
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn list_documents(&self) -> Result<Vec<Document>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        self.collect_ids(&self.root, "", &mut ids)?;

        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.read(&id) {
                Ok((fm, modified)) => docs.push(document_from(&id, &fm, modified)),
                Err(e @ NotedbError::Frontmatter { .. }) => {
                    tracing::warn!(%id, error = %e, "skipping unreadable document");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(docs)
    }

    fn get_document(&self, id: &str) -> Result<Document> {
        let (fm, modified) = self.read(id)?;
        Ok(document_from(id, &fm, modified))
    }

    fn apply_patch(&mut self, id: &str, patch: &MetadataPatch) -> Result<Document> {
        let (mut fm, _) = self.read(id)?;
        fm.apply_patch(patch)?;
        let now = Utc::now();
        fm.set_timestamp(UPDATED_KEY, now);
        self.write(id, &fm)?;
        tracing::info!(%id, field = patch.target(), "wrote metadata patch");
        Ok(document_from(id, &fm, now))
    }

    fn create_document(
        &mut self,
        folder: &str,
        title: &str,
        initial: &[MetadataPatch],
    ) -> Result<Document> {
        let folder = normalize_folder(folder);
        let id = unique_id(&folder, title, &self.config.file_ext, |candidate| {
            self.root.join(candidate).exists()
        });
        let now = Utc::now();
        let fm = new_document(title, initial, now)?;
        self.write(&id, &fm)?;
        tracing::info!(%id, "created document");
        Ok(document_from(&id, &fm, now))
    }

    fn load_view(&self, owner: &str) -> Result<Option<ViewConfig>> {
        match self.read(owner) {
            Ok((fm, _)) => fm.view_config(owner),
            Err(NotedbError::DocumentNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save_view(&mut self, owner: &str, config: &ViewConfig) -> Result<()> {
        let mut fm = match self.read(owner) {
            Ok((fm, _)) => fm,
            Err(NotedbError::DocumentNotFound(_)) => {
                let title = super::stem(owner).to_string();
                new_document(&title, &[], Utc::now())?
            }
            Err(e) => return Err(e),
        };
        fm.set_view_config(config)?;
        self.write(owner, &fm)?;
        tracing::info!(%owner, "saved view configuration");
        Ok(())
    }

    fn file_ext(&self) -> &str {
        &self.config.file_ext
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyValue;
    use crate::view::config::Source;
    use crate::view::value::ValueKind;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Projects/sub")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(
            root.join("Projects/alpha.md"),
            "---\ntitle: Alpha\nstatus: Doing\n---\nalpha body\n",
        )
        .unwrap();
        fs::write(root.join("Projects/beta.md"), "# Beta\n").unwrap();
        fs::write(root.join("Projects/sub/gamma.md"), "gamma").unwrap();
        fs::write(root.join("Projects/notes.txt"), "ignored").unwrap();
        fs::write(root.join(".git/HEAD.md"), "ignored").unwrap();
        let store = FileStore::open(root).unwrap();
        (dir, store)
    }

    #[test]
    fn lists_documents_sorted_and_skips_hidden() {
        let (_dir, store) = setup();
        let ids: Vec<String> = store
            .list_documents()
            .unwrap()
            .into_iter()
            .map(|d| d.row.id)
            .collect();
        assert_eq!(
            ids,
            vec!["Projects/alpha.md", "Projects/beta.md", "Projects/sub/gamma.md"]
        );
    }

    #[test]
    fn rows_follow_source() {
        let (_dir, store) = setup();
        let rows = store.rows(&Source::folder("Projects")).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn malformed_document_is_skipped_in_listing() {
        let (dir, store) = setup();
        fs::write(dir.path().join("Projects/bad.md"), "---\n: [\n---\n").unwrap();
        let docs = store.list_documents().unwrap();
        assert_eq!(docs.len(), 3);
        assert!(store.get_document("Projects/bad.md").is_err());
    }

    #[test]
    fn patch_rewrites_frontmatter_only() {
        let (dir, mut store) = setup();
        let doc = store
            .apply_patch(
                "Projects/alpha.md",
                &MetadataPatch::Property {
                    key: "status".into(),
                    value: PropertyValue::from_text(ValueKind::Text, "Done"),
                },
            )
            .unwrap();
        assert_eq!(
            doc.row.properties["status"],
            PropertyValue::from_text(ValueKind::Text, "Done")
        );

        let text = fs::read_to_string(dir.path().join("Projects/alpha.md")).unwrap();
        assert!(text.starts_with("---\ntitle: Alpha\nstatus: Done\nupdated:"));
        assert!(text.ends_with("---\nalpha body\n"));
    }

    #[test]
    fn patch_missing_document_fails() {
        let (_dir, mut store) = setup();
        let result = store.apply_patch(
            "Projects/nope.md",
            &MetadataPatch::Title {
                title: "x".into(),
            },
        );
        assert!(matches!(result, Err(NotedbError::DocumentNotFound(_))));
    }

    #[test]
    fn ids_cannot_escape_root() {
        let (_dir, store) = setup();
        assert!(matches!(
            store.get_document("../outside.md"),
            Err(NotedbError::DocumentNotFound(_))
        ));
        assert!(store.get_document("/etc/passwd").is_err());
    }

    #[test]
    fn create_document_picks_unique_name() {
        let (dir, mut store) = setup();
        let first = store.create_document("Projects", "Alpha", &[]).unwrap();
        assert_eq!(first.row.id, "Projects/alpha-2.md");
        assert_eq!(first.row.title, "Alpha");

        let second = store
            .create_document(
                "New Folder",
                "Task: one",
                &[MetadataPatch::Tags {
                    tags: vec!["todo".into()],
                }],
            )
            .unwrap();
        assert_eq!(second.row.id, "New Folder/task-one.md");
        assert_eq!(second.row.tags, vec!["todo".to_string()]);
        assert!(dir.path().join("New Folder/task-one.md").is_file());
    }

    #[test]
    fn save_and_load_view_on_new_folder_note() {
        let (dir, mut store) = setup();
        let owner = store.folder_note_id("Projects");
        assert_eq!(owner, "Projects/Projects.md");
        assert_eq!(store.load_view(&owner).unwrap(), None);

        let config = ViewConfig::for_folder("Projects", &[]);
        store.save_view(&owner, &config).unwrap();
        assert_eq!(store.load_view(&owner).unwrap(), Some(config));
        assert!(dir.path().join("Projects/Projects.md").is_file());

        // The owner is not a row of its own view.
        let rows = store.rows(&Source::folder("Projects")).unwrap();
        assert!(rows.iter().all(|r| r.id != owner));
    }

    #[test]
    fn custom_extension() {
        let (dir, _) = setup();
        let mut config = NotedbConfig::default();
        config.set_file_ext("txt");
        config.save(dir.path().join(CONFIG_DIR)).unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        let ids: Vec<String> = store
            .list_documents()
            .unwrap()
            .into_iter()
            .map(|d| d.row.id)
            .collect();
        assert_eq!(ids, vec!["Projects/notes.txt"]);
        assert_eq!(store.config().file_ext, ".txt");
        assert_eq!(store.root(), dir.path());
        assert_eq!(store.folder_note_id("Projects"), "Projects/Projects.txt");
    }
}
