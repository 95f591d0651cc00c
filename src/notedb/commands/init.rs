use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NotedbError, Result};
use crate::model::normalize_folder;
use crate::store::DataStore;
use crate::view::config::{Source, ViewConfig};

/// Turn `folder` into a database view stored on its folder note.
pub fn run<S: DataStore>(store: &mut S, folder: &str) -> Result<CmdResult> {
    let folder = normalize_folder(folder);
    let owner = store.folder_note_id(&folder);
    if store.load_view(&owner)?.is_some() {
        return Err(NotedbError::ViewExists(owner));
    }

    let rows = store.rows(&Source::folder(&folder))?;
    let config = ViewConfig::for_folder(&folder, &rows);
    store.save_view(&owner, &config)?;

    let mut result = CmdResult::default().with_config(config);
    result.add_message(CmdMessage::success(format!(
        "Database view created on {} ({} rows, {} columns)",
        owner,
        rows.len(),
        result.config.as_ref().map_or(0, |c| c.columns.len())
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn creates_view_with_discovered_columns() {
        let mut store = InMemoryStore::new()
            .with_document("Work/a.md", "---\ntitle: A\npriority: 2\n---\n")
            .with_document("Work/b.md", "---\ntitle: B\nowner: sam\n---\n");
        let result = run(&mut store, "Work").unwrap();
        let config = result.config.unwrap();
        let ids: Vec<&str> = config.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["title", "tags", "updated", "priority", "owner"]);

        let saved = store.load_view("Work/Work.md").unwrap();
        assert_eq!(saved, Some(config));
    }

    #[test]
    fn refuses_to_overwrite_existing_view() {
        let mut store = InMemoryStore::new();
        run(&mut store, "Work").unwrap();
        assert!(matches!(
            run(&mut store, "./Work/"),
            Err(NotedbError::ViewExists(_))
        ));
    }
}
