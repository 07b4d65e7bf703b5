//! The autosaved draft of the report being filled in.

use tracing::{info, warn};

use crate::catalog;
use crate::photos::PhotoRecord;
use crate::report::{self, ReportError};
use crate::storage::{Storage, StorageError};
use birdability_types::AnswerTree;

/// Entry holding the report JSON, including the embedded photo list.
pub const FORM_DATA_KEY: &str = "birdabilityFormData";
/// Entry holding the photo metadata list.
pub const PHOTOS_KEY: &str = "birdabilityPhotos";

/// Error type for saving drafts.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Could not encode photo list: {0}")]
    Photos(#[from] serde_json::Error),
}

/// What a stored draft held. Missing or unreadable parts are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub tree: Option<AnswerTree>,
    pub photos: Vec<PhotoRecord>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.tree.is_none() && self.photos.is_empty()
    }
}

/// Saves and loads the draft through a `Storage`.
#[derive(Debug, Clone, Default)]
pub struct DraftStore<S> {
    storage: S,
}

impl<S: Storage> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write both draft entries.
    pub fn save(&mut self, tree: &AnswerTree, photos: &[PhotoRecord]) -> Result<(), DraftError> {
        let document = report::report_string(tree, photos)?;
        let photo_list = serde_json::to_string(photos)?;
        self.storage.write(FORM_DATA_KEY, &document)?;
        self.storage.write(PHOTOS_KEY, &photo_list)?;
        info!(photos = photos.len(), "draft saved");
        Ok(())
    }

    /// Read both draft entries independently. Failures are logged and skipped.
    pub fn load(&self) -> Draft {
        let tree = self.read_entry(FORM_DATA_KEY).and_then(|text| {
            match report::parse_report(&text) {
                Ok(imported) => Some(imported.tree),
                Err(err) => {
                    warn!(%err, "ignoring unreadable draft");
                    None
                }
            }
        });

        let photos = self
            .read_entry(PHOTOS_KEY)
            .and_then(|text| match serde_json::from_str::<Vec<PhotoRecord>>(&text) {
                Ok(photos) => Some(photos),
                Err(err) => {
                    warn!(%err, "ignoring unreadable photo list");
                    None
                }
            })
            .unwrap_or_default();

        Draft { tree, photos }
    }

    /// Remove both draft entries.
    pub fn clear(&mut self) -> Result<(), DraftError> {
        self.storage.remove(FORM_DATA_KEY)?;
        self.storage.remove(PHOTOS_KEY)?;
        info!("draft cleared");
        Ok(())
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        match self.storage.read(key) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, %err, "draft entry not readable");
                None
            }
        }
    }
}

/// Whether a draft tree holds a location or trail name worth keeping.
pub fn has_names(tree: &AnswerTree) -> bool {
    [catalog::paths::LOCATION_NAME, catalog::paths::TRAIL_NAME]
        .into_iter()
        .any(|path| tree.text(&path.into()).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use birdability_types::{FieldPath, TriState};

    fn record(id: &str) -> PhotoRecord {
        PhotoRecord {
            id: id.to_string(),
            name: format!("{id}.jpg"),
            size: 100,
            mime: "image/jpeg".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn save_then_load() {
        let mut tree = AnswerTree::new();
        tree.insert("generalInformation.locationName", "Test Park")
            .unwrap();
        tree.insert("accessibilityDetailed.steps.present", TriState::No)
            .unwrap();

        let mut store = DraftStore::new(MemoryStorage::new());
        store.save(&tree, &[record("photo_1")]).unwrap();
        assert_eq!(store.storage().len(), 2);

        let draft = store.load();
        let loaded = draft.tree.unwrap();
        assert_eq!(
            loaded.text(&FieldPath::new("generalInformation.locationName")),
            Some("Test Park")
        );
        assert_eq!(
            loaded
                .get_tri_state(&FieldPath::new("accessibilityDetailed.steps.present"))
                .unwrap(),
            TriState::No
        );
        assert_eq!(draft.photos, vec![record("photo_1")]);
    }

    #[test]
    fn load_fails_soft_per_entry() {
        let mut storage = MemoryStorage::new();
        storage.write(FORM_DATA_KEY, "{broken").unwrap();
        storage
            .write(PHOTOS_KEY, &serde_json::to_string(&[record("p")]).unwrap())
            .unwrap();

        let draft = DraftStore::new(storage).load();
        assert!(draft.tree.is_none());
        assert_eq!(draft.photos.len(), 1);
    }

    #[test]
    fn empty_storage_loads_empty_draft() {
        let store = DraftStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn clear_removes_both_entries() {
        let mut store = DraftStore::new(MemoryStorage::new());
        store.save(&AnswerTree::new(), &[]).unwrap();
        store.clear().unwrap();
        assert!(store.storage().is_empty());
    }

    #[test]
    fn names_count_as_content() {
        let mut tree = AnswerTree::new();
        assert!(!has_names(&tree));
        tree.insert("generalInformation.trailName", "Loop").unwrap();
        assert!(has_names(&tree));
    }
}
