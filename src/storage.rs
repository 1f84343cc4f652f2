use crate::errors::StoreError;
use crate::models::Tracker;
use async_trait::async_trait;
use std::{
    collections::HashMap,
    path::PathBuf,
};
use tokio::{fs, sync::Mutex};
use tracing::debug;

/// Whole-document persistence keyed by collection and key.
///
/// Writes always replace the stored document; there is no partial update.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_document(&self, collection: &str, key: &str) -> Result<Option<Tracker>, StoreError>;

    async fn put_document(&self, collection: &str, key: &str, value: &Tracker) -> Result<(), StoreError>;
}

/// One pretty-printed JSON file per document: `<root>/<collection>/<key>.json`.
pub struct FileDocumentStore {
    root: PathBuf,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn document_path(&self, collection: &str, key: &str) -> Result<PathBuf, StoreError> {
        check_segment(collection)?;
        check_segment(key)?;
        Ok(self.root.join(collection).join(format!("{key}.json")))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get_document(&self, collection: &str, key: &str) -> Result<Option<Tracker>, StoreError> {
        let path = self.document_path(collection, key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode(&bytes).map(Some)
    }

    async fn put_document(&self, collection: &str, key: &str, value: &Tracker) -> Result<(), StoreError> {
        let path = self.document_path(collection, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(value)?;
        fs::write(&path, payload).await?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Keeps serialized documents in memory, so reads go through the same
/// decoding and validation as the file store.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_document(&self, collection: &str, key: &str) -> Result<Option<Tracker>, StoreError> {
        check_segment(collection)?;
        check_segment(key)?;
        let documents = self.documents.lock().await;
        match documents.get(&(collection.to_string(), key.to_string())) {
            Some(bytes) => decode(bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn put_document(&self, collection: &str, key: &str, value: &Tracker) -> Result<(), StoreError> {
        check_segment(collection)?;
        check_segment(key)?;
        let payload = serde_json::to_vec(value)?;
        self.documents
            .lock()
            .await
            .insert((collection.to_string(), key.to_string()), payload);
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> Result<Tracker, StoreError> {
    let tracker: Tracker = serde_json::from_slice(bytes)?;
    tracker.validate()?;
    Ok(tracker)
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    let escapes = segment.is_empty()
        || segment.starts_with('.')
        || segment.contains(['/', '\\', '\0']);
    if escapes {
        return Err(StoreError::InvalidKey(segment.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::USERS_COLLECTION;
    use crate::tracker::{DayEdit, WeekEdit};

    fn unique_root() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("gym_tracker_store_{}_{}", std::process::id(), nanos));
        path
    }

    fn sample() -> Tracker {
        Tracker::default()
            .set_field(0, 0, DayEdit::Workout("Squat 5x5".into()))
            .and_then(|t| t.set_field(11, 5, DayEdit::Done(true)))
            .and_then(|t| t.set_week_field(3, WeekEdit::Weight("79.2".into())))
            .unwrap()
    }

    #[tokio::test]
    async fn file_store_round_trips() {
        let root = unique_root();
        let store = FileDocumentStore::new(&root);
        let tracker = sample();

        store.put_document(USERS_COLLECTION, "alice", &tracker).await.unwrap();
        store.put_document(USERS_COLLECTION, "alice", &tracker).await.unwrap();
        let loaded = store.get_document(USERS_COLLECTION, "alice").await.unwrap();
        assert_eq!(loaded, Some(tracker));

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn file_store_missing_document_is_none() {
        let store = FileDocumentStore::new(unique_root());
        let loaded = store.get_document(USERS_COLLECTION, "nobody").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_document() {
        let root = unique_root();
        let store = FileDocumentStore::new(&root);
        let path = store.document_path(USERS_COLLECTION, "bob").unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"{\"weeks\": []}").unwrap();

        let result = store.get_document(USERS_COLLECTION, "bob").await;
        assert!(matches!(result, Err(StoreError::Encoding(_))));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn rejects_keys_outside_collection() {
        let store = FileDocumentStore::new("data");
        for key in ["", "../etc", "a/b", ".hidden", "a\\b"] {
            assert!(matches!(
                store.document_path(USERS_COLLECTION, key),
                Err(StoreError::InvalidKey(_))
            ));
        }
        assert!(store.document_path(USERS_COLLECTION, "uid-123").is_ok());
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryDocumentStore::new();
        store.put_document(USERS_COLLECTION, "alice", &Tracker::default()).await.unwrap();
        store.put_document(USERS_COLLECTION, "alice", &sample()).await.unwrap();

        let loaded = store.get_document(USERS_COLLECTION, "alice").await.unwrap();
        assert_eq!(loaded, Some(sample()));
        assert_eq!(store.documents.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_rejects_bad_collection_and_key() {
        let store = MemoryDocumentStore::new();
        let tracker = Tracker::default();
        for (collection, key) in [(USERS_COLLECTION, "../alice"), ("", "alice"), ("a/b", "alice")] {
            assert!(matches!(
                store.put_document(collection, key, &tracker).await,
                Err(StoreError::InvalidKey(_))
            ));
            assert!(matches!(
                store.get_document(collection, key).await,
                Err(StoreError::InvalidKey(_))
            ));
        }
        assert!(store.documents.lock().await.is_empty());
    }
}
