//! Storage boundary for vocabulary items
//!
//! The engine never touches persistence directly: the host hands it a
//! [`VocabularyStore`] and everything goes through awaited calls on that
//! trait. A browser-extension host bridges this to extension storage; the
//! in-memory implementation backs tests and local development.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::srs::models::SrsMetadata;

use super::models::VocabularyItem;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Host-provided access to the vocabulary corpus
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Every item in the corpus, in stored order
    async fn fetch_all(&self) -> Result<Vec<VocabularyItem>>;

    /// Look up a single item
    async fn get(&self, id: Uuid) -> Result<Option<VocabularyItem>>;

    /// Write updated scheduling metadata for an existing item, leaving the
    /// word fields as stored. Concurrent writers are not coordinated; the
    /// last write wins.
    async fn save_srs(&self, id: Uuid, srs: &SrsMetadata) -> Result<()>;
}

/// In-memory store for local development and tests
#[derive(Default, Clone)]
pub struct MemoryVocabularyStore {
    items: Arc<Mutex<Vec<VocabularyItem>>>,
}

impl MemoryVocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole corpus
    pub fn seed(&self, items: Vec<VocabularyItem>) -> Result<()> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Backend(format!("Failed to lock store: {}", e)))?;
        *guard = items;
        Ok(())
    }

    /// Append one captured item
    pub fn insert(&self, item: VocabularyItem) -> Result<()> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Backend(format!("Failed to lock store: {}", e)))?;
        guard.push(item);
        Ok(())
    }
}

#[async_trait]
impl VocabularyStore for MemoryVocabularyStore {
    async fn fetch_all(&self) -> Result<Vec<VocabularyItem>> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Backend(format!("Failed to lock store: {}", e)))?;
        Ok(guard.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<VocabularyItem>> {
        let guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Backend(format!("Failed to lock store: {}", e)))?;
        Ok(guard.iter().find(|item| item.id == id).cloned())
    }

    async fn save_srs(&self, id: Uuid, srs: &SrsMetadata) -> Result<()> {
        let mut guard = self
            .items
            .lock()
            .map_err(|e| StoreError::Backend(format!("Failed to lock store: {}", e)))?;
        let item = guard
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::ItemNotFound(id))?;
        item.srs = Some(srs.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn item(word: &str) -> VocabularyItem {
        VocabularyItem::new(
            word.to_string(),
            format!("{}-translated", word),
            "de".to_string(),
            "en".to_string(),
        )
    }

    #[tokio::test]
    async fn test_fetch_all_preserves_stored_order() {
        let store = MemoryVocabularyStore::new();
        let words = ["eins", "zwei", "drei"];
        store.seed(words.iter().map(|w| item(w)).collect()).unwrap();
        store.insert(item("vier")).unwrap();

        let fetched = store.fetch_all().await.unwrap();
        let fetched_words: Vec<&str> =
            fetched.iter().map(|it| it.original_word.as_str()).collect();
        assert_eq!(fetched_words, ["eins", "zwei", "drei", "vier"]);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = MemoryVocabularyStore::new();
        store.insert(item("eins")).unwrap();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_srs_replaces_metadata_only() {
        let store = MemoryVocabularyStore::new();
        let it = item("eins");
        let id = it.id;
        store.insert(it).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut srs = SrsMetadata::new(now);
        srs.box_index = 2;
        store.save_srs(id, &srs).await.unwrap();

        let stored = store.get(id).await.unwrap().unwrap();
        assert_eq!(stored.original_word, "eins");
        assert_eq!(stored.srs, Some(srs));
    }

    #[tokio::test]
    async fn test_save_srs_unknown_id_is_an_error() {
        let store = MemoryVocabularyStore::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let srs = SrsMetadata::new(now);

        let err = store.save_srs(Uuid::new_v4(), &srs).await.unwrap_err();
        assert!(matches!(err, StoreError::ItemNotFound(_)));
    }
}
