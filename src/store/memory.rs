use super::{ObjectEntry, ObjectStore, PutOptions, StoredObject};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory [`ObjectStore`] used by the test suite.
///
/// A `BTreeMap` keyed by object name gives the lexicographic listing order
/// the S3 contract guarantees.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys, in listing order.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Removes an object, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.objects.lock().unwrap().remove(key).is_some()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, PipelineError> {
        let objects = self.objects.lock().unwrap();
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| ObjectEntry {
                key: k.clone(),
                size: v.body.len() as u64,
            })
            .collect())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, PipelineError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, body: Vec<u8>, opts: PutOptions) -> Result<(), PipelineError> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: opts.content_type,
                cache_control: opts.cache_control,
                custom_metadata: opts.custom_metadata,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_is_prefix_scoped_and_ordered() {
        let store = MemoryStore::new();
        for key in ["raw/b", "raw/a", "hourly/x"] {
            store
                .put(key, b"{}".to_vec(), PutOptions::default())
                .await
                .unwrap();
        }

        let listed = store.list("raw/").await.unwrap();
        let keys: Vec<_> = listed.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["raw/a", "raw/b"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_preserves_metadata() {
        let store = MemoryStore::new();
        let opts = PutOptions::ndjson().metadata("spotCount", "3");
        store.put("raw/a", b"x".to_vec(), opts).await.unwrap();

        let obj = store.get("raw/a").await.unwrap().unwrap();
        assert_eq!(obj.content_type.as_deref(), Some("application/x-ndjson"));
        assert_eq!(obj.custom_metadata.get("spotCount").unwrap(), "3");
    }
}
