//! Object-store abstraction.
//!
//! The pipeline needs exactly three operations from its store: list by
//! prefix, get with custom metadata, and put with content-type,
//! cache-control, and custom metadata. [`S3Store`](s3::S3Store) backs
//! production; [`MemoryStore`](memory::MemoryStore) backs the test suite.

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use crate::error::PipelineError;
use async_trait::async_trait;
use std::collections::HashMap;

/// One entry from a prefix listing.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

/// A fetched object: body plus the HTTP and custom metadata written
/// alongside it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub custom_metadata: HashMap<String, String>,
}

impl StoredObject {
    /// Interprets the body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Write options: HTTP metadata plus free-form custom metadata.
#[derive(Debug, Clone, Default)]
pub struct PutOptions {
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub custom_metadata: HashMap<String, String>,
}

impl PutOptions {
    pub fn json() -> Self {
        PutOptions {
            content_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }

    pub fn ndjson() -> Self {
        PutOptions {
            content_type: Some("application/x-ndjson".to_string()),
            ..Default::default()
        }
    }

    pub fn cache_control(mut self, value: &str) -> Self {
        self.cache_control = Some(value.to_string());
        self
    }

    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.custom_metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// Cache policy for content-addressed rollup files and their sidecars.
pub const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";
/// Cache policy for the mutable manifest.
pub const CACHE_MANIFEST: &str = "public, max-age=60";
/// Cache policy for summaries, which are overwritten in place.
pub const CACHE_SUMMARY: &str = "public, max-age=300";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists keys under `prefix` in lexicographic order.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, PipelineError>;

    /// Fetches one object, or `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, PipelineError>;

    /// Writes one object with the given HTTP and custom metadata.
    async fn put(&self, key: &str, body: Vec<u8>, opts: PutOptions) -> Result<(), PipelineError>;
}
