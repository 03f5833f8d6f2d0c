use super::{ObjectEntry, ObjectStore, PutOptions, StoredObject};
use crate::error::PipelineError;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;

/// [`ObjectStore`] backed by a single S3 bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Creates a store using the ambient AWS configuration (env vars,
    /// instance profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig, bucket: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, PipelineError> {
        let mut entries = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| PipelineError::List {
                    prefix: prefix.to_string(),
                    message: e.to_string(),
                })?;

            for obj in resp.contents() {
                if let Some(key) = obj.key() {
                    entries.push(ObjectEntry {
                        key: key.to_string(),
                        size: obj.size().unwrap_or(0).max(0) as u64,
                    });
                }
            }

            match resp.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, PipelineError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match resp {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().map_or(false, |s| s.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(PipelineError::Read {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let content_type = output.content_type().map(|s| s.to_string());
        let cache_control = output.cache_control().map(|s| s.to_string());
        let custom_metadata: HashMap<String, String> = output
            .metadata()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| PipelineError::Read {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes()
            .to_vec();

        Ok(Some(StoredObject {
            body,
            content_type,
            cache_control,
            custom_metadata,
        }))
    }

    async fn put(&self, key: &str, body: Vec<u8>, opts: PutOptions) -> Result<(), PipelineError> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(ct) = &opts.content_type {
            req = req.content_type(ct);
        }
        if let Some(cc) = &opts.cache_control {
            req = req.cache_control(cc);
        }
        if !opts.custom_metadata.is_empty() {
            req = req.set_metadata(Some(opts.custom_metadata.clone()));
        }

        req.send().await.map_err(|e| PipelineError::Storage {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }
}
