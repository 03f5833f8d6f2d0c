//! Per-minute capture job.
//!
//! Each tick fetches one upstream snapshot, normalizes it, and writes one
//! NDJSON capture under the hour's `raw/` prefix. Failed ticks are
//! abandoned without retry; the hourly aggregation deduplicates by spot id
//! across overlapping captures, so a missed minute costs nothing but
//! resolution.

use crate::error::PipelineError;
use crate::fetch::{fetch_spots, SpotTransport};
use crate::ndjson::to_ndjson;
use crate::normalizer::{normalize_snapshot, NormalizedSpot};
use crate::paths;
use crate::store::{ObjectStore, PutOptions};
use chrono::{DateTime, Utc};
use log::info;

/// Result of one successful collector tick.
#[derive(Debug)]
pub struct CollectOutcome {
    pub key: String,
    pub spot_count: usize,
}

/// Runs one collector tick against the current wall clock.
pub async fn collect<T: SpotTransport>(
    store: &dyn ObjectStore,
    transport: &T,
    api_url: &str,
) -> Result<CollectOutcome, PipelineError> {
    collect_at(store, transport, api_url, Utc::now()).await
}

/// Runs one collector tick with an explicit capture timestamp.
pub async fn collect_at<T: SpotTransport>(
    store: &dyn ObjectStore,
    transport: &T,
    api_url: &str,
    captured_at: DateTime<Utc>,
) -> Result<CollectOutcome, PipelineError> {
    let raws = fetch_spots(transport, api_url).await?;
    let spots = normalize_snapshot(&raws, captured_at);
    write_capture(store, &spots, captured_at).await
}

/// Persists one normalized snapshot as a raw NDJSON capture with
/// `spotCount`/`capturedAt` custom metadata.
pub async fn write_capture(
    store: &dyn ObjectStore,
    spots: &[NormalizedSpot],
    captured_at: DateTime<Utc>,
) -> Result<CollectOutcome, PipelineError> {
    let key = paths::raw_capture_key(captured_at);
    let body = to_ndjson(spots).map_err(|e| PipelineError::Storage {
        key: key.clone(),
        message: e.to_string(),
    })?;

    let opts = PutOptions::ndjson()
        .metadata("spotCount", &spots.len().to_string())
        .metadata("capturedAt", &paths::iso_millis(captured_at));

    store.put(&key, body.into_bytes(), opts).await?;

    info!("collect: wrote {} spots to {}", spots.len(), key);
    Ok(CollectOutcome {
        key,
        spot_count: spots.len(),
    })
}
