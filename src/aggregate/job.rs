//! The three aggregation jobs and the shared publication path.
//!
//! One algorithm, parameterized by input and output layer: list the input
//! prefix, read the children in parallel, merge by `(mode, band, entity)`,
//! then publish a content-addressed NDJSON rollup, its meta sidecar, and a
//! manifest entry. List and put failures abort the job; a failed read of a
//! single child is logged and skipped.

use super::merge::{finalize, group_spots, merge_rows};
use super::types::{Accumulator, AggregateKey, BaseAggregate, DailyAggregate, HourlyAggregate, MonthlyAggregate};
use crate::error::PipelineError;
use crate::hashing::{add_hash_to_filename, short_hash};
use crate::manifest::{update_manifest, ManifestLevel};
use crate::ndjson::parse_ndjson;
use crate::normalizer::NormalizedSpot;
use crate::paths;
use crate::store::{ObjectStore, PutOptions, CACHE_IMMUTABLE};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Result of one aggregation run.
#[derive(Debug)]
pub struct AggregationOutcome {
    /// Content-addressed key the rollup was published under.
    pub path: String,
    /// Bucket timestamp at this level.
    pub timestamp: String,
    pub total_spots: u64,
    pub total_activations: u64,
    pub files_processed: usize,
    pub row_count: usize,
}

/// Sidecar published next to every rollup, without the content hash.
#[derive(Debug, Serialize)]
struct MetaFile {
    timestamp: String,
    path: String,
    generated_at: String,
    total_spots: u64,
    total_activations: u64,
    unique_activators: u64,
    unique_parks: u64,
    row_count: usize,
    files_processed: usize,
}

/// Aggregates the hour containing `target`: raw captures → hourly rollup.
///
/// The only level that consumes spots rather than aggregates; spots are
/// deduplicated by id across the hour's captures before grouping.
pub async fn aggregate_hour(
    store: &dyn ObjectStore,
    target: DateTime<Utc>,
) -> Result<AggregationOutcome, PipelineError> {
    let prefix = paths::raw_prefix(target);
    let timestamp = paths::hour_timestamp(target);
    info!("aggregate-hour: {} from {}", timestamp, prefix);

    let keys: Vec<String> = store
        .list(&prefix)
        .await?
        .into_iter()
        .map(|e| e.key)
        .filter(|k| k.ends_with(".ndjson"))
        .collect();

    let children = read_children(store, &keys).await;
    let files_processed = children.len();

    // Captures overlap the upstream retention window, so the same spot id
    // shows up in consecutive captures. Files arrive in key order; the
    // last capture wins per id.
    let mut by_id: HashMap<i64, NormalizedSpot> = HashMap::new();
    for (key, text) in &children {
        let (spots, skipped) = parse_ndjson::<NormalizedSpot>(text);
        if skipped > 0 {
            warn!("aggregate-hour: skipped {} malformed lines in {}", skipped, key);
        }
        for spot in spots {
            by_id.insert(spot.spot_id, spot);
        }
    }

    let rows = finalize(group_spots(by_id.values()));
    publish(
        store,
        ManifestLevel::Hourly,
        &timestamp,
        &paths::hourly_key(target),
        &paths::hourly_meta_key(target),
        &rows,
        files_processed,
    )
    .await
}

/// Aggregates the day containing `target`: hourly rollups → daily rollup.
pub async fn aggregate_day(
    store: &dyn ObjectStore,
    target: DateTime<Utc>,
) -> Result<AggregationOutcome, PipelineError> {
    let prefix = paths::hourly_prefix_for_day(target);
    let timestamp = paths::day_timestamp(target);
    info!("aggregate-day: {} from {}", timestamp, prefix);

    let (rows, files_processed) = merge_child_rollups::<HourlyAggregate>(store, &prefix).await?;
    publish(
        store,
        ManifestLevel::Daily,
        &timestamp,
        &paths::daily_key(target),
        &paths::daily_meta_key(target),
        &rows,
        files_processed,
    )
    .await
}

/// Aggregates the month containing `target`: daily rollups → monthly rollup.
pub async fn aggregate_month(
    store: &dyn ObjectStore,
    target: DateTime<Utc>,
) -> Result<AggregationOutcome, PipelineError> {
    let prefix = paths::daily_prefix_for_month(target);
    let timestamp = paths::month_timestamp(target);
    info!("aggregate-month: {} from {}", timestamp, prefix);

    let (rows, files_processed) = merge_child_rollups::<DailyAggregate>(store, &prefix).await?;
    publish(
        store,
        ManifestLevel::Monthly,
        &timestamp,
        &paths::monthly_key(target),
        &paths::monthly_meta_key(target),
        &rows,
        files_processed,
    )
    .await
}

/// Lists one rollup layer under `prefix`, keeps the newest file per bucket,
/// reads them in parallel, and merges their rows. Returns the merged rows
/// and the number of files read.
async fn merge_child_rollups<R>(
    store: &dyn ObjectStore,
    prefix: &str,
) -> Result<(Vec<BaseAggregate>, usize), PipelineError>
where
    R: RollupRow,
{
    let keys: Vec<String> = store
        .list(prefix)
        .await?
        .into_iter()
        .map(|e| e.key)
        .filter(|k| k.ends_with(".ndjson"))
        .collect();
    let keys = resolve_bucket_files(store, keys).await;

    let children = read_children(store, &keys).await;
    let files_processed = children.len();

    let mut groups: BTreeMap<AggregateKey, Accumulator> = BTreeMap::new();
    for (key, text) in &children {
        let (rows, skipped) = parse_ndjson::<R>(text);
        if skipped > 0 {
            warn!("aggregate: skipped {} malformed lines in {}", skipped, key);
        }
        let bases: Vec<BaseAggregate> = rows.into_iter().map(R::into_base).collect();
        merge_rows(&mut groups, &bases);
    }

    Ok((finalize(groups), files_processed))
}

/// A deserialized rollup row that can surrender its level-independent part.
trait RollupRow: serde::de::DeserializeOwned {
    fn into_base(self) -> BaseAggregate;
}

impl RollupRow for HourlyAggregate {
    fn into_base(self) -> BaseAggregate {
        self.base
    }
}

impl RollupRow for DailyAggregate {
    fn into_base(self) -> BaseAggregate {
        self.base
    }
}

impl RollupRow for MonthlyAggregate {
    fn into_base(self) -> BaseAggregate {
        self.base
    }
}

/// Re-aggregation leaves superseded content-addressed files behind; a
/// bucket may therefore have several `<stem>-<hash>.ndjson` objects. The
/// bucket's meta sidecar is rewritten on every publication and names the
/// current file, so ambiguous buckets resolve through it; when the sidecar
/// is unreadable, the lexicographically last candidate is a deterministic
/// fallback.
async fn resolve_bucket_files(store: &dyn ObjectStore, keys: Vec<String>) -> Vec<String> {
    let mut by_stem: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for key in keys {
        by_stem.entry(bucket_stem(&key)).or_default().push(key);
    }

    let mut resolved = Vec::new();
    for (stem, mut candidates) in by_stem {
        if candidates.len() == 1 {
            resolved.push(candidates.pop().expect("one candidate"));
            continue;
        }

        let meta_key = format!("{stem}.meta.json");
        let current = match store.get(&meta_key).await {
            Ok(Some(obj)) => serde_json::from_str::<serde_json::Value>(&obj.text())
                .ok()
                .and_then(|meta| meta["path"].as_str().map(str::to_string)),
            _ => None,
        };

        match current.filter(|path| candidates.contains(path)) {
            Some(path) => resolved.push(path),
            None => {
                warn!(
                    "aggregate: {} superseded files for {} and no usable sidecar",
                    candidates.len(),
                    stem
                );
                resolved.push(candidates.pop().expect("candidates non-empty"));
            }
        }
    }
    resolved
}

/// Strips the `-<hash8>` suffix (when present) and the extension from a
/// rollup key, yielding its bucket identity.
fn bucket_stem(key: &str) -> String {
    let stem = key.strip_suffix(".ndjson").unwrap_or(key);
    match stem.char_indices().rev().nth(8) {
        Some((idx, '-')) if stem[idx + 1..].chars().all(|c| c.is_ascii_hexdigit()) => {
            stem[..idx].to_string()
        }
        _ => stem.to_string(),
    }
}

/// Reads `keys` concurrently. A failed read is logged and excluded; the
/// batch proceeds with what it got.
async fn read_children(store: &dyn ObjectStore, keys: &[String]) -> Vec<(String, String)> {
    let reads = keys.iter().map(|key| async move {
        match store.get(key).await {
            Ok(Some(obj)) => Some((key.clone(), obj.text())),
            Ok(None) => {
                warn!("aggregate: listed object vanished: {}", key);
                None
            }
            Err(e) => {
                warn!("aggregate: {} reading {}: {}", e.kind(), key, e);
                None
            }
        }
    });
    join_all(reads).await.into_iter().flatten().collect()
}

/// Serializes, hashes, and writes one rollup plus its sidecar, then
/// re-links the manifest. A manifest failure is a warning, not a job
/// failure; the rollup exists and a later run re-links it.
async fn publish(
    store: &dyn ObjectStore,
    level: ManifestLevel,
    timestamp: &str,
    base_key: &str,
    meta_key: &str,
    rows: &[BaseAggregate],
    files_processed: usize,
) -> Result<AggregationOutcome, PipelineError> {
    let lines: Vec<String> = rows
        .iter()
        .map(|base| {
            let row = match level {
                ManifestLevel::Hourly => serde_json::to_string(&HourlyAggregate {
                    hour: timestamp.to_string(),
                    base: base.clone(),
                }),
                ManifestLevel::Daily => serde_json::to_string(&DailyAggregate {
                    date: timestamp.to_string(),
                    base: base.clone(),
                }),
                ManifestLevel::Monthly => serde_json::to_string(&MonthlyAggregate {
                    month: timestamp.to_string(),
                    base: base.clone(),
                }),
            };
            row.map_err(|e| PipelineError::Storage {
                key: base_key.to_string(),
                message: e.to_string(),
            })
        })
        .collect::<Result<_, _>>()?;
    let body = lines.join("\n");

    let hash = short_hash(body.as_bytes());
    let path = add_hash_to_filename(base_key, &hash);

    let total_spots: u64 = rows.iter().map(|r| r.spot_count).sum();
    let total_activations = distinct_across(rows, |r| &r.activations);
    let unique_activators = distinct_across(rows, |r| &r.activators);
    let unique_parks = distinct_across(rows, |r| &r.parks);
    let generated_at = paths::iso_millis(Utc::now());

    let rollup_opts = PutOptions::ndjson()
        .cache_control(CACHE_IMMUTABLE)
        .metadata("timestamp", timestamp)
        .metadata("generatedAt", &generated_at)
        .metadata("totalSpots", &total_spots.to_string())
        .metadata("filesProcessed", &files_processed.to_string());
    store.put(&path, body.into_bytes(), rollup_opts).await?;

    let meta = MetaFile {
        timestamp: timestamp.to_string(),
        path: path.clone(),
        generated_at,
        total_spots,
        total_activations,
        unique_activators,
        unique_parks,
        row_count: rows.len(),
        files_processed,
    };
    let meta_body = serde_json::to_vec(&meta).map_err(|e| PipelineError::Storage {
        key: meta_key.to_string(),
        message: e.to_string(),
    })?;
    store
        .put(
            meta_key,
            meta_body,
            PutOptions::json().cache_control(CACHE_IMMUTABLE),
        )
        .await?;

    if let Err(e) = update_manifest(
        store,
        level,
        timestamp,
        &path,
        total_spots,
        total_activations,
        level.max_entries(),
    )
    .await
    {
        warn!(
            "aggregate: manifest update failed for {} ({}): {}",
            timestamp,
            e.kind(),
            e
        );
    }

    info!(
        "aggregate: published {} ({} rows, {} spots, {} files)",
        path,
        rows.len(),
        total_spots,
        files_processed
    );

    Ok(AggregationOutcome {
        path,
        timestamp: timestamp.to_string(),
        total_spots,
        total_activations,
        files_processed,
        row_count: rows.len(),
    })
}

/// Cardinality of the union of one collection across rows. A pair active
/// on two bands counts once.
fn distinct_across<F>(rows: &[BaseAggregate], field: F) -> u64
where
    F: Fn(&BaseAggregate) -> &Vec<String>,
{
    let mut set: HashSet<&str> = HashSet::new();
    for row in rows {
        set.extend(field(row).iter().map(String::as_str));
    }
    set.len() as u64
}
