//! The published manifest: one mutable object pointing at the newest
//! rollup file per bucket per level.
//!
//! Updates are load-modify-store with no compare-and-swap; the scheduler
//! guarantees a single writer per level. Loads go through a value-level
//! normalizer that migrates two legacy shapes: a `hours` list (renamed to
//! `hourly`) and entries carrying a bare `timestamp` field (renamed to the
//! level's field). Anything unrecognizable is treated as an empty manifest.

use crate::error::PipelineError;
use crate::paths;
use crate::store::{ObjectStore, PutOptions, CACHE_MANIFEST};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MANIFEST_KEY: &str = "manifest.json";

/// The three rollup levels the manifest indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLevel {
    Hourly,
    Daily,
    Monthly,
}

impl ManifestLevel {
    /// Retention cap: 30 days of hours, 90 days, 24 months.
    pub fn max_entries(self) -> usize {
        match self {
            ManifestLevel::Hourly => 720,
            ManifestLevel::Daily => 90,
            ManifestLevel::Monthly => 24,
        }
    }

    /// Name of this level's timestamp field within an entry.
    fn time_field(self) -> &'static str {
        match self {
            ManifestLevel::Hourly => "hour",
            ManifestLevel::Daily => "day",
            ManifestLevel::Monthly => "month",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub hour: String,
    pub path: String,
    #[serde(default)]
    pub total_spots: u64,
    #[serde(default)]
    pub total_activations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub day: String,
    pub path: String,
    #[serde(default)]
    pub total_spots: u64,
    #[serde(default)]
    pub total_activations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyEntry {
    pub month: String,
    pub path: String,
    #[serde(default)]
    pub total_spots: u64,
    #[serde(default)]
    pub total_activations: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub hourly: Vec<HourlyEntry>,
    #[serde(default)]
    pub daily: Vec<DailyEntry>,
    #[serde(default)]
    pub monthly: Vec<MonthlyEntry>,
}

/// Coerces a stored manifest value into the current shape.
pub fn normalize_manifest(mut value: Value) -> Manifest {
    let Some(obj) = value.as_object_mut() else {
        return Manifest::default();
    };

    // Legacy list name.
    if let Some(hours) = obj.remove("hours") {
        obj.entry("hourly").or_insert(hours);
    }

    let mut manifest = Manifest {
        updated_at: obj
            .get("updated_at")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ..Default::default()
    };

    for (list, level) in [
        ("hourly", ManifestLevel::Hourly),
        ("daily", ManifestLevel::Daily),
        ("monthly", ManifestLevel::Monthly),
    ] {
        let Some(entries) = obj.get_mut(list).and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in entries.iter_mut() {
            if let Some(fields) = entry.as_object_mut() {
                // Legacy entries carried a bare `timestamp`.
                if !fields.contains_key(level.time_field()) {
                    if let Some(ts) = fields.remove("timestamp") {
                        fields.insert(level.time_field().to_string(), ts);
                    }
                }
            }
            // An entry that still doesn't parse is dropped, not fatal.
            match level {
                ManifestLevel::Hourly => {
                    if let Ok(e) = serde_json::from_value::<HourlyEntry>(entry.clone()) {
                        manifest.hourly.push(e);
                    }
                }
                ManifestLevel::Daily => {
                    if let Ok(e) = serde_json::from_value::<DailyEntry>(entry.clone()) {
                        manifest.daily.push(e);
                    }
                }
                ManifestLevel::Monthly => {
                    if let Ok(e) = serde_json::from_value::<MonthlyEntry>(entry.clone()) {
                        manifest.monthly.push(e);
                    }
                }
            }
        }
    }

    manifest
}

/// Loads and normalizes the manifest; a missing or unparseable object is an
/// empty manifest, a store failure surfaces.
pub async fn load_manifest(store: &dyn ObjectStore) -> Result<Manifest, PipelineError> {
    let Some(obj) = store.get(MANIFEST_KEY).await? else {
        return Ok(Manifest::default());
    };
    match serde_json::from_str::<Value>(&obj.text()) {
        Ok(value) => Ok(normalize_manifest(value)),
        Err(_) => Ok(Manifest::default()),
    }
}

/// Replace-or-insert the entry for one bucket at one level, re-sort
/// descending by timestamp, truncate to `max_entries`, and store.
pub async fn update_manifest(
    store: &dyn ObjectStore,
    level: ManifestLevel,
    time_value: &str,
    path: &str,
    total_spots: u64,
    total_activations: u64,
    max_entries: usize,
) -> Result<(), PipelineError> {
    let mut manifest = load_manifest(store).await?;

    match level {
        ManifestLevel::Hourly => {
            manifest.hourly.retain(|e| e.hour != time_value);
            manifest.hourly.push(HourlyEntry {
                hour: time_value.to_string(),
                path: path.to_string(),
                total_spots,
                total_activations,
            });
            manifest.hourly.sort_by(|a, b| b.hour.cmp(&a.hour));
            manifest.hourly.truncate(max_entries);
        }
        ManifestLevel::Daily => {
            manifest.daily.retain(|e| e.day != time_value);
            manifest.daily.push(DailyEntry {
                day: time_value.to_string(),
                path: path.to_string(),
                total_spots,
                total_activations,
            });
            manifest.daily.sort_by(|a, b| b.day.cmp(&a.day));
            manifest.daily.truncate(max_entries);
        }
        ManifestLevel::Monthly => {
            manifest.monthly.retain(|e| e.month != time_value);
            manifest.monthly.push(MonthlyEntry {
                month: time_value.to_string(),
                path: path.to_string(),
                total_spots,
                total_activations,
            });
            manifest.monthly.sort_by(|a, b| b.month.cmp(&a.month));
            manifest.monthly.truncate(max_entries);
        }
    }

    manifest.updated_at = paths::iso_millis(Utc::now());

    let body = serde_json::to_vec(&manifest).map_err(|e| PipelineError::Storage {
        key: MANIFEST_KEY.to_string(),
        message: e.to_string(),
    })?;

    store
        .put(
            MANIFEST_KEY,
            body,
            PutOptions::json().cache_control(CACHE_MANIFEST),
        )
        .await
}
