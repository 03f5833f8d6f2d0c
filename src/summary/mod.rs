//! Periodic summary builder.
//!
//! Reads the manifest, pulls the cheapest covering rollup layer for each
//! window, merges the rows in memory, and overwrites the fixed-schema
//! documents under `summaries/`. Summaries are mutable and short-cached,
//! unlike the content-addressed rollups they are derived from.

mod types;
mod windows;

pub use types::*;
pub use windows::{select_sources, SelectedSources, Window};

use crate::aggregate::{finalize, merge_rows, AggregateKey, Accumulator, BaseAggregate};
use crate::error::PipelineError;
use crate::manifest::{load_manifest, Manifest};
use crate::ndjson::parse_ndjson;
use crate::paths;
use crate::store::{ObjectStore, PutOptions, CACHE_SUMMARY};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use futures_util::future::join_all;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Mode categories used by trend rows. Classification is case-insensitive;
/// modes outside every category count toward totals but no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCategory {
    Cw,
    Ssb,
    Digital,
}

pub fn mode_category(mode: &str) -> Option<ModeCategory> {
    match mode.to_ascii_uppercase().as_str() {
        "CW" => Some(ModeCategory::Cw),
        "SSB" | "AM" | "FM" | "LSB" | "USB" => Some(ModeCategory::Ssb),
        "FT8" | "FT4" | "RTTY" | "PSK31" | "PSK" | "JS8" | "MFSK" | "OLIVIA" | "SSTV"
        | "DIGITAL" => Some(ModeCategory::Digital),
        _ => None,
    }
}

/// Result of one summarize run: the keys that were written.
#[derive(Debug)]
pub struct SummaryOutcome {
    pub written: Vec<String>,
}

/// Builds and publishes every summary against the current wall clock.
pub async fn summarize(store: &dyn ObjectStore) -> Result<SummaryOutcome, PipelineError> {
    summarize_at(store, Utc::now()).await
}

/// Builds and publishes every summary as of `now`.
pub async fn summarize_at(
    store: &dyn ObjectStore,
    now: DateTime<Utc>,
) -> Result<SummaryOutcome, PipelineError> {
    let manifest = load_manifest(store).await?;
    let generated_at = paths::iso_millis(now);
    let mut cache: HashMap<String, Vec<BaseAggregate>> = HashMap::new();
    let mut written = Vec::new();

    for window in [Window::Last24h, Window::Last7d, Window::Last30d] {
        let selected = select_sources(&manifest, window, now);
        let rows = merged_rows(store, &mut cache, &selected.paths()).await;
        let stats = window_stats(window, &rows, &generated_at);
        let key = format!("summaries/stats_{}.json", window.label());
        write_summary(store, &key, &stats).await?;
        written.push(key);
    }

    let all_time = select_sources(&manifest, Window::AllTime, now);
    let rows = merged_rows(store, &mut cache, &all_time.paths()).await;
    let all_time_stats = AllTimeStats {
        generated_at: generated_at.clone(),
        totals: totals_of(&rows),
        data_since: all_time.earliest_timestamp(),
    };
    write_summary(store, "summaries/all_time.json", &all_time_stats).await?;
    written.push("summaries/all_time.json".to_string());

    let time_of_day = time_of_day(&manifest, &generated_at);
    write_summary(store, "summaries/time_of_day.json", &time_of_day).await?;
    written.push("summaries/time_of_day.json".to_string());

    let day_of_week = day_of_week(&manifest, &generated_at);
    write_summary(store, "summaries/day_of_week.json", &day_of_week).await?;
    written.push("summaries/day_of_week.json".to_string());

    let trends = trends(store, &mut cache, &manifest, now, &generated_at).await;
    write_summary(store, "summaries/trends.json", &trends).await?;
    written.push("summaries/trends.json".to_string());

    let top = top_entities(store, &mut cache, &manifest, now, &generated_at).await;
    write_summary(store, "summaries/top_entities.json", &top).await?;
    written.push("summaries/top_entities.json".to_string());

    info!("summarize: wrote {} summaries", written.len());
    Ok(SummaryOutcome { written })
}

async fn write_summary(
    store: &dyn ObjectStore,
    key: &str,
    value: &impl Serialize,
) -> Result<(), PipelineError> {
    let body = serde_json::to_vec(value).map_err(|e| PipelineError::Storage {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store
        .put(key, body, PutOptions::json().cache_control(CACHE_SUMMARY))
        .await
}

/// Fetches any uncached rollup paths in parallel. A failed or missing read
/// is logged and contributes nothing; partial data beats no data.
async fn load_paths(
    store: &dyn ObjectStore,
    cache: &mut HashMap<String, Vec<BaseAggregate>>,
    paths: &[String],
) {
    let missing: Vec<String> = paths
        .iter()
        .filter(|p| !cache.contains_key(*p))
        .cloned()
        .collect();

    let reads = missing.iter().map(|path| async move {
        match store.get(path).await {
            Ok(Some(obj)) => {
                let (rows, skipped) = parse_ndjson::<BaseAggregate>(&obj.text());
                if skipped > 0 {
                    warn!("summarize: skipped {} malformed lines in {}", skipped, path);
                }
                (path.clone(), rows)
            }
            Ok(None) => {
                warn!("summarize: manifest references missing object {}", path);
                (path.clone(), Vec::new())
            }
            Err(e) => {
                warn!("summarize: {} reading {}: {}", e.kind(), path, e);
                (path.clone(), Vec::new())
            }
        }
    });

    for (path, rows) in join_all(reads).await {
        cache.insert(path, rows);
    }
}

/// Loads `paths` and merges all their rows into one keyed aggregate.
async fn merged_rows(
    store: &dyn ObjectStore,
    cache: &mut HashMap<String, Vec<BaseAggregate>>,
    paths: &[String],
) -> Vec<BaseAggregate> {
    load_paths(store, cache, paths).await;
    let mut groups: BTreeMap<AggregateKey, Accumulator> = BTreeMap::new();
    for path in paths {
        if let Some(rows) = cache.get(path) {
            merge_rows(&mut groups, rows);
        }
    }
    finalize(groups)
}

fn distinct<'a, I: IntoIterator<Item = &'a String>>(items: I) -> u64 {
    items.into_iter().collect::<HashSet<_>>().len() as u64
}

fn totals_of(rows: &[BaseAggregate]) -> Totals {
    Totals {
        spots: rows.iter().map(|r| r.spot_count).sum(),
        activations: distinct(rows.iter().flat_map(|r| &r.activations)),
        unique_activators: distinct(rows.iter().flat_map(|r| &r.activators)),
        unique_parks: distinct(rows.iter().flat_map(|r| &r.parks)),
    }
}

fn window_stats(window: Window, rows: &[BaseAggregate], generated_at: &str) -> WindowStats {
    // Per-dimension accumulation: spot sum plus the activation set.
    let mut by_mode: BTreeMap<&str, (u64, HashSet<&String>)> = BTreeMap::new();
    let mut by_band: BTreeMap<&str, (u64, HashSet<&String>)> = BTreeMap::new();
    let mut by_entity: BTreeMap<&str, (u64, HashSet<&String>)> = BTreeMap::new();

    for row in rows {
        for (map, dim) in [
            (&mut by_mode, row.mode.as_str()),
            (&mut by_band, row.band.as_str()),
            (&mut by_entity, row.entity.as_str()),
        ] {
            let slot = map.entry(dim).or_default();
            slot.0 += row.spot_count;
            slot.1.extend(&row.activations);
        }
    }

    let mut modes: Vec<ModeStat> = by_mode
        .into_iter()
        .map(|(mode, (spots, acts))| ModeStat {
            mode: mode.to_string(),
            spots,
            activations: acts.len() as u64,
        })
        .collect();
    modes.sort_by(|a, b| b.spots.cmp(&a.spots).then(a.mode.cmp(&b.mode)));

    let mut bands: Vec<BandStat> = by_band
        .into_iter()
        .map(|(band, (spots, acts))| BandStat {
            band: band.to_string(),
            spots,
            activations: acts.len() as u64,
        })
        .collect();
    bands.sort_by(|a, b| b.spots.cmp(&a.spots).then(a.band.cmp(&b.band)));

    let mut entities: Vec<EntityStat> = by_entity
        .into_iter()
        .map(|(entity, (spots, acts))| EntityStat {
            entity: entity.to_string(),
            spots,
            activations: acts.len() as u64,
        })
        .collect();
    entities.sort_by(|a, b| b.activations.cmp(&a.activations).then(a.entity.cmp(&b.entity)));
    entities.truncate(20);

    WindowStats {
        window: window.label().to_string(),
        generated_at: generated_at.to_string(),
        totals: totals_of(rows),
        by_mode: modes,
        by_band: bands,
        by_entity: entities,
    }
}

/// Attributes each manifest hourly entry's spot count to its UTC hour of
/// day.
fn time_of_day(manifest: &Manifest, generated_at: &str) -> TimeOfDay {
    let mut spots_by_hour = [0u64; 24];
    for entry in &manifest.hourly {
        if let Some(hour) = entry
            .hour
            .get(11..13)
            .and_then(|h| h.parse::<usize>().ok())
            .filter(|h| *h < 24)
        {
            spots_by_hour[hour] += entry.total_spots;
        }
    }
    TimeOfDay {
        generated_at: generated_at.to_string(),
        hours: spots_by_hour
            .iter()
            .enumerate()
            .map(|(hour, spots)| TimeOfDayRow {
                hour: hour as u32,
                spots: *spots,
            })
            .collect(),
    }
}

/// Attributes each manifest daily entry's spot count to its weekday,
/// Sunday = 0.
fn day_of_week(manifest: &Manifest, generated_at: &str) -> DayOfWeek {
    let mut spots_by_day = [0u64; 7];
    for entry in &manifest.daily {
        if let Ok(date) = NaiveDate::parse_from_str(&entry.day, "%Y-%m-%d") {
            spots_by_day[date.weekday().num_days_from_sunday() as usize] += entry.total_spots;
        }
    }
    DayOfWeek {
        generated_at: generated_at.to_string(),
        days: spots_by_day
            .iter()
            .enumerate()
            .map(|(day, spots)| DayOfWeekRow {
                day: day as u32,
                spots: *spots,
            })
            .collect(),
    }
}

/// The UTC Sunday starting the week containing `date`.
fn week_key(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

fn rows_for<'a>(
    paths: &[String],
    cache: &'a HashMap<String, Vec<BaseAggregate>>,
) -> Vec<&'a BaseAggregate> {
    paths
        .iter()
        .filter_map(|p| cache.get(p))
        .flatten()
        .collect()
}

fn trend_row(period: String, rows: &[&BaseAggregate]) -> TrendRow {
    let mut all: HashSet<&String> = HashSet::new();
    let mut cw: HashSet<&String> = HashSet::new();
    let mut ssb: HashSet<&String> = HashSet::new();
    let mut digital: HashSet<&String> = HashSet::new();

    for row in rows {
        all.extend(&row.activators);
        match mode_category(&row.mode) {
            Some(ModeCategory::Cw) => cw.extend(&row.activators),
            Some(ModeCategory::Ssb) => ssb.extend(&row.activators),
            Some(ModeCategory::Digital) => digital.extend(&row.activators),
            None => {}
        }
    }

    TrendRow {
        period,
        activators: all.len() as u64,
        cw: cw.len() as u64,
        ssb: ssb.len() as u64,
        digital: digital.len() as u64,
    }
}

async fn trends(
    store: &dyn ObjectStore,
    cache: &mut HashMap<String, Vec<BaseAggregate>>,
    manifest: &Manifest,
    now: DateTime<Utc>,
    generated_at: &str,
) -> Trends {
    // Daily trend: one row per day over the last 14 days.
    let day_cutoff = paths::day_timestamp(now - Duration::days(14));
    let mut recent_days: Vec<(String, String)> = manifest
        .daily
        .iter()
        .filter(|e| e.day.as_str() >= day_cutoff.as_str())
        .map(|e| (e.day.clone(), e.path.clone()))
        .collect();
    recent_days.sort();

    // Weekly trend: daily rollups grouped by the Sunday of their week,
    // over the last 14 weeks.
    let current_week = week_key(now.date_naive());
    let week_cutoff = current_week - Duration::weeks(13);
    let mut weeks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in &manifest.daily {
        let Ok(date) = NaiveDate::parse_from_str(&entry.day, "%Y-%m-%d") else {
            continue;
        };
        let week = week_key(date);
        if week >= week_cutoff {
            weeks
                .entry(week.format("%Y-%m-%d").to_string())
                .or_default()
                .push(entry.path.clone());
        }
    }

    // Monthly trend: the last 12 monthly rollups.
    let month_cutoff = now
        .checked_sub_months(chrono::Months::new(11))
        .map(paths::month_timestamp)
        .unwrap_or_default();
    let mut recent_months: Vec<(String, String)> = manifest
        .monthly
        .iter()
        .filter(|e| e.month.as_str() >= month_cutoff.as_str())
        .map(|e| (e.month.clone(), e.path.clone()))
        .collect();
    recent_months.sort();

    let mut all_paths: Vec<String> = recent_days.iter().map(|(_, p)| p.clone()).collect();
    all_paths.extend(weeks.values().flatten().cloned());
    all_paths.extend(recent_months.iter().map(|(_, p)| p.clone()));
    load_paths(store, cache, &all_paths).await;

    let daily = recent_days
        .iter()
        .map(|(day, path)| trend_row(day.clone(), &rows_for(std::slice::from_ref(path), cache)))
        .collect();

    let weekly = weeks
        .iter()
        .map(|(week, paths)| trend_row(week.clone(), &rows_for(paths, cache)))
        .collect();

    let monthly = recent_months
        .iter()
        .map(|(month, path)| trend_row(month.clone(), &rows_for(std::slice::from_ref(path), cache)))
        .collect();

    Trends {
        generated_at: generated_at.to_string(),
        daily,
        weekly,
        monthly,
    }
}

async fn top_entities(
    store: &dyn ObjectStore,
    cache: &mut HashMap<String, Vec<BaseAggregate>>,
    manifest: &Manifest,
    now: DateTime<Utc>,
    generated_at: &str,
) -> TopEntities {
    let cutoff = paths::day_timestamp(now - Duration::days(14));
    let paths: Vec<String> = manifest
        .daily
        .iter()
        .filter(|e| e.day.as_str() >= cutoff.as_str())
        .map(|e| e.path.clone())
        .collect();
    load_paths(store, cache, &paths).await;

    let mut park_activators: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    let mut state_activators: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for path in &paths {
        let Some(rows) = cache.get(path) else { continue };
        for row in rows {
            for activation in &row.activations {
                if let Some((call, park)) = activation.split_once('|') {
                    park_activators.entry(park).or_default().insert(call);
                }
            }
            for pair in &row.state_activators {
                if let Some((state, call)) = pair.split_once('|') {
                    state_activators.entry(state).or_default().insert(call);
                }
            }
        }
    }

    let mut parks: Vec<TopPark> = park_activators
        .into_iter()
        .map(|(park, calls)| TopPark {
            park: park.to_string(),
            activators: calls.len() as u64,
        })
        .collect();
    parks.sort_by(|a, b| b.activators.cmp(&a.activators).then(a.park.cmp(&b.park)));
    parks.truncate(10);

    let mut states: Vec<TopState> = state_activators
        .into_iter()
        .map(|(state, calls)| TopState {
            state: state.to_string(),
            activators: calls.len() as u64,
        })
        .collect();
    states.sort_by(|a, b| b.activators.cmp(&a.activators).then(a.state.cmp(&b.state)));
    states.truncate(10);

    TopEntities {
        generated_at: generated_at.to_string(),
        parks,
        states,
    }
}
