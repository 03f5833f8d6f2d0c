//! Window → source selection over the manifest.
//!
//! Each summary window is served from the cheapest rollup layer that
//! covers it: 24h from hourly files, 7d and 30d from daily files, and
//! all-time from monthly files supplemented by daily files for months
//! without a monthly rollup and hourly files for days without a daily one
//! (the current partial day and month).

use crate::manifest::Manifest;
use crate::paths;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Last24h,
    Last7d,
    Last30d,
    AllTime,
}

impl Window {
    pub fn label(self) -> &'static str {
        match self {
            Window::Last24h => "24h",
            Window::Last7d => "7d",
            Window::Last30d => "30d",
            Window::AllTime => "all_time",
        }
    }
}

/// Manifest entries chosen to cover one window: `(bucket timestamp, path)`.
#[derive(Debug, Default)]
pub struct SelectedSources {
    pub hourly: Vec<(String, String)>,
    pub daily: Vec<(String, String)>,
    pub monthly: Vec<(String, String)>,
}

impl SelectedSources {
    pub fn paths(&self) -> Vec<String> {
        self.hourly
            .iter()
            .chain(&self.daily)
            .chain(&self.monthly)
            .map(|(_, path)| path.clone())
            .collect()
    }

    /// Earliest bucket timestamp among the selected sources.
    pub fn earliest_timestamp(&self) -> Option<String> {
        self.monthly
            .iter()
            .chain(&self.daily)
            .chain(&self.hourly)
            .map(|(ts, _)| ts.clone())
            .min()
    }
}

/// Selects the manifest entries covering `window` as of `now`.
pub fn select_sources(manifest: &Manifest, window: Window, now: DateTime<Utc>) -> SelectedSources {
    let mut selected = SelectedSources::default();

    match window {
        Window::Last24h => {
            let cutoff = paths::hour_timestamp(now - Duration::hours(24));
            selected.hourly = manifest
                .hourly
                .iter()
                .filter(|e| e.hour.as_str() >= cutoff.as_str())
                .map(|e| (e.hour.clone(), e.path.clone()))
                .collect();
        }
        Window::Last7d | Window::Last30d => {
            let days = if window == Window::Last7d { 7 } else { 30 };
            let cutoff = paths::day_timestamp(now - Duration::days(days));
            selected.daily = manifest
                .daily
                .iter()
                .filter(|e| e.day.as_str() >= cutoff.as_str())
                .map(|e| (e.day.clone(), e.path.clone()))
                .collect();
        }
        Window::AllTime => {
            let months: HashSet<&str> = manifest.monthly.iter().map(|e| e.month.as_str()).collect();
            selected.monthly = manifest
                .monthly
                .iter()
                .map(|e| (e.month.clone(), e.path.clone()))
                .collect();

            // Daily rollups for months not yet rolled up monthly.
            selected.daily = manifest
                .daily
                .iter()
                .filter(|e| e.day.len() >= 7 && !months.contains(&e.day[..7]))
                .map(|e| (e.day.clone(), e.path.clone()))
                .collect();

            // Hourly rollups for days (and months) not otherwise covered.
            let days: HashSet<&str> = selected.daily.iter().map(|(d, _)| d.as_str()).collect();
            selected.hourly = manifest
                .hourly
                .iter()
                .filter(|e| {
                    e.hour.len() >= 10
                        && !days.contains(&e.hour[..10])
                        && !months.contains(&e.hour[..7])
                })
                .map(|e| (e.hour.clone(), e.path.clone()))
                .collect();
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{DailyEntry, HourlyEntry, MonthlyEntry};
    use chrono::TimeZone;

    fn hourly(hour: &str) -> HourlyEntry {
        HourlyEntry {
            hour: hour.to_string(),
            path: format!("hourly/{hour}"),
            total_spots: 1,
            total_activations: 1,
        }
    }

    fn daily(day: &str) -> DailyEntry {
        DailyEntry {
            day: day.to_string(),
            path: format!("daily/{day}"),
            total_spots: 1,
            total_activations: 1,
        }
    }

    fn monthly(month: &str) -> MonthlyEntry {
        MonthlyEntry {
            month: month.to_string(),
            path: format!("monthly/{month}"),
            total_spots: 1,
            total_activations: 1,
        }
    }

    #[test]
    fn test_24h_window_takes_recent_hourly_only() {
        let manifest = Manifest {
            hourly: vec![
                hourly("2024-03-15T09:00:00.000Z"),
                hourly("2024-03-14T11:00:00.000Z"),
                hourly("2024-03-14T09:00:00.000Z"),
            ],
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();

        // Cutoff is 2024-03-14T10:00; the 09:00 hour from yesterday is out.
        let selected = select_sources(&manifest, Window::Last24h, now);
        let hours: Vec<_> = selected.hourly.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(
            hours,
            vec!["2024-03-15T09:00:00.000Z", "2024-03-14T11:00:00.000Z"]
        );
    }

    #[test]
    fn test_7d_and_30d_use_daily() {
        let manifest = Manifest {
            daily: vec![daily("2024-03-14"), daily("2024-03-01"), daily("2024-01-01")],
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();

        let week = select_sources(&manifest, Window::Last7d, now);
        assert_eq!(week.daily.len(), 1);
        let month = select_sources(&manifest, Window::Last30d, now);
        assert_eq!(month.daily.len(), 2);
        assert!(week.hourly.is_empty() && week.monthly.is_empty());
    }

    #[test]
    fn test_all_time_supplements_uncovered_months_and_days() {
        let manifest = Manifest {
            monthly: vec![monthly("2024-01"), monthly("2024-02")],
            daily: vec![daily("2024-01-15"), daily("2024-03-01"), daily("2024-03-02")],
            hourly: vec![
                hourly("2024-02-10T05:00:00.000Z"),
                hourly("2024-03-02T08:00:00.000Z"),
                hourly("2024-03-03T09:00:00.000Z"),
            ],
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();

        let selected = select_sources(&manifest, Window::AllTime, now);
        assert_eq!(selected.monthly.len(), 2);
        // 2024-01-15 is covered by the monthly rollup; March days are not.
        let days: Vec<_> = selected.daily.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(days, vec!["2024-03-01", "2024-03-02"]);
        // Feb hour covered by monthly; Mar-02 hour covered by daily;
        // only the current partial day's hour remains.
        let hours: Vec<_> = selected.hourly.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(hours, vec!["2024-03-03T09:00:00.000Z"]);
    }

    #[test]
    fn test_earliest_timestamp_spans_levels() {
        let selected = SelectedSources {
            monthly: vec![("2024-01".into(), "m".into())],
            daily: vec![("2024-03-01".into(), "d".into())],
            hourly: vec![("2024-03-03T09:00:00.000Z".into(), "h".into())],
        };
        assert_eq!(selected.earliest_timestamp().as_deref(), Some("2024-01"));
    }
}
