//! Fixed-schema summary documents published under `summaries/`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub spots: u64,
    pub activations: u64,
    pub unique_activators: u64,
    pub unique_parks: u64,
}

#[derive(Debug, Serialize)]
pub struct ModeStat {
    pub mode: String,
    pub spots: u64,
    pub activations: u64,
}

#[derive(Debug, Serialize)]
pub struct BandStat {
    pub band: String,
    pub spots: u64,
    pub activations: u64,
}

#[derive(Debug, Serialize)]
pub struct EntityStat {
    pub entity: String,
    pub spots: u64,
    pub activations: u64,
}

/// `summaries/stats_<window>.json`.
#[derive(Debug, Serialize)]
pub struct WindowStats {
    pub window: String,
    pub generated_at: String,
    pub totals: Totals,
    /// Sorted by spot count descending.
    pub by_mode: Vec<ModeStat>,
    /// Sorted by spot count descending.
    pub by_band: Vec<BandStat>,
    /// Top 20, sorted by activations descending.
    pub by_entity: Vec<EntityStat>,
}

/// `summaries/all_time.json`.
#[derive(Debug, Serialize)]
pub struct AllTimeStats {
    pub generated_at: String,
    pub totals: Totals,
    /// Earliest bucket timestamp merged into the all-time aggregate.
    pub data_since: Option<String>,
}

/// `summaries/time_of_day.json`: spots by UTC hour of day.
#[derive(Debug, Serialize)]
pub struct TimeOfDay {
    pub generated_at: String,
    pub hours: Vec<TimeOfDayRow>,
}

#[derive(Debug, Serialize)]
pub struct TimeOfDayRow {
    pub hour: u32,
    pub spots: u64,
}

/// `summaries/day_of_week.json`: spots by weekday, Sunday = 0.
#[derive(Debug, Serialize)]
pub struct DayOfWeek {
    pub generated_at: String,
    pub days: Vec<DayOfWeekRow>,
}

#[derive(Debug, Serialize)]
pub struct DayOfWeekRow {
    pub day: u32,
    pub spots: u64,
}

/// `summaries/trends.json`.
#[derive(Debug, Serialize)]
pub struct Trends {
    pub generated_at: String,
    /// Last 14 days.
    pub daily: Vec<TrendRow>,
    /// Last 14 weeks, keyed by the UTC Sunday starting each week.
    pub weekly: Vec<TrendRow>,
    /// Last 12 months.
    pub monthly: Vec<TrendRow>,
}

/// Activator counts per period: overall plus per mode category.
#[derive(Debug, Serialize)]
pub struct TrendRow {
    pub period: String,
    pub activators: u64,
    pub cw: u64,
    pub ssb: u64,
    pub digital: u64,
}

/// `summaries/top_entities.json`.
#[derive(Debug, Serialize)]
pub struct TopEntities {
    pub generated_at: String,
    /// Top 10 parks by unique activators over 14 days.
    pub parks: Vec<TopPark>,
    /// Top 10 states by unique activators over 14 days.
    pub states: Vec<TopState>,
}

#[derive(Debug, Serialize)]
pub struct TopPark {
    pub park: String,
    pub activators: u64,
}

#[derive(Debug, Serialize)]
pub struct TopState {
    pub state: String,
    pub activators: u64,
}
