//! Upstream spot record → [`NormalizedSpot`].
//!
//! Normalization is a pure transform: parse the string-typed frequency,
//! classify it to a band, upper-case the mode, extract the country entity
//! from the park reference, and resolve a US state from coordinates with a
//! grid-square fallback. Field extraction is tolerant; a malformed record
//! degrades to empty/zero fields rather than failing the snapshot.

use crate::geo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of the upstream spot array, extracted field-by-field.
#[derive(Debug, Clone, Default)]
pub struct RawSpot {
    pub spot_id: i64,
    pub activator: String,
    pub frequency: String,
    pub mode: String,
    pub reference: String,
    pub spot_time: String,
    pub spotter: String,
    pub source: String,
    pub name: String,
    pub grid4: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl RawSpot {
    /// Extracts the fields this pipeline uses from one payload element.
    /// Unknown or null fields default to empty string / 0; the upstream
    /// sends `frequency` as a string but numbers are accepted too.
    pub fn from_value(value: &Value) -> Self {
        let str_field = |name: &str| -> String {
            value[name].as_str().unwrap_or_default().to_string()
        };

        let frequency = match &value["frequency"] {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };

        RawSpot {
            spot_id: value["spotId"].as_i64().unwrap_or(0),
            activator: str_field("activator"),
            frequency,
            mode: str_field("mode"),
            reference: str_field("reference"),
            spot_time: str_field("spotTime"),
            spotter: str_field("spotter"),
            source: str_field("source"),
            name: str_field("name"),
            grid4: str_field("grid4"),
            latitude: value["latitude"].as_f64().unwrap_or(0.0),
            longitude: value["longitude"].as_f64().unwrap_or(0.0),
        }
    }
}

/// Canonical spot record persisted in raw captures and consumed by the
/// hourly aggregation. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpot {
    pub captured_at: String,
    pub spot_id: i64,
    pub activator: String,
    pub reference: String,
    /// kHz; 0 when the upstream value does not parse.
    pub frequency: f64,
    pub mode: String,
    pub band: String,
    pub source: String,
    /// Prefix of `reference` before the first `-`, or `"unknown"`.
    pub entity: String,
    pub grid: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub spotter: String,
    /// Two-letter US state code, `None` for non-US spots.
    pub state: Option<String>,
}

/// Amateur bands by frequency range in MHz, both ends inclusive.
const BAND_TABLE: &[(f64, f64, &str)] = &[
    (1.8, 2.0, "160m"),
    (3.5, 4.0, "80m"),
    (5.3, 5.4, "60m"),
    (7.0, 7.3, "40m"),
    (10.1, 10.15, "30m"),
    (14.0, 14.35, "20m"),
    (18.068, 18.168, "17m"),
    (21.0, 21.45, "15m"),
    (24.89, 24.99, "12m"),
    (28.0, 29.7, "10m"),
    (50.0, 54.0, "6m"),
    (144.0, 148.0, "2m"),
    (420.0, 450.0, "70cm"),
];

/// Classifies a frequency in kHz to a band tag. Anything outside every
/// range, including unparseable input mapped to 0, is `"other"`.
pub fn band_for_frequency(khz: f64) -> &'static str {
    if !khz.is_finite() {
        return "other";
    }
    let mhz = khz / 1000.0;
    BAND_TABLE
        .iter()
        .find(|(lo, hi, _)| mhz >= *lo && mhz <= *hi)
        .map(|(_, _, band)| *band)
        .unwrap_or("other")
}

/// Country entity: prefix of the park reference before the first `-`.
pub fn entity_from_reference(reference: &str) -> String {
    match reference.split('-').next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Normalizes one upstream record captured at `captured_at`.
pub fn normalize_spot(raw: &RawSpot, captured_at: DateTime<Utc>) -> NormalizedSpot {
    let frequency = raw.frequency.trim().parse::<f64>().unwrap_or(0.0);
    let frequency = if frequency.is_finite() { frequency } else { 0.0 };
    let grid: String = raw.grid4.chars().take(4).collect();
    let state = geo::resolve_state(raw.latitude, raw.longitude, &grid);

    NormalizedSpot {
        captured_at: crate::paths::iso_millis(captured_at),
        spot_id: raw.spot_id,
        activator: raw.activator.clone(),
        reference: raw.reference.clone(),
        frequency,
        mode: raw.mode.to_uppercase(),
        band: band_for_frequency(frequency).to_string(),
        source: raw.source.clone(),
        entity: entity_from_reference(&raw.reference),
        grid,
        latitude: raw.latitude,
        longitude: raw.longitude,
        name: raw.name.clone(),
        spotter: raw.spotter.clone(),
        state: state.map(|s| s.to_string()),
    }
}

/// Normalizes a whole snapshot with one shared capture timestamp.
pub fn normalize_snapshot(raws: &[RawSpot], captured_at: DateTime<Utc>) -> Vec<NormalizedSpot> {
    raws.iter().map(|raw| normalize_spot(raw, captured_at)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn capture_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 1, 0).unwrap()
    }

    #[test]
    fn test_band_table_midpoints_and_boundaries() {
        for (lo, hi, band) in BAND_TABLE {
            let mid = (lo + hi) / 2.0 * 1000.0;
            assert_eq!(band_for_frequency(lo * 1000.0), *band, "low edge of {band}");
            assert_eq!(band_for_frequency(hi * 1000.0), *band, "high edge of {band}");
            assert_eq!(band_for_frequency(mid), *band, "midpoint of {band}");
        }
    }

    #[test]
    fn test_band_outside_ranges_is_other() {
        assert_eq!(band_for_frequency(13999.0), "other");
        assert_eq!(band_for_frequency(0.0), "other");
        assert_eq!(band_for_frequency(1000000.0), "other");
    }

    #[test]
    fn test_band_degenerate_values_are_other() {
        assert_eq!(band_for_frequency(f64::NAN), "other");
        assert_eq!(band_for_frequency(-7100.0), "other");
    }

    #[test]
    fn test_band_edges_40m_and_20m() {
        assert_eq!(band_for_frequency(14000.0), "20m");
        assert_eq!(band_for_frequency(14001.0), "20m");
        assert_eq!(band_for_frequency(7137.0), "40m");
    }

    #[test]
    fn test_entity_extraction() {
        assert_eq!(entity_from_reference("K-1234"), "K");
        assert_eq!(entity_from_reference("US-PA-1234"), "US");
        assert_eq!(entity_from_reference(""), "unknown");
        assert_eq!(entity_from_reference("-1234"), "unknown");
    }

    #[test]
    fn test_normalize_spot_fields() {
        let raw = RawSpot {
            spot_id: 7,
            activator: "W0A".into(),
            frequency: "7137".into(),
            mode: "ssb".into(),
            reference: "K-1".into(),
            grid4: "FN42".into(),
            latitude: 42.4,
            longitude: -71.8,
            ..Default::default()
        };

        let spot = normalize_spot(&raw, capture_time());
        assert_eq!(spot.captured_at, "2024-03-15T09:01:00.000Z");
        assert_eq!(spot.frequency, 7137.0);
        assert_eq!(spot.mode, "SSB");
        assert_eq!(spot.band, "40m");
        assert_eq!(spot.entity, "K");
        assert_eq!(spot.state.as_deref(), Some("MA"));
    }

    #[test]
    fn test_normalize_unparseable_frequency() {
        let raw = RawSpot {
            frequency: "QRP".into(),
            ..Default::default()
        };
        let spot = normalize_spot(&raw, capture_time());
        assert_eq!(spot.frequency, 0.0);
        assert_eq!(spot.band, "other");
    }

    #[test]
    fn test_normalize_state_grid_fallback() {
        // No usable coordinates, grid still resolves.
        let raw = RawSpot {
            grid4: "EM12".into(),
            ..Default::default()
        };
        let spot = normalize_spot(&raw, capture_time());
        assert_eq!(spot.state.as_deref(), Some("TX"));
    }

    #[test]
    fn test_normalize_non_us_spot_has_no_state() {
        let raw = RawSpot {
            reference: "DE-0001".into(),
            grid4: "JO62".into(),
            latitude: 52.5,
            longitude: 13.4,
            ..Default::default()
        };
        let spot = normalize_spot(&raw, capture_time());
        assert_eq!(spot.entity, "DE");
        assert_eq!(spot.state, None);
    }

    #[test]
    fn test_normalize_truncates_long_grid() {
        let raw = RawSpot {
            grid4: "FN42ab".into(),
            ..Default::default()
        };
        let spot = normalize_spot(&raw, capture_time());
        assert_eq!(spot.grid, "FN42");
        assert_eq!(spot.state.as_deref(), Some("MA"));
    }

    #[test]
    fn test_raw_spot_from_value_accepts_numeric_frequency() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"spotId":3,"frequency":14074,"mode":"FT8"}"#).unwrap();
        let raw = RawSpot::from_value(&value);
        assert_eq!(raw.spot_id, 3);
        assert_eq!(raw.frequency, "14074");
        assert_eq!(raw.mode, "FT8");
    }
}
