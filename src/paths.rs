//! Bucket timestamps and object-key formatters.
//!
//! Every layer of the store shares the `YYYY/MM/DD/HH` layout:
//!
//! ```text
//! raw/YYYY/MM/DD/HH/spots-<timestamp-dashed>.ndjson
//! hourly/YYYY/MM/DD/HH-<hash8>.ndjson   (+ HH.meta.json sidecar)
//! daily/YYYY/MM/DD-<hash8>.ndjson       (+ DD.meta.json)
//! monthly/YYYY/MM-<hash8>.ndjson        (+ MM.meta.json)
//! ```

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Full ISO-8601 timestamp with milliseconds, e.g. `2024-03-15T09:00:00.000Z`.
pub fn iso_millis(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Bucket timestamp for the hourly level: minutes, seconds, and millis zeroed.
pub fn hour_timestamp(t: DateTime<Utc>) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:00:00.000Z",
        t.year(),
        t.month(),
        t.day(),
        t.hour()
    )
}

/// Bucket timestamp for the daily level: `YYYY-MM-DD`.
pub fn day_timestamp(t: DateTime<Utc>) -> String {
    format!("{:04}-{:02}-{:02}", t.year(), t.month(), t.day())
}

/// Bucket timestamp for the monthly level: `YYYY-MM`.
pub fn month_timestamp(t: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", t.year(), t.month())
}

/// Replaces the characters S3 keys should not repeat from ISO timestamps
/// (`:` and `.`) with dashes.
pub fn timestamp_dashed(iso: &str) -> String {
    iso.replace([':', '.'], "-")
}

/// Prefix holding all raw captures for the hour containing `t`.
pub fn raw_prefix(t: DateTime<Utc>) -> String {
    format!(
        "raw/{:04}/{:02}/{:02}/{:02}/",
        t.year(),
        t.month(),
        t.day(),
        t.hour()
    )
}

/// Key for a single raw capture taken at `captured_at`.
pub fn raw_capture_key(captured_at: DateTime<Utc>) -> String {
    format!(
        "{}spots-{}.ndjson",
        raw_prefix(captured_at),
        timestamp_dashed(&iso_millis(captured_at))
    )
}

/// Un-hashed output key for the hourly rollup of the hour containing `t`.
/// The published key gets the content hash inserted before the extension.
pub fn hourly_key(t: DateTime<Utc>) -> String {
    format!(
        "hourly/{:04}/{:02}/{:02}/{:02}.ndjson",
        t.year(),
        t.month(),
        t.day(),
        t.hour()
    )
}

/// Sidecar key for the hourly rollup; never content-hashed.
pub fn hourly_meta_key(t: DateTime<Utc>) -> String {
    format!(
        "hourly/{:04}/{:02}/{:02}/{:02}.meta.json",
        t.year(),
        t.month(),
        t.day(),
        t.hour()
    )
}

/// Prefix holding all hourly rollups for the day containing `t`.
pub fn hourly_prefix_for_day(t: DateTime<Utc>) -> String {
    format!("hourly/{:04}/{:02}/{:02}/", t.year(), t.month(), t.day())
}

pub fn daily_key(t: DateTime<Utc>) -> String {
    format!("daily/{:04}/{:02}/{:02}.ndjson", t.year(), t.month(), t.day())
}

pub fn daily_meta_key(t: DateTime<Utc>) -> String {
    format!(
        "daily/{:04}/{:02}/{:02}.meta.json",
        t.year(),
        t.month(),
        t.day()
    )
}

/// Prefix holding all daily rollups for the month containing `t`.
pub fn daily_prefix_for_month(t: DateTime<Utc>) -> String {
    format!("daily/{:04}/{:02}/", t.year(), t.month())
}

pub fn monthly_key(t: DateTime<Utc>) -> String {
    format!("monthly/{:04}/{:02}.ndjson", t.year(), t.month())
}

pub fn monthly_meta_key(t: DateTime<Utc>) -> String {
    format!("monthly/{:04}/{:02}.meta.json", t.year(), t.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_hour_timestamp_zeroes_subhour_fields() {
        assert_eq!(
            hour_timestamp(ts(2024, 3, 15, 9, 42, 17)),
            "2024-03-15T09:00:00.000Z"
        );
    }

    #[test]
    fn test_day_and_month_timestamps() {
        let t = ts(2025, 12, 27, 20, 0, 0);
        assert_eq!(day_timestamp(t), "2025-12-27");
        assert_eq!(month_timestamp(t), "2025-12");
    }

    #[test]
    fn test_timestamp_dashed() {
        assert_eq!(
            timestamp_dashed("2024-03-15T09:42:17.123Z"),
            "2024-03-15T09-42-17-123Z"
        );
    }

    #[test]
    fn test_raw_capture_key() {
        let t = ts(2024, 3, 15, 9, 42, 17);
        assert_eq!(
            raw_capture_key(t),
            "raw/2024/03/15/09/spots-2024-03-15T09-42-17-000Z.ndjson"
        );
    }

    #[test]
    fn test_rollup_keys() {
        let t = ts(2025, 12, 27, 20, 5, 0);
        assert_eq!(hourly_key(t), "hourly/2025/12/27/20.ndjson");
        assert_eq!(hourly_meta_key(t), "hourly/2025/12/27/20.meta.json");
        assert_eq!(daily_key(t), "daily/2025/12/27.ndjson");
        assert_eq!(monthly_key(t), "monthly/2025/12.ndjson");
    }

    #[test]
    fn test_layer_prefixes() {
        let t = ts(2025, 1, 2, 3, 0, 0);
        assert_eq!(raw_prefix(t), "raw/2025/01/02/03/");
        assert_eq!(hourly_prefix_for_day(t), "hourly/2025/01/02/");
        assert_eq!(daily_prefix_for_month(t), "daily/2025/01/");
    }
}
