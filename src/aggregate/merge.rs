//! The merge algebra shared by every rollup level.
//!
//! Grouping is by `(mode, band, entity)`. Merging is commutative and
//! associative: set-valued fields union, `spot_count` sums, and every
//! cardinality is recomputed from the final sets, so aggregating a
//! partition of the inputs in any order yields the same rows.

use super::types::{Accumulator, AggregateKey, BaseAggregate};
use crate::normalizer::NormalizedSpot;
use std::collections::BTreeMap;

/// Groups deduplicated spots into per-key accumulators.
pub fn group_spots<'a, I>(spots: I) -> BTreeMap<AggregateKey, Accumulator>
where
    I: IntoIterator<Item = &'a NormalizedSpot>,
{
    let mut groups: BTreeMap<AggregateKey, Accumulator> = BTreeMap::new();
    for spot in spots {
        groups
            .entry(AggregateKey::for_spot(spot))
            .or_default()
            .add_spot(spot);
    }
    groups
}

/// Folds child rollup rows into the running per-key accumulators.
pub fn merge_rows(groups: &mut BTreeMap<AggregateKey, Accumulator>, rows: &[BaseAggregate]) {
    for row in rows {
        groups.entry(row.key()).or_default().merge_base(row);
    }
}

/// Finalizes accumulators into rows, ordered by key.
pub fn finalize(groups: BTreeMap<AggregateKey, Accumulator>) -> Vec<BaseAggregate> {
    groups
        .into_iter()
        .map(|(key, acc)| acc.into_base(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: i64, activator: &str, reference: &str, mode: &str, band: &str) -> NormalizedSpot {
        NormalizedSpot {
            captured_at: "2024-03-15T09:01:00.000Z".into(),
            spot_id: id,
            activator: activator.into(),
            reference: reference.into(),
            frequency: 7137.0,
            mode: mode.into(),
            band: band.into(),
            source: String::new(),
            entity: reference.split('-').next().unwrap_or("unknown").into(),
            grid: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            name: String::new(),
            spotter: String::new(),
            state: None,
        }
    }

    #[test]
    fn test_two_spots_two_activators_one_key() {
        let spots = vec![
            spot(1, "W0A", "K-1", "SSB", "40m"),
            spot(2, "K1X", "K-2", "SSB", "40m"),
        ];
        let rows = finalize(group_spots(&spots));

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.mode, "SSB");
        assert_eq!(row.band, "40m");
        assert_eq!(row.entity, "K");
        assert_eq!(row.spot_count, 2);
        assert_eq!(row.activation_count, 2);
        assert_eq!(row.unique_activators, 2);
        assert_eq!(row.unique_parks, 2);
        assert_eq!(row.activators, vec!["K1X", "W0A"]);
        assert_eq!(row.activations, vec!["K1X|K-2", "W0A|K-1"]);
    }

    #[test]
    fn test_repeat_spots_same_activation() {
        // Same activator at the same park, three spots: one activation.
        let spots = vec![
            spot(1, "W0A", "K-1", "CW", "20m"),
            spot(2, "W0A", "K-1", "CW", "20m"),
            spot(3, "W0A", "K-1", "CW", "20m"),
        ];
        let rows = finalize(group_spots(&spots));

        assert_eq!(rows[0].spot_count, 3);
        assert_eq!(rows[0].unique_activators, 1);
        assert_eq!(rows[0].unique_parks, 1);
        assert_eq!(rows[0].activation_count, 1);
    }

    #[test]
    fn test_state_activators_only_for_us_spots() {
        let mut us = spot(1, "W0A", "US-0001", "CW", "40m");
        us.state = Some("MA".into());
        let non_us = spot(2, "DL1A", "DE-0001", "CW", "40m");

        let rows = finalize(group_spots(vec![&us, &non_us]));

        let us_row = rows.iter().find(|r| r.entity == "US").unwrap();
        assert_eq!(us_row.state_activators, vec!["MA|W0A"]);
        let de_row = rows.iter().find(|r| r.entity == "DE").unwrap();
        assert!(de_row.state_activators.is_empty());
    }

    #[test]
    fn test_partition_merge_equals_whole() {
        // Aggregate of S equals merge of aggregates of any partition of S.
        let all = vec![
            spot(1, "W0A", "K-1", "SSB", "40m"),
            spot(2, "K1X", "K-2", "SSB", "40m"),
            spot(3, "W0A", "K-5", "SSB", "40m"),
            spot(4, "N2B", "K-1", "CW", "20m"),
        ];
        let whole = finalize(group_spots(&all));

        let part1 = finalize(group_spots(&all[..2]));
        let part2 = finalize(group_spots(&all[2..]));
        let mut merged = BTreeMap::new();
        merge_rows(&mut merged, &part1);
        merge_rows(&mut merged, &part2);
        let merged = finalize(merged);

        assert_eq!(
            serde_json::to_string(&whole).unwrap(),
            serde_json::to_string(&merged).unwrap()
        );
    }

    #[test]
    fn test_merge_is_input_order_independent() {
        let a = finalize(group_spots(&vec![spot(1, "W0A", "K-1", "SSB", "40m")]));
        let b = finalize(group_spots(&vec![spot(2, "K1X", "K-2", "SSB", "40m")]));

        let mut ab = BTreeMap::new();
        merge_rows(&mut ab, &a);
        merge_rows(&mut ab, &b);
        let mut ba = BTreeMap::new();
        merge_rows(&mut ba, &b);
        merge_rows(&mut ba, &a);

        assert_eq!(
            serde_json::to_string(&finalize(ab)).unwrap(),
            serde_json::to_string(&finalize(ba)).unwrap()
        );
    }

    #[test]
    fn test_merge_recomputes_cardinalities_from_unions() {
        // Hour 09: 5 spots, activators {W0A, K1X}, parks {K-1, K-5}.
        // Hour 10: 3 spots, activators {W0A}, parks {K-9}.
        let child = |spot_count: u64, activators: &[&str], parks: &[&str]| BaseAggregate {
            mode: "SSB".into(),
            band: "40m".into(),
            entity: "K".into(),
            spot_count,
            activation_count: 0,
            unique_activators: activators.len() as u64,
            unique_parks: parks.len() as u64,
            activators: activators.iter().map(|s| s.to_string()).collect(),
            parks: parks.iter().map(|s| s.to_string()).collect(),
            activations: vec![],
            state_activators: vec![],
        };

        let mut groups = BTreeMap::new();
        merge_rows(&mut groups, &[child(5, &["W0A", "K1X"], &["K-1", "K-5"])]);
        merge_rows(&mut groups, &[child(3, &["W0A"], &["K-9"])]);
        let rows = finalize(groups);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].spot_count, 8);
        assert_eq!(rows[0].unique_activators, 2);
        assert_eq!(rows[0].unique_parks, 3);
    }
}
