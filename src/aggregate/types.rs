//! Row and accumulator types for the rollup layers.

use crate::normalizer::NormalizedSpot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Composite grouping key shared by every rollup level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AggregateKey {
    pub mode: String,
    pub band: String,
    pub entity: String,
}

impl AggregateKey {
    pub fn for_spot(spot: &NormalizedSpot) -> Self {
        AggregateKey {
            mode: spot.mode.clone(),
            band: spot.band.clone(),
            entity: spot.entity.clone(),
        }
    }
}

/// One row of a published rollup file.
///
/// The cardinality fields are always recomputed from the collections; a
/// merge never sums them from children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAggregate {
    pub mode: String,
    pub band: String,
    pub entity: String,
    pub spot_count: u64,
    pub activation_count: u64,
    pub unique_activators: u64,
    pub unique_parks: u64,
    pub activators: Vec<String>,
    pub parks: Vec<String>,
    /// `"CALLSIGN|PARK"` pairs.
    pub activations: Vec<String>,
    /// `"STATE|CALLSIGN"` pairs, US spots only.
    pub state_activators: Vec<String>,
}

impl BaseAggregate {
    pub fn key(&self) -> AggregateKey {
        AggregateKey {
            mode: self.mode.clone(),
            band: self.band.clone(),
            entity: self.entity.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyAggregate {
    /// ISO hour, minutes and below zeroed.
    pub hour: String,
    #[serde(flatten)]
    pub base: BaseAggregate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(flatten)]
    pub base: BaseAggregate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// `YYYY-MM`.
    pub month: String,
    #[serde(flatten)]
    pub base: BaseAggregate,
}

/// Running state for one grouping key.
///
/// Ordered sets keep serialization deterministic, so re-aggregating
/// unchanged inputs reproduces the published bytes and therefore the
/// content hash.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pub spot_count: u64,
    pub activators: BTreeSet<String>,
    pub parks: BTreeSet<String>,
    pub activations: BTreeSet<String>,
    pub state_activators: BTreeSet<String>,
}

impl Accumulator {
    /// Folds one deduplicated spot into this group.
    pub fn add_spot(&mut self, spot: &NormalizedSpot) {
        self.spot_count += 1;
        self.activators.insert(spot.activator.clone());
        self.parks.insert(spot.reference.clone());
        self.activations
            .insert(format!("{}|{}", spot.activator, spot.reference));
        if let Some(state) = &spot.state {
            self.state_activators
                .insert(format!("{}|{}", state, spot.activator));
        }
    }

    /// Folds one child rollup row into this group: spot counts sum, the
    /// collections union.
    pub fn merge_base(&mut self, row: &BaseAggregate) {
        self.spot_count += row.spot_count;
        self.activators.extend(row.activators.iter().cloned());
        self.parks.extend(row.parks.iter().cloned());
        self.activations.extend(row.activations.iter().cloned());
        self.state_activators
            .extend(row.state_activators.iter().cloned());
    }

    /// Finalizes the group into a row, recomputing every cardinality from
    /// the accumulated sets.
    pub fn into_base(self, key: &AggregateKey) -> BaseAggregate {
        BaseAggregate {
            mode: key.mode.clone(),
            band: key.band.clone(),
            entity: key.entity.clone(),
            spot_count: self.spot_count,
            activation_count: self.activations.len() as u64,
            unique_activators: self.activators.len() as u64,
            unique_parks: self.parks.len() as u64,
            activators: self.activators.into_iter().collect(),
            parks: self.parks.into_iter().collect(),
            activations: self.activations.into_iter().collect(),
            state_activators: self.state_activators.into_iter().collect(),
        }
    }
}
