//! Time-hierarchical rollups: raw captures → hourly → daily → monthly.

mod job;
mod merge;
mod types;

pub use job::{aggregate_day, aggregate_hour, aggregate_month, AggregationOutcome};
pub use merge::{finalize, group_spots, merge_rows};
pub use types::{
    Accumulator, AggregateKey, BaseAggregate, DailyAggregate, HourlyAggregate, MonthlyAggregate,
};
