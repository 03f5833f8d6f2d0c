//! Trigger dispatch: maps the platform's cron expressions onto jobs and
//! computes each job's target bucket.
//!
//! The hourly job aggregates the previous hour, the daily job the previous
//! day, and the monthly job (on the 1st) the previous month. An
//! unrecognized schedule runs the hourly aggregation.

use crate::aggregate::{aggregate_day, aggregate_hour, aggregate_month};
use crate::collector::collect;
use crate::error::PipelineError;
use crate::fetch::SpotTransport;
use crate::store::ObjectStore;
use crate::summary::summarize;
use chrono::{DateTime, Datelike, Duration, Utc};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Collect,
    AggregateHour,
    AggregateDay,
    AggregateMonth,
    Summarize,
}

/// The cron expressions the platform schedules, mapped to jobs.
pub fn job_for_cron(cron: &str) -> Job {
    match cron.trim() {
        "* * * * *" => Job::Collect,
        "5 * * * *" => Job::AggregateHour,
        "15 0 * * *" => Job::AggregateDay,
        "30 0 1 * *" => Job::AggregateMonth,
        "*/15 * * * *" => Job::Summarize,
        _ => Job::AggregateHour,
    }
}

/// Any instant within the hour before the one containing `now`.
pub fn previous_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(1)
}

/// Any instant within the day before the one containing `now`.
pub fn previous_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(1)
}

/// Any instant within the month before the one containing `now`.
pub fn previous_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(now.day() as i64)
}

/// Runs one job invocation as of `now`.
pub async fn run_job<T: SpotTransport>(
    store: &dyn ObjectStore,
    transport: &T,
    api_url: &str,
    job: Job,
    now: DateTime<Utc>,
) -> Result<(), PipelineError> {
    match job {
        Job::Collect => {
            let outcome = collect(store, transport, api_url).await?;
            info!("collect: {} spots captured", outcome.spot_count);
        }
        Job::AggregateHour => {
            aggregate_hour(store, previous_hour(now)).await?;
        }
        Job::AggregateDay => {
            aggregate_day(store, previous_day(now)).await?;
        }
        Job::AggregateMonth => {
            aggregate_month(store, previous_month(now)).await?;
        }
        Job::Summarize => {
            summarize(store).await?;
        }
    }
    Ok(())
}
