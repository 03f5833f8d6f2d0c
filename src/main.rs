//! CLI entry point for the POTA spot rollup pipeline.
//!
//! Provides one subcommand per scheduled job, a `trigger` subcommand that
//! dispatches by cron expression the way the platform scheduler does, and
//! a `run` daemon mode that drives every cadence in-process.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use clap::{Parser, Subcommand};
use log::{error, info};
use pota_rollup::aggregate::{aggregate_day, aggregate_hour, aggregate_month};
use pota_rollup::collector::collect;
use pota_rollup::config::Config;
use pota_rollup::fetch::BasicClient;
use pota_rollup::scheduler::{self, job_for_cron, run_job, Job};
use pota_rollup::store::{ObjectStore, S3Store};
use pota_rollup::summary::summarize;

#[derive(Parser)]
#[command(name = "pota_rollup")]
#[command(about = "Ingests POTA spots and maintains time-hierarchical rollups", long_about = None)]
struct Cli {
    /// Object-store bucket (or set SPOT_BUCKET)
    #[arg(long, global = true)]
    bucket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one upstream snapshot and write a raw capture
    Collect,
    /// Aggregate one hour of raw captures (default: the previous hour)
    AggregateHour {
        /// Target hour, e.g. "2024-03-15T09"
        #[arg(value_name = "HOUR")]
        hour: Option<String>,
    },
    /// Aggregate one day of hourly rollups (default: the previous day)
    AggregateDay {
        /// Target day, e.g. "2024-03-15"
        #[arg(value_name = "DAY")]
        day: Option<String>,
    },
    /// Aggregate one month of daily rollups (default: the previous month)
    AggregateMonth {
        /// Target month, e.g. "2024-03"
        #[arg(value_name = "MONTH")]
        month: Option<String>,
    },
    /// Rebuild every summary document from the manifest
    Summarize,
    /// Dispatch a job the way the platform scheduler does
    Trigger {
        /// Cron expression of the firing trigger
        #[arg(value_name = "CRON")]
        cron: String,
    },
    /// Run every job on its own cadence, with a health endpoint
    Run {
        /// Port for GET /health
        #[arg(long, default_value_t = 8080)]
        health_port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let bucket = cli
        .bucket
        .or(config.bucket)
        .context("no bucket configured; pass --bucket or set SPOT_BUCKET")?;

    let aws_config = aws_config::load_from_env().await;
    let store = S3Store::new(&aws_config, &bucket);
    let http = BasicClient::new();

    match cli.command {
        Commands::Collect => {
            let outcome = collect(&store, &http, &config.api_url).await?;
            info!("captured {} spots to {}", outcome.spot_count, outcome.key);
        }
        Commands::AggregateHour { hour } => {
            let target = match hour {
                Some(h) => parse_hour(&h)?,
                None => scheduler::previous_hour(Utc::now()),
            };
            aggregate_hour(&store, target).await?;
        }
        Commands::AggregateDay { day } => {
            let target = match day {
                Some(d) => parse_day(&d)?,
                None => scheduler::previous_day(Utc::now()),
            };
            aggregate_day(&store, target).await?;
        }
        Commands::AggregateMonth { month } => {
            let target = match month {
                Some(m) => parse_month(&m)?,
                None => scheduler::previous_month(Utc::now()),
            };
            aggregate_month(&store, target).await?;
        }
        Commands::Summarize => {
            summarize(&store).await?;
        }
        Commands::Trigger { cron } => {
            let job = job_for_cron(&cron);
            info!("trigger {:?} -> {:?}", cron, job);
            run_job(&store, &http, &config.api_url, job, Utc::now()).await?;
        }
        Commands::Run { health_port } => {
            run_daemon(&store, &http, &config.api_url, health_port).await;
        }
    }

    Ok(())
}

/// Drives every job at its scheduled cadence: collect each minute,
/// aggregate the previous hour at xx:05, the previous day at 00:15, the
/// previous month at 00:30 on the 1st, and summarize every 15 minutes.
async fn run_daemon(store: &dyn ObjectStore, http: &BasicClient, api_url: &str, health_port: u16) {
    tokio::spawn(async move {
        if let Err(e) = pota_rollup::health::serve(health_port).await {
            error!("health endpoint failed: {}", e);
        }
    });
    info!("daemon started; /health on port {}", health_port);

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now = Utc::now();

        for job in due_jobs(now) {
            if let Err(e) = run_job(store, http, api_url, job, now).await {
                error!("{:?} failed ({}): {}", job, e.kind(), e);
            }
        }
    }
}

/// The jobs whose cadence matches this minute.
fn due_jobs(now: DateTime<Utc>) -> Vec<Job> {
    let mut jobs = vec![Job::Collect];
    if now.minute() == 5 {
        jobs.push(Job::AggregateHour);
    }
    if now.hour() == 0 && now.minute() == 15 {
        jobs.push(Job::AggregateDay);
    }
    if now.day() == 1 && now.hour() == 0 && now.minute() == 30 {
        jobs.push(Job::AggregateMonth);
    }
    if now.minute() % 15 == 0 {
        jobs.push(Job::Summarize);
    }
    jobs
}

fn parse_hour(value: &str) -> Result<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(&format!("{value}:00:00"), "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("invalid hour '{value}', expected YYYY-MM-DDTHH"))?;
    Ok(naive.and_utc())
}

fn parse_day(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid day '{value}', expected YYYY-MM-DD"))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

fn parse_month(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{value}', expected YYYY-MM"))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}
