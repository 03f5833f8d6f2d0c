//! Spot ingestion and rollup pipeline for Parks On The Air.
//!
//! Five cooperating jobs share one object-store bucket: a per-minute
//! collector captures normalized spots under `raw/`, three aggregation
//! jobs maintain content-addressed hourly/daily/monthly rollups, a
//! manifest indexes the newest rollup per bucket, and a summary builder
//! publishes fixed-schema JSON documents for dashboards.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod hashing;
pub mod health;
pub mod manifest;
pub mod ndjson;
pub mod normalizer;
pub mod paths;
pub mod scheduler;
pub mod store;
pub mod summary;
