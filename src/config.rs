//! Environment configuration.
//!
//! `.env` is loaded by `main` before reading these; CLI flags override.

use std::env;

pub const DEFAULT_API_URL: &str = "https://api.pota.app/spot/activator";

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream spot API endpoint.
    pub api_url: String,
    /// Object-store bucket holding every pipeline layer.
    pub bucket: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            api_url: env::var("POTA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            bucket: env::var("SPOT_BUCKET").ok(),
        }
    }
}
