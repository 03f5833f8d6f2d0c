use super::SpotTransport;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::time::Duration;

/// Identifies this collector to the upstream API on every request.
pub const COLLECTOR_USER_AGENT: &str = "pota-rollup/0.1 (spot aggregation pipeline)";

/// The production [`SpotTransport`]: stable `User-Agent`, 30-second request
/// timeout, 10-second connection timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(COLLECTOR_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotTransport for BasicClient {
    async fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let resp = self
            .0
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch(format!("upstream returned {status}")));
        }

        resp.text()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))
    }
}
