//! Upstream HTTP access.
//!
//! [`fetch_spots`] pulls one snapshot of the current activator spots from
//! the upstream API and hands the raw records to the normalizer. The
//! request carries a stable `User-Agent`; the API needs no authentication.

mod basic;

pub use basic::{BasicClient, COLLECTOR_USER_AGENT};

use crate::error::PipelineError;
use crate::normalizer::RawSpot;
use async_trait::async_trait;

/// Transport for one snapshot request against the upstream spot API.
///
/// Production uses [`BasicClient`]; the test suite substitutes a canned
/// payload. Implementations own the HTTP-level failure policy: a transport
/// error or non-2xx status surfaces as `Fetch`.
#[async_trait]
pub trait SpotTransport: Send + Sync {
    /// Fetches the raw response body of one snapshot request.
    async fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

/// Fetches one snapshot of the upstream spot list.
///
/// Returns `Fetch` on transport failures and non-2xx statuses, `Parse` when
/// the payload is not a JSON array. Individual records are extracted
/// field-by-field with defaults, so a malformed element degrades to empty
/// fields instead of failing the snapshot.
pub async fn fetch_spots<T: SpotTransport>(
    transport: &T,
    url: &str,
) -> Result<Vec<RawSpot>, PipelineError> {
    let body = transport.fetch(url).await?;
    parse_spot_payload(&body)
}

/// Parses the upstream payload: must be a JSON array; each element is
/// extracted tolerantly.
pub fn parse_spot_payload(body: &str) -> Result<Vec<RawSpot>, PipelineError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PipelineError::Parse(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or_else(|| PipelineError::Parse("payload is not an array".to_string()))?;

    Ok(items.iter().map(RawSpot::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedTransport(Result<String, PipelineError>);

    #[async_trait]
    impl SpotTransport for CannedTransport {
        async fn fetch(&self, _url: &str) -> Result<String, PipelineError> {
            match &self.0 {
                Ok(body) => Ok(body.clone()),
                Err(e) => Err(PipelineError::Fetch(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_spots_through_transport() {
        let transport = CannedTransport(Ok(
            r#"[{"spotId":1,"activator":"W0A","frequency":"7137","mode":"ssb","reference":"K-1"}]"#
                .to_string(),
        ));
        let spots = fetch_spots(&transport, "http://example.invalid").await.unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].spot_id, 1);
        assert_eq!(spots[0].activator, "W0A");
    }

    #[tokio::test]
    async fn test_fetch_spots_propagates_transport_failure() {
        let transport = CannedTransport(Err(PipelineError::Fetch("upstream returned 503".into())));
        let err = fetch_spots(&transport, "http://example.invalid").await.unwrap_err();
        assert_eq!(err.kind(), "FETCH_ERROR");
    }

    #[test]
    fn test_parse_payload_array() {
        let body = r#"[{"spotId":1,"activator":"W0A","frequency":"7137","mode":"ssb","reference":"K-1"}]"#;
        let spots = parse_spot_payload(body).unwrap();
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].spot_id, 1);
        assert_eq!(spots[0].activator, "W0A");
    }

    #[test]
    fn test_parse_payload_rejects_non_array() {
        let err = parse_spot_payload(r#"{"spots":[]}"#).unwrap_err();
        assert_eq!(err.kind(), "PARSE_ERROR");
    }

    #[test]
    fn test_parse_payload_rejects_invalid_json() {
        let err = parse_spot_payload("not json").unwrap_err();
        assert_eq!(err.kind(), "PARSE_ERROR");
    }

    #[test]
    fn test_parse_payload_tolerates_malformed_elements() {
        let spots = parse_spot_payload(r#"[{"spotId":"not a number"},42]"#).unwrap();
        assert_eq!(spots.len(), 2);
        assert_eq!(spots[0].spot_id, 0);
        assert_eq!(spots[1].activator, "");
    }
}
