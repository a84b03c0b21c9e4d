use super::model::RiverPayload;
use super::payload::{decode, PayloadError};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RIVER_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a river.
///
/// None of these are retried here; the next poll tick is the only retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was not a river document
    #[error("Parse error: {0}")]
    Payload(#[from] PayloadError),
    /// The fetch task panicked or was cancelled before producing a result
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

/// Fetch and decode the river published at `source`.
///
/// Accepts plain JSON and JSONP bodies. A single attempt is made.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded 30 seconds
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Response exceeded 10MB
/// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
/// - [`FetchError::Payload`] - Body is not a river document
pub async fn fetch_river(client: &reqwest::Client, source: &str) -> Result<RiverPayload, FetchError> {
    tracing::debug!(source = %source, "Fetching river");

    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(source).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = tokio::time::timeout(FETCH_TIMEOUT, read_limited_bytes(response, MAX_RIVER_SIZE))
        .await
        .map_err(|_| FetchError::Timeout)??;

    let payload = decode(&bytes)?;
    tracing::debug!(
        source = %source,
        feeds = payload.updated_feeds.updated_feed.len(),
        "River decoded"
    );
    Ok(payload)
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    // Network interruptions mid-body leave us short of Content-Length
    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
