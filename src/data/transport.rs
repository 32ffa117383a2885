//! HTTP transport for the AEMET OpenData fetch pipeline
//!
//! A thin client that performs a single GET with a bounded timeout and hands
//! back the status code and body with no further interpretation. Retry
//! policy, if any, belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Sentinel status for DNS, connect, timeout and TLS failures
///
/// The transport never surfaces these as errors; it reports them in-band so
/// the caller can distinguish "the network broke" from "the server said no".
pub const TRANSPORT_FAILURE: u16 = 0;

/// Default per-request connect/read timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Outcome of one HTTP exchange
///
/// On a completed exchange `status` is the real HTTP status and `body` is the
/// response body (the error body for non-200 responses, since the server may
/// return diagnostic JSON worth logging). On a transport-level failure
/// `status` is [`TRANSPORT_FAILURE`] and `body` describes what went wrong.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code, or 0 if the exchange never completed
    pub status: u16,
    /// Response body, or a failure description when status is 0
    pub body: String,
}

impl FetchResponse {
    /// Returns true if the exchange failed before producing an HTTP status
    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE
    }
}

/// Interface for performing one bounded GET request
///
/// The forecast client is generic over this so tests can drive the two-hop
/// protocol without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET against `url`, bounded by `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResponse;
}

/// Transport backed by a shared reqwest client
///
/// Connections are pooled and released by reqwest on every exit path;
/// dropping an in-flight `fetch` future aborts the request.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a new HttpTransport with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Creates a new HttpTransport with a custom reqwest client
    #[allow(dead_code)]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, timeout: Duration) -> FetchResponse {
        let result = self.client.get(url).timeout(timeout).send().await;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                // Reading the body can still fail mid-stream (timeout, reset);
                // that counts as a transport failure, not an HTTP outcome.
                match response.text().await {
                    Ok(body) => {
                        debug!(status, url, "HTTP exchange completed");
                        FetchResponse { status, body }
                    }
                    Err(e) => FetchResponse {
                        status: TRANSPORT_FAILURE,
                        body: format!("body read failed: {e}"),
                    },
                }
            }
            Err(e) => {
                debug!(url, error = %e, "HTTP exchange failed");
                FetchResponse {
                    status: TRANSPORT_FAILURE,
                    body: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_sentinel() {
        let response = FetchResponse {
            status: TRANSPORT_FAILURE,
            body: "dns error".to_string(),
        };
        assert!(response.is_transport_failure());

        let ok = FetchResponse {
            status: 200,
            body: "{}".to_string(),
        };
        assert!(!ok.is_transport_failure());
    }

    #[tokio::test]
    async fn test_unresolvable_host_reports_sentinel() {
        let transport = HttpTransport::new();
        let response = transport
            .fetch(
                "http://invalid.host.invalid/forecast",
                Duration::from_millis(500),
            )
            .await;

        assert!(response.is_transport_failure());
        assert!(!response.body.is_empty());
    }
}
