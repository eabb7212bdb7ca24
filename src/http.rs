// src/http.rs
// Transport seam for the external APIs. The real fetcher wraps a shared
// reqwest client; the stub queues canned responses and records every URL it
// was asked for, so tests can assert both payload handling and "no call was
// made" paths without sockets.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ViewError;

/// Status + body of an upstream reply, before any view-specific parsing.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: String,
}

impl FetchedResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issue one GET and return status + body. Connection-level failures
    /// map to `ViewError::Transport`; non-2xx statuses are returned as-is
    /// so callers can branch on them (404 is meaningful for Wikipedia).
    async fn get(&self, url: &str) -> Result<FetchedResponse, ViewError>;
}

pub type DynHttp = Arc<dyn HttpFetch>;

/// Production transport: one shared client, identifying User-Agent,
/// 4s connect / 10s total timeouts.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedResponse, ViewError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ViewError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ViewError::Transport(e.to_string()))?;
        Ok(FetchedResponse { status, body })
    }
}

/// Test transport: pops queued replies in order and logs requested URLs.
/// An empty queue is a hard test failure, surfaced as a transport error.
#[derive(Default)]
pub struct StubFetcher {
    responses: Mutex<VecDeque<Result<FetchedResponse, ViewError>>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .expect("stub responses mutex poisoned")
            .push_back(Ok(FetchedResponse {
                status,
                body: body.into(),
            }));
    }

    pub fn push_error(&self, err: ViewError) {
        self.responses
            .lock()
            .expect("stub responses mutex poisoned")
            .push_back(Err(err));
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("stub calls mutex poisoned").clone()
    }
}

#[async_trait]
impl HttpFetch for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchedResponse, ViewError> {
        self.calls
            .lock()
            .expect("stub calls mutex poisoned")
            .push(url.to_string());
        self.responses
            .lock()
            .expect("stub responses mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ViewError::Transport(format!(
                    "stub has no response queued for {url}"
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_replays_in_order_and_records_urls() {
        let stub = StubFetcher::new();
        stub.push_response(200, "first");
        stub.push_response(404, "second");

        let a = stub.get("http://x/1").await.unwrap();
        let b = stub.get("http://x/2").await.unwrap();
        assert_eq!(a.status, 200);
        assert!(a.is_success());
        assert_eq!(b.status, 404);
        assert!(!b.is_success());
        assert_eq!(stub.calls(), vec!["http://x/1", "http://x/2"]);
    }

    #[tokio::test]
    async fn stub_exhaustion_is_a_transport_error() {
        let stub = StubFetcher::new();
        let err = stub.get("http://x").await.unwrap_err();
        assert!(matches!(err, ViewError::Transport(_)));
    }
}
