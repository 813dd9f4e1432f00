//! HTTP transport for provider calls.
//!
//! ureq is blocking, so every request runs on tokio's blocking pool and the
//! caller only sees an async `get`.

use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use super::types::FetchError;

/// Status code and raw body of a completed request.
///
/// Non-2xx responses are still `Ok`: providers put rate-limit and
/// reserved-address signals in error bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// A single plain GET, no custom headers.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError>;
}

/// ureq-backed fetcher with a global request timeout.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }

    fn get_blocking(agent: &ureq::Agent, url: &str) -> Result<HttpReply, FetchError> {
        match agent.get(url).call() {
            Ok(response) => Ok(read_reply(response)),
            Err(ureq::Error::Status(_, response)) => Ok(read_reply(response)),
            Err(ureq::Error::Transport(t)) => Err(FetchError::Transport(t.to_string())),
        }
    }
}

fn read_reply(response: ureq::Response) -> HttpReply {
    let status = response.status();
    // An unreadable body is treated like an unparseable one further up.
    let body = response.into_string().unwrap_or_else(|e| {
        warn!(status, error = %e, "failed to read response body");
        String::new()
    });
    HttpReply { status, body }
}

#[async_trait]
impl HttpFetch for UreqFetcher {
    async fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
        let agent = self.agent.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || Self::get_blocking(&agent, &url))
            .await
            .map_err(|e| FetchError::Join(e.to_string()))?
    }
}
