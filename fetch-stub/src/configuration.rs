use crate::{http_client::HttpClient, HyperHttpClient};
use std::{sync::Arc, time::Duration};

#[derive(Debug, Clone)]
pub struct FetchStubConfiguration {
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
    passthrough: bool,
    response_timeout: Option<Duration>,
}

impl FetchStubConfiguration {
    pub fn new() -> Self {
        Self {
            http_client: None,
            passthrough: true,
            response_timeout: None,
        }
    }

    /// The transport requests go to while nothing is intercepting them.
    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.http_client
            .clone()
            .unwrap_or_else(|| Arc::new(HyperHttpClient::new()))
    }

    pub fn set_http_client(&mut self, http_client: Arc<dyn HttpClient + Send + Sync>) {
        self.http_client = Some(http_client);
    }

    pub fn passthrough(&self) -> bool {
        self.passthrough
    }

    pub fn set_passthrough(&mut self, value: bool) {
        self.passthrough = value;
    }

    /// How long a request may wait for a deferred responder. `None` waits
    /// until one is supplied or the interception is removed.
    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout
    }

    /// Bounds the wait for a deferred responder with `tokio::time::timeout`.
    ///
    /// Once set, stubbed requests must run inside a tokio runtime with the time
    /// driver enabled (`#[tokio::test]`, `TestSession::run`). Polling them from
    /// another executor such as `futures::executor::block_on` panics.
    pub fn set_response_timeout(&mut self, timeout: Duration) {
        self.response_timeout = Some(timeout);
    }
}

impl Default for FetchStubConfiguration {
    fn default() -> Self {
        Self::new()
    }
}
