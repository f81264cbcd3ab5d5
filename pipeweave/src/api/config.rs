//! API client configuration.

use std::time::Duration;

/// Connection settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout for plain REST calls.
    pub timeout: Duration,
    /// Per-request timeout for streaming endpoints.
    ///
    /// Reqwest's timeout covers body consumption, so a server-sent-event
    /// subscription must not run under the REST timeout: the backend keeps
    /// a training stream open for minutes while the job runs.
    pub stream_timeout: Duration,
    /// User-agent header value.
    pub user_agent: String,
}

impl ApiConfig {
    /// Creates a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            stream_timeout: Duration::from_secs(600),
            user_agent: concat!("pipeweave/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the per-request timeout for plain REST calls.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-request timeout for streaming endpoints.
    #[must_use]
    pub fn with_stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Sets the user-agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
