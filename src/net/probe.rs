//! net::probe
//!
//! Bounded-latency reachability check.
//!
//! A probe answers "can the remote be reached right now?" with a single
//! HEAD request. Any error, timeout or non-success status is `false`; the
//! probe never fails. A `true` answer does not promise that a later push
//! succeeds, so callers still handle push failure at the push site.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client, Url};
use thiserror::Error;

use crate::core::config::{DEFAULT_PROBE_TIMEOUT, DEFAULT_PROBE_URL};

/// Errors constructing a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid probe URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Answers whether the network is usable.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// True if the probe target answered successfully within the bound.
    async fn is_online(&self) -> bool;
}

/// Probe that sends `HEAD <url>` and waits at most `timeout`.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(concat!("devbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: parsed,
            timeout,
        })
    }

    /// Probe against the default endpoint with the default bound.
    pub fn with_defaults() -> Result<Self, ProbeError> {
        Self::new(DEFAULT_PROBE_URL, DEFAULT_PROBE_TIMEOUT)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn is_online(&self) -> bool {
        let request = self.client.head(self.url.clone()).send();

        // The client timeout covers the request; the outer bound also covers
        // DNS stalls that happen before the client clock starts.
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                let online = status.is_success() || status.is_redirection();
                tracing::debug!(url = %self.url, %status, online, "probe answered");
                online
            }
            Ok(Err(e)) => {
                tracing::debug!(url = %self.url, error = %e, "probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(url = %self.url, timeout = ?self.timeout, "probe timed out");
                false
            }
        }
    }
}
