//! RDAP (Registration Data Access Protocol) client.
//!
//! Availability is decided from the HTTP status alone, so the client never
//! reads the response body.

use crate::error::DomainScoutError;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("domain-scout/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a pooled `reqwest::Client` with a bounded timeout.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
    /// Timeout for each RDAP request
    timeout: Duration,
}

impl RdapClient {
    /// Create a new RDAP client with the default 5 second timeout.
    pub fn new() -> Result<Self, DomainScoutError> {
        Self::with_timeout(Duration::from_secs(5))
    }

    /// Create a new RDAP client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainScoutError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                DomainScoutError::network_with_source(
                    "Failed to create RDAP HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a single GET and return the response status code.
    ///
    /// # Errors
    ///
    /// `Timeout` when no response arrives within the configured timeout,
    /// `NetworkError` for every other transport failure.
    pub async fn fetch_status(&self, url: &str) -> Result<u16, DomainScoutError> {
        debug!(url, "sending RDAP request");

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/rdap+json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(url, e))?;

        let status = response.status().as_u16();
        debug!(url, status, "RDAP response received");
        Ok(status)
    }

    fn map_transport_error(&self, url: &str, err: reqwest::Error) -> DomainScoutError {
        if err.is_timeout() {
            DomainScoutError::timeout(format!("RDAP request to {}", url), self.timeout)
        } else if err.is_connect() {
            DomainScoutError::network_with_source("Connection failed", err.to_string())
        } else {
            DomainScoutError::network_with_source("RDAP request failed", err.to_string())
        }
    }
}
