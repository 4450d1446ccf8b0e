//! Core data types for domain availability checking.
//!
//! This module defines the request/result records that flow through the worker
//! pool, the availability verdict, and the checker configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Availability verdict for a single domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// The registry has no record of the domain (RDAP 404)
    Available,
    /// The domain is registered, or the lookup was inconclusive
    Taken,
}

impl Availability {
    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// A single RDAP lookup waiting in the work queue.
///
/// Built by splitting the domain on its last dot; the endpoint URL is resolved
/// up front so workers only have to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Fully qualified domain name (e.g., "example.com")
    pub domain: String,
    /// Lower-cased last label of the domain
    pub tld: String,
    /// Complete RDAP lookup URL for this domain
    pub endpoint_url: String,
    /// Dispatch position, used to restore input order after the pool finishes
    pub index: usize,
}

/// Result of a domain availability check.
///
/// Exactly one is produced per dispatched request. Failures are recorded in
/// `error` with `available == false`, never by omitting the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The domain name that was checked (e.g., "example.com")
    pub domain: String,

    /// HTTP status returned by the RDAP server, if a response arrived
    pub http_status: Option<u16>,

    /// Whether the domain is available for registration
    pub available: bool,

    /// Why the check was inconclusive, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall time of the lookup, including rate-limit waits and retries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

impl CheckResult {
    /// Build a result for a lookup that got an HTTP answer.
    pub fn from_status(domain: impl Into<String>, status: u16, available: bool) -> Self {
        Self {
            domain: domain.into(),
            http_status: Some(status),
            available,
            error: None,
            check_duration: None,
        }
    }

    /// Build an error-tagged result. Errors are never reported as available.
    pub fn failed(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            http_status: None,
            available: false,
            error: Some(error.into()),
            check_duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.check_duration = Some(duration);
        self
    }
}

/// Configuration options for bulk checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Number of concurrent workers pulling from the queue
    /// Default: 6, Range: 1-100
    pub workers: usize,

    /// Minimum gap between two request dispatches, across all workers
    /// Default: 100ms
    #[serde(skip)]
    pub rate_limit: Duration,

    /// Timeout for each individual RDAP request
    /// Default: 5 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// How many times a request is re-sent after a network failure or timeout
    /// Default: 1
    pub retry_count: u32,

    /// TLDs used to expand base names (entries without a dot)
    pub tlds: Option<Vec<String>>,

    /// Drop malformed domains before dispatch instead of checking them
    pub validate: bool,

    /// Replace the per-TLD endpoint table with a single RDAP base URL
    pub rdap_base_url: Option<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            workers: 6,
            rate_limit: Duration::from_millis(100),
            timeout: Duration::from_secs(5),
            retry_count: 1,
            tlds: None,
            validate: false,
            rdap_base_url: None,
        }
    }
}

impl CheckConfig {
    /// Set the worker count, capped at 100 to prevent resource exhaustion.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, 100);
        self
    }

    /// Set the global minimum interval between dispatches.
    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Convenience for callers holding the interval as fractional seconds.
    ///
    /// Negative and non-finite values are treated as "no rate limit".
    pub fn with_rate_limit_secs(self, seconds: f64) -> Self {
        let interval = if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds)
        } else {
            Duration::ZERO
        };
        self.with_rate_limit(interval)
    }

    /// Set custom timeout for RDAP requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Set TLDs to check for base domain names.
    pub fn with_tlds(mut self, tlds: Vec<String>) -> Self {
        self.tlds = Some(tlds);
        self
    }

    /// Enable or disable the domain format validation pass.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Send every lookup to `base_url` instead of the per-TLD registry.
    pub fn with_rdap_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rdap_base_url = Some(base_url.into());
        self
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => write!(f, "AVAILABLE"),
            Availability::Taken => write!(f, "TAKEN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.workers, 6);
        assert_eq!(config.rate_limit, Duration::from_millis(100));
        assert_eq!(config.retry_count, 1);
        assert!(config.tlds.is_none());
        assert!(!config.validate);
    }

    #[test]
    fn test_workers_are_clamped() {
        assert_eq!(CheckConfig::default().with_workers(0).workers, 1);
        assert_eq!(CheckConfig::default().with_workers(500).workers, 100);
        assert_eq!(CheckConfig::default().with_workers(12).workers, 12);
    }

    #[test]
    fn test_rate_limit_secs() {
        let config = CheckConfig::default().with_rate_limit_secs(0.25);
        assert_eq!(config.rate_limit, Duration::from_millis(250));

        let config = CheckConfig::default().with_rate_limit_secs(-1.0);
        assert_eq!(config.rate_limit, Duration::ZERO);

        let config = CheckConfig::default().with_rate_limit_secs(f64::NAN);
        assert_eq!(config.rate_limit, Duration::ZERO);
    }

    #[test]
    fn test_failed_result_is_never_available() {
        let result = CheckResult::failed("example.com", "Network error: refused");
        assert!(!result.available);
        assert!(result.http_status.is_none());
        assert_eq!(result.error.as_deref(), Some("Network error: refused"));
    }
}
