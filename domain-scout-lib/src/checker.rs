//! Main domain checker implementation.
//!
//! `DomainChecker` turns raw user input into `CheckRequest`s and hands them to
//! the worker pool, sharing one HTTP client and one rate limiter across every
//! lookup it performs.

use crate::concurrent::{ConcurrentProcessor, ProgressFn};
use crate::error::DomainScoutError;
use crate::protocols::{extract_tld, rdap_url, RdapClient};
use crate::rate_limit::RateLimiter;
use crate::types::{CheckConfig, CheckRequest, CheckResult};
use crate::utils::{expand_domain_inputs, filter_valid_domains, validate_domain};
use std::sync::Arc;
use tracing::info;

/// Coordinates bulk availability checks.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout_lib::{CheckConfig, DomainChecker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = DomainChecker::with_config(CheckConfig::default().with_workers(4))?;
///     let domains = vec!["example".to_string(), "rust-lang.org".to_string()];
///     let tlds = vec!["com".to_string(), "io".to_string()];
///
///     for result in checker.check_all(&domains, Some(&tlds)).await? {
///         println!("{}: {}", result.domain, result.available);
///     }
///     Ok(())
/// }
/// ```
pub struct DomainChecker {
    config: CheckConfig,
    rdap_client: RdapClient,
    /// Shared by every run of this checker so back-to-back calls stay spaced
    rate_limiter: Arc<RateLimiter>,
    progress: Option<ProgressFn>,
}

impl DomainChecker {
    /// Create a checker with the default configuration.
    pub fn new() -> Result<Self, DomainScoutError> {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker with a custom configuration.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn with_config(config: CheckConfig) -> Result<Self, DomainScoutError> {
        let rdap_client = RdapClient::with_timeout(config.timeout)?;
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));

        Ok(Self {
            config,
            rdap_client,
            rate_limiter,
            progress: None,
        })
    }

    /// Report every finished lookup to `progress` as it completes.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Number of RDAP lookups `check_all` would dispatch for these inputs.
    ///
    /// Counts the expanded names that survive validation (when enabled) and
    /// resolve to an endpoint. Rejected names never reach the worker pool, so
    /// this matches the final count reported to the progress callback.
    pub fn lookup_count(&self, domains: &[String], tlds: Option<&[String]>) -> usize {
        let tlds = tlds.or(self.config.tlds.as_deref());
        let base_override = self.config.rdap_base_url.as_deref();

        expand_domain_inputs(domains, tlds)
            .iter()
            .filter(|domain| !self.config.validate || validate_domain(domain).is_ok())
            .filter(|domain| rdap_url(domain, base_override).is_ok())
            .count()
    }

    /// Check every domain and return one result per dispatched domain.
    ///
    /// Base names are expanded with `tlds` (or the configured TLDs when
    /// `None`). With validation enabled, malformed names are dropped before
    /// dispatch and do not appear in the output. Inputs that have no TLD after
    /// expansion are reported as taken with an error, without a network call.
    ///
    /// Results come back in input order. Per-domain failures never surface as
    /// `Err`.
    pub async fn check_all(
        &self,
        domains: &[String],
        tlds: Option<&[String]>,
    ) -> Result<Vec<CheckResult>, DomainScoutError> {
        let tlds = tlds.or(self.config.tlds.as_deref());
        let mut expanded = expand_domain_inputs(domains, tlds);

        if self.config.validate {
            let (valid, invalid) = filter_valid_domains(&expanded);
            if !invalid.is_empty() {
                info!(skipped = invalid.len(), "invalid domains removed before dispatch");
            }
            expanded = valid;
        }

        let (requests, mut rejected) = self.build_requests(expanded);
        let dispatched: Vec<usize> = requests.iter().map(|r| r.index).collect();

        info!(
            domains = dispatched.len(),
            rejected = rejected.len(),
            workers = self.config.workers,
            rate_limit_ms = self.config.rate_limit.as_millis() as u64,
            "starting availability check"
        );

        let results = self.processor().run(requests).await;

        let mut ordered: Vec<(usize, CheckResult)> =
            dispatched.into_iter().zip(results).collect();
        ordered.append(&mut rejected);
        ordered.sort_by_key(|(index, _)| *index);

        let results: Vec<CheckResult> = ordered.into_iter().map(|(_, r)| r).collect();
        info!(
            total = results.len(),
            available = results.iter().filter(|r| r.available).count(),
            "availability check finished"
        );

        Ok(results)
    }

    /// Check a single fully qualified domain.
    ///
    /// Goes through the same rate limiter, retry policy and classifier as
    /// `check_all`.
    pub async fn check_domain(&self, domain: &str) -> CheckResult {
        let (requests, rejected) = self.build_requests(vec![domain.trim().to_string()]);

        if let Some((_, result)) = rejected.into_iter().next() {
            return result;
        }

        self.processor()
            .run(requests)
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| CheckResult::failed(domain, "worker failure: no result recorded"))
    }

    fn processor(&self) -> ConcurrentProcessor {
        let processor = ConcurrentProcessor::new(
            self.config.workers,
            self.rdap_client.clone(),
            self.rate_limiter.clone(),
        )
        .with_retries(self.config.retry_count);

        match &self.progress {
            Some(progress) => processor.with_progress(progress.clone()),
            None => processor,
        }
    }

    /// Split inputs into dispatchable requests and immediate failures, both
    /// tagged with their input position.
    fn build_requests(
        &self,
        domains: Vec<String>,
    ) -> (Vec<CheckRequest>, Vec<(usize, CheckResult)>) {
        let base_override = self.config.rdap_base_url.as_deref();
        let mut requests = Vec::with_capacity(domains.len());
        let mut rejected = Vec::new();

        for (index, domain) in domains.into_iter().enumerate() {
            let request = extract_tld(&domain).and_then(|tld| {
                rdap_url(&domain, base_override).map(|endpoint_url| (tld, endpoint_url))
            });

            match request {
                Ok((tld, endpoint_url)) => requests.push(CheckRequest {
                    domain,
                    tld,
                    endpoint_url,
                    index,
                }),
                Err(e) => {
                    tracing::warn!(domain = %domain, "cannot build RDAP request: {}", e);
                    rejected.push((index, CheckResult::failed(domain, e.to_string())));
                }
            }
        }

        (requests, rejected)
    }
}
