//! Bounded worker pool for bulk RDAP lookups.
//!
//! A fixed number of tokio tasks pull `CheckRequest`s from one shared FIFO
//! queue. Every dispatch goes through the shared `RateLimiter`, every outcome
//! (including failures) becomes exactly one `CheckResult`, and `run` only
//! returns once all workers have been joined.

use crate::classify::classify;
use crate::error::DomainScoutError;
use crate::protocols::RdapClient;
use crate::rate_limit::RateLimiter;
use crate::types::{CheckRequest, CheckResult};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Called once per finished lookup with the number of results recorded so far.
pub type ProgressFn = Arc<dyn Fn(usize, &CheckResult) + Send + Sync>;

type SharedQueue = Arc<Mutex<VecDeque<CheckRequest>>>;
type SharedResults = Arc<Mutex<Vec<(usize, CheckResult)>>>;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Everything a worker needs, shared read-only between workers.
struct WorkerContext {
    client: RdapClient,
    rate_limiter: Arc<RateLimiter>,
    retry_count: u32,
    retry_backoff: Duration,
    progress: Option<ProgressFn>,
    #[cfg(test)]
    panic_on: Option<String>,
}

/// Manages concurrent domain checking operations.
pub struct ConcurrentProcessor {
    workers: usize,
    client: RdapClient,
    rate_limiter: Arc<RateLimiter>,
    retry_count: u32,
    retry_backoff: Duration,
    progress: Option<ProgressFn>,
    #[cfg(test)]
    panic_on: Option<String>,
}

impl ConcurrentProcessor {
    /// Create a pool of `workers` tasks sharing `client` and `rate_limiter`.
    pub fn new(workers: usize, client: RdapClient, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            workers: workers.max(1),
            client,
            rate_limiter,
            retry_count: 1,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            progress: None,
            #[cfg(test)]
            panic_on: None,
        }
    }

    /// Number of re-sends after a network failure or timeout.
    pub fn with_retries(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Make the worker that picks up `domain` panic mid-request.
    #[cfg(test)]
    fn with_panic_on(mut self, domain: &str) -> Self {
        self.panic_on = Some(domain.to_string());
        self
    }

    /// Check every request and return one result per request, in dispatch order.
    pub async fn run(&self, requests: Vec<CheckRequest>) -> Vec<CheckResult> {
        if requests.is_empty() {
            return Vec::new();
        }

        let total = requests.len();
        let dispatched: Vec<(usize, String)> = requests
            .iter()
            .map(|r| (r.index, r.domain.clone()))
            .collect();

        let queue: SharedQueue = Arc::new(Mutex::new(VecDeque::from(requests)));
        let results: SharedResults = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let pool_size = self.workers.min(total);
        let context = Arc::new(WorkerContext {
            client: self.client.clone(),
            rate_limiter: self.rate_limiter.clone(),
            retry_count: self.retry_count,
            retry_backoff: self.retry_backoff,
            progress: self.progress.clone(),
            #[cfg(test)]
            panic_on: self.panic_on.clone(),
        });

        debug!(total, pool_size, "starting worker pool");

        let handles: Vec<_> = (0..pool_size)
            .map(|worker_id| {
                let context = context.clone();
                let queue = queue.clone();
                let results = results.clone();
                tokio::spawn(async move { context.work(worker_id, queue, results).await })
            })
            .collect();

        for (worker_id, outcome) in futures::future::join_all(handles)
            .await
            .into_iter()
            .enumerate()
        {
            if let Err(e) = outcome {
                error!(worker_id, error = %e, "worker task failed");
            }
        }

        let mut collected = std::mem::take(&mut *results.lock().await);

        // A worker that died mid-request leaves a hole; fill it so every
        // dispatched request still has exactly one result.
        let recorded: HashSet<usize> = collected.iter().map(|(index, _)| *index).collect();
        for (index, domain) in dispatched {
            if !recorded.contains(&index) {
                collected.push((
                    index,
                    CheckResult::failed(domain, "worker failure: no result recorded"),
                ));
            }
        }

        collected.sort_by_key(|(index, _)| *index);
        collected.into_iter().map(|(_, result)| result).collect()
    }
}

impl WorkerContext {
    async fn work(&self, worker_id: usize, queue: SharedQueue, results: SharedResults) {
        loop {
            let next = queue.lock().await.pop_front();
            let Some(request) = next else {
                break;
            };

            let result = self.check(&request).await;
            debug!(
                worker_id,
                domain = %result.domain,
                available = result.available,
                status = ?result.http_status,
                "check finished"
            );

            let recorded = {
                let mut results = results.lock().await;
                results.push((request.index, result.clone()));
                results.len()
            };

            if let Some(progress) = &self.progress {
                progress(recorded, &result);
            }
        }
    }

    /// Dispatch one request, retrying transport failures, and classify it.
    async fn check(&self, request: &CheckRequest) -> CheckResult {
        let start = Instant::now();
        let mut attempt = 0;

        #[cfg(test)]
        if self.panic_on.as_deref() == Some(request.domain.as_str()) {
            panic!("worker crashed on {}", request.domain);
        }

        loop {
            self.rate_limiter.acquire().await;

            match self.client.fetch_status(&request.endpoint_url).await {
                Ok(status) => {
                    let verdict = classify(Some(status), false);
                    let mut result =
                        CheckResult::from_status(&request.domain, status, verdict.is_available());
                    if status != 200 && status != 404 {
                        result.error = Some(
                            DomainScoutError::unexpected_status(&request.domain, status)
                                .to_string(),
                        );
                    }
                    return result.with_duration(start.elapsed());
                }
                Err(e) if e.is_network_failure() && attempt < self.retry_count => {
                    attempt += 1;
                    debug!(domain = %request.domain, attempt, error = %e, "retrying RDAP request");
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(e) => {
                    let verdict = classify(None, true);
                    let mut result = CheckResult::failed(&request.domain, e.to_string());
                    result.available = verdict.is_available();
                    return result.with_duration(start.elapsed());
                }
            }
        }
    }
}
