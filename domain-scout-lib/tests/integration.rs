//! Integration tests for domain-scout-lib against an in-process RDAP server.

use domain_scout_lib::{report, CheckConfig, DomainChecker};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Minimal RDAP responder: answers `GET /domain/<name>` with a status chosen
/// per domain (200 by default), optionally after a delay.
struct MockRdap {
    base_url: String,
    hits: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl MockRdap {
    async fn start(statuses: &[(&str, u16)], delays: &[(&str, Duration)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let statuses: Arc<HashMap<String, u16>> = Arc::new(
            statuses
                .iter()
                .map(|(domain, status)| (domain.to_string(), *status))
                .collect(),
        );
        let delays: Arc<HashMap<String, Duration>> = Arc::new(
            delays
                .iter()
                .map(|(domain, delay)| (domain.to_string(), *delay))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(Vec::new()));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let statuses = statuses.clone();
                let delays = delays.clone();
                let hits = server_hits.clone();
                tokio::spawn(async move {
                    let _ = respond(stream, &statuses, &delays, &hits).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/domain/", addr),
            hits,
        }
    }

    fn hits(&self) -> Vec<(String, Instant)> {
        self.hits.lock().unwrap().clone()
    }

    fn hit_count(&self, domain: &str) -> usize {
        self.hits().iter().filter(|(d, _)| d == domain).count()
    }
}

async fn respond(
    mut stream: TcpStream,
    statuses: &HashMap<String, u16>,
    delays: &HashMap<String, Duration>,
    hits: &Mutex<Vec<(String, Instant)>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let text = String::from_utf8_lossy(&request);
    let path = text.split_whitespace().nth(1).unwrap_or("/");
    let domain = path.rsplit('/').next().unwrap_or("").to_string();
    hits.lock().unwrap().push((domain.clone(), Instant::now()));

    if let Some(delay) = delays.get(&domain) {
        tokio::time::sleep(*delay).await;
    }

    let status = statuses.get(&domain).copied().unwrap_or(200);
    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/rdap+json\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn config_for(server: &MockRdap) -> CheckConfig {
    CheckConfig::default()
        .with_rdap_base_url(server.base_url.clone())
        .with_rate_limit(Duration::ZERO)
        .with_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_end_to_end_availability() {
    let server = MockRdap::start(
        &[("available-example-zzz.com", 404), ("google.com", 200)],
        &[],
    )
    .await;
    let checker = DomainChecker::with_config(config_for(&server)).unwrap();

    let results = checker
        .check_all(&strings(&["available-example-zzz.com", "google.com"]), None)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].domain, "available-example-zzz.com");
    assert!(results[0].available);
    assert_eq!(results[0].http_status, Some(404));
    assert_eq!(results[1].domain, "google.com");
    assert!(!results[1].available);
    assert_eq!(results[1].http_status, Some(200));

    assert_eq!(report::summary_line(&results), "1/2 domains are available");
}

#[tokio::test]
async fn test_one_result_per_domain_in_input_order() {
    let domains: Vec<String> = (0..25).map(|i| format!("name{:02}.com", i)).collect();
    let statuses: Vec<(String, u16)> = domains
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let status = match i % 4 {
                0 => 404,
                1 => 200,
                2 => 429,
                _ => 500,
            };
            (d.clone(), status)
        })
        .collect();
    let status_refs: Vec<(&str, u16)> = statuses.iter().map(|(d, s)| (d.as_str(), *s)).collect();

    let server = MockRdap::start(&status_refs, &[]).await;
    let checker = DomainChecker::with_config(config_for(&server).with_workers(4)).unwrap();
    let results = checker.check_all(&domains, None).await.unwrap();

    assert_eq!(results.len(), domains.len());
    for (i, (result, domain)) in results.iter().zip(&domains).enumerate() {
        assert_eq!(&result.domain, domain);
        assert_eq!(result.available, i % 4 == 0, "{}", domain);
    }
    assert_eq!(server.hits().len(), domains.len());
}

#[tokio::test]
async fn test_rate_limit_spaces_dispatches_across_workers() {
    let server = MockRdap::start(&[], &[]).await;
    let interval = Duration::from_millis(100);
    let config = config_for(&server)
        .with_workers(4)
        .with_rate_limit(interval);
    let checker = DomainChecker::with_config(config).unwrap();

    let domains: Vec<String> = (0..6).map(|i| format!("paced{}.com", i)).collect();
    let start = Instant::now();
    let results = checker.check_all(&domains, None).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 6);
    assert!(
        elapsed >= interval * 5,
        "6 dispatches at 100ms spacing finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_base_names_expand_across_tlds() {
    let server = MockRdap::start(&[("foo.net", 404)], &[]).await;
    let checker = DomainChecker::with_config(config_for(&server)).unwrap();

    let tlds = strings(&["com", "net"]);
    let results = checker
        .check_all(&strings(&["foo", "bar.io"]), Some(&tlds))
        .await
        .unwrap();

    let domains: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["foo.com", "foo.net", "bar.io"]);
    assert!(!results[0].available);
    assert!(results[1].available);
    assert_eq!(server.hit_count("foo.com"), 1);
    assert_eq!(server.hit_count("bar.io"), 1);
}

#[tokio::test]
async fn test_inconclusive_lookups_are_taken() {
    let server = MockRdap::start(
        &[("busy.com", 429), ("broken.com", 503), ("free.com", 404)],
        &[("slow.com", Duration::from_secs(2))],
    )
    .await;
    let config = config_for(&server)
        .with_timeout(Duration::from_millis(200))
        .with_retry_count(1);
    let checker = DomainChecker::with_config(config).unwrap();

    let results = checker
        .check_all(
            &strings(&["busy.com", "broken.com", "slow.com", "free.com"]),
            None,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 4);

    assert!(!results[0].available);
    assert_eq!(results[0].http_status, Some(429));
    assert!(results[0].error.as_deref().unwrap().contains("429"));

    assert!(!results[1].available);
    assert_eq!(results[1].http_status, Some(503));

    assert!(!results[2].available);
    assert!(results[2].http_status.is_none());
    assert!(results[2].error.as_deref().unwrap().contains("Timeout"));
    // one retry after the first timeout
    assert_eq!(server.hit_count("slow.com"), 2);
    // status answers are never retried
    assert_eq!(server.hit_count("busy.com"), 1);

    assert!(results[3].available);
    assert!(results[3].error.is_none());
}

#[tokio::test]
async fn test_validation_skips_malformed_domains() {
    let server = MockRdap::start(&[], &[]).await;
    let checker =
        DomainChecker::with_config(config_for(&server).with_validation(true)).unwrap();

    let results = checker
        .check_all(&strings(&["good.com", "bad_name.com", "nodot"]), None)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].domain, "good.com");
    assert_eq!(server.hits().len(), 1);
}

#[tokio::test]
async fn test_check_domain_single_lookup() {
    let server = MockRdap::start(&[("solo.dev", 404)], &[]).await;
    let checker = DomainChecker::with_config(config_for(&server)).unwrap();

    let result = checker.check_domain("solo.dev").await;
    assert!(result.available);
    assert!(result.check_duration.is_some());
}
