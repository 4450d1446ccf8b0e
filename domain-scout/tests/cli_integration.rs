// domain-scout/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::thread;
use tempfile::{NamedTempFile, TempDir};

const KEYWORD_CONFIG: &str = r#"{
  "keyword_categories": {
    "action": { "words": ["sync"], "bonus": 10, "required": false },
    "object": { "words": ["flow"], "bonus": 10, "required": false }
  },
  "generation": {
    "max_domains": 100,
    "min_length": 4,
    "max_length": 12,
    "patterns": { "single_word": true, "two_word_combo": true }
  },
  "domain_settings": { "default_tld": "com", "append_tld_to_output": true }
}"#;

/// Helper to create a test domains file
fn create_test_domains_file(domains: &[&str]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    let content = domains.join("\n");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

/// Command isolated from the caller's config files and DS_* variables.
fn scout(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("domain-scout").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "DS_WORKERS",
        "DS_RATE_LIMIT",
        "DS_TIMEOUT",
        "DS_TLD",
        "DS_ONLY_AVAILABLE",
        "DS_VALIDATE",
        "DS_FORMAT",
        "DS_RDAP_URL",
        "DS_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Blocking RDAP stand-in: 200 for every domain unless listed otherwise.
fn start_mock_rdap(statuses: &[(&str, u16)]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let addr = listener.local_addr().unwrap();
    let statuses: HashMap<String, u16> = statuses
        .iter()
        .map(|(domain, status)| (domain.to_string(), *status))
        .collect();

    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let statuses = statuses.clone();
            thread::spawn(move || respond(stream, &statuses));
        }
    });

    format!("http://{}/domain/", addr)
}

fn respond(mut stream: TcpStream, statuses: &HashMap<String, u16>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let text = String::from_utf8_lossy(&request);
    let path = text.split_whitespace().nth(1).unwrap_or("/");
    let domain = path.rsplit('/').next().unwrap_or("");
    let status = statuses.get(domain).copied().unwrap_or(200);

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        status
    );
    let _ = stream.write_all(response.as_bytes());
}

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    scout(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("rank"))
        .stdout(predicate::str::contains("workflow"));
}

#[test]
fn test_check_help_shows_flags() {
    let home = TempDir::new().unwrap();
    scout(home.path())
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--rate-limit"))
        .stdout(predicate::str::contains("--only-available"))
        .stdout(predicate::str::contains("--rdap-url"));
}

#[test]
fn test_missing_domain_file_exits_with_error() {
    let home = TempDir::new().unwrap();
    scout(home.path())
        .args(["check", "-f", "no-such-domains.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_check_without_domains_fails() {
    let home = TempDir::new().unwrap();
    scout(home.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No domains to check"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("broken.toml");
    fs::write(&config, "[defaults]\nworkers = 0\n").unwrap();

    scout(home.path())
        .args(["--config", config.to_str().unwrap(), "check", "foo.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_check_reports_availability_from_status() {
    let home = TempDir::new().unwrap();
    let url = start_mock_rdap(&[("available-example-zzz.com", 404), ("google.com", 200)]);

    scout(home.path())
        .args([
            "check",
            "available-example-zzz.com",
            "google.com",
            "--rdap-url",
            &url,
            "--rate-limit",
            "0",
            "--format",
            "console",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("available-example-zzz.com"))
        .stdout(predicate::str::contains("AVAILABLE"))
        .stdout(predicate::str::contains("TAKEN"))
        .stdout(predicate::str::contains("Summary: 1/2 domains are available"));
}

#[test]
fn test_check_file_with_tlds_writes_csv_report() {
    let home = TempDir::new().unwrap();
    let url = start_mock_rdap(&[("brandnew.io", 404)]);
    let domains = create_test_domains_file(&["# candidates", "brandnew", ""]);
    let output = home.path().join("out").join("results.csv");

    scout(home.path())
        .args([
            "check",
            "-f",
            domains.path().to_str().unwrap(),
            "-t",
            "com,io",
            "--rdap-url",
            &url,
            "--rate-limit",
            "0",
            "--format",
            "csv",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"))
        .stdout(predicate::str::contains("Summary: 1/2 domains are available"));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "domain,status,available",
            "brandnew.com,200,false",
            "brandnew.io,404,true",
        ]
    );
}

#[test]
fn test_check_settings_from_environment() {
    let home = TempDir::new().unwrap();
    let url = start_mock_rdap(&[("envfree.com", 404)]);

    scout(home.path())
        .args(["check", "envfree.com", "envtaken.com"])
        .env("DS_RDAP_URL", &url)
        .env("DS_RATE_LIMIT", "0")
        .env("DS_FORMAT", "csv")
        .env("DS_ONLY_AVAILABLE", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("envfree.com,404,true"))
        .stdout(predicate::str::contains("envtaken.com,200,false").not())
        .stdout(predicate::str::contains("Summary: 1/2 domains are available"));
}

#[test]
fn test_generate_prints_domains_with_tld() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("keywords.json");
    fs::write(&config, KEYWORD_CONFIG).unwrap();

    scout(home.path())
        .args(["generate", "-c", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("flow.com"))
        .stdout(predicate::str::contains("syncflow.com"));
}

#[test]
fn test_generate_csv_to_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("keywords.json");
    fs::write(&config, KEYWORD_CONFIG).unwrap();
    let output = home.path().join("names.csv");

    scout(home.path())
        .args([
            "generate",
            "-c",
            config.to_str().unwrap(),
            "--format",
            "csv",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("domain\n"));
    assert!(content.lines().any(|line| line == "flow"));
    assert!(!content.contains(".com"));
}

#[test]
fn test_generate_missing_config_fails() {
    let home = TempDir::new().unwrap();
    scout(home.path())
        .args(["generate", "-c", "missing.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_rank_writes_sorted_csv() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("available.csv");
    fs::write(
        &input,
        "domain,status,available\nsynchronization.com,404,true\nflow.com,404,true\n",
    )
    .unwrap();
    let output = home.path().join("ranked.csv");

    scout(home.path())
        .args([
            "rank",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-k",
            "flow",
            "-q",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rankings written to"));

    let ranked = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = ranked.lines().collect();
    assert_eq!(lines[0], "Domain,Score,Syllables,Length");
    assert!(lines[1].starts_with("flow.com,"));
    assert!(lines[2].starts_with("synchronization.com,"));
}

#[test]
fn test_rank_top_limits_table_not_csv() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("available.csv");
    fs::write(
        &input,
        "domain,status,available\nsynchronization.com,404,true\nflow.com,404,true\nzest.com,404,true\n",
    )
    .unwrap();
    let output = home.path().join("ranked.csv");

    scout(home.path())
        .args([
            "rank",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-k",
            "flow",
            "--top",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("flow.com"))
        .stdout(predicate::str::contains("... and 2 more"));

    let ranked = fs::read_to_string(&output).unwrap();
    assert_eq!(ranked.lines().count(), 4);
    assert!(ranked.contains("zest.com,"));
    assert!(ranked.contains("synchronization.com,"));
}

#[test]
fn test_workflow_rejects_out_of_range_workers() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("startup.json");
    fs::write(&config, KEYWORD_CONFIG).unwrap();
    let sessions = home.path().join("sessions");

    for workers in ["0", "500"] {
        scout(home.path())
            .args([
                "workflow",
                "-c",
                config.to_str().unwrap(),
                "--sessions",
                sessions.to_str().unwrap(),
                "-w",
                workers,
            ])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("--workers must be between 1 and 100"));
    }
    assert!(!sessions.exists());
}

#[test]
fn test_workflow_creates_session() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("startup.json");
    fs::write(&config, KEYWORD_CONFIG).unwrap();
    let sessions = home.path().join("sessions");

    // only the two-word combinations are free
    let free_url = start_mock_rdap(&[("flowsync.com", 404), ("syncflow.com", 404)]);

    scout(home.path())
        .args([
            "workflow",
            "-c",
            config.to_str().unwrap(),
            "--sessions",
            sessions.to_str().unwrap(),
        ])
        .env("DS_RDAP_URL", &free_url)
        .env("DS_RATE_LIMIT", "0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session:"))
        .stdout(predicate::str::contains("domains are available"));

    let session_dirs: Vec<_> = fs::read_dir(&sessions)
        .unwrap()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.file_name().map(|n| n != "latest").unwrap_or(false))
        .collect();
    assert_eq!(session_dirs.len(), 1);
    let session = &session_dirs[0];

    for file in [
        "domains.txt",
        "available.csv",
        "ranked_domains.csv",
        "domain_results.md",
        "session_summary.md",
        "config.json",
    ] {
        assert!(session.join(file).exists(), "missing {}", file);
    }

    let available = fs::read_to_string(session.join("available.csv")).unwrap();
    assert!(available.contains("flowsync.com,404,true"));
    assert!(!available.contains("flow.com,200"));

    let latest = fs::read_to_string(sessions.join("latest").join("ranked_domains.csv")).unwrap();
    assert!(latest.starts_with("Domain,Score,Syllables,Length"));

    let summary = fs::read_to_string(session.join("session_summary.md")).unwrap();
    assert!(summary.contains("startup"));
}
