//! Utility functions for domain list handling and validation.
//!
//! Reading domain lists, expanding base names across TLDs and the optional
//! format validation pass all live here.

use crate::error::DomainScoutError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref DOMAIN_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z]{2,})+$")
            .expect("domain pattern is a valid regex");
}

/// Validate a domain name format.
///
/// Accepts a single label of letters, digits and inner hyphens followed by one
/// or more alphabetic labels of at least two characters (e.g. `example.com`,
/// `my-app.co.uk`).
pub fn validate_domain(domain: &str) -> Result<(), DomainScoutError> {
    let domain = domain.trim();

    if domain.is_empty() {
        return Err(DomainScoutError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if !DOMAIN_PATTERN.is_match(domain) {
        return Err(DomainScoutError::invalid_domain(
            domain,
            "Expected a name of letters, digits and hyphens followed by a TLD",
        ));
    }

    Ok(())
}

/// Split domains into (valid, invalid) according to `validate_domain`.
///
/// Invalid entries are logged and excluded; they never reach the worker pool.
pub fn filter_valid_domains(domains: &[String]) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::with_capacity(domains.len());
    let mut invalid = Vec::new();

    for domain in domains {
        match validate_domain(domain) {
            Ok(()) => valid.push(domain.clone()),
            Err(e) => {
                tracing::warn!(domain = %domain, "skipping invalid domain: {}", e);
                invalid.push(domain.clone());
            }
        }
    }

    (valid, invalid)
}

/// Parse a domain list: one entry per line, `#` starts a comment.
pub fn parse_domain_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let entry = line.split('#').next().unwrap_or("").trim();
            if entry.is_empty() {
                None
            } else {
                Some(entry.to_string())
            }
        })
        .collect()
}

/// Read a domain list file.
///
/// # Errors
///
/// Returns `FileError` if the file does not exist or cannot be read. This is
/// a fatal, before-any-work error for callers.
pub fn load_domains_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainScoutError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DomainScoutError::file_error(
            path.to_string_lossy(),
            "Domain file not found",
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to read domain file: {}", e),
        )
    })?;

    Ok(parse_domain_list(&content))
}

/// Expand domain inputs with TLDs.
///
/// - Entries containing a dot are fully qualified and pass through unchanged;
///   `tlds` is ignored for them.
/// - Entries without a dot become one domain per TLD when `tlds` is given,
///   and pass through unchanged otherwise.
///
/// Blank entries are dropped and duplicates removed, keeping the first
/// occurrence.
pub fn expand_domain_inputs(domains: &[String], tlds: Option<&[String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    let mut push = |domain: String| {
        if seen.insert(domain.to_ascii_lowercase()) {
            results.push(domain);
        }
    };

    for domain in domains {
        let trimmed = domain.trim();
        if trimmed.is_empty() {
            continue;
        }

        match tlds {
            Some(tld_list) if !trimmed.contains('.') => {
                for tld in tld_list {
                    let tld = tld.trim().trim_start_matches('.');
                    if !tld.is_empty() {
                        push(format!("{}.{}", trimmed, tld));
                    }
                }
            }
            _ => push(trimmed.to_string()),
        }
    }

    results
}

/// Parse a comma-separated TLD list (`"com, .net,org"`).
pub fn parse_tld_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// The domain without its last label (`"sync.example.com"` -> `"sync.example"`).
pub fn domain_base(domain: &str) -> &str {
    match domain.rsplit_once('.') {
        Some((base, _)) => base,
        None => domain,
    }
}
