//! Timestamped session directories for the generate → check → rank workflow.
//!
//! Each run writes into `<base>/YYYY-MM-DD_HH-MM-SS/`. A sibling `latest/`
//! directory links to the newest session's files, and old sessions can be
//! pruned by the date encoded in their name.

use crate::config::RankConfig;
use crate::error::DomainScoutError;
use chrono::{Duration, Local, NaiveDateTime};
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

pub const SESSION_DIR_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub const DOMAINS_FILE: &str = "domains.txt";
pub const AVAILABLE_FILE: &str = "available.csv";
pub const RANKED_FILE: &str = "ranked_domains.csv";
pub const REPORT_FILE: &str = "domain_results.md";
pub const SUMMARY_FILE: &str = "session_summary.md";

/// Files mirrored into the `latest` directory.
pub const LATEST_FILES: [&str; 4] = [DOMAINS_FILE, AVAILABLE_FILE, RANKED_FILE, REPORT_FILE];

fn io_error(path: &Path, action: &str, err: std::io::Error) -> DomainScoutError {
    DomainScoutError::file_error(path.to_string_lossy(), format!("{}: {}", action, err))
}

/// Create `base/<timestamp>` and return its path.
///
/// When a session with the same timestamp already exists, `_2`, `_3`, ... is
/// appended so an earlier run is never overwritten.
pub fn create_session_dir<P: AsRef<Path>>(base: P) -> Result<PathBuf, DomainScoutError> {
    let base = base.as_ref();
    fs::create_dir_all(base)
        .map_err(|e| io_error(base, "Failed to create sessions directory", e))?;

    let stamp = Local::now().format(SESSION_DIR_FORMAT).to_string();
    let mut attempt = 1u32;
    loop {
        let name = if attempt == 1 {
            stamp.clone()
        } else {
            format!("{}_{}", stamp, attempt)
        };
        let dir = base.join(name);

        match fs::create_dir(&dir) {
            Ok(()) => {
                info!(path = %dir.display(), "created session directory");
                return Ok(dir);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(io_error(&dir, "Failed to create session directory", e)),
        }
    }
}

/// Timestamp encoded in a session directory name, ignoring a `_N` suffix.
fn session_timestamp(name: &str) -> Option<NaiveDateTime> {
    if let Ok(created) = NaiveDateTime::parse_from_str(name, SESSION_DIR_FORMAT) {
        return Some(created);
    }
    let (stamp, suffix) = name.rsplit_once('_')?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, SESSION_DIR_FORMAT).ok()
}

/// Copy the keyword configuration used for a run into the session.
pub fn archive_config<P: AsRef<Path>, Q: AsRef<Path>>(
    session: P,
    config_path: Q,
) -> Result<PathBuf, DomainScoutError> {
    let config_path = config_path.as_ref();
    let extension = config_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");
    let target = session.as_ref().join(format!("config.{}", extension));

    fs::copy(config_path, &target)
        .map_err(|e| io_error(config_path, "Failed to archive configuration", e))?;
    Ok(target)
}

/// Path of `to` relative to the directory `from`. Both must exist.
fn relative_path(from: &Path, to: &Path) -> Result<PathBuf, DomainScoutError> {
    let from = from
        .canonicalize()
        .map_err(|e| io_error(from, "Failed to resolve path", e))?;
    let to = to
        .canonicalize()
        .map_err(|e| io_error(to, "Failed to resolve path", e))?;

    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from_parts.len() {
        relative.push("..");
    }
    for part in &to_parts[common..] {
        relative.push(part.as_os_str());
    }
    Ok(relative)
}

#[cfg(unix)]
fn link_file(source: &Path, target: &Path, latest: &Path) -> Result<(), DomainScoutError> {
    let relative = relative_path(latest, source)?;
    std::os::unix::fs::symlink(&relative, target)
        .map_err(|e| io_error(target, "Failed to create link", e))
}

#[cfg(not(unix))]
fn link_file(source: &Path, target: &Path, _latest: &Path) -> Result<(), DomainScoutError> {
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|e| io_error(target, "Failed to copy file", e))
}

/// Point `latest/<file>` at the session's copy of each workflow file.
///
/// Stale entries are removed first, so files missing from the session do not
/// keep pointing at an older run.
pub fn update_latest_links<P: AsRef<Path>, Q: AsRef<Path>>(
    session: P,
    latest: Q,
) -> Result<(), DomainScoutError> {
    let session = session.as_ref();
    let latest = latest.as_ref();

    fs::create_dir_all(latest)
        .map_err(|e| io_error(latest, "Failed to create latest directory", e))?;

    for name in LATEST_FILES {
        let source = session.join(name);
        let target = latest.join(name);

        if fs::symlink_metadata(&target).is_ok() {
            fs::remove_file(&target)
                .map_err(|e| io_error(&target, "Failed to remove stale link", e))?;
        }

        if source.exists() {
            link_file(&source, &target, latest)?;
            debug!(file = name, "updated latest link");
        }
    }

    Ok(())
}

/// Headline numbers for a finished workflow run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Name of the keyword configuration, usually its file stem
    pub label: String,
    pub total_checked: usize,
    pub available_found: usize,
    pub top_domain: Option<String>,
}

/// Render `session_summary.md`.
pub fn format_session_summary(config: &RankConfig, stats: &SessionStats) -> String {
    let mut out = String::new();
    let label = if stats.label.is_empty() {
        "General"
    } else {
        stats.label.as_str()
    };

    let _ = writeln!(out, "# Domain Search Session Summary");
    let _ = writeln!(out, "**Date**: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Configuration**: {}", label);
    let _ = writeln!(out, "**Total Domains Checked**: {}", stats.total_checked);
    let _ = writeln!(out, "**Available Domains Found**: {}", stats.available_found);
    let _ = writeln!(
        out,
        "**Top Domain**: {}",
        stats.top_domain.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Configuration Used");
    let _ = writeln!(out, "- Default TLD: {}", config.domain_settings.default_tld);
    let _ = writeln!(
        out,
        "- Max domains generated: {}",
        config.generation.max_domains
    );
    let _ = writeln!(
        out,
        "- Syllable threshold: {}",
        config.scoring.syllable_threshold
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Keywords Used");
    for (name, category) in &config.keyword_categories {
        let shown: Vec<&str> = category.words.iter().take(5).map(String::as_str).collect();
        let _ = write!(out, "- **{}**: {}", name, shown.join(", "));
        if category.words.len() > 5 {
            let _ = write!(out, " (and {} more)", category.words.len() - 5);
        }
        let _ = writeln!(out);
    }

    out
}

/// Write `session_summary.md` into the session directory.
pub fn write_session_summary<P: AsRef<Path>>(
    session: P,
    config: &RankConfig,
    stats: &SessionStats,
) -> Result<PathBuf, DomainScoutError> {
    let path = session.as_ref().join(SUMMARY_FILE);
    fs::write(&path, format_session_summary(config, stats))
        .map_err(|e| io_error(&path, "Failed to write session summary", e))?;
    Ok(path)
}

/// Delete session directories older than `retention_days`.
///
/// Only directories whose name parses as a session timestamp are considered.
/// Returns the removed paths.
pub fn cleanup_old_sessions<P: AsRef<Path>>(
    base: P,
    retention_days: u32,
) -> Result<Vec<PathBuf>, DomainScoutError> {
    let base = base.as_ref();
    if !base.exists() {
        return Ok(Vec::new());
    }

    // a window reaching past the earliest representable date keeps everything
    let Some(cutoff) = Local::now()
        .naive_local()
        .checked_sub_signed(Duration::days(i64::from(retention_days)))
    else {
        debug!(retention_days, "retention window exceeds calendar range");
        return Ok(Vec::new());
    };
    let entries =
        fs::read_dir(base).map_err(|e| io_error(base, "Failed to read sessions directory", e))?;

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(created) = session_timestamp(name) else {
            continue;
        };

        if created < cutoff {
            info!(session = name, "removing old session");
            fs::remove_dir_all(&path)
                .map_err(|e| io_error(&path, "Failed to remove old session", e))?;
            removed.push(path);
        }
    }

    removed.sort();
    Ok(removed)
}
