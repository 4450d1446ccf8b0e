//! Rendering of check results as console text, Markdown or CSV.
//!
//! Every renderer takes the full result collection. The `only_available`
//! filter only hides rows; summary counts are always computed over
//! everything that was checked.

use crate::error::DomainScoutError;
use crate::types::CheckResult;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Output format for a check report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Csv,
    Console,
}

impl FromStr for ReportFormat {
    type Err = DomainScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "csv" => Ok(ReportFormat::Csv),
            "console" | "text" => Ok(ReportFormat::Console),
            other => Err(DomainScoutError::config(format!(
                "Unknown report format '{}'. Expected markdown, csv or console",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Console => write!(f, "console"),
        }
    }
}

/// Counts over a full result collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    pub available: usize,
    pub taken: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let available = results.iter().filter(|r| r.available).count();
        Self {
            total: results.len(),
            available,
            taken: results.len() - available,
        }
    }
}

fn visible<'a>(
    results: &'a [CheckResult],
    only_available: bool,
) -> impl Iterator<Item = &'a CheckResult> {
    results
        .iter()
        .filter(move |r| !only_available || r.available)
}

fn availability_label(available: bool) -> &'static str {
    if available {
        "AVAILABLE"
    } else {
        "TAKEN"
    }
}

fn status_label(result: &CheckResult) -> String {
    match result.http_status {
        Some(status) => status.to_string(),
        None => "error".to_string(),
    }
}

/// One `{domain:<35} AVAILABLE|TAKEN` line per visible result.
pub fn format_console(results: &[CheckResult], only_available: bool) -> String {
    visible(results, only_available)
        .map(|r| format!("{:<35} {}", r.domain, availability_label(r.available)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown report with a summary section and a results table.
pub fn format_markdown(
    results: &[CheckResult],
    only_available: bool,
    generated_at: DateTime<Local>,
) -> String {
    let summary = ReportSummary::from_results(results);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# Domain Availability Check Results");
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out);
    let _ = writeln!(out, "## Summary");
    if only_available {
        let _ = writeln!(out, "- Showing only available domains");
    }
    let _ = writeln!(out, "- Total domains checked: {}", summary.total);
    let _ = writeln!(out, "- Available: {}", summary.available);
    let _ = writeln!(out, "- Taken: {}", summary.taken);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Results");
    let _ = writeln!(out, "| Domain | Status | Availability |");
    let _ = writeln!(out, "|--------|--------|--------------|");

    for result in visible(results, only_available) {
        let availability = if result.available {
            "✅ AVAILABLE"
        } else {
            "❌ TAKEN"
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            result.domain,
            status_label(result),
            availability
        );
    }

    out
}

/// CSV with a `domain,status,available` header.
pub fn format_csv(results: &[CheckResult], only_available: bool) -> Result<String, DomainScoutError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["domain", "status", "available"])?;

    for result in visible(results, only_available) {
        writer.write_record([
            result.domain.clone(),
            status_label(result),
            result.available.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainScoutError::internal(format!("Failed to flush CSV output: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| DomainScoutError::internal(format!("CSV output is not UTF-8: {}", e)))
}

/// `"N/M domains are available"`, counted over all results.
pub fn summary_line(results: &[CheckResult]) -> String {
    let summary = ReportSummary::from_results(results);
    format!(
        "{}/{} domains are available",
        summary.available, summary.total
    )
}

/// Render `results` in the requested format, timestamping Markdown with the
/// current local time.
pub fn render(
    format: ReportFormat,
    results: &[CheckResult],
    only_available: bool,
) -> Result<String, DomainScoutError> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown(results, only_available, Local::now())),
        ReportFormat::Csv => format_csv(results, only_available),
        ReportFormat::Console => Ok(format_console(results, only_available)),
    }
}

/// Write a rendered report, creating parent directories as needed.
pub fn write_report<P: AsRef<Path>>(path: P, content: &str) -> Result<(), DomainScoutError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainScoutError::file_error(
                    parent.to_string_lossy(),
                    format!("Failed to create output directory: {}", e),
                )
            })?;
        }
    }

    fs::write(path, content).map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to write report: {}", e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<CheckResult> {
        vec![
            CheckResult::from_status("available-example-zzz.com", 404, true),
            CheckResult::from_status("google.com", 200, false),
            CheckResult::failed("flaky.io", "Network error: connection reset"),
        ]
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_parse_report_format() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("Markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Console);
        assert!("json".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_console_lines() {
        let text = format_console(&sample(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], format!("{:<35} TAKEN", "google.com"));
        assert!(lines[0].ends_with(" AVAILABLE"));
    }

    #[test]
    fn test_console_only_available() {
        let text = format_console(&sample(), true);
        assert_eq!(text, format!("{:<35} AVAILABLE", "available-example-zzz.com"));
    }

    #[test]
    fn test_markdown_report() {
        let md = format_markdown(&sample(), false, fixed_time());
        assert!(md.starts_with("# Domain Availability Check Results\n"));
        assert!(md.contains("Generated: 2024-03-09 14:05:00"));
        assert!(md.contains("- Total domains checked: 3"));
        assert!(md.contains("- Available: 1"));
        assert!(md.contains("- Taken: 2"));
        assert!(md.contains("| Domain | Status | Availability |"));
        assert!(md.contains("| available-example-zzz.com | 404 | ✅ AVAILABLE |"));
        assert!(md.contains("| google.com | 200 | ❌ TAKEN |"));
        assert!(md.contains("| flaky.io | error | ❌ TAKEN |"));
        assert!(!md.contains("Showing only available"));
    }

    #[test]
    fn test_markdown_filter_keeps_full_counts() {
        let md = format_markdown(&sample(), true, fixed_time());
        assert!(md.contains("- Showing only available domains"));
        assert!(md.contains("- Total domains checked: 3"));
        assert!(!md.contains("google.com"));
    }

    #[test]
    fn test_csv_report() {
        let csv = format_csv(&sample(), false).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "domain,status,available");
        assert_eq!(lines[1], "available-example-zzz.com,404,true");
        assert_eq!(lines[2], "google.com,200,false");
        assert_eq!(lines[3], "flaky.io,error,false");

        let filtered = format_csv(&sample(), true).unwrap();
        assert_eq!(filtered.lines().count(), 2);
    }

    #[test]
    fn test_summary_line_counts_everything() {
        assert_eq!(summary_line(&sample()), "1/3 domains are available");
        assert_eq!(summary_line(&[]), "0/0 domains are available");
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.md");
        write_report(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
