//! Terminal display for the domain-scout CLI.
//!
//! Colored result lines, the check spinner, ranking tables and run
//! summaries. Everything decorative goes through the `console` crate; the
//! spinner writes to stderr so piped stdout stays clean.

use console::{pad_str, style, Alignment, Term};
use domain_scout_lib::generate::GenerationResult;
use domain_scout_lib::{CheckResult, ProgressFn, RankedDomain};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner with a `[done/total]` counter.
pub struct Spinner {
    running: Arc<AtomicBool>,
    completed: Arc<AtomicUsize>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner, or return `None` when stderr is not a terminal.
    pub fn start_if_tty(message: String, total: usize) -> Option<Self> {
        if Term::stderr().is_term() {
            Some(Self::start(message, total))
        } else {
            None
        }
    }

    /// Start a new spinner with the given message (e.g. "Checking 8 domains").
    pub fn start(message: String, total: usize) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let completed = Arc::new(AtomicUsize::new(0));
        let running_clone = running.clone();
        let completed_clone = completed.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let done = completed_clone.load(Ordering::Relaxed);
                let _ = term.clear_line();
                let _ = term.write_str(&format!(
                    "{} {} {}",
                    style(frame).cyan(),
                    message,
                    style(format!("[{}/{}]", done, total)).dim(),
                ));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            completed,
            handle: Some(handle),
        }
    }

    /// Progress callback that advances the spinner's counter.
    pub fn progress(&self) -> ProgressFn {
        let completed = self.completed.clone();
        Arc::new(move |recorded: usize, _: &CheckResult| {
            completed.store(recorded, Ordering::Relaxed);
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a check run.
pub fn print_header(domain_count: usize, workers: usize, rate_limit: Duration) {
    println!(
        "{} {} {}",
        style("domain-scout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "· Checking {} domain{}",
            domain_count,
            plural(domain_count)
        ))
        .dim(),
    );
    println!(
        "{}",
        style(format!(
            "Workers: {} | Rate limit: {}ms",
            workers,
            rate_limit.as_millis()
        ))
        .dim()
    );
    println!();
}

// ── Result lines ─────────────────────────────────────────────────────────────

/// Print one colored line per result.
pub fn print_results(results: &[CheckResult], only_available: bool, debug: bool) {
    for result in results {
        if only_available && !result.available {
            continue;
        }
        print_result(result, debug);
    }
}

/// Format and print a single domain result with colors and alignment.
pub fn print_result(result: &CheckResult, debug: bool) {
    let padded_domain = pad_str(&result.domain, 35, Alignment::Left, Some(".."));

    if result.available {
        println!(
            "  {}  {}",
            style(&padded_domain).white(),
            style("AVAILABLE").green().bold(),
        );
    } else {
        let reason = brief_error(result)
            .map(|r| format!("  {}", style(r).dim()))
            .unwrap_or_default();
        println!(
            "  {}  {}{}",
            style(&padded_domain).white(),
            style("TAKEN").red().bold(),
            reason,
        );
    }

    if debug {
        if let Some(duration) = result.check_duration {
            let status = result
                .http_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no status".to_string());
            println!(
                "    {} Checked in {}ms ({})",
                style("└─").dim(),
                duration.as_millis(),
                status,
            );
        }
    }
}

/// Short reason shown next to a TAKEN line whose lookup was inconclusive.
fn brief_error(result: &CheckResult) -> Option<&'static str> {
    let msg = result.error.as_deref()?.to_lowercase();
    let reason = if msg.contains("timeout") || msg.contains("timed out") {
        "(timeout)"
    } else if msg.contains("network") || msg.contains("connect") || msg.contains("dns") {
        "(network error)"
    } else if msg.contains("status") {
        "(unexpected status)"
    } else if msg.contains("invalid") || msg.contains("tld") {
        "(invalid domain)"
    } else {
        "(error)"
    };
    Some(reason)
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(results: &[CheckResult], duration: Duration) {
    let total = results.len();
    let available = results.iter().filter(|r| r.available).count();
    let errors = results.iter().filter(|r| r.error.is_some()).count();

    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        plural(total),
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", available)).green(),
        style("|").dim(),
        style(format!("{} taken", total - available)).red(),
        style("|").dim(),
        style(format!("{} inconclusive", errors)).yellow(),
    );
}

// ── Generation & ranking ─────────────────────────────────────────────────────

/// Print how many candidates each pattern family produced.
pub fn print_generation_summary(result: &GenerationResult) {
    let counts = &result.family_counts;
    eprintln!(
        "{} {} candidate{}{}",
        style("Generated").bold(),
        style(result.names.len()).bold(),
        plural(result.names.len()),
        if result.was_sampled() {
            format!(" (sampled from {})", result.total_candidates)
        } else {
            String::new()
        },
    );

    let families = [
        ("single word", counts.single_word),
        ("two-word combo", counts.two_word_combo),
        ("prefix", counts.prefix),
        ("suffix", counts.suffix),
        ("creative suffix", counts.creative_suffix),
        ("special combination", counts.special_combination),
        ("compound", counts.compound),
    ];
    for (name, count) in families.iter().filter(|(_, count)| *count > 0) {
        eprintln!("  {} {}: {}", style("•").dim(), name, count);
    }
}

/// Print a ranking table, best first.
pub fn print_rankings(ranked: &[RankedDomain], limit: usize) {
    if ranked.is_empty() {
        println!("  {}", style("No domains to rank").yellow());
        return;
    }

    println!(
        "  {}  {}  {}  {}  {}",
        style(pad_str("#", 4, Alignment::Right, None)).bold(),
        style(pad_str("Domain", 30, Alignment::Left, None)).bold(),
        style(pad_str("Score", 6, Alignment::Right, None)).bold(),
        style(pad_str("Syl", 4, Alignment::Right, None)).bold(),
        style(pad_str("Len", 4, Alignment::Right, None)).bold(),
    );
    for (i, entry) in ranked.iter().take(limit).enumerate() {
        println!("  {}", format_ranking_row(i + 1, entry));
    }
    if ranked.len() > limit {
        println!(
            "  {}",
            style(format!("... and {} more", ranked.len() - limit)).dim()
        );
    }
}

fn format_ranking_row(position: usize, entry: &RankedDomain) -> String {
    format!(
        "{:>4}  {}  {:>6}  {:>4}  {:>4}",
        position,
        pad_str(&entry.domain, 30, Alignment::Left, Some("..")),
        entry.score,
        entry.syllables,
        entry.length,
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
