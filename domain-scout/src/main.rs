//! Domain Scout CLI Application
//!
//! Command-line interface over domain-scout-lib: bulk RDAP availability
//! checks, keyword-driven name generation, ranking, and a session workflow
//! that chains all three.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use domain_scout_lib::generate::{format_generated, GenerateFormat};
use domain_scout_lib::session::{self, SessionStats};
use domain_scout_lib::utils::parse_tld_list;
use domain_scout_lib::{
    config::parse_duration_string, generate_domains, load_domains_from_file, load_env_config,
    rank, rank_domains, report, CheckConfig, CheckResult, ConfigManager, DefaultsConfig,
    DomainChecker, EnvConfig, FileConfig, RankConfig, RankOptions, ReportFormat,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scout
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find available, pronounceable domain names")]
#[command(
    long_about = "Generate domain candidates from keyword lists, check their availability over RDAP, and rank the free ones.\n\nChecks run on a bounded worker pool behind a global rate limit."
)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Checker defaults file (TOML); overrides DS_CONFIG and discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show progress details
    #[arg(short = 'v', long = "verbose", global = true, help_heading = "Debugging")]
    pub verbose: bool,

    /// Show per-request debug output
    #[arg(short = 'd', long = "debug", global = true, help_heading = "Debugging")]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check domain availability over RDAP
    Check(CheckArgs),
    /// Generate domain candidates from a keyword configuration
    Generate(GenerateArgs),
    /// Score and sort domains from a CSV file
    Rank(RankArgs),
    /// Generate, check, rank and report in a new session directory
    Workflow(WorkflowArgs),
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Domain names to check (base names or FQDNs)
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Input file with domains (one per line, # for comments)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// TLDs for base names (comma-separated or multiple -t flags)
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append, help_heading = "Domain Selection")]
    pub tlds: Option<Vec<String>>,

    /// Drop malformed domains before checking
    #[arg(long = "validate", help_heading = "Domain Selection")]
    pub validate: bool,

    /// Concurrent workers (default: 6, max: 100)
    #[arg(
        short = 'w',
        long = "workers",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub workers: Option<usize>,

    /// Seconds between request dispatches across all workers (default: 0.1)
    #[arg(long = "rate-limit", value_name = "SECS", help_heading = "Performance")]
    pub rate_limit: Option<f64>,

    /// Per-request timeout, e.g. 5s, 500ms, 2m (default: 5s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Retries after a network failure or timeout (default: 1)
    #[arg(long = "retries", value_name = "N", help_heading = "Performance")]
    pub retries: Option<u32>,

    /// Report format: markdown, csv or console (default: markdown)
    #[arg(long = "format", value_name = "FORMAT", help_heading = "Output Format")]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output Format"
    )]
    pub output: Option<String>,

    /// Only list available domains
    #[arg(long = "only-available", help_heading = "Output Format")]
    pub only_available: bool,

    /// Send every lookup to this RDAP base URL
    #[arg(long = "rdap-url", value_name = "URL", help_heading = "Advanced")]
    pub rdap_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Keyword configuration (JSON or TOML)
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: String,

    /// Write domains to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Cap on generated names (default: from the configuration)
    #[arg(short = 'm', long = "max-domains", value_name = "N")]
    pub max_domains: Option<usize>,

    /// Output layout: txt or csv
    #[arg(long = "format", value_name = "FORMAT", default_value = "txt")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct RankArgs {
    /// CSV file with domains in the first column
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: String,

    /// Write rankings to a CSV file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Keyword configuration (JSON or TOML)
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: Option<String>,

    /// Extra keywords to reward (comma-separated)
    #[arg(
        short = 'k',
        long = "keywords",
        value_name = "WORDS",
        value_delimiter = ','
    )]
    pub keywords: Option<Vec<String>>,

    /// Bonus for each matched extra keyword
    #[arg(long = "keyword-bonus", value_name = "N", default_value = "15")]
    pub keyword_bonus: i64,

    /// Keep only the best N domains
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,

    /// Drop domains with more syllables than this
    #[arg(long = "max-syllables", value_name = "N")]
    pub max_syllables: Option<usize>,

    /// Do not print the ranking table
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct WorkflowArgs {
    /// Keyword configuration (JSON or TOML)
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    pub config: String,

    /// Directory holding session folders and the latest links
    #[arg(long = "sessions", value_name = "DIR", default_value = "sessions")]
    pub sessions: String,

    /// Cap on generated names (default: from the configuration)
    #[arg(short = 'm', long = "max-domains", value_name = "N")]
    pub max_domains: Option<usize>,

    /// Check generated names across these TLDs instead of the default TLD
    #[arg(short = 't', long = "tld", value_name = "TLD", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub tlds: Option<Vec<String>>,

    /// Concurrent workers
    #[arg(short = 'w', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Ranked domains shown at the end
    #[arg(long = "top", value_name = "N", default_value = "10")]
    pub top: usize,

    /// Delete sessions older than this many days
    #[arg(long = "retention-days", value_name = "DAYS", default_value = "30")]
    pub retention_days: u32,
}

/// Fully resolved options for one `check` run.
#[derive(Debug, Clone)]
struct CheckSettings {
    check: CheckConfig,
    only_available: bool,
    format: ReportFormat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.debug);
    debug!("domain-scout v{} starting", env!("CARGO_PKG_VERSION"));

    let outcome = match &cli.command {
        Commands::Check(args) => run_check(&cli, args).await,
        Commands::Generate(args) => run_generate(args),
        Commands::Rank(args) => run_rank(args),
        Commands::Workflow(args) => run_workflow(&cli, args).await,
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the flags.
fn init_logging(verbose: bool, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose, debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_log_level(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    }
}

// ── Configuration ────────────────────────────────────────────────────────────

/// Load the checker defaults file: `--config`, then `DS_CONFIG`, then discovery.
fn load_file_config(
    explicit: Option<&str>,
    env_config: &EnvConfig,
    verbose: bool,
) -> CliResult<FileConfig> {
    let config_manager = ConfigManager::new(verbose);

    if let Some(path) = explicit {
        info!("Using explicit config file (CLI --config): {}", path);
        let file_config = config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
        return Ok(file_config);
    }

    if let Some(path) = &env_config.config {
        info!("Using explicit config file (DS_CONFIG env var): {}", path);
        let file_config = config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?;
        return Ok(file_config);
    }

    debug!("Discovering config files");
    Ok(config_manager.discover_and_load()?)
}

/// File and environment layers, ready for the CLI layer on top.
fn load_layers(cli: &Cli) -> CliResult<(DefaultsConfig, EnvConfig)> {
    let env_config = load_env_config();
    let file_config = load_file_config(cli.config.as_deref(), &env_config, cli.verbose)?;
    Ok((file_config.defaults.unwrap_or_default(), env_config))
}

/// Merge defaults < file < environment < CLI flags.
fn resolve_check_settings(
    defaults: &DefaultsConfig,
    env_config: &EnvConfig,
    args: &CheckArgs,
) -> CliResult<CheckSettings> {
    let mut config = defaults.apply_to(CheckConfig::default());
    config = env_config.apply_to(config);
    config = apply_cli_args_to_config(config, args)?;

    // Only override boolean settings when the user explicitly passes the flag.
    let only_available = args.only_available
        || env_config
            .only_available
            .or(defaults.only_available)
            .unwrap_or(false);

    let format = match args
        .format
        .as_deref()
        .or(env_config.format.as_deref())
        .or(defaults.format.as_deref())
    {
        Some(value) => value.parse::<ReportFormat>()?,
        None => ReportFormat::default(),
    };

    Ok(CheckSettings {
        check: config,
        only_available,
        format,
    })
}

/// `--workers` bounds shared by `check` and `workflow`.
fn validate_workers(workers: usize) -> CliResult<usize> {
    if workers == 0 || workers > 100 {
        return Err("--workers must be between 1 and 100".into());
    }
    Ok(workers)
}

/// Apply CLI arguments to config (highest precedence).
fn apply_cli_args_to_config(mut config: CheckConfig, args: &CheckArgs) -> CliResult<CheckConfig> {
    if let Some(workers) = args.workers {
        config = config.with_workers(validate_workers(workers)?);
    }
    if let Some(rate_limit) = args.rate_limit {
        if !rate_limit.is_finite() || rate_limit < 0.0 {
            return Err("--rate-limit must be a non-negative number of seconds".into());
        }
        config = config.with_rate_limit_secs(rate_limit);
    }
    if let Some(timeout) = &args.timeout {
        let duration = parse_duration_string(timeout)
            .ok_or_else(|| format!("Invalid timeout '{}'. Use e.g. 5s, 500ms or 2m", timeout))?;
        config = config.with_timeout(duration);
    }
    if let Some(retries) = args.retries {
        config = config.with_retry_count(retries);
    }
    if let Some(tlds) = &args.tlds {
        config = config.with_tlds(parse_tld_list(&tlds.join(",")));
    }
    if args.validate {
        config = config.with_validation(true);
    }
    if let Some(url) = &args.rdap_url {
        config = config.with_rdap_base_url(url.clone());
    }
    Ok(config)
}

// ── check ────────────────────────────────────────────────────────────────────

/// Domains from `--file` first, then positional arguments.
fn collect_domains(args: &CheckArgs) -> CliResult<Vec<String>> {
    let mut domains = Vec::new();

    if let Some(file) = &args.file {
        domains.extend(load_domains_from_file(file)?);
    }
    domains.extend(
        args.domains
            .iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    );

    if domains.is_empty() {
        return Err("No domains to check. Pass domain names or use --file".into());
    }
    Ok(domains)
}

/// Run a check with a spinner while lookups are in flight.
async fn run_checks(
    config: CheckConfig,
    domains: &[String],
    tlds: Option<&[String]>,
) -> CliResult<Vec<CheckResult>> {
    let mut checker = DomainChecker::with_config(config)?;
    let total = checker.lookup_count(domains, tlds);

    let spinner = ui::Spinner::start_if_tty(format!("Checking {} domains", total), total);
    if let Some(spinner) = &spinner {
        checker = checker.with_progress(spinner.progress());
    }

    let results = checker.check_all(domains, tlds).await;

    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    Ok(results?)
}

async fn run_check(cli: &Cli, args: &CheckArgs) -> CliResult<()> {
    let (defaults, env_config) = load_layers(cli)?;
    let settings = resolve_check_settings(&defaults, &env_config, args)?;
    let domains = collect_domains(args)?;

    if cli.verbose {
        ui::print_header(
            domains.len(),
            settings.check.workers,
            settings.check.rate_limit,
        );
    }

    let start = Instant::now();
    let results = run_checks(settings.check.clone(), &domains, None).await?;
    let elapsed = start.elapsed();

    ui::print_results(&results, settings.only_available, cli.debug);

    match (&args.output, settings.format) {
        (Some(path), format) => {
            let content = report::render(format, &results, settings.only_available)?;
            report::write_report(path, &content)?;
            println!("Report written to {}", path);
        }
        // console lines were already printed
        (None, ReportFormat::Console) => {}
        (None, format) => {
            let content = report::render(format, &results, settings.only_available)?;
            println!();
            print!("{}", content);
        }
    }

    if cli.verbose {
        ui::print_summary(&results, elapsed);
    }
    println!("Summary: {}", report::summary_line(&results));
    Ok(())
}

// ── generate ─────────────────────────────────────────────────────────────────

fn run_generate(args: &GenerateArgs) -> CliResult<()> {
    let format: GenerateFormat = args.format.parse()?;
    let config = RankConfig::load(&args.config)?;

    let generated = generate_domains(&config, args.max_domains);
    ui::print_generation_summary(&generated);

    let content = format_generated(&generated.names, &config.domain_settings, format);
    match &args.output {
        Some(path) => {
            report::write_report(path, &content)?;
            eprintln!("Saved {} domains to {}", generated.names.len(), path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

// ── rank ─────────────────────────────────────────────────────────────────────

fn run_rank(args: &RankArgs) -> CliResult<()> {
    let mut config = match &args.config {
        Some(path) => RankConfig::load(path)?,
        None => RankConfig::default(),
    };
    if let Some(keywords) = &args.keywords {
        config = config.with_custom_keywords(keywords.clone(), args.keyword_bonus);
    }

    let domains = rank::read_domains_csv(&args.input)?;
    info!("Ranking {} domains from {}", domains.len(), args.input);

    // --top limits the table only; the CSV keeps every ranked domain
    let options = RankOptions {
        max_syllables: args.max_syllables,
        top: None,
    };
    let ranked = rank_domains(&domains, &config, options);

    if let Some(path) = &args.output {
        rank::write_rankings_csv(path, &ranked)?;
        println!("Rankings written to {}", path);
    }
    if !args.quiet {
        ui::print_rankings(&ranked, args.top.unwrap_or(ranked.len()));
    }
    Ok(())
}

// ── workflow ─────────────────────────────────────────────────────────────────

/// Names to check: bare names across `tlds`, or each name with the default TLD.
fn workflow_domains(names: &[String], config: &RankConfig, tlds: Option<&[String]>) -> Vec<String> {
    match tlds {
        Some(_) => names.to_vec(),
        None => {
            let tld = config.domain_settings.default_tld.trim_start_matches('.');
            names.iter().map(|name| format!("{}.{}", name, tld)).collect()
        }
    }
}

fn session_label(config_path: &str) -> String {
    Path::new(config_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("custom")
        .to_string()
}

async fn run_workflow(cli: &Cli, args: &WorkflowArgs) -> CliResult<()> {
    let rank_config = RankConfig::load(&args.config)?;
    let (defaults, env_config) = load_layers(cli)?;

    let mut check_config = env_config.apply_to(defaults.apply_to(CheckConfig::default()));
    if let Some(workers) = args.workers {
        check_config = check_config.with_workers(validate_workers(workers)?);
    }
    let tlds = args
        .tlds
        .as_ref()
        .map(|tlds| parse_tld_list(&tlds.join(",")));

    let sessions = PathBuf::from(&args.sessions);
    let removed = session::cleanup_old_sessions(&sessions, args.retention_days)?;
    if !removed.is_empty() {
        info!("Removed {} old sessions", removed.len());
    }

    let session_dir = session::create_session_dir(&sessions)?;
    session::archive_config(&session_dir, &args.config)?;
    println!("Session: {}", session_dir.display());

    // generate
    let generated = generate_domains(&rank_config, args.max_domains);
    ui::print_generation_summary(&generated);
    report::write_report(
        session_dir.join(session::DOMAINS_FILE),
        &format_generated(
            &generated.names,
            &rank_config.domain_settings,
            GenerateFormat::Txt,
        ),
    )?;

    // check
    let domains = workflow_domains(&generated.names, &rank_config, tlds.as_deref());
    let results = run_checks(check_config, &domains, tlds.as_deref()).await?;
    report::write_report(
        session_dir.join(session::AVAILABLE_FILE),
        &report::format_csv(&results, true)?,
    )?;

    // rank
    let available: Vec<String> = results
        .iter()
        .filter(|r| r.available)
        .map(|r| r.domain.clone())
        .collect();
    let ranked = rank_domains(&available, &rank_config, RankOptions::default());
    rank::write_rankings_csv(session_dir.join(session::RANKED_FILE), &ranked)?;

    // report
    report::write_report(
        session_dir.join(session::REPORT_FILE),
        &report::render(ReportFormat::Markdown, &results, true)?,
    )?;

    session::update_latest_links(&session_dir, sessions.join("latest"))?;
    let stats = SessionStats {
        label: session_label(&args.config),
        total_checked: results.len(),
        available_found: available.len(),
        top_domain: ranked.first().map(|r| r.domain.clone()),
    };
    session::write_session_summary(&session_dir, &rank_config, &stats)?;

    println!();
    ui::print_rankings(&ranked, args.top);
    println!();
    println!("Summary: {}", report::summary_line(&results));
    Ok(())
}
