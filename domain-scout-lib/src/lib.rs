//! # Domain Scout Library
//!
//! Bulk domain availability checking over RDAP, with a keyword-driven name
//! generator and a ranker for the names that turn out to be free.
//!
//! Lookups run on a fixed pool of tokio workers that share one FIFO queue and
//! one global rate limiter. Availability is decided from the RDAP status code
//! alone: 404 means available, anything else (including errors) means taken.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scout_lib::{report, CheckConfig, DomainChecker};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CheckConfig::default()
//!         .with_workers(6)
//!         .with_rate_limit(Duration::from_millis(100));
//!     let checker = DomainChecker::with_config(config)?;
//!
//!     let domains = vec!["example.com".to_string(), "rust-lang.org".to_string()];
//!     let results = checker.check_all(&domains, None).await?;
//!
//!     println!("{}", report::summary_line(&results));
//!     Ok(())
//! }
//! ```

pub use checker::DomainChecker;
pub use concurrent::ProgressFn;
pub use config::{
    load_env_config, ConfigManager, DefaultsConfig, EnvConfig, FileConfig, RankConfig,
};
pub use error::DomainScoutError;
pub use protocols::registry::{
    has_dedicated_endpoint, known_tlds, rdap_endpoint, FALLBACK_RDAP_ENDPOINT,
};
pub use protocols::RdapClient;
pub use types::{Availability, CheckConfig, CheckRequest, CheckResult};
pub use utils::{expand_domain_inputs, load_domains_from_file, validate_domain};

// Public modules
pub mod classify;
pub mod config;
pub mod generate;
pub mod rank;
pub mod rate_limit;
pub mod report;
pub mod session;
pub mod utils;

pub use generate::{generate_domains, GenerationResult};
pub use rank::{rank_domains, RankOptions, RankedDomain};
pub use report::ReportFormat;

// Internal modules
mod checker;
mod concurrent;
mod error;
mod protocols;
mod types;

pub type Result<T> = std::result::Result<T, DomainScoutError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
