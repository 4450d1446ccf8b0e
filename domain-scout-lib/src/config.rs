//! Configuration file parsing and management.
//!
//! Two documents live here:
//!
//! - `FileConfig`: checker defaults read from `domain-scout.toml` files and
//!   `DS_*` environment variables, merged with proper precedence rules.
//! - `RankConfig`: the keyword document shared by the generator and the
//!   ranker, read from JSON or TOML.

use crate::error::DomainScoutError;
use crate::types::CheckConfig;
use crate::utils::parse_tld_list;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for checker options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to `check` options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Seconds between dispatches (e.g. 0.1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<f64>,

    /// Request timeout as a string, e.g. "5s", "500ms", "2m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlds: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_available: Option<bool>,

    /// Report format: markdown, csv or console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_base_url: Option<String>,
}

impl DefaultsConfig {
    /// Overlay the values that are set onto `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(rate_limit) = self.rate_limit {
            config = config.with_rate_limit_secs(rate_limit);
        }
        if let Some(timeout) = self.timeout.as_deref().and_then(parse_duration_string) {
            config = config.with_timeout(timeout);
        }
        if let Some(retry_count) = self.retry_count {
            config = config.with_retry_count(retry_count);
        }
        if let Some(tlds) = &self.tlds {
            config = config.with_tlds(tlds.clone());
        }
        if let Some(validate) = self.validate {
            config = config.with_validation(validate);
        }
        if let Some(url) = &self.rdap_base_url {
            config = config.with_rdap_base_url(url.clone());
        }
        config
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Log every file that contributed to the merged configuration
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainScoutError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is read first, then the home directory, then the current
    /// directory; later files win field by field. A file that exists but fails
    /// to parse or validate is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainScoutError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose {
            for path in &loaded_files {
                debug!(path = %path.display(), "loaded configuration file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-scout.toml", "./.domain-scout.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-scout.toml", "domain-scout.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-scout").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        let defaults = match (lower.defaults, higher.defaults) {
            (Some(lower), Some(higher)) => Some(DefaultsConfig {
                workers: higher.workers.or(lower.workers),
                rate_limit: higher.rate_limit.or(lower.rate_limit),
                timeout: higher.timeout.or(lower.timeout),
                retry_count: higher.retry_count.or(lower.retry_count),
                tlds: higher.tlds.or(lower.tlds),
                only_available: higher.only_available.or(lower.only_available),
                format: higher.format.or(lower.format),
                validate: higher.validate.or(lower.validate),
                rdap_base_url: higher.rdap_base_url.or(lower.rdap_base_url),
            }),
            (lower, higher) => higher.or(lower),
        };

        FileConfig { defaults }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainScoutError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(workers) = defaults.workers {
            if workers == 0 || workers > 100 {
                return Err(DomainScoutError::config(
                    "Workers must be between 1 and 100",
                ));
            }
        }

        if let Some(rate_limit) = defaults.rate_limit {
            if !rate_limit.is_finite() || rate_limit < 0.0 {
                return Err(DomainScoutError::config(format!(
                    "Invalid rate_limit {}. Use a non-negative number of seconds",
                    rate_limit
                )));
            }
        }

        if let Some(timeout) = &defaults.timeout {
            if parse_duration_string(timeout).is_none() {
                return Err(DomainScoutError::config(format!(
                    "Invalid timeout format '{}'. Use format like '5s', '500ms', '2m'",
                    timeout
                )));
            }
        }

        if let Some(tlds) = &defaults.tlds {
            for tld in tlds {
                if tld.is_empty() || tld.contains('.') || tld.contains(' ') {
                    return Err(DomainScoutError::config(format!(
                        "Invalid TLD '{}' in defaults",
                        tld
                    )));
                }
            }
        }

        if let Some(format) = &defaults.format {
            format.parse::<crate::report::ReportFormat>()?;
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors `check` options.
///
/// Values come from `DS_*` variables. Invalid values are logged and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub workers: Option<usize>,
    pub rate_limit: Option<f64>,
    pub timeout: Option<String>,
    pub tlds: Option<Vec<String>>,
    pub only_available: Option<bool>,
    pub format: Option<String>,
    pub validate: Option<bool>,
    pub rdap_base_url: Option<String>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Overlay the values that are set onto `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(rate_limit) = self.rate_limit {
            config = config.with_rate_limit_secs(rate_limit);
        }
        if let Some(timeout) = self.timeout.as_deref().and_then(parse_duration_string) {
            config = config.with_timeout(timeout);
        }
        if let Some(tlds) = &self.tlds {
            config = config.with_tlds(tlds.clone());
        }
        if let Some(validate) = self.validate {
            config = config.with_validation(validate);
        }
        if let Some(url) = &self.rdap_base_url {
            config = config.with_rdap_base_url(url.clone());
        }
        config
    }
}

/// Load configuration from the process environment.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Build an `EnvConfig` from any variable source.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    let bool_var = |key: &str| -> Option<bool> {
        let value = lookup(key)?;
        let parsed = parse_bool(&value);
        if parsed.is_none() {
            warn!("Ignoring invalid {}='{}', use true/false", key, value);
        }
        parsed
    };

    let string_var = |key: &str| -> Option<String> {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(value) = lookup("DS_WORKERS") {
        match value.trim().parse::<usize>() {
            Ok(workers) if (1..=100).contains(&workers) => env_config.workers = Some(workers),
            _ => warn!("Ignoring invalid DS_WORKERS='{}', must be 1-100", value),
        }
    }

    if let Some(value) = lookup("DS_RATE_LIMIT") {
        match value.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => env_config.rate_limit = Some(secs),
            _ => warn!(
                "Ignoring invalid DS_RATE_LIMIT='{}', use seconds like 0.1",
                value
            ),
        }
    }

    if let Some(value) = lookup("DS_TIMEOUT") {
        if parse_duration_string(&value).is_some() {
            env_config.timeout = Some(value.trim().to_string());
        } else {
            warn!(
                "Ignoring invalid DS_TIMEOUT='{}', use format like '5s', '500ms', '2m'",
                value
            );
        }
    }

    if let Some(value) = lookup("DS_TLD") {
        let tlds = parse_tld_list(&value);
        if !tlds.is_empty() {
            env_config.tlds = Some(tlds);
        }
    }

    env_config.only_available = bool_var("DS_ONLY_AVAILABLE");
    env_config.validate = bool_var("DS_VALIDATE");

    if let Some(format) = string_var("DS_FORMAT") {
        match format.parse::<crate::report::ReportFormat>() {
            Ok(_) => env_config.format = Some(format),
            Err(_) => warn!(
                "Ignoring invalid DS_FORMAT='{}', use markdown, csv or console",
                format
            ),
        }
    }

    env_config.rdap_base_url = string_var("DS_RDAP_URL");
    env_config.config = string_var("DS_CONFIG");

    env_config
}

/// Parse a duration string like "500ms", "5s", "2m" (bare numbers are seconds).
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = value.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = value.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        value.parse::<u64>().ok().map(Duration::from_secs)
    }
}

// ---------------------------------------------------------------------------
// Keyword configuration shared by `generate` and `rank`
// ---------------------------------------------------------------------------

/// A named group of keywords with the bonus each matched word earns.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct KeywordCategory {
    pub words: Vec<String>,
    pub bonus: i64,
    /// Names without any word from this category take the missing-required penalty
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_score: i64,
    pub syllable_penalty: i64,
    pub syllable_threshold: i64,
    pub length_penalty: i64,
    pub missing_required_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 100,
            syllable_penalty: 20,
            syllable_threshold: 2,
            length_penalty: 2,
            missing_required_penalty: 0,
        }
    }
}

/// A primary word that scores extra when paired with any secondary word.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SpecialCombination {
    pub primary: String,
    pub secondary: Vec<String>,
    pub bonus: i64,
}

/// Substrings that cost `penalty` once when any of them appears.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PenaltyRule {
    pub patterns: Vec<String>,
    pub penalty: i64,
}

/// Which candidate families the generator produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatternSettings {
    pub single_word: bool,
    pub two_word_combo: bool,
    pub compound_words: bool,
    pub prefix_patterns: Vec<String>,
    pub suffix_patterns: Vec<String>,
    pub creative_suffixes: Vec<String>,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            single_word: true,
            two_word_combo: true,
            compound_words: false,
            prefix_patterns: Vec::new(),
            suffix_patterns: Vec::new(),
            creative_suffixes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_domains: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub excluded_patterns: Vec<String>,
    /// Seed for the sampling shuffle applied above `max_domains`
    pub seed: u64,
    pub patterns: PatternSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_domains: 2000,
            min_length: 4,
            max_length: 20,
            excluded_patterns: Vec::new(),
            seed: 42,
            patterns: PatternSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DomainSettings {
    pub default_tld: String,
    pub append_tld_to_output: bool,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            default_tld: "com".to_string(),
            append_tld_to_output: true,
        }
    }
}

/// Keyword configuration for generation and ranking.
///
/// Every section is optional in the source document and falls back to its
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RankConfig {
    pub keyword_categories: BTreeMap<String, KeywordCategory>,
    pub scoring: ScoringConfig,
    pub special_combinations: Vec<SpecialCombination>,
    pub penalties: BTreeMap<String, PenaltyRule>,
    pub generation: GenerationSettings,
    pub domain_settings: DomainSettings,
}

impl RankConfig {
    /// Load from a `.toml` file, or JSON for any other extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DomainScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Ranking configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read ranking configuration: {}", e),
            )
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, DomainScoutError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DomainScoutError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), DomainScoutError> {
        let generation = &self.generation;
        if generation.min_length > generation.max_length {
            return Err(DomainScoutError::config(format!(
                "generation.min_length ({}) exceeds generation.max_length ({})",
                generation.min_length, generation.max_length
            )));
        }

        let tld = &self.domain_settings.default_tld;
        if tld.is_empty() || tld.contains('.') || tld.contains(' ') {
            return Err(DomainScoutError::config(format!(
                "Invalid domain_settings.default_tld '{}'",
                tld
            )));
        }

        Ok(())
    }

    /// Add (or replace) a `custom` category built from command-line keywords.
    pub fn with_custom_keywords(mut self, words: Vec<String>, bonus: i64) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        self.keyword_categories.insert(
            "custom".to_string(),
            KeywordCategory {
                words,
                bonus,
                required: false,
            },
        );
        self
    }

    /// Every keyword across all categories, deduplicated and sorted.
    pub fn all_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .keyword_categories
            .values()
            .flat_map(|category| category.words.iter().cloned())
            .collect();
        words.sort();
        words.dedup();
        words
    }
}
