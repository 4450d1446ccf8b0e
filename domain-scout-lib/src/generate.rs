//! Domain name generation engine.
//!
//! Builds candidate base names from the keyword categories of a `RankConfig`.
//! The generator works on base names only; TLDs are appended at output time
//! (`with_tld`) or by the checker's expansion step.
//!
//! # Candidate families
//!
//! - single keywords
//! - two-word pairs across categories, in both orders
//! - `prefix_patterns` + keyword and keyword + `suffix_patterns`
//! - keyword + `creative_suffixes` (a trailing `e`/`y` is dropped before
//!   `ify` and `ly`)
//! - special combinations, in both orders
//! - hyphenated compounds of short keywords (opt-in)
//!
//! # Examples
//!
//! ```
//! use domain_scout_lib::config::RankConfig;
//! use domain_scout_lib::generate::generate_domains;
//!
//! let config = RankConfig::from_json_str(r#"{
//!     "keyword_categories": {
//!         "action": {"words": ["sync"], "bonus": 10},
//!         "object": {"words": ["data"], "bonus": 5}
//!     }
//! }"#).unwrap();
//!
//! let result = generate_domains(&config, None);
//! assert!(result.names.contains(&"syncdata".to_string()));
//! assert!(result.names.contains(&"datasync".to_string()));
//! ```

use crate::config::{DomainSettings, GenerationSettings, RankConfig};
use crate::error::DomainScoutError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, info};

/// Compound pairs only use keywords up to this length.
const COMPOUND_WORD_MAX_LEN: usize = 8;

/// Valid candidates produced by each family, before deduplication across
/// families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyCounts {
    pub single_word: usize,
    pub two_word_combo: usize,
    pub prefix: usize,
    pub suffix: usize,
    pub creative_suffix: usize,
    pub special_combination: usize,
    pub compound: usize,
}

/// Output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Sorted, deduplicated base names (sampled down to `max_domains`)
    pub names: Vec<String>,
    /// Distinct valid candidates before sampling
    pub total_candidates: usize,
    pub family_counts: FamilyCounts,
}

impl GenerationResult {
    pub fn was_sampled(&self) -> bool {
        self.total_candidates > self.names.len()
    }
}

/// Output layout for generated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateFormat {
    /// One domain per line, TLD appended per `domain_settings`
    #[default]
    Txt,
    /// `domain` header followed by bare names
    Csv,
}

impl FromStr for GenerateFormat {
    type Err = DomainScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(GenerateFormat::Txt),
            "csv" => Ok(GenerateFormat::Csv),
            other => Err(DomainScoutError::config(format!(
                "Unknown generate format '{}'. Expected txt or csv",
                other
            ))),
        }
    }
}

/// Whether a candidate passes length, exclusion and character rules.
pub fn is_valid_candidate(name: &str, settings: &GenerationSettings) -> bool {
    let len = name.chars().count();
    if len < settings.min_length || len > settings.max_length {
        return false;
    }

    if settings
        .excluded_patterns
        .iter()
        .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
    {
        return false;
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return false;
    }

    !(name.contains("--") || name.starts_with('-') || name.ends_with('-'))
}

struct Families<'a> {
    settings: &'a GenerationSettings,
    names: BTreeSet<String>,
}

impl<'a> Families<'a> {
    /// Add the valid candidates of one family and return how many there were.
    fn add<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let valid: BTreeSet<String> = candidates
            .into_iter()
            .filter(|name| is_valid_candidate(name, self.settings))
            .collect();
        let count = valid.len();
        self.names.extend(valid);
        count
    }
}

fn strip_for_suffix<'w>(word: &'w str, suffix: &str) -> &'w str {
    if matches!(suffix, "ify" | "ly") && (word.ends_with('e') || word.ends_with('y')) {
        &word[..word.len() - 1]
    } else {
        word
    }
}

/// Generate base names from `config`.
///
/// `max_domains` overrides `generation.max_domains`. When more candidates
/// exist than the cap, a shuffle seeded with `generation.seed` picks the
/// sample, so the same configuration and cap always give the same names.
pub fn generate_domains(config: &RankConfig, max_domains: Option<usize>) -> GenerationResult {
    let settings = &config.generation;
    let patterns = &settings.patterns;
    let all_words = config.all_words();
    let categories: Vec<&Vec<String>> = config
        .keyword_categories
        .values()
        .map(|category| &category.words)
        .collect();

    info!(
        words = all_words.len(),
        categories = categories.len(),
        "generating domain candidates"
    );

    let mut families = Families {
        settings,
        names: BTreeSet::new(),
    };
    let mut counts = FamilyCounts::default();

    if patterns.single_word {
        counts.single_word = families.add(
            categories
                .iter()
                .flat_map(|words| words.iter().cloned())
                .collect::<Vec<_>>(),
        );
    }

    if patterns.two_word_combo {
        let mut combos = Vec::new();
        for (i, first) in categories.iter().enumerate() {
            for second in &categories[i + 1..] {
                for a in first.iter() {
                    for b in second.iter() {
                        combos.push(format!("{}{}", a, b));
                        combos.push(format!("{}{}", b, a));
                    }
                }
            }
        }
        counts.two_word_combo = families.add(combos);
    }

    counts.prefix = families.add(
        patterns
            .prefix_patterns
            .iter()
            .flat_map(|prefix| all_words.iter().map(move |w| format!("{}{}", prefix, w)))
            .collect::<Vec<_>>(),
    );

    counts.suffix = families.add(
        patterns
            .suffix_patterns
            .iter()
            .flat_map(|suffix| all_words.iter().map(move |w| format!("{}{}", w, suffix)))
            .collect::<Vec<_>>(),
    );

    counts.creative_suffix = families.add(
        patterns
            .creative_suffixes
            .iter()
            .flat_map(|suffix| {
                all_words
                    .iter()
                    .map(move |w| format!("{}{}", strip_for_suffix(w, suffix), suffix))
            })
            .collect::<Vec<_>>(),
    );

    counts.special_combination = families.add(
        config
            .special_combinations
            .iter()
            .flat_map(|combo| {
                combo.secondary.iter().flat_map(move |secondary| {
                    [
                        format!("{}{}", combo.primary, secondary),
                        format!("{}{}", secondary, combo.primary),
                    ]
                })
            })
            .collect::<Vec<_>>(),
    );

    if patterns.compound_words {
        let short: Vec<&String> = all_words
            .iter()
            .filter(|w| w.chars().count() <= COMPOUND_WORD_MAX_LEN)
            .collect();
        let mut compounds = Vec::new();
        for a in &short {
            for b in &short {
                if a != b {
                    compounds.push(format!("{}-{}", a, b));
                }
            }
        }
        counts.compound = families.add(compounds);
    }

    let total_candidates = families.names.len();
    let mut names: Vec<String> = families.names.into_iter().collect();
    let cap = max_domains.unwrap_or(settings.max_domains);

    if names.len() > cap {
        info!(cap, total_candidates, "sampling generated domains");
        let mut rng = StdRng::seed_from_u64(settings.seed);
        names.shuffle(&mut rng);
        names.truncate(cap);
        names.sort();
    }

    debug!(?counts, kept = names.len(), "generation finished");

    GenerationResult {
        names,
        total_candidates,
        family_counts: counts,
    }
}

/// Append the configured default TLD when `append_tld_to_output` is set.
pub fn with_tld(names: &[String], settings: &DomainSettings) -> Vec<String> {
    if !settings.append_tld_to_output {
        return names.to_vec();
    }

    let tld = settings.default_tld.trim_start_matches('.');
    names
        .iter()
        .map(|name| format!("{}.{}", name, tld))
        .collect()
}

/// Render generated names for writing to disk.
pub fn format_generated(names: &[String], settings: &DomainSettings, format: GenerateFormat) -> String {
    let mut out = String::new();

    match format {
        GenerateFormat::Txt => {
            for domain in with_tld(names, settings) {
                out.push_str(&domain);
                out.push('\n');
            }
        }
        GenerateFormat::Csv => {
            out.push_str("domain\n");
            for name in names {
                out.push_str(name);
                out.push('\n');
            }
        }
    }

    out
}
