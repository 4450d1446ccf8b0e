//! Scoring and ranking of candidate domains.
//!
//! Shorter names with fewer syllables score higher; keyword categories,
//! special combinations and penalty patterns from `RankConfig` adjust the
//! score from there.

use crate::config::RankConfig;
use crate::error::DomainScoutError;
use crate::utils::domain_base;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref VOWEL_RUNS: Regex = Regex::new(r"[aeiouy]+").expect("valid vowel regex");
    static ref SILENT_ENDINGS: Regex =
        Regex::new(r"[^aeiou]e[sd]?$|[^e]ely$").expect("valid silent-ending regex");
    // `ia` must not count before a final `n` ("median"); the regex crate has
    // no lookahead, so that case is filtered in `count_additions`.
    static ref ADDITIONS: Regex = Regex::new(concat!(
        r"[^aeioulr][lr]e[sd]?$|",
        r"[csgz]es$|",
        r"[td]ed$|",
        r"ia|io|eo|",
        r"ism$|",
        r"[^aeiou]ire$|",
        r"[^gq]u[ae]|",
        r"ious|eous|",
        r"[st]ion"
    ))
    .expect("valid syllable-addition regex");
}

fn count_additions(word: &str) -> usize {
    ADDITIONS
        .find_iter(word)
        .filter(|m| !(m.as_str() == "ia" && &word[m.end()..] == "n"))
        .count()
}

/// Estimate the number of spoken syllables in a word.
///
/// Vowel groups are counted, silent endings subtracted and known
/// under-counted patterns added back. `ai`, `io` and `eo` on their own are
/// spelled out (two syllables). The result is never below 1.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();

    if matches!(word.as_str(), "ai" | "io" | "eo") {
        return 2;
    }

    let vowel_groups = VOWEL_RUNS.find_iter(&word).count();
    let silent = SILENT_ENDINGS.find_iter(&word).count();
    let mut additions = count_additions(&word);

    // "seoify": the vowel run swallows the `i` of the suffix
    if let Some(stem) = word.strip_suffix("ify") {
        if stem.ends_with(|c: char| "aeiou".contains(c)) {
            additions += 1;
        }
    }

    (vowel_groups + additions).saturating_sub(silent).max(1)
}

/// Score a domain (the TLD, if present, is ignored).
pub fn score_domain(domain: &str, config: &RankConfig) -> i64 {
    let name = domain_base(domain).to_lowercase();
    let scoring = &config.scoring;

    let syllables = count_syllables(&name) as i64;
    let mut score = scoring.base_score;
    score -= (syllables - scoring.syllable_threshold) * scoring.syllable_penalty;
    score -= name.chars().count() as i64 * scoring.length_penalty;

    for category in config.keyword_categories.values() {
        let matched = category
            .words
            .iter()
            .filter(|word| !word.is_empty() && name.contains(word.as_str()))
            .count() as i64;

        score += matched * category.bonus;

        if category.required && matched == 0 {
            score -= scoring.missing_required_penalty;
        }
    }

    for combo in &config.special_combinations {
        let has_primary = !combo.primary.is_empty() && name.contains(combo.primary.as_str());
        let has_secondary = combo
            .secondary
            .iter()
            .any(|word| !word.is_empty() && name.contains(word.as_str()));
        if has_primary && has_secondary {
            score += combo.bonus;
        }
    }

    for rule in config.penalties.values() {
        if rule
            .patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
        {
            score -= rule.penalty;
        }
    }

    score
}

/// A scored domain, ready for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedDomain {
    pub domain: String,
    pub score: i64,
    /// Syllables of the name without its TLD
    pub syllables: usize,
    /// Characters in the name without its TLD
    pub length: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Drop names with more syllables than this
    pub max_syllables: Option<usize>,
    /// Keep only the best N names
    pub top: Option<usize>,
}

fn ranking_order(a: &RankedDomain, b: &RankedDomain) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.syllables.cmp(&b.syllables))
        .then_with(|| a.domain.cmp(&b.domain))
}

/// Score, filter and sort domains: best score first, then fewer syllables,
/// then alphabetical.
pub fn rank_domains(domains: &[String], config: &RankConfig, options: RankOptions) -> Vec<RankedDomain> {
    let mut ranked: Vec<RankedDomain> = domains
        .iter()
        .map(|domain| domain.trim())
        .filter(|domain| !domain.is_empty())
        .map(|domain| {
            let name = domain_base(domain);
            RankedDomain {
                domain: domain.to_string(),
                score: score_domain(domain, config),
                syllables: count_syllables(name),
                length: name.chars().count(),
            }
        })
        .filter(|ranked| {
            options
                .max_syllables
                .map_or(true, |max| ranked.syllables <= max)
        })
        .collect();

    ranked.sort_by(ranking_order);

    if let Some(top) = options.top {
        ranked.truncate(top);
    }

    ranked
}

/// Read domains from the first column of a CSV file.
///
/// The first row is treated as a header unless its first cell looks like a
/// domain name.
pub fn read_domains_csv<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainScoutError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DomainScoutError::file_error(
            path.to_string_lossy(),
            "Input file not found",
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to read input file: {}", e),
        )
    })?;

    parse_domains_csv(&content)
}

/// Parse CSV text as described in `read_domains_csv`.
pub fn parse_domains_csv(content: &str) -> Result<Vec<String>, DomainScoutError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut domains = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let Some(first) = record.get(0).map(str::trim) else {
            continue;
        };
        if first.is_empty() || (row == 0 && !looks_like_domain(first)) {
            continue;
        }
        domains.push(first.to_string());
    }

    Ok(domains)
}

fn looks_like_domain(value: &str) -> bool {
    match value.rsplit_once('.') {
        Some((name, tld)) => {
            !name.is_empty() && !tld.is_empty() && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

/// Write rankings as `Domain,Score,Syllables,Length`.
pub fn write_rankings_csv<P: AsRef<Path>>(path: P, ranked: &[RankedDomain]) -> Result<(), DomainScoutError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Domain", "Score", "Syllables", "Length"])?;

    for entry in ranked {
        writer.write_record([
            entry.domain.clone(),
            entry.score.to_string(),
            entry.syllables.to_string(),
            entry.length.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
