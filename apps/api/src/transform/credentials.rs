//! Education and certification reconciliation.
//!
//! Academic entries that read like certifications are dropped from education.
//! Certifications are kept only when the caller listed them, unless the caller
//! listed none. Both lists share one year matcher, and the matched year is
//! shown separately from the title.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::transform::skills::matches_keyword;

/// Text that marks an entry as a certification rather than a degree.
const CERTIFICATION_MARKERS: &[&str] = &[
    "certified",
    "certification",
    "certificate",
    "pmp",
    "prince2",
    "itil",
    "togaf",
    "cissp",
    "cism",
    "cisa",
    "ccna",
    "ccnp",
    "comptia",
    "istqb",
    "cka",
    "ckad",
    "psm",
    "csm",
    "scrum master",
    "aws",
    "amazon web services",
    "azure",
    "microsoft certified",
    "google cloud",
    "gcp",
    "salesforce",
    "oracle certified",
];

/// A year, or a year range ending in a year or an open marker.
static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(?\s*\b(?:19|20)\d{2}\b(?:\s*(?:-|–|to)\s*(?:\b(?:19|20)\d{2}\b|present|current|now|today))?\s*\)?",
    )
    .expect("year pattern is valid")
});

/// A display line with its year token split out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedEntry {
    pub title: String,
    pub year: Option<String>,
}

/// Splits the first year (or year range) out of `text`.
pub fn extract_year(text: &str) -> DatedEntry {
    let text = text.trim();
    let Some(m) = YEAR_PATTERN.find(text) else {
        return DatedEntry {
            title: text.to_string(),
            year: None,
        };
    };

    let year = m
        .as_str()
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .to_string();

    let mut title = String::with_capacity(text.len());
    title.push_str(&text[..m.start()]);
    title.push(' ');
    title.push_str(&text[m.end()..]);
    let title = tidy_separators(&title);

    DatedEntry {
        title,
        year: Some(year),
    }
}

/// Collapses whitespace and trims separators left dangling by a removed year.
fn tidy_separators(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '–' | '|' | '(' | ')' | ':'))
        .replace(" ,", ",")
        .replace("()", "")
        .trim()
        .to_string()
}

/// Lowercased with every non-alphanumeric character removed.
pub fn normalize_credential(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when the text reads like a professional certification.
pub fn looks_like_certification(text: &str) -> bool {
    let lower = text.to_lowercase();
    CERTIFICATION_MARKERS
        .iter()
        .any(|marker| matches_keyword(&lower, marker))
}

/// Academic entries with certification-like entries removed.
pub fn filter_education(entries: &[String]) -> Vec<DatedEntry> {
    entries
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .filter(|e| !looks_like_certification(e))
        .map(extract_year)
        .collect()
}

/// Certifications restricted to the caller's list.
///
/// `candidates` are the entries to show (AI-optimized or raw). `allowed` is the
/// caller-supplied list. An empty `allowed` list lets every candidate through.
/// Matching ignores case, punctuation and a trailing year.
pub fn filter_certifications(candidates: &[String], allowed: &[String]) -> Vec<DatedEntry> {
    let allowed_set: HashSet<String> = allowed
        .iter()
        .flat_map(|a| {
            let full = normalize_credential(a);
            let undated = normalize_credential(&extract_year(a).title);
            [full, undated]
        })
        .filter(|a| !a.is_empty())
        .collect();

    candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| {
            allowed_set.is_empty()
                || allowed_set.contains(&normalize_credential(c))
                || allowed_set.contains(&normalize_credential(&extract_year(c).title))
        })
        .map(extract_year)
        .collect()
}
