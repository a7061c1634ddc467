//! Job-keyword highlighting over already-normalized markup.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::models::candidate::JobDescription;
use crate::transform::html::split_tags;

/// Keywords of this length or shorter are ignored.
const MIN_KEYWORD_CHARS: usize = 2;

/// Collects highlightable keywords from requirements, skills and responsibilities.
///
/// Entries are trimmed, deduplicated case-insensitively and sorted longest first
/// so that a phrase wins over a keyword it contains.
pub fn collect_keywords(jd: &JobDescription) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords: Vec<String> = jd
        .requirements
        .iter()
        .chain(jd.skills.iter())
        .chain(jd.responsibilities.iter())
        .map(|k| k.trim())
        .filter(|k| k.chars().count() > MIN_KEYWORD_CHARS)
        .filter(|k| seen.insert(k.to_lowercase()))
        .map(str::to_string)
        .collect();
    keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    keywords
}

/// Wraps whole-word, case-insensitive keyword matches in an accent-colored span.
///
/// Built once per document. With no job description it is a no-op.
pub struct Highlighter {
    patterns: Option<KeywordPatterns>,
    accent: String,
}

/// The longest-first alternation used to find candidates, plus one pattern per
/// keyword (same order) anchored at the start of its input.
struct KeywordPatterns {
    any: Regex,
    anchored: Vec<Regex>,
}

impl KeywordPatterns {
    fn build(keywords: &[String]) -> Result<Self, regex::Error> {
        let case_insensitive = |pattern: String| {
            RegexBuilder::new(&pattern).case_insensitive(true).build()
        };
        let escaped: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        Ok(Self {
            any: case_insensitive(format!("(?:{})", escaped.join("|")))?,
            anchored: escaped
                .iter()
                .map(|k| case_insensitive(format!("^(?:{k})")))
                .collect::<Result<_, _>>()?,
        })
    }

    /// The first whole-word keyword at or after `from`, as a byte range of `text`.
    ///
    /// When the longest candidate at a position is not word-bounded, shorter
    /// keywords starting at the same position are tried before moving on.
    fn next_match(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        let mut pos = from;
        while pos <= text.len() {
            let m = self.any.find_at(text, pos)?;
            let start = m.start();
            if is_word_bounded(text, start, m.end()) {
                return Some((start, m.end()));
            }
            let shorter = self
                .anchored
                .iter()
                .filter_map(|re| re.find(&text[start..]))
                .map(|a| (start, start + a.end()))
                .find(|&(s, e)| e > s && is_word_bounded(text, s, e));
            if shorter.is_some() {
                return shorter;
            }
            pos = start + text[start..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
        None
    }
}

impl Highlighter {
    pub fn new(jd: Option<&JobDescription>, accent: &str) -> Self {
        let patterns = jd
            .map(collect_keywords)
            .filter(|k| !k.is_empty())
            .and_then(|keywords| {
                KeywordPatterns::build(&keywords)
                    .map_err(|e| tracing::warn!("Keyword pattern rejected, highlighting disabled: {e}"))
                    .ok()
            });
        Self {
            patterns,
            accent: accent.to_string(),
        }
    }

    /// Highlights text runs of `markup`, leaving tags untouched.
    pub fn apply(&self, markup: &str) -> String {
        let Some(patterns) = &self.patterns else {
            return markup.to_string();
        };
        split_tags(markup)
            .into_iter()
            .map(|(is_tag, part)| {
                if is_tag {
                    part.to_string()
                } else {
                    self.highlight_text(patterns, part)
                }
            })
            .collect()
    }

    fn highlight_text(&self, patterns: &KeywordPatterns, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        while let Some((start, end)) = patterns.next_match(text, copied) {
            out.push_str(&text[copied..start]);
            out.push_str(&format!(
                r#"<span class="keyword-highlight" style="color: {}; font-weight: 600;">{}</span>"#,
                self.accent,
                &text[start..end]
            ));
            copied = end;
        }
        out.push_str(&text[copied..]);
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Neither neighbour of the match may be a word character.
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map(is_word_char).unwrap_or(false) && !after.map(is_word_char).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jd(skills: &[&str]) -> JobDescription {
        JobDescription {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_job_description_is_noop() {
        let h = Highlighter::new(None, "#ff0000");
        assert_eq!(h.apply("<p>Rust expert</p>"), "<p>Rust expert</p>");
    }

    #[test]
    fn test_short_keywords_ignored() {
        let keywords = collect_keywords(&jd(&["Go", "C", "SQL"]));
        assert_eq!(keywords, vec!["SQL".to_string()]);
    }

    #[test]
    fn test_case_insensitive_match_keeps_original_text() {
        let h = Highlighter::new(Some(&jd(&["kubernetes"])), "#123456");
        let out = h.apply("<p>Ran Kubernetes clusters</p>");
        assert!(out.contains(r#"style="color: #123456; font-weight: 600;">Kubernetes</span>"#));
    }

    #[test]
    fn test_whole_words_only() {
        let h = Highlighter::new(Some(&jd(&["Rust"])), "#000");
        assert_eq!(h.apply("<p>Rusty tools</p>"), "<p>Rusty tools</p>");
        assert_eq!(h.apply("<p>Trust me</p>"), "<p>Trust me</p>");
    }

    #[test]
    fn test_go_keyword_never_matches_inside_going() {
        let h = Highlighter::new(Some(&jd(&["Go", "Python"])), "#000");
        let out = h.apply("<p>Going to use Python</p>");
        assert!(out.starts_with("<p>Going to use "));
        assert!(out.contains(">Python</span>"));
    }

    #[test]
    fn test_keyword_not_matched_as_prefix_of_longer_word() {
        let h = Highlighter::new(Some(&jd(&["Java"])), "#000");
        assert_eq!(h.apply("<p>JavaScript only</p>"), "<p>JavaScript only</p>");
    }

    #[test]
    fn test_keywords_with_symbols_are_escaped() {
        let h = Highlighter::new(Some(&jd(&["C++", ".NET"])), "#000");
        let out = h.apply("<p>C++ and .NET services</p>");
        assert!(out.contains(">C++</span>"));
        assert!(out.contains(">.NET</span>"));
    }

    #[test]
    fn test_tags_are_never_rewritten() {
        let h = Highlighter::new(Some(&jd(&["strong", "class"])), "#000");
        let out = h.apply("<p><strong>Built</strong> a strong team</p>");
        assert!(out.starts_with("<p><strong>Built</strong>"));
        assert!(out.contains(">strong</span> team"));
    }

    #[test]
    fn test_longer_phrase_wins() {
        let h = Highlighter::new(Some(&jd(&["data", "data engineering"])), "#000");
        let out = h.apply("<p>Data engineering lead</p>");
        assert!(out.contains(">Data engineering</span>"));
    }

    #[test]
    fn test_overlapping_candidate_found_after_failed_boundary() {
        let h = Highlighter::new(Some(&jd(&["API"])), "#000");
        let out = h.apply("<p>APIs and API design</p>");
        assert_eq!(out.matches("keyword-highlight").count(), 1);
        assert!(out.contains(">API</span> design"));
    }

    #[test]
    fn test_shorter_keyword_tried_when_longer_phrase_is_not_whole_word() {
        let h = Highlighter::new(Some(&jd(&["SQL Server", "SQL"])), "#000");
        let out = h.apply("<p>SQL Servers administration</p>");
        assert!(out.contains(">SQL</span> Servers administration"));
        assert_eq!(out.matches("keyword-highlight").count(), 1);
    }

    #[test]
    fn test_job_description_without_usable_keywords_is_noop() {
        let h = Highlighter::new(Some(&jd(&["Go", " "])), "#000");
        assert_eq!(h.apply("<p>Go team</p>"), "<p>Go team</p>");
    }
}
