//! Content Decision Gate: decides whether caller-supplied sections are authoritative.
//!
//! Caller-authored content always takes precedence over AI generation: enrichment
//! runs only when no section carries valid content and the target is the final document.

use serde::Serialize;

use crate::models::document::OutputFormat;
use crate::models::section::Section;

/// Substrings that mark a section as a leftover error placeholder.
const ERROR_MARKERS: &[&str] = &["generation failed", "try regenerating", "error:"];
/// Prefix that marks a section as a leftover error placeholder.
const ERROR_PREFIX: &str = "failed to";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Absent,
    ErrorPlaceholder,
    Valid,
}

impl ContentStatus {
    pub fn is_valid(self) -> bool {
        self == ContentStatus::Valid
    }
}

/// Classifies one piece of section content.
pub fn classify_content(content: &str) -> ContentStatus {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return ContentStatus::Absent;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with(ERROR_PREFIX) || ERROR_MARKERS.iter().any(|m| lower.contains(m)) {
        return ContentStatus::ErrorPlaceholder;
    }
    ContentStatus::Valid
}

/// True iff at least one section carries valid content.
pub fn has_contentful_sections(sections: &[Section]) -> bool {
    sections
        .iter()
        .any(|s| classify_content(&s.content).is_valid())
}

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateDecision {
    pub has_contentful_sections: bool,
    pub enrichment_required: bool,
}

/// Enrichment is required only for the document format with no valid caller content.
pub fn decide(sections: &[Section], format: OutputFormat) -> GateDecision {
    let has_contentful_sections = has_contentful_sections(sections);
    GateDecision {
        has_contentful_sections,
        enrichment_required: !has_contentful_sections && format == OutputFormat::Document,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::SectionType;

    fn section(content: &str) -> Section {
        Section {
            id: "s".to_string(),
            section_type: SectionType::Summary,
            title: "Summary".to_string(),
            content: content.to_string(),
            visible: true,
            order: 0,
        }
    }

    #[test]
    fn test_classify_absent() {
        assert_eq!(classify_content(""), ContentStatus::Absent);
        assert_eq!(classify_content(" \n\t "), ContentStatus::Absent);
    }

    #[test]
    fn test_classify_error_markers() {
        for text in [
            "Generation failed, please retry",
            "Content unavailable. Try regenerating.",
            "Error: upstream timeout",
            "  Failed to generate summary",
        ] {
            assert_eq!(classify_content(text), ContentStatus::ErrorPlaceholder, "{text}");
        }
    }

    #[test]
    fn test_failed_to_only_counts_as_prefix() {
        assert_eq!(
            classify_content("Rescued a project that had failed to launch twice"),
            ContentStatus::Valid
        );
    }

    #[test]
    fn test_classify_valid() {
        assert_eq!(classify_content("Seasoned architect"), ContentStatus::Valid);
    }

    #[test]
    fn test_one_valid_section_is_enough() {
        let sections = vec![section(""), section("Error: boom"), section("Real text")];
        assert!(has_contentful_sections(&sections));
    }

    #[test]
    fn test_decide_requires_enrichment_without_content() {
        let decision = decide(&[section(""), section("failed to load")], OutputFormat::Document);
        assert!(!decision.has_contentful_sections);
        assert!(decision.enrichment_required);
    }

    #[test]
    fn test_decide_skips_enrichment_with_content() {
        let decision = decide(&[section("Caller text")], OutputFormat::Document);
        assert!(decision.has_contentful_sections);
        assert!(!decision.enrichment_required);
    }

    #[test]
    fn test_decide_never_enriches_drafts() {
        let decision = decide(&[], OutputFormat::Draft);
        assert!(!decision.enrichment_required);
    }
}
