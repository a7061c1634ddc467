use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateData;

/// AI-derived overlay merged over raw candidate data before rendering.
///
/// Every field is optional. `None` (or an empty list) means "fall back to
/// the raw `CandidateData` field".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichedContent {
    #[serde(default)]
    pub enhanced_summary: Option<String>,
    #[serde(default)]
    pub categorized_skills: Option<CategorizedSkills>,
    #[serde(default)]
    pub enriched_experience: Option<Vec<EnrichedExperience>>,
    #[serde(default)]
    pub areas_of_expertise: Option<Vec<String>>,
    #[serde(default)]
    pub value_proposition: Option<String>,
    #[serde(default)]
    pub optimized_education: Option<Vec<String>>,
    #[serde(default)]
    pub optimized_certifications: Option<Vec<String>>,
    #[serde(default)]
    pub core_competencies: Option<Vec<String>>,
    #[serde(default)]
    pub technical_expertise: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorizedSkills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub functional: Vec<String>,
    #[serde(default)]
    pub leadership: Vec<String>,
}

/// A field that callers and the model send either as a list or as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    List(Vec<String>),
    Text(String),
}

/// Work-history entry as produced by enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichedExperience {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<TextOrList>,
    #[serde(default)]
    pub achievements: Option<TextOrList>,
    #[serde(default)]
    pub technical_environment: Option<TextOrList>,
    /// Free narrative without role structure.
    #[serde(default)]
    pub description: Option<String>,
}

impl EnrichedExperience {
    /// True when the entry names a role or employer and can stand in for raw history.
    pub fn is_structured(&self) -> bool {
        non_blank(&self.company) || non_blank(&self.title)
    }
}

impl EnrichedContent {
    /// Overwrites the candidate summary with the enhanced one, when present.
    pub fn merge_into(&self, candidate: &mut CandidateData) {
        if let Some(summary) = self.enhanced_summary.as_deref() {
            if !summary.trim().is_empty() {
                candidate.summary = Some(summary.trim().to_string());
            }
        }
    }

    /// Technical skill list with the enrichment fallbacks applied.
    pub fn technical_skills(&self) -> Option<&[String]> {
        self.categorized_skills
            .as_ref()
            .map(|c| c.technical.as_slice())
            .filter(|s| !s.is_empty())
            .or_else(|| self.technical_expertise.as_deref().filter(|s| !s.is_empty()))
    }

    /// Functional and leadership skills, then core competencies.
    pub fn functional_skills(&self) -> Option<Vec<String>> {
        let from_categories: Vec<String> = self
            .categorized_skills
            .as_ref()
            .map(|c| c.functional.iter().chain(c.leadership.iter()).cloned().collect())
            .unwrap_or_default();
        if !from_categories.is_empty() {
            return Some(from_categories);
        }
        self.core_competencies.clone().filter(|c| !c.is_empty())
    }
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}
