//! Areas of expertise derived from the candidate's title and skills.

use std::collections::HashSet;

use crate::transform::skills::{matches_keyword, CategoryRule};

pub const MIN_AREAS: usize = 6;

/// Canonical areas, in display order.
pub const EXPERTISE_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "Software Engineering",
        keywords: &["developer", "engineer", "software", "programming", "backend", "frontend", "full stack", "rust", "java", "python"],
    },
    CategoryRule {
        category: "Cloud Architecture",
        keywords: &["cloud", "aws", "azure", "gcp", "kubernetes", "architect"],
    },
    CategoryRule {
        category: "DevOps & Automation",
        keywords: &["devops", "ci/cd", "automation", "terraform", "ansible", "docker", "sre"],
    },
    CategoryRule {
        category: "Data & Analytics",
        keywords: &["data", "analytics", "sql", "machine learning", "bi", "statistic"],
    },
    CategoryRule {
        category: "Cybersecurity",
        keywords: &["security", "cyber", "iam", "soc", "iso 27001", "gdpr"],
    },
    CategoryRule {
        category: "Project Management",
        keywords: &["project", "pmo", "delivery", "prince2", "pmp", "program"],
    },
    CategoryRule {
        category: "Agile Delivery",
        keywords: &["agile", "scrum", "kanban", "safe"],
    },
    CategoryRule {
        category: "Business Analysis",
        keywords: &["business analyst", "business analysis", "requirements", "process", "functional analyst"],
    },
    CategoryRule {
        category: "Digital Transformation",
        keywords: &["transformation", "digital", "change management"],
    },
    CategoryRule {
        category: "Team Leadership",
        keywords: &["lead", "manager", "head of", "director", "chief", "mentor"],
    },
    CategoryRule {
        category: "Stakeholder Management",
        keywords: &["stakeholder", "client", "account", "relationship"],
    },
];

/// Appended in order, skipping duplicates, until `MIN_AREAS` is reached.
pub const FALLBACK_AREAS: &[&str] = &[
    "Strategic Planning",
    "Stakeholder Management",
    "Process Improvement",
    "Team Leadership",
    "Risk Management",
    "Quality Assurance",
];

/// Canonical areas matched by any signal, in rule order.
pub fn derive_areas(title: Option<&str>, skills: &[String]) -> Vec<String> {
    let signals: Vec<String> = title
        .into_iter()
        .map(str::to_string)
        .chain(skills.iter().cloned())
        .map(|s| s.to_lowercase())
        .collect();

    EXPERTISE_RULES
        .iter()
        .filter(|rule| {
            signals
                .iter()
                .any(|signal| rule.keywords.iter().any(|k| matches_keyword(signal, k)))
        })
        .map(|rule| rule.category.to_string())
        .collect()
}

/// Deduplicates `areas` and pads them with the fallback list up to `MIN_AREAS`.
pub fn pad_areas(areas: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = areas
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .filter(|a| seen.insert(a.to_lowercase()))
        .collect();

    for fallback in FALLBACK_AREAS {
        if out.len() >= MIN_AREAS {
            break;
        }
        if seen.insert(fallback.to_lowercase()) {
            out.push(fallback.to_string());
        }
    }
    out
}

/// Enriched areas when present, otherwise derived ones, always padded.
pub fn areas_of_expertise(
    enriched: Option<&[String]>,
    title: Option<&str>,
    skills: &[String],
) -> Vec<String> {
    match enriched.filter(|a| a.iter().any(|s| !s.trim().is_empty())) {
        Some(areas) => pad_areas(areas.to_vec()),
        None => pad_areas(derive_areas(title, skills)),
    }
}
