use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured candidate profile supplied by the caller.
///
/// List fields keep insertion order. Nothing here is deduplicated implicitly;
/// the transformation layer filters explicitly where it has to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateData {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
}

impl CandidateData {
    /// "First Last", tolerating either half being blank.
    pub fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One entry of the work history. Start/end markers are free-form ("2019", "Jan 2020", "Present").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
}

/// Job description used as a read-only enrichment and highlighting signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Account-manager contact printed in the document header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ManagerContact {
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .all(|f| f.as_deref().map(str::trim).unwrap_or("").is_empty())
    }
}
