use serde::{Deserialize, Serialize};

/// Declared type of a caller-editable document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionType {
    Header,
    Summary,
    FunctionalSkills,
    Experience,
    Education,
    Certifications,
    Languages,
    #[serde(other)]
    Other,
}

/// A named, ordered block of document content supplied by the caller.
///
/// `content` may be empty or carry a placeholder left behind by a failed
/// generation; `generation::content_gate` decides which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub order: i32,
}

fn default_visible() -> bool {
    true
}

/// Returns the sections sorted by `order`. Ties keep their input order.
pub fn sorted_by_order(sections: &[Section]) -> Vec<&Section> {
    let mut sorted: Vec<&Section> = sections.iter().collect();
    sorted.sort_by_key(|s| s.order);
    sorted
}
