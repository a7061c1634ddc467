//! Template variants: each one supplies a theme and a block order, nothing else.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Blocks a variant can place in its body, in the order the variant lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Block {
    Header,
    ValueProposition,
    Summary,
    FunctionalSkills,
    TechnicalSkills,
    AreasOfExpertise,
    Education,
    Certifications,
    Languages,
    ExperienceOverview,
    Experience,
}

impl Block {
    pub fn default_heading(self) -> &'static str {
        match self {
            Block::Header => "",
            Block::ValueProposition => "Value Proposition",
            Block::Summary => "Professional Summary",
            Block::FunctionalSkills => "Functional Skills",
            Block::TechnicalSkills => "Technical Skills",
            Block::AreasOfExpertise => "Areas of Expertise",
            Block::Education => "Education",
            Block::Certifications => "Certifications",
            Block::Languages => "Languages",
            Block::ExperienceOverview => "Career Overview",
            Block::Experience => "Professional Experience",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Block::Header => "block-header",
            Block::ValueProposition => "block-value-proposition",
            Block::Summary => "block-summary",
            Block::FunctionalSkills => "block-functional-skills",
            Block::TechnicalSkills => "block-technical-skills",
            Block::AreasOfExpertise => "block-expertise",
            Block::Education => "block-education",
            Block::Certifications => "block-certifications",
            Block::Languages => "block-languages",
            Block::ExperienceOverview => "block-experience-overview",
            Block::Experience => "block-experience",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Name and headline over a rule.
    Plain,
    /// Full-width colored band.
    Banner,
}

/// Colors and typography. Every color is a CSS color literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub accent: &'static str,
    pub secondary: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub heading_font: &'static str,
    pub body_font: &'static str,
    pub header_style: HeaderStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    Professional,
    Modern,
    Minimal,
    Antaes,
    Executive,
}

impl TemplateId {
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Professional => "professional",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::Antaes => "antaes",
            TemplateId::Executive => "executive",
        }
    }

    pub fn variant(self) -> &'static dyn TemplateVariant {
        match self {
            TemplateId::Professional => &Professional,
            TemplateId::Modern => &Modern,
            TemplateId::Minimal => &Minimal,
            TemplateId::Antaes => &Antaes,
            TemplateId::Executive => &Executive,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "professional" | "generic" | "default" => Ok(TemplateId::Professional),
            "modern" => Ok(TemplateId::Modern),
            "minimal" => Ok(TemplateId::Minimal),
            "antaes" => Ok(TemplateId::Antaes),
            "executive" => Ok(TemplateId::Executive),
            _ => Err(UnknownTemplate(s.to_string())),
        }
    }
}

/// A fixed visual strategy over the shared transformation layer.
pub trait TemplateVariant: Send + Sync {
    fn id(&self) -> TemplateId;
    fn theme(&self) -> Theme;
    /// Body order. Must start with `Block::Header` and list every declarable block.
    fn block_order(&self) -> &'static [Block];
}

pub struct Professional;
pub struct Modern;
pub struct Minimal;
pub struct Antaes;
pub struct Executive;

impl TemplateVariant for Professional {
    fn id(&self) -> TemplateId {
        TemplateId::Professional
    }

    fn theme(&self) -> Theme {
        Theme {
            accent: "#1f3a5f",
            secondary: "#4a6fa5",
            text: "#222222",
            muted: "#666666",
            heading_font: "Georgia, 'Times New Roman', serif",
            body_font: "'Helvetica Neue', Arial, sans-serif",
            header_style: HeaderStyle::Plain,
        }
    }

    fn block_order(&self) -> &'static [Block] {
        &[
            Block::Header,
            Block::ValueProposition,
            Block::Summary,
            Block::FunctionalSkills,
            Block::TechnicalSkills,
            Block::AreasOfExpertise,
            Block::Education,
            Block::Certifications,
            Block::Languages,
            Block::ExperienceOverview,
            Block::Experience,
        ]
    }
}

impl TemplateVariant for Modern {
    fn id(&self) -> TemplateId {
        TemplateId::Modern
    }

    fn theme(&self) -> Theme {
        Theme {
            accent: "#0f766e",
            secondary: "#14b8a6",
            text: "#1f2933",
            muted: "#52606d",
            heading_font: "'Inter', 'Segoe UI', Arial, sans-serif",
            body_font: "'Inter', 'Segoe UI', Arial, sans-serif",
            header_style: HeaderStyle::Plain,
        }
    }

    fn block_order(&self) -> &'static [Block] {
        &[
            Block::Header,
            Block::ValueProposition,
            Block::Summary,
            Block::TechnicalSkills,
            Block::ExperienceOverview,
            Block::Experience,
            Block::FunctionalSkills,
            Block::AreasOfExpertise,
            Block::Education,
            Block::Certifications,
            Block::Languages,
        ]
    }
}

impl TemplateVariant for Minimal {
    fn id(&self) -> TemplateId {
        TemplateId::Minimal
    }

    fn theme(&self) -> Theme {
        Theme {
            accent: "#111111",
            secondary: "#444444",
            text: "#111111",
            muted: "#777777",
            heading_font: "Arial, Helvetica, sans-serif",
            body_font: "Arial, Helvetica, sans-serif",
            header_style: HeaderStyle::Plain,
        }
    }

    fn block_order(&self) -> &'static [Block] {
        &[
            Block::Header,
            Block::ValueProposition,
            Block::Summary,
            Block::FunctionalSkills,
            Block::TechnicalSkills,
            Block::AreasOfExpertise,
            Block::Education,
            Block::Certifications,
            Block::Languages,
            Block::Experience,
        ]
    }
}

impl TemplateVariant for Antaes {
    fn id(&self) -> TemplateId {
        TemplateId::Antaes
    }

    fn theme(&self) -> Theme {
        Theme {
            accent: "#0b2e59",
            secondary: "#f28c28",
            text: "#1c1c1c",
            muted: "#5f6b7a",
            heading_font: "'Montserrat', 'Segoe UI', Arial, sans-serif",
            body_font: "'Open Sans', Arial, sans-serif",
            header_style: HeaderStyle::Banner,
        }
    }

    fn block_order(&self) -> &'static [Block] {
        &[
            Block::Header,
            Block::ValueProposition,
            Block::Summary,
            Block::ExperienceOverview,
            Block::FunctionalSkills,
            Block::TechnicalSkills,
            Block::AreasOfExpertise,
            Block::Education,
            Block::Certifications,
            Block::Languages,
            Block::Experience,
        ]
    }
}

impl TemplateVariant for Executive {
    fn id(&self) -> TemplateId {
        TemplateId::Executive
    }

    fn theme(&self) -> Theme {
        Theme {
            accent: "#2d2d2d",
            secondary: "#b8860b",
            text: "#1a1a1a",
            muted: "#6b6b6b",
            heading_font: "'Playfair Display', Georgia, serif",
            body_font: "Georgia, 'Times New Roman', serif",
            header_style: HeaderStyle::Banner,
        }
    }

    fn block_order(&self) -> &'static [Block] {
        &[
            Block::Header,
            Block::ValueProposition,
            Block::Summary,
            Block::AreasOfExpertise,
            Block::FunctionalSkills,
            Block::TechnicalSkills,
            Block::Education,
            Block::Certifications,
            Block::Languages,
            Block::ExperienceOverview,
            Block::Experience,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TemplateId; 5] = [
        TemplateId::Professional,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::Antaes,
        TemplateId::Executive,
    ];

    #[test]
    fn test_aliases_resolve_to_professional() {
        assert_eq!("generic".parse::<TemplateId>(), Ok(TemplateId::Professional));
        assert_eq!(" Default ".parse::<TemplateId>(), Ok(TemplateId::Professional));
        assert_eq!("ANTAES".parse::<TemplateId>(), Ok(TemplateId::Antaes));
        assert!("glossy".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_every_variant_starts_with_header_and_lists_declarable_blocks() {
        let declarable = [
            Block::Summary,
            Block::FunctionalSkills,
            Block::Experience,
            Block::Education,
            Block::Certifications,
            Block::Languages,
        ];
        for id in ALL {
            let variant = id.variant();
            assert_eq!(variant.id(), id);
            let order = variant.block_order();
            assert_eq!(order[0], Block::Header, "{id}");
            for block in declarable {
                assert!(order.contains(&block), "{id} is missing {block:?}");
            }
        }
    }

    #[test]
    fn test_minimal_has_no_experience_overview() {
        assert!(!TemplateId::Minimal
            .variant()
            .block_order()
            .contains(&Block::ExperienceOverview));
    }

    #[test]
    fn test_modern_promotes_experience_ahead_of_education() {
        let order = TemplateId::Modern.variant().block_order();
        let pos = |b| order.iter().position(|x| *x == b).unwrap();
        assert!(pos(Block::TechnicalSkills) < pos(Block::Education));
        assert!(pos(Block::Experience) < pos(Block::Education));
    }

    #[test]
    fn test_executive_leads_with_value_proposition_and_expertise() {
        let order = TemplateId::Executive.variant().block_order();
        assert_eq!(order[1], Block::ValueProposition);
        let pos = |b| order.iter().position(|x| *x == b).unwrap();
        assert!(pos(Block::AreasOfExpertise) < pos(Block::FunctionalSkills));
    }
}
