//! Template Composer: turns merged candidate data and caller sections into one document.
//!
//! The variant contributes only its theme and block order. Section arrangement,
//! transformation and experience rendering are shared by all variants:
//!   - sections are sorted by `order`; an invisible section removes its block
//!   - declared blocks fill the variant's slots for declared blocks in caller order
//!   - `other` sections follow the declared block that precedes them
//!   - valid section content wins; otherwise enriched/raw data; otherwise "To be provided."
//!   - undeclared blocks without data are omitted

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::generation::content_gate::classify_content;
use crate::models::candidate::{CandidateData, JobDescription, ManagerContact};
use crate::models::enriched::EnrichedContent;
use crate::models::section::{sorted_by_order, Section, SectionType};
use crate::render::document::wrap_document;
use crate::render::experience::{render_experience, ExperienceFragments};
use crate::render::variants::{Block, TemplateId, TemplateVariant, Theme};
use crate::transform::credentials::{filter_certifications, filter_education, DatedEntry};
use crate::transform::expertise::areas_of_expertise;
use crate::transform::skills::{
    categorize_functional, categorize_technical, classify, SkillCategory, FUNCTIONAL_CATCH_ALL,
    FUNCTIONAL_RULES,
};
use crate::transform::{escape_html, inline_markdown, markdown_to_html, Highlighter};

pub const TO_BE_PROVIDED: &str = "To be provided.";

/// Everything composition reads. `candidate.summary` already carries the enhanced summary.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    pub candidate: &'a CandidateData,
    pub enriched: Option<&'a EnrichedContent>,
    pub sections: &'a [Section],
    pub job_description: Option<&'a JobDescription>,
    pub manager_contact: Option<&'a ManagerContact>,
}

pub struct TemplateComposer {
    variant: &'static dyn TemplateVariant,
}

#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Standard(Block),
    Custom(&'a Section),
}

/// Request-scoped values shared by every block renderer.
struct RenderContext<'a> {
    input: CompositionInput<'a>,
    highlighter: Highlighter,
    experience: ExperienceFragments,
}

impl TemplateComposer {
    pub fn new(id: TemplateId) -> Self {
        Self {
            variant: id.variant(),
        }
    }

    /// Resolves a caller-supplied identifier. Unknown identifiers fall back to professional.
    pub fn for_template(identifier: &str) -> Self {
        let id = identifier.parse::<TemplateId>().unwrap_or_else(|e| {
            warn!("{e}, falling back to {}", TemplateId::Professional);
            TemplateId::Professional
        });
        Self::new(id)
    }

    pub fn template_id(&self) -> TemplateId {
        self.variant.id()
    }

    pub fn theme(&self) -> Theme {
        self.variant.theme()
    }

    /// Full HTML document for the renderer.
    pub fn compose(&self, input: &CompositionInput<'_>) -> String {
        let name = input.candidate.full_name();
        let title = if name.is_empty() {
            "Competence File".to_string()
        } else {
            format!("{name} - Competence File")
        };
        wrap_document(&title, &self.theme(), &self.compose_body(input))
    }

    /// The document body: every arranged block, in slot order.
    pub fn compose_body(&self, input: &CompositionInput<'_>) -> String {
        let highlighter = Highlighter::new(input.job_description, self.theme().accent);
        let experience = render_experience(
            &input.candidate.experience,
            input.enriched.and_then(|e| e.enriched_experience.as_deref()),
            &highlighter,
        );
        let ctx = RenderContext {
            input: *input,
            highlighter,
            experience,
        };

        let arrangement = arrange(self.variant.block_order(), input.sections);
        arrangement
            .slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Standard(block) => {
                    render_block(*block, arrangement.declared.get(block).copied(), &ctx)
                }
                Slot::Custom(section) => Some(render_custom(section, &ctx)),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Arrangement
// ────────────────────────────────────────────────────────────────────────────

struct Arrangement<'a> {
    slots: Vec<Slot<'a>>,
    declared: HashMap<Block, &'a Section>,
}

/// Block a section type claims. Header and `other` claim none.
fn declared_block(section_type: SectionType) -> Option<Block> {
    match section_type {
        SectionType::Summary => Some(Block::Summary),
        SectionType::FunctionalSkills => Some(Block::FunctionalSkills),
        SectionType::Experience => Some(Block::Experience),
        SectionType::Education => Some(Block::Education),
        SectionType::Certifications => Some(Block::Certifications),
        SectionType::Languages => Some(Block::Languages),
        SectionType::Header | SectionType::Other => None,
    }
}

fn arrange<'a>(order: &'static [Block], sections: &'a [Section]) -> Arrangement<'a> {
    let mut hidden: HashSet<Block> = HashSet::new();
    let mut declared: HashMap<Block, &'a Section> = HashMap::new();
    let mut caller_order: Vec<Block> = Vec::new();
    // Custom sections keyed by the declared block preceding them (None: none yet).
    let mut customs: Vec<(Option<Block>, &'a Section)> = Vec::new();
    let mut last_declared: Option<Block> = None;

    for section in sorted_by_order(sections) {
        if section.section_type == SectionType::Header {
            continue;
        }
        match declared_block(section.section_type) {
            Some(block) if !declared.contains_key(&block) && !hidden.contains(&block) => {
                if section.visible {
                    declared.insert(block, section);
                    caller_order.push(block);
                    last_declared = Some(block);
                } else {
                    hidden.insert(block);
                }
            }
            // `other`, or a second section of an already claimed type.
            _ => {
                if section.visible {
                    customs.push((last_declared, section));
                }
            }
        }
    }

    if hidden.contains(&Block::Experience) {
        hidden.insert(Block::ExperienceOverview);
    }

    let mut fill = caller_order.into_iter();
    let mut slots = Vec::with_capacity(order.len() + customs.len());
    let mut anchors_placed: HashSet<Option<Block>> = HashSet::new();

    for &reserved in order {
        if hidden.contains(&reserved) {
            continue;
        }
        let block = if declared.contains_key(&reserved) {
            fill.next().unwrap_or(reserved)
        } else {
            reserved
        };
        slots.push(Slot::Standard(block));

        let anchor = if block == Block::Header { None } else { Some(block) };
        if declared.contains_key(&block) || block == Block::Header {
            anchors_placed.insert(anchor);
            slots.extend(
                customs
                    .iter()
                    .filter(|(a, _)| *a == anchor)
                    .map(|(_, s)| Slot::Custom(s)),
            );
        }
    }

    // Anchors that never got a slot still keep their custom sections.
    slots.extend(
        customs
            .iter()
            .filter(|(a, _)| !anchors_placed.contains(a))
            .map(|(_, s)| Slot::Custom(s)),
    );

    Arrangement { slots, declared }
}

// ────────────────────────────────────────────────────────────────────────────
// Block rendering
// ────────────────────────────────────────────────────────────────────────────

fn render_block(block: Block, declared: Option<&Section>, ctx: &RenderContext<'_>) -> Option<String> {
    match block {
        Block::Header => return Some(render_header(ctx)),
        Block::ValueProposition => return render_value_proposition(ctx),
        Block::ExperienceOverview => return render_experience_overview(ctx),
        _ => {}
    }

    let heading = declared
        .map(|s| s.title.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(block.default_heading());

    if let Some(section) = declared {
        if classify_content(&section.content).is_valid() {
            let mut inner = markdown_to_html(&section.content);
            if matches!(block, Block::Summary | Block::Experience) {
                inner = ctx.highlighter.apply(&inner);
            }
            return Some(wrap_block(block.css_class(), heading, &inner));
        }
    }

    match (block_data(block, ctx), declared) {
        (Some(inner), _) => Some(wrap_block(block.css_class(), heading, &inner)),
        (None, Some(_)) => Some(wrap_block(block.css_class(), heading, &to_be_provided())),
        (None, None) => None,
    }
}

fn render_custom(section: &Section, ctx: &RenderContext<'_>) -> String {
    let heading = match section.title.trim() {
        "" => "Additional Information",
        title => title,
    };
    let inner = if classify_content(&section.content).is_valid() {
        ctx.highlighter.apply(&markdown_to_html(&section.content))
    } else {
        to_be_provided()
    };
    wrap_block("block-custom", heading, &inner)
}

/// Enriched or raw data for a block, as inner markup. `None` when there is nothing to show.
fn block_data(block: Block, ctx: &RenderContext<'_>) -> Option<String> {
    let candidate = ctx.input.candidate;
    let enriched = ctx.input.enriched;
    match block {
        Block::Summary => candidate
            .summary
            .as_deref()
            .map(markdown_to_html)
            .filter(|html| !html.is_empty())
            .map(|html| ctx.highlighter.apply(&html)),
        Block::FunctionalSkills => {
            let categories = match enriched.and_then(EnrichedContent::functional_skills) {
                Some(skills) => categorize_functional(&skills),
                None => categorize_functional(&candidate.skills)
                    .into_iter()
                    .filter(|c| c.name != FUNCTIONAL_CATCH_ALL)
                    .collect(),
            };
            render_categories(&categories)
        }
        Block::TechnicalSkills => {
            let categories = match enriched.and_then(EnrichedContent::technical_skills) {
                Some(skills) => categorize_technical(skills),
                None => {
                    let technical: Vec<String> = candidate
                        .skills
                        .iter()
                        .filter(|s| classify(s, FUNCTIONAL_RULES).is_none())
                        .cloned()
                        .collect();
                    categorize_technical(&technical)
                }
            };
            render_categories(&categories)
        }
        Block::AreasOfExpertise => {
            let areas = areas_of_expertise(
                enriched.and_then(|e| e.areas_of_expertise.as_deref()),
                candidate.title.as_deref(),
                &candidate.skills,
            );
            render_list("expertise-list cols-2", &areas)
        }
        Block::Education => {
            let source = enriched
                .and_then(|e| e.optimized_education.as_deref())
                .filter(|e| !e.is_empty())
                .unwrap_or(candidate.education.as_slice());
            render_dated(&filter_education(source))
        }
        Block::Certifications => {
            let source = enriched
                .and_then(|e| e.optimized_certifications.as_deref())
                .filter(|c| !c.is_empty())
                .unwrap_or(candidate.certifications.as_slice());
            render_dated(&filter_certifications(source, &candidate.certifications))
        }
        Block::Languages => render_list("language-list", &candidate.languages),
        Block::Experience => {
            Some(ctx.experience.detailed_blocks.clone()).filter(|html| !html.is_empty())
        }
        Block::Header | Block::ValueProposition | Block::ExperienceOverview => None,
    }
}

fn render_header(ctx: &RenderContext<'_>) -> String {
    let candidate = ctx.input.candidate;
    let mut html = String::from("<header class=\"doc-header\">");
    html.push_str(&format!(
        "<h1 class=\"candidate-name\">{}</h1>",
        escape_html(&candidate.full_name())
    ));

    let headline = ctx
        .input
        .sections
        .iter()
        .find(|s| s.section_type == SectionType::Header && s.visible)
        .filter(|s| classify_content(&s.content).is_valid())
        .map(|s| inline_markdown(&s.content))
        .or_else(|| {
            candidate
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(escape_html)
        });
    if let Some(headline) = headline {
        html.push_str(&format!("<p class=\"headline\">{headline}</p>"));
    }

    let mut meta = Vec::new();
    if let Some(years) = candidate.years_of_experience.filter(|y| *y > 0) {
        meta.push(format!("{years}+ years of experience"));
    }
    if let Some(location) = candidate.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        meta.push(escape_html(location));
    }
    if !meta.is_empty() {
        html.push_str(&format!("<p class=\"header-meta\">{}</p>", meta.join(" | ")));
    }

    if let Some(contact) = ctx.input.manager_contact.filter(|c| !c.is_empty()) {
        let parts: Vec<String> = [&contact.name, &contact.email, &contact.phone]
            .into_iter()
            .filter_map(|f| f.as_deref().map(str::trim).filter(|v| !v.is_empty()))
            .map(escape_html)
            .collect();
        html.push_str(&format!(
            "<p class=\"manager-contact\"><span class=\"label\">Contact:</span> {}</p>",
            parts.join(" | ")
        ));
    }

    html.push_str("</header>");
    html
}

fn render_value_proposition(ctx: &RenderContext<'_>) -> Option<String> {
    let text = ctx
        .input
        .enriched
        .and_then(|e| e.value_proposition.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())?;
    Some(format!(
        "<aside class=\"value-proposition {}\">{}</aside>",
        Block::ValueProposition.css_class(),
        markdown_to_html(text)
    ))
}

/// Omitted when the caller authored the experience section themselves.
fn render_experience_overview(ctx: &RenderContext<'_>) -> Option<String> {
    let authored = ctx
        .input
        .sections
        .iter()
        .any(|s| s.section_type == SectionType::Experience && classify_content(&s.content).is_valid());
    if authored || ctx.experience.summary_list.is_empty() {
        return None;
    }
    Some(wrap_block(
        Block::ExperienceOverview.css_class(),
        Block::ExperienceOverview.default_heading(),
        &ctx.experience.summary_list,
    ))
}

fn wrap_block(class: &str, heading: &str, inner: &str) -> String {
    format!(
        "<section class=\"block {class}\"><h2>{}</h2>{inner}</section>",
        escape_html(heading)
    )
}

fn to_be_provided() -> String {
    format!("<p class=\"to-be-provided\">{TO_BE_PROVIDED}</p>")
}

fn render_categories(categories: &[SkillCategory]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    let titled = categories.len() > 1;
    let html = categories
        .iter()
        .map(|category| {
            let items: String = category
                .skills
                .iter()
                .map(|s| format!("<li>{}</li>", escape_html(s)))
                .collect();
            let heading = if titled {
                format!("<h3>{}</h3>", escape_html(&category.name))
            } else {
                String::new()
            };
            format!(
                "<div class=\"skill-category\">{heading}<ul class=\"skill-list {}\">{items}</ul></div>",
                category.layout().css_class()
            )
        })
        .collect();
    Some(html)
}

fn render_list(class: &str, items: &[String]) -> Option<String> {
    let items: String = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();
    (!items.is_empty()).then(|| format!("<ul class=\"{class}\">{items}</ul>"))
}

fn render_dated(entries: &[DatedEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let items: String = entries
        .iter()
        .map(|entry| {
            let year = entry
                .year
                .as_deref()
                .map(|y| format!(" <span class=\"credential-year\">{}</span>", escape_html(y)))
                .unwrap_or_default();
            format!(
                "<li><span class=\"credential-title\">{}</span>{year}</li>",
                escape_html(&entry.title)
            )
        })
        .collect();
    Some(format!("<ul class=\"credential-list\">{items}</ul>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::ExperienceItem;
    use crate::models::enriched::CategorizedSkills;

    fn candidate() -> CandidateData {
        CandidateData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            title: Some("Senior Data Engineer".to_string()),
            years_of_experience: Some(12),
            summary: Some("Builds data platforms.".to_string()),
            skills: vec![
                "Python".to_string(),
                "PostgreSQL".to_string(),
                "Team Leadership".to_string(),
            ],
            education: vec!["MSc Computer Science, ETH Zurich (2012)".to_string()],
            certifications: vec!["AWS Certified Solutions Architect 2021".to_string()],
            languages: vec!["English".to_string(), "French".to_string()],
            experience: vec![ExperienceItem {
                company: "Acme".to_string(),
                title: "Data Engineer".to_string(),
                start_date: Some("2018".to_string()),
                end_date: None,
                responsibilities: Some("Built pipelines. Ran Kubernetes clusters.".to_string()),
            }],
            ..Default::default()
        }
    }

    fn section(id: &str, section_type: SectionType, content: &str, order: i32) -> Section {
        Section {
            id: id.to_string(),
            section_type,
            title: String::new(),
            content: content.to_string(),
            visible: true,
            order,
        }
    }

    fn input<'a>(candidate: &'a CandidateData, sections: &'a [Section]) -> CompositionInput<'a> {
        CompositionInput {
            candidate,
            enriched: None,
            sections,
            job_description: None,
            manager_contact: None,
        }
    }

    fn position(body: &str, needle: &str) -> usize {
        body.find(needle)
            .unwrap_or_else(|| panic!("'{needle}' not found in body"))
    }

    #[test]
    fn test_unknown_template_falls_back_to_professional() {
        assert_eq!(
            TemplateComposer::for_template("glossy").template_id(),
            TemplateId::Professional
        );
        assert_eq!(TemplateComposer::for_template("antaes").template_id(), TemplateId::Antaes);
    }

    #[test]
    fn test_no_sections_renders_data_blocks_in_variant_order() {
        let c = candidate();
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &[]));
        let header = position(&body, "doc-header");
        let summary = position(&body, "block-summary");
        let expertise = position(&body, "block-expertise");
        let experience = position(&body, "class=\"block block-experience\"");
        assert!(header < summary && summary < expertise && expertise < experience);
        assert!(body.contains("Builds data platforms."));
        assert!(!body.contains(TO_BE_PROVIDED));
    }

    #[test]
    fn test_valid_section_content_wins_over_data() {
        let c = candidate();
        let sections = vec![section("s1", SectionType::Summary, "Caller **authored** summary.", 0)];
        let body = TemplateComposer::new(TemplateId::Antaes).compose_body(&input(&c, &sections));
        assert!(body.contains("Caller <strong>authored</strong> summary."));
        assert!(!body.contains("Builds data platforms."));
    }

    #[test]
    fn test_placeholder_section_falls_back_to_data() {
        let c = candidate();
        let sections = vec![section("s1", SectionType::Summary, "Generation failed, try regenerating", 0)];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &sections));
        assert!(body.contains("Builds data platforms."));
        assert!(!body.contains("Generation failed"));
    }

    #[test]
    fn test_declared_section_without_data_says_to_be_provided() {
        let c = CandidateData {
            first_name: "Ada".to_string(),
            ..Default::default()
        };
        let sections = vec![section("l", SectionType::Languages, "", 0)];
        let body = TemplateComposer::new(TemplateId::Minimal).compose_body(&input(&c, &sections));
        assert!(body.contains("block-languages"));
        assert!(body.contains(TO_BE_PROVIDED));
        // Undeclared blocks without data are omitted entirely.
        assert!(!body.contains("block-education"));
        assert!(!body.contains("block-certifications"));
    }

    #[test]
    fn test_invisible_section_removes_block_but_never_header() {
        let c = candidate();
        let mut summary = section("s", SectionType::Summary, "", 0);
        summary.visible = false;
        let mut header = section("h", SectionType::Header, "", 1);
        header.visible = false;
        let mut experience = section("e", SectionType::Experience, "", 2);
        experience.visible = false;
        let sections = vec![summary, header, experience];
        let body = TemplateComposer::new(TemplateId::Antaes).compose_body(&input(&c, &sections));
        assert!(body.contains("doc-header"));
        assert!(!body.contains("block-summary"));
        assert!(!body.contains("block-experience"));
    }

    #[test]
    fn test_caller_order_is_authoritative_among_declared_blocks() {
        let c = candidate();
        let sections = vec![
            section("lang", SectionType::Languages, "", 0),
            section("sum", SectionType::Summary, "", 1),
        ];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &sections));
        assert!(position(&body, "block-languages") < position(&body, "block-summary"));
    }

    #[test]
    fn test_sections_sorted_by_order_field() {
        let c = candidate();
        let sections = vec![
            section("sum", SectionType::Summary, "", 5),
            section("edu", SectionType::Education, "", 1),
        ];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &sections));
        assert!(position(&body, "block-education") < position(&body, "block-summary"));
    }

    #[test]
    fn test_custom_section_follows_preceding_declared_block() {
        let c = candidate();
        let mut custom = section("x", SectionType::Other, "Volunteer mentor.", 1);
        custom.title = "Volunteering".to_string();
        let sections = vec![
            section("sum", SectionType::Summary, "", 0),
            custom,
            section("edu", SectionType::Education, "", 2),
        ];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &sections));
        let summary = position(&body, "block-summary");
        let custom = position(&body, "Volunteering");
        let next = position(&body, "block-functional-skills");
        assert!(summary < custom && custom < next);
    }

    #[test]
    fn test_custom_section_before_any_declared_block_follows_header() {
        let c = candidate();
        let sections = vec![section("x", SectionType::Other, "Note.", 0)];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &sections));
        assert!(position(&body, "block-custom") < position(&body, "block-summary"));
    }

    #[test]
    fn test_enriched_skills_take_precedence() {
        let c = candidate();
        let enriched = EnrichedContent {
            categorized_skills: Some(CategorizedSkills {
                technical: vec!["Rust".to_string(), "Kafka".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut i = input(&c, &[]);
        i.enriched = Some(&enriched);
        let body = TemplateComposer::new(TemplateId::Modern).compose_body(&i);
        assert!(body.contains("<li>Rust</li>"));
        assert!(body.contains("<li>Kafka</li>"));
    }

    #[test]
    fn test_raw_skills_split_between_functional_and_technical() {
        let c = candidate();
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &[]));
        let functional = position(&body, "block-functional-skills");
        let technical = position(&body, "block-technical-skills");
        let leadership = position(&body, "<li>Team Leadership</li>");
        assert!(functional < leadership && leadership < technical);

        let technical_block = body[technical..].split("</section>").next().unwrap();
        assert!(technical_block.contains("<li>Python</li>"));
        assert!(!technical_block.contains("Team Leadership"));
    }

    #[test]
    fn test_manager_contact_in_header() {
        let c = candidate();
        let contact = ManagerContact {
            name: Some("Grace Hopper".to_string()),
            email: Some("grace@example.com".to_string()),
            phone: None,
        };
        let mut i = input(&c, &[]);
        i.manager_contact = Some(&contact);
        let body = TemplateComposer::new(TemplateId::Executive).compose_body(&i);
        let header_end = position(&body, "</header>");
        assert!(position(&body, "grace@example.com") < header_end);
    }

    #[test]
    fn test_value_proposition_only_when_enriched() {
        let c = candidate();
        let body = TemplateComposer::new(TemplateId::Executive).compose_body(&input(&c, &[]));
        assert!(!body.contains("value-proposition"));

        let enriched = EnrichedContent {
            value_proposition: Some("Turns data into decisions.".to_string()),
            ..Default::default()
        };
        let mut i = input(&c, &[]);
        i.enriched = Some(&enriched);
        let body = TemplateComposer::new(TemplateId::Executive).compose_body(&i);
        assert!(position(&body, "value-proposition") < position(&body, "block-summary"));
    }

    #[test]
    fn test_minimal_has_no_overview_but_antaes_places_it_after_summary() {
        let c = candidate();
        let minimal = TemplateComposer::new(TemplateId::Minimal).compose_body(&input(&c, &[]));
        assert!(!minimal.contains("block-experience-overview"));

        let antaes = TemplateComposer::new(TemplateId::Antaes).compose_body(&input(&c, &[]));
        let summary = position(&antaes, "block-summary");
        let overview = position(&antaes, "block-experience-overview");
        let functional = position(&antaes, "block-functional-skills");
        assert!(summary < overview && overview < functional);
    }

    #[test]
    fn test_highlighting_only_with_job_description() {
        let c = candidate();
        let without = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &[]));
        assert!(!without.contains("keyword-highlight"));

        let jd = JobDescription {
            requirements: vec!["data platforms".to_string()],
            ..Default::default()
        };
        let mut i = input(&c, &[]);
        i.job_description = Some(&jd);
        let with = TemplateComposer::new(TemplateId::Professional).compose_body(&i);
        assert!(with.contains("keyword-highlight"));
    }

    #[test]
    fn test_expertise_always_padded_to_six() {
        let c = CandidateData {
            first_name: "Ada".to_string(),
            ..Default::default()
        };
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &[]));
        let start = position(&body, "expertise-list");
        let items = body[start..].split("</ul>").next().unwrap().matches("<li>").count();
        assert_eq!(items, 6);
    }

    #[test]
    fn test_compose_wraps_in_document_shell() {
        let c = candidate();
        let html = TemplateComposer::new(TemplateId::Professional).compose(&input(&c, &[]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ada Lovelace - Competence File</title>"));
    }

    #[test]
    fn test_candidate_text_is_escaped() {
        let mut c = candidate();
        c.languages = vec!["<b onclick=x>German</b>".to_string()];
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&input(&c, &[]));
        assert!(body.contains("&lt;b onclick=x&gt;German"));
    }

    #[test]
    fn test_optimized_credentials_are_reconciled_before_rendering() {
        let c = candidate();
        let enriched = EnrichedContent {
            optimized_certifications: Some(vec![
                "AWS Certified Solutions Architect (2021)".to_string(),
                "CISSP 2019".to_string(),
            ]),
            optimized_education: Some(vec![
                "MSc Computer Science, ETH Zurich (2012)".to_string(),
                "PMP Certification 2018".to_string(),
            ]),
            ..Default::default()
        };
        let mut i = input(&c, &[]);
        i.enriched = Some(&enriched);
        let body = TemplateComposer::new(TemplateId::Professional).compose_body(&i);

        assert!(body.contains(
            r#"<span class="credential-title">AWS Certified Solutions Architect</span> <span class="credential-year">2021</span>"#
        ));
        assert!(body.contains(r#"<span class="credential-title">MSc Computer Science, ETH Zurich</span>"#));
        // Never declared by the candidate.
        assert!(!body.contains("CISSP"));
        // Reads like a certification, so it is not education.
        assert!(!body.contains("PMP"));
    }
}
