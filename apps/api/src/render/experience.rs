//! Work history → two markup fragments: a compact overview list and detailed per-role blocks.
//!
//! Structured enriched entries (naming a role or employer) replace the raw history.
//! Narrative-only enriched entries never replace it; they are shown as an overview
//! paragraph above the raw roles.

use crate::models::candidate::ExperienceItem;
use crate::models::enriched::{EnrichedExperience, TextOrList};
use crate::transform::{escape_html, inline_markdown, markdown_to_html, Highlighter};

const PERIOD_SEPARATOR: &str = " - ";
const OPEN_ENDED: &str = "Present";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceFragments {
    pub summary_list: String,
    pub detailed_blocks: String,
}

impl ExperienceFragments {
    pub fn is_empty(&self) -> bool {
        self.summary_list.is_empty() && self.detailed_blocks.is_empty()
    }
}

/// Source-independent view of one role.
#[derive(Debug, Default)]
struct RoleView {
    company: String,
    title: String,
    period: Option<String>,
    description: Option<String>,
    responsibilities: Vec<String>,
    achievements: Vec<String>,
    technical_environment: Vec<String>,
}

impl RoleView {
    fn is_empty(&self) -> bool {
        self.company.is_empty()
            && self.title.is_empty()
            && self.description.is_none()
            && self.responsibilities.is_empty()
            && self.achievements.is_empty()
            && self.technical_environment.is_empty()
    }
}

impl From<&ExperienceItem> for RoleView {
    fn from(item: &ExperienceItem) -> Self {
        RoleView {
            company: item.company.trim().to_string(),
            title: item.title.trim().to_string(),
            period: format_period(None, item.start_date.as_deref(), item.end_date.as_deref()),
            description: None,
            responsibilities: item
                .responsibilities
                .as_deref()
                .map(split_items)
                .unwrap_or_default(),
            achievements: Vec::new(),
            technical_environment: Vec::new(),
        }
    }
}

impl From<&EnrichedExperience> for RoleView {
    fn from(entry: &EnrichedExperience) -> Self {
        RoleView {
            company: entry.company.as_deref().unwrap_or("").trim().to_string(),
            title: entry.title.as_deref().unwrap_or("").trim().to_string(),
            period: format_period(
                entry.period.as_deref(),
                entry.start_date.as_deref(),
                entry.end_date.as_deref(),
            ),
            description: entry
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            responsibilities: list_items(entry.responsibilities.as_ref()),
            achievements: list_items(entry.achievements.as_ref()),
            technical_environment: list_items(entry.technical_environment.as_ref()),
        }
    }
}

/// Explicit period when given, else "start - end", else "start - Present".
pub fn format_period(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> Option<String> {
    fn clean(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    if let Some(period) = clean(period) {
        return Some(period.to_string());
    }
    match (clean(start), clean(end)) {
        (Some(start), Some(end)) => Some(format!("{start}{PERIOD_SEPARATOR}{end}")),
        (Some(start), None) => Some(format!("{start}{PERIOD_SEPARATOR}{OPEN_ENDED}")),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    }
}

/// Splits free text into list items on `;`, newlines and sentence-ending periods.
///
/// A period only ends an item when followed by whitespace or the end of text,
/// so "Node.js" stays whole. Leading bullet markers are dropped, as are empty items.
pub fn split_items(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let boundary = match c {
            ';' | '\n' => true,
            '.' => chars.peek().map_or(true, |next| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            push_item(&mut items, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_item(&mut items, &current);
    items
}

fn push_item(items: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    let item = ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .unwrap_or(trimmed)
        .trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
}

/// List fields arrive either as a list or as free text.
pub fn list_items(field: Option<&TextOrList>) -> Vec<String> {
    match field {
        Some(TextOrList::List(list)) => list
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(TextOrList::Text(text)) => split_items(text),
        None => Vec::new(),
    }
}

/// Renders the work history, preferring structured enriched entries over raw items.
pub fn render_experience(
    raw: &[ExperienceItem],
    enriched: Option<&[EnrichedExperience]>,
    highlighter: &Highlighter,
) -> ExperienceFragments {
    let enriched = enriched.unwrap_or_default();
    let structured: Vec<RoleView> = enriched
        .iter()
        .filter(|e| e.is_structured())
        .map(RoleView::from)
        .collect();

    if !structured.is_empty() {
        return render_roles(&structured, None, highlighter);
    }

    let narrative = enriched
        .iter()
        .filter_map(|e| e.description.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    let roles: Vec<RoleView> = raw.iter().map(RoleView::from).collect();
    let narrative = (!narrative.is_empty()).then_some(narrative);
    render_roles(&roles, narrative.as_deref(), highlighter)
}

fn render_roles(roles: &[RoleView], narrative: Option<&str>, highlighter: &Highlighter) -> ExperienceFragments {
    let roles: Vec<&RoleView> = roles.iter().filter(|r| !r.is_empty()).collect();

    let summary_list = if roles.is_empty() {
        String::new()
    } else {
        let items: String = roles.iter().map(|r| overview_item(r)).collect();
        format!("<ul class=\"experience-overview\">{items}</ul>")
    };

    let mut detailed_blocks = String::new();
    if let Some(narrative) = narrative {
        detailed_blocks.push_str(&format!(
            "<div class=\"experience-narrative\">{}</div>",
            highlighter.apply(&markdown_to_html(narrative))
        ));
    }
    for role in &roles {
        detailed_blocks.push_str(&role_block(role, highlighter));
    }

    ExperienceFragments {
        summary_list,
        detailed_blocks,
    }
}

fn overview_item(role: &RoleView) -> String {
    let mut line = String::from("<li>");
    if !role.title.is_empty() {
        line.push_str(&format!("<strong>{}</strong>", escape_html(&role.title)));
    }
    if !role.company.is_empty() {
        if !role.title.is_empty() {
            line.push_str(", ");
        }
        line.push_str(&escape_html(&role.company));
    }
    if let Some(period) = &role.period {
        line.push_str(&format!(" <span class=\"period\">{}</span>", escape_html(period)));
    }
    line.push_str("</li>");
    line
}

fn role_block(role: &RoleView, highlighter: &Highlighter) -> String {
    let mut html = String::from("<div class=\"role\"><div class=\"role-header\">");
    if !role.title.is_empty() {
        html.push_str(&format!("<h3 class=\"role-title\">{}</h3>", escape_html(&role.title)));
    }
    if !role.company.is_empty() {
        html.push_str(&format!("<span class=\"role-company\">{}</span>", escape_html(&role.company)));
    }
    if let Some(period) = &role.period {
        html.push_str(&format!("<span class=\"period\">{}</span>", escape_html(period)));
    }
    html.push_str("</div>");

    if let Some(description) = &role.description {
        html.push_str(&highlighter.apply(&markdown_to_html(description)));
    }
    html.push_str(&sub_section("Responsibilities", &role.responsibilities, highlighter));
    html.push_str(&sub_section("Key Achievements", &role.achievements, highlighter));
    html.push_str(&sub_section("Technical Environment", &role.technical_environment, highlighter));
    html.push_str("</div>");
    html
}

/// Empty when there are no items: no heading without content.
fn sub_section(heading: &str, items: &[String], highlighter: &Highlighter) -> String {
    if items.is_empty() {
        return String::new();
    }
    let list: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", highlighter.apply(&inline_markdown(item))))
        .collect();
    format!("<h4>{heading}</h4><ul>{list}</ul>")
}
