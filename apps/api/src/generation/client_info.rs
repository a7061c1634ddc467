//! Client Info Extractor: pattern-based employer and role detection from a job description.
//!
//! Pure function of its input. Used for filenames and document metadata only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::candidate::JobDescription;

pub const UNKNOWN_CLIENT: &str = "Unknown Client";
pub const UNKNOWN_POSITION: &str = "Unknown Position";

/// Employer and role resolved once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub client: String,
    pub job_title: String,
}

/// A run of capitalized words on one line, allowing `&`, `-`, `.` and digits inside words.
const NAME: &str = r"[A-Z][A-Za-z0-9&'\.\-]*(?:[ \t]+(?:&[ \t]+)?[A-Z][A-Za-z0-9&'\.\-]*){0,4}";

/// Employer patterns, tried in order. Capture group 1 is the name.
static CLIENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "Company: Acme Corp" / "Client - Acme"
        format!(r"(?m)^\s*(?:Company|Client|Employer|Organi[sz]ation)\s*[:\-]\s*({NAME})"),
        // "Acme Corp is hiring" / "Acme is looking for"
        format!(
            r"\b({NAME})\s+(?:is|are)\s+(?:currently\s+)?(?:hiring|looking\s+for|seeking|recruiting|searching\s+for)\b"
        ),
        // legal-entity suffixes
        format!(
            r"\b({NAME}\s+(?:Inc\.?|Ltd\.?|LLC|GmbH|S\.A\.|SA|SAS|AG|Corp\.?|Corporation|PLC|plc|BV|NV|SARL|Limited))(?:\W|$)"
        ),
        // "Acme is a leading bank"
        format!(
            r"\b({NAME})\s+is\s+an?\s+(?:(?:leading|global|international|major|growing|innovative|well-known)\s+)*(?:bank|company|firm|provider|insurer|consultancy|agency|startup|scale-up|organi[sz]ation|retailer|manufacturer|group|player|leader)\b"
        ),
        // "join Acme" / "at Acme,"
        format!(r"\b(?:[Jj]oin|[Aa]t)\s+({NAME})"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("client pattern is valid"))
    .collect()
});

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^\s*(?:Job\s+Title|Title|Position|Role)\s*[:\-]\s*([^\n]{2,80})",
        r"(?:hiring|looking\s+for|seeking|recruiting)\s+(?:an?\s+|the\s+)?((?:[A-Z][\w/+#\.\-]*)(?:[ \t]+[A-Z][\w/+#\.\-]*){0,5})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("title pattern is valid"))
    .collect()
});

const LEADING_ARTICLES: &[&str] = &["The ", "A ", "An "];

/// Organizational units that trail an employer name ("Acme Data Team").
const TRAILING_UNITS: &[&str] = &[
    "Team", "Teams", "Department", "Dept", "Division", "Unit", "Office", "Practice", "Squad", "Tribe",
];

/// Words that the capitalized-run patterns catch but are never employers.
const NOT_EMPLOYERS: &[&str] = &[
    "We", "Our", "You", "They", "This", "Job", "Role", "Position", "Company", "Client", "About",
];

/// Fallback scan list. Matching is a case-insensitive substring test, first entry wins.
pub const KNOWN_EMPLOYERS: &[&str] = &[
    "Google",
    "Microsoft",
    "Amazon",
    "Apple",
    "IBM",
    "Accenture",
    "Deloitte",
    "Capgemini",
    "McKinsey",
    "KPMG",
    "PwC",
    "BNP Paribas",
    "Société Générale",
    "Crédit Agricole",
    "Airbus",
    "Thales",
    "TotalEnergies",
    "Siemens",
    "Nestlé",
    "Novartis",
    "Roche",
    "HSBC",
    "Barclays",
    "JPMorgan",
    "Goldman Sachs",
    "Salesforce",
    "Netflix",
    "Spotify",
];

/// Resolves `{client, job_title}` from an optional job description. Never fails.
pub fn extract_client_info(jd: Option<&JobDescription>) -> ClientInfo {
    let Some(jd) = jd else {
        return ClientInfo {
            client: UNKNOWN_CLIENT.to_string(),
            job_title: UNKNOWN_POSITION.to_string(),
        };
    };

    ClientInfo {
        client: extract_client(jd).unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
        job_title: extract_job_title(jd).unwrap_or_else(|| UNKNOWN_POSITION.to_string()),
    }
}

fn extract_client(jd: &JobDescription) -> Option<String> {
    if let Some(company) = non_blank(jd.company.as_deref()) {
        return Some(company.to_string());
    }

    for pattern in CLIENT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&jd.description) {
            if let Some(name) = caps.get(1).and_then(|m| clean_client_name(m.as_str())) {
                return Some(name);
            }
        }
    }

    let haystack = [
        jd.description.as_str(),
        &jd.requirements.join(" "),
        &jd.responsibilities.join(" "),
    ]
    .join(" ")
    .to_lowercase();

    KNOWN_EMPLOYERS
        .iter()
        .find(|name| haystack.contains(&name.to_lowercase()))
        .map(|name| name.to_string())
}

fn extract_job_title(jd: &JobDescription) -> Option<String> {
    if let Some(title) = non_blank(jd.title.as_deref()) {
        return Some(title.to_string());
    }
    TITLE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(&jd.description)
            .and_then(|caps| caps.get(1))
            .and_then(|m| non_blank(Some(m.as_str().trim_end_matches(['.', ',', ';']))))
            .map(str::to_string)
    })
}

/// Strips leading articles and trailing unit nouns. Returns `None` when nothing usable is left.
fn clean_client_name(raw: &str) -> Option<String> {
    let mut name = raw.trim().trim_end_matches([',', ';', ':']).trim();

    for article in LEADING_ARTICLES {
        if let Some(rest) = name.strip_prefix(article) {
            name = rest.trim_start();
            break;
        }
    }

    loop {
        let Some((head, last)) = name.rsplit_once(char::is_whitespace) else {
            break;
        };
        if TRAILING_UNITS.iter().any(|u| u.eq_ignore_ascii_case(last)) {
            name = head.trim_end();
        } else {
            break;
        }
    }

    let name = name.trim();
    if name.is_empty() || NOT_EMPLOYERS.contains(&name) || TRAILING_UNITS.contains(&name) {
        return None;
    }
    Some(name.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jd_text(text: &str) -> JobDescription {
        JobDescription {
            description: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_job_description_yields_defaults() {
        let info = extract_client_info(None);
        assert_eq!(info.client, UNKNOWN_CLIENT);
        assert_eq!(info.job_title, UNKNOWN_POSITION);
    }

    #[test]
    fn test_explicit_company_wins_verbatim_after_trim() {
        let jd = JobDescription {
            description: "Google is hiring".to_string(),
            company: Some("  the Acme data team ".to_string()),
            ..Default::default()
        };
        assert_eq!(extract_client_info(Some(&jd)).client, "the Acme data team");
    }

    #[test]
    fn test_blank_company_falls_through_to_patterns() {
        let jd = JobDescription {
            description: "Northwind Traders is hiring a Data Engineer.".to_string(),
            company: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(extract_client_info(Some(&jd)).client, "Northwind Traders");
    }

    #[test]
    fn test_labelled_company_line() {
        let jd = jd_text("Position: Senior Architect\nClient: Contoso Retail\nLocation: Paris");
        let info = extract_client_info(Some(&jd));
        assert_eq!(info.client, "Contoso Retail");
        assert_eq!(info.job_title, "Senior Architect");
    }

    #[test]
    fn test_hiring_verb_pattern() {
        let jd = jd_text("Fabrikam Digital is looking for a Cloud Engineer to join us.");
        let info = extract_client_info(Some(&jd));
        assert_eq!(info.client, "Fabrikam Digital");
        assert_eq!(info.job_title, "Cloud Engineer");
    }

    #[test]
    fn test_legal_suffix_pattern() {
        let jd = jd_text("You will work for Globex Holdings GmbH on payment systems.");
        assert_eq!(extract_client_info(Some(&jd)).client, "Globex Holdings GmbH");
    }

    #[test]
    fn test_industry_noun_pattern_strips_article() {
        let jd = jd_text("The Riverside Mutual is a leading insurer in Belgium.");
        assert_eq!(extract_client_info(Some(&jd)).client, "Riverside Mutual");
    }

    #[test]
    fn test_trailing_unit_nouns_stripped() {
        let jd = jd_text("Join Initech Platform Team and build APIs.");
        assert_eq!(extract_client_info(Some(&jd)).client, "Initech Platform");
    }

    #[test]
    fn test_pronoun_subjects_are_not_employers() {
        let jd = jd_text("We are hiring engineers who love Rust.");
        assert_eq!(extract_client_info(Some(&jd)).client, UNKNOWN_CLIENT);
    }

    #[test]
    fn test_known_employer_any_casing() {
        let jd = jd_text("strong background in payments, ideally from a bank like bnp paribas or similar");
        assert_eq!(extract_client_info(Some(&jd)).client, "BNP Paribas");
    }

    #[test]
    fn test_known_employer_found_in_requirements() {
        let jd = JobDescription {
            description: "backend work on payments".to_string(),
            requirements: vec!["experience with netflix-scale streaming".to_string()],
            ..Default::default()
        };
        assert_eq!(extract_client_info(Some(&jd)).client, "Netflix");
    }

    #[test]
    fn test_explicit_title_wins() {
        let jd = JobDescription {
            description: "Acme is hiring a Rust Developer".to_string(),
            title: Some(" Staff Engineer ".to_string()),
            ..Default::default()
        };
        assert_eq!(extract_client_info(Some(&jd)).job_title, "Staff Engineer");
    }

    #[test]
    fn test_unresolved_title_defaults() {
        let jd = jd_text("some text without any structure");
        let info = extract_client_info(Some(&jd));
        assert_eq!(info.client, UNKNOWN_CLIENT);
        assert_eq!(info.job_title, UNKNOWN_POSITION);
    }
}
