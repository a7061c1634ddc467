//! Skill categorization driven by ordered rule tables.
//!
//! Each table is scanned top to bottom and a skill joins the first category
//! whose keywords it matches. Every table ends in a catch-all, so the union
//! of the emitted categories is always the deduplicated input.

use std::collections::HashSet;

use serde::Serialize;

/// One row of a categorization table.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
}

pub const FUNCTIONAL_CATCH_ALL: &str = "Professional Skills";
pub const TECHNICAL_CATCH_ALL: &str = "Tools & Technologies";
/// Single bucket used when no specific technical rule matched anything.
pub const TECHNICAL_GENERAL: &str = "Technical Skills";

pub const FUNCTIONAL_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "Leadership & Management",
        keywords: &[
            "lead", "manag", "mentor", "coach", "supervis", "direct", "team building",
            "people", "delegat", "governance", "budget", "stakeholder",
        ],
    },
    CategoryRule {
        category: "Communication & Collaboration",
        keywords: &[
            "communicat", "collaborat", "present", "negotiat", "facilitat", "writing",
            "public speaking", "interpersonal", "teamwork", "relationship", "client",
        ],
    },
    CategoryRule {
        category: "Problem Solving & Analysis",
        keywords: &[
            "problem", "analy", "critical thinking", "troubleshoot", "research", "decision",
            "root cause", "quantitative", "debug", "requirements",
        ],
    },
    CategoryRule {
        category: "Innovation & Strategy",
        keywords: &[
            "strateg", "innovat", "transformation", "vision", "roadmap", "planning",
            "change management", "business development", "product", "design thinking",
        ],
    },
];

pub const TECHNICAL_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "Frameworks & Libraries",
        keywords: &[
            "react", "angular", "vue", "next.js", "node.js", "django", "flask", "spring",
            "rails", ".net", "express", "tokio", "axum", "actix", "tensorflow", "pytorch",
            "pandas", "numpy", "laravel", "svelte", "fastapi", "hibernate", "jquery",
        ],
    },
    CategoryRule {
        category: "Databases & Storage",
        keywords: &[
            "sql", "postgres", "mysql", "mariadb", "oracle", "mongo", "redis", "cassandra",
            "dynamodb", "elasticsearch", "sqlite", "snowflake", "bigquery", "database",
            "neo4j", "kafka", "s3",
        ],
    },
    CategoryRule {
        category: "Cloud & DevOps",
        keywords: &[
            "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "k8s", "terraform",
            "ansible", "jenkins", "ci/cd", "gitlab", "github actions", "helm", "devops",
            "linux", "cloud", "openshift", "prometheus", "grafana",
        ],
    },
    CategoryRule {
        category: "Programming Languages",
        keywords: &[
            "rust", "python", "java", "javascript", "typescript", "c++", "c#", "golang", "go",
            "ruby", "php", "kotlin", "swift", "scala", "perl", "haskell", "elixir", "r",
            "c", "cobol", "bash", "shell", "matlab", "dart", "lua", "fortran",
        ],
    },
];

/// Order technical categories are shown in. Rule order above only decides
/// precedence ("Ruby on Rails" is a framework before it is a language).
pub const TECHNICAL_DISPLAY_ORDER: &[&str] = &[
    "Programming Languages",
    "Frameworks & Libraries",
    "Databases & Storage",
    "Cloud & DevOps",
    TECHNICAL_CATCH_ALL,
];

/// Members of one emitted category, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Column hint for a rendered skill list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnLayout {
    Single,
    Two,
    Three,
}

impl ColumnLayout {
    pub fn for_count(count: usize) -> Self {
        if count >= 15 {
            ColumnLayout::Three
        } else if count >= 8 {
            ColumnLayout::Two
        } else {
            ColumnLayout::Single
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ColumnLayout::Single => "cols-1",
            ColumnLayout::Two => "cols-2",
            ColumnLayout::Three => "cols-3",
        }
    }
}

impl SkillCategory {
    pub fn layout(&self) -> ColumnLayout {
        ColumnLayout::for_count(self.skills.len())
    }
}

/// Trims, drops blanks and removes case-insensitive duplicates, keeping first occurrences.
pub fn dedup_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Keywords of three characters or fewer must equal a whole token of the skill
/// ("go" matches "Go" but not "MongoDB"); longer keywords match as substrings.
pub fn matches_keyword(skill_lower: &str, keyword: &str) -> bool {
    if keyword.chars().count() <= 3 {
        skill_lower
            .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '.'))
            .any(|token| token.trim_end_matches('.') == keyword)
    } else {
        skill_lower.contains(keyword)
    }
}

/// Index of the first rule whose keywords match `skill`.
pub fn classify(skill: &str, rules: &[CategoryRule]) -> Option<usize> {
    let lower = skill.to_lowercase();
    rules
        .iter()
        .position(|rule| rule.keywords.iter().any(|k| matches_keyword(&lower, k)))
}

fn categorize(skills: &[String], rules: &[CategoryRule], catch_all: &str) -> (Vec<SkillCategory>, usize) {
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); rules.len() + 1];
    let mut matched = 0;
    for skill in dedup_skills(skills) {
        match classify(&skill, rules) {
            Some(idx) => {
                matched += 1;
                buckets[idx].push(skill);
            }
            None => buckets[rules.len()].push(skill),
        }
    }

    let names = rules.iter().map(|r| r.category).chain(std::iter::once(catch_all));
    let categories = names
        .zip(buckets)
        .filter(|(_, members)| !members.is_empty())
        .map(|(name, members)| SkillCategory {
            name: name.to_string(),
            skills: members,
        })
        .collect();
    (categories, matched)
}

/// Leadership, communication, problem-solving and strategy buckets plus a catch-all.
pub fn categorize_functional(skills: &[String]) -> Vec<SkillCategory> {
    categorize(skills, FUNCTIONAL_RULES, FUNCTIONAL_CATCH_ALL).0
}

/// Language, framework, storage and cloud buckets plus a catch-all.
/// When no specific rule matches any skill, everything lands in one general category.
pub fn categorize_technical(skills: &[String]) -> Vec<SkillCategory> {
    let (mut categories, matched) = categorize(skills, TECHNICAL_RULES, TECHNICAL_CATCH_ALL);
    if matched == 0 {
        let all = dedup_skills(skills);
        if all.is_empty() {
            return Vec::new();
        }
        return vec![SkillCategory {
            name: TECHNICAL_GENERAL.to_string(),
            skills: all,
        }];
    }
    categories.sort_by_key(|c| {
        TECHNICAL_DISPLAY_ORDER
            .iter()
            .position(|name| *name == c.name)
            .unwrap_or(TECHNICAL_DISPLAY_ORDER.len())
    });
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn union(categories: &[SkillCategory]) -> HashSet<String> {
        categories.iter().flat_map(|c| c.skills.iter().cloned()).collect()
    }

    #[test]
    fn test_technical_categories() {
        let skills = strings(&["Rust", "React", "PostgreSQL", "AWS", "Jira"]);
        let cats = categorize_technical(&skills);
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Programming Languages",
                "Frameworks & Libraries",
                "Databases & Storage",
                "Cloud & DevOps",
                TECHNICAL_CATCH_ALL,
            ]
        );
        assert_eq!(cats.last().unwrap().skills, strings(&["Jira"]));
    }

    #[test]
    fn test_technical_without_matches_is_one_general_category() {
        let skills = strings(&["Jira", "Confluence", "Visio"]);
        let cats = categorize_technical(&skills);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, TECHNICAL_GENERAL);
        assert_eq!(cats[0].skills, skills);
    }

    #[test]
    fn test_short_keywords_match_whole_tokens_only() {
        assert_eq!(classify("MongoDB", TECHNICAL_RULES), Some(1));
        assert_eq!(classify("Go", TECHNICAL_RULES), Some(3));
        assert_eq!(classify("R", TECHNICAL_RULES), Some(3));
        assert_eq!(classify("Ruby on Rails", TECHNICAL_RULES), Some(0));
    }

    #[test]
    fn test_javascript_is_a_language_not_java_substring_confusion() {
        let cats = categorize_technical(&strings(&["JavaScript", "Java"]));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "Programming Languages");
        assert_eq!(cats[0].skills, strings(&["JavaScript", "Java"]));
    }

    #[test]
    fn test_functional_categories() {
        let skills = strings(&[
            "Team Leadership",
            "Stakeholder communication",
            "Data analysis",
            "Digital transformation",
            "Rust",
        ]);
        let cats = categorize_functional(&skills);
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Leadership & Management",
                "Problem Solving & Analysis",
                "Innovation & Strategy",
                FUNCTIONAL_CATCH_ALL,
            ]
        );
        // "Stakeholder communication" hits the leadership row first.
        assert_eq!(cats[0].skills, strings(&["Team Leadership", "Stakeholder communication"]));
    }

    #[test]
    fn test_union_equals_deduplicated_input() {
        let skills = strings(&["Rust", "rust", " ", "", "Kafka", "Negotiation", "Jira", "Mentoring"]);
        let expected: HashSet<String> = dedup_skills(&skills).into_iter().collect();
        assert_eq!(union(&categorize_functional(&skills)), expected);
        assert_eq!(union(&categorize_technical(&skills)), expected);
        assert_eq!(expected.len(), 5);
    }

    #[test]
    fn test_empty_categories_not_emitted() {
        let cats = categorize_functional(&strings(&["Mentoring"]));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "Leadership & Management");
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(categorize_technical(&[]).is_empty());
        assert!(categorize_functional(&[]).is_empty());
    }

    #[test]
    fn test_column_layout_thresholds() {
        assert_eq!(ColumnLayout::for_count(7), ColumnLayout::Single);
        assert_eq!(ColumnLayout::for_count(8), ColumnLayout::Two);
        assert_eq!(ColumnLayout::for_count(14), ColumnLayout::Two);
        assert_eq!(ColumnLayout::for_count(15), ColumnLayout::Three);
    }

    #[test]
    fn test_languages_shown_first_even_when_listed_last() {
        let cats = categorize_technical(&strings(&["Docker", "Django", "Python"]));
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Programming Languages", "Frameworks & Libraries", "Cloud & DevOps"]
        );
        // Precedence still follows the rule table.
        assert_eq!(classify("Ruby on Rails", TECHNICAL_RULES), Some(0));
    }
}
