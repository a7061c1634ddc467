//! Escaping helpers shared by every fragment builder.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags that markdown-bearing content may carry through to the document.
static ALLOWED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^</?(?:p|br|ul|ol|li|strong|em|b|i|u|span|h[1-6])(?:\s+(?:class|style)="[^"<>]*")*\s*/?>"#,
    )
    .expect("allowed-tag pattern is valid")
});

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes every `<` that does not open a whitelisted formatting tag.
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find('<') {
        out.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        match ALLOWED_TAG.find(candidate) {
            Some(m) => {
                out.push_str(m.as_str());
                rest = &candidate[m.end()..];
            }
            None => {
                out.push_str("&lt;");
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Splits markup into `(is_tag, slice)` runs so text can be rewritten without touching tags.
pub fn split_tags(markup: &str) -> Vec<(bool, &str)> {
    let mut parts = Vec::new();
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        if start > 0 {
            parts.push((false, &rest[..start]));
        }
        match rest[start..].find('>') {
            Some(end) => {
                parts.push((true, &rest[start..start + end + 1]));
                rest = &rest[start + end + 1..];
            }
            None => {
                parts.push((false, &rest[start..]));
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        parts.push((false, rest));
    }
    parts
}
