//! Markdown-like normalization of free text into document markup.
//!
//! Supported: `**bold**`, `* item` bullet lines (also `-` and `•`), `*emphasis*`,
//! blank-line paragraph breaks and single-newline line breaks. Anything else is
//! plain text. Raw markup outside a small formatting whitelist is escaped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::transform::html::sanitize_markup;

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*\n]+?)\*\*").expect("bold pattern is valid"));
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+?)\*").expect("emphasis pattern is valid"));
static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[*•\-]\s+(.+)$").expect("bullet pattern is valid"));
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph pattern is valid"));
static BLOCK_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^<(?:p|ul|ol|div|h[1-6]|table|blockquote)[\s>]")
        .expect("block-start pattern is valid")
});
static BLOCK_ANYWHERE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:p|ul|ol|div|h[1-6]|table|blockquote)[\s>]")
        .expect("block pattern is valid")
});

/// Converts markdown-like text to block markup. Blank input yields an empty string.
///
/// Output that is already free of markdown markers normalizes to itself.
pub fn markdown_to_html(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let text = sanitize_markup(text);
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");

    let mut blocks: Vec<String> = Vec::new();
    for paragraph in PARAGRAPH_BREAK.split(&text) {
        render_paragraph(paragraph, &mut blocks);
    }

    let html = blocks.concat();
    if BLOCK_ANYWHERE.is_match(&html) {
        html
    } else {
        format!("<p>{html}</p>")
    }
}

/// Inline-only variant for list items and table cells: bold and emphasis, no blocks.
pub fn inline_markdown(text: &str) -> String {
    let text = sanitize_markup(text.trim());
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    EMPHASIS.replace_all(&text, "<em>$1</em>").into_owned()
}

fn render_paragraph(paragraph: &str, out: &mut Vec<String>) {
    let mut items: Vec<String> = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for line in paragraph.lines() {
        // Bullets are pulled out before emphasis so `* item` never turns into `<em>`.
        if let Some(caps) = BULLET.captures(line) {
            flush_lines(&mut lines, out);
            items.push(emphasize(caps[1].trim()));
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        flush_items(&mut items, out);
        lines.push(emphasize(line));
    }

    flush_lines(&mut lines, out);
    flush_items(&mut items, out);
}

fn emphasize(text: &str) -> String {
    EMPHASIS.replace_all(text, "<em>$1</em>").into_owned()
}

fn flush_lines(lines: &mut Vec<String>, out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join("<br>");
    lines.clear();
    if BLOCK_START.is_match(&joined) {
        out.push(joined);
    } else {
        out.push(format!("<p>{joined}</p>"));
    }
}

fn flush_items(items: &mut Vec<String>, out: &mut Vec<String>) {
    if items.is_empty() {
        return;
    }
    let lis: String = items.iter().map(|i| format!("<li>{i}</li>")).collect();
    items.clear();
    out.push(format!("<ul>{lis}</ul>"));
}
