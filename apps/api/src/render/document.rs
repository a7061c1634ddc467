//! HTML5 document shell around a composed body, with a stylesheet generated from the theme.

use crate::render::variants::{HeaderStyle, Theme};
use crate::transform::escape_html;

pub const PREVIEW_BANNER_TEXT: &str = "Preview: not the exported document";

/// Wraps a composed body in a complete, print-ready HTML5 document.
pub fn wrap_document(title: &str, theme: &Theme, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n\
         <main class=\"competence-file\">\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
        css = stylesheet(theme),
    )
}

/// Inserts the preview banner right after the opening `<body>` tag.
///
/// Markup without a body tag gets the banner prepended.
pub fn inject_preview_banner(html: &str) -> String {
    let banner = format!(
        "\n<div class=\"preview-banner\" role=\"note\">{PREVIEW_BANNER_TEXT}</div>"
    );
    match find_body_open(html) {
        Some(end) => {
            let mut out = String::with_capacity(html.len() + banner.len());
            out.push_str(&html[..end]);
            out.push_str(&banner);
            out.push_str(&html[end..]);
            out
        }
        None => format!("{}{html}", banner.trim_start()),
    }
}

/// Byte offset just past the `<body ...>` opening tag.
fn find_body_open(html: &str) -> Option<usize> {
    let lower = html.to_ascii_lowercase();
    let start = lower
        .match_indices("<body")
        .map(|(i, _)| i)
        .find(|&i| matches!(lower.as_bytes().get(i + 5), Some(b'>' | b' ' | b'\t' | b'\n' | b'\r')))?;
    lower[start..].find('>').map(|offset| start + offset + 1)
}

fn stylesheet(theme: &Theme) -> String {
    let header = match theme.header_style {
        HeaderStyle::Plain => format!(
            ".doc-header {{ border-bottom: 3px solid {accent}; padding-bottom: 12px; margin-bottom: 20px; }}\n\
             .doc-header .candidate-name {{ color: {accent}; }}\n",
            accent = theme.accent
        ),
        HeaderStyle::Banner => format!(
            ".doc-header {{ background: {accent}; color: #ffffff; padding: 24px 28px; margin: -24px -28px 24px; \
             border-bottom: 6px solid {secondary}; }}\n\
             .doc-header .candidate-name, .doc-header .headline, .doc-header .header-meta {{ color: #ffffff; }}\n",
            accent = theme.accent,
            secondary = theme.secondary
        ),
    };

    format!(
        "@page {{ size: A4; margin: 18mm 16mm; }}\n\
         body {{ font-family: {body_font}; color: {text}; font-size: 10.5pt; line-height: 1.45; margin: 0; }}\n\
         .competence-file {{ padding: 24px 28px; }}\n\
         h1, h2, h3, h4 {{ font-family: {heading_font}; margin: 0 0 6px; }}\n\
         .candidate-name {{ font-size: 24pt; }}\n\
         .headline {{ font-size: 13pt; color: {secondary}; margin: 4px 0; }}\n\
         .header-meta, .manager-contact {{ color: {muted}; font-size: 9.5pt; margin: 2px 0; }}\n\
         {header}\
         .block {{ margin-bottom: 18px; page-break-inside: avoid; }}\n\
         .block > h2 {{ color: {accent}; font-size: 13pt; text-transform: uppercase; letter-spacing: 0.04em; \
         border-bottom: 1px solid {secondary}; padding-bottom: 3px; }}\n\
         .value-proposition {{ border-left: 4px solid {secondary}; background: #f7f7f7; padding: 10px 14px; \
         margin-bottom: 18px; }}\n\
         .skill-category h3 {{ font-size: 10.5pt; color: {secondary}; }}\n\
         .skill-list, .expertise-list {{ margin: 0 0 8px; padding-left: 18px; }}\n\
         .cols-1 {{ column-count: 1; }}\n\
         .cols-2 {{ column-count: 2; column-gap: 24px; }}\n\
         .cols-3 {{ column-count: 3; column-gap: 18px; }}\n\
         .credential-year, .period {{ color: {muted}; font-size: 9.5pt; }}\n\
         .experience-overview {{ padding-left: 18px; }}\n\
         .role {{ margin-bottom: 14px; page-break-inside: avoid; }}\n\
         .role-header {{ display: flex; gap: 12px; align-items: baseline; flex-wrap: wrap; }}\n\
         .role-title {{ font-size: 11pt; color: {accent}; }}\n\
         .role-company {{ font-weight: 600; }}\n\
         .role h4 {{ font-size: 10pt; color: {muted}; margin-top: 6px; }}\n\
         .to-be-provided {{ color: {muted}; font-style: italic; }}\n\
         .preview-banner {{ background: #fff3cd; color: #664d03; border-bottom: 1px solid #ffe69c; \
         padding: 8px 16px; font-weight: 600; text-align: center; }}\n\
         @media print {{ .preview-banner {{ display: none; }} }}\n",
        body_font = theme.body_font,
        heading_font = theme.heading_font,
        text = theme.text,
        accent = theme.accent,
        secondary = theme.secondary,
        muted = theme.muted,
        header = header,
    )
}
