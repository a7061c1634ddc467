// Content transformation: pure functions over strings and lists.
// Normalization, keyword highlighting, skill categorization, credential reconciliation,
// and expertise derivation. Shared unconditionally by every template variant.

pub mod credentials;
pub mod expertise;
pub mod highlight;
pub mod html;
pub mod markdown;
pub mod skills;

pub use highlight::Highlighter;
pub use html::escape_html;
pub use markdown::{inline_markdown, markdown_to_html};
