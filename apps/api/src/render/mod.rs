// Document composition: template variants, experience fragments and the HTML shell.
// Everything here is synchronous and pure; the PDF step lives in `export`.

pub mod composer;
pub mod document;
pub mod experience;
pub mod variants;

pub use composer::{CompositionInput, TemplateComposer};
pub use document::inject_preview_banner;
