pub mod candidate;
pub mod document;
pub mod enriched;
pub mod section;
