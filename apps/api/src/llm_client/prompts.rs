// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Common instruction appended to every enrichment prompt.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate profile below. \
    Do NOT invent employers, dates, certifications, degrees or metrics. \
    If the profile does not support a claim, leave it out.";
