// Competence file generation.
// Implements: client extraction, content gating, bounded AI enrichment, the end-to-end pipeline.
// All LLM calls go through llm_client; rendering and storage sit behind traits.

pub mod batch;
pub mod client_info;
pub mod content_gate;
pub mod enrichment;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
