// All LLM prompt constants for the enrichment tasks.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt shared by all enrichment tasks.
pub const ENRICHMENT_SYSTEM: &str = "You are an expert consultant profile writer preparing \
    competence files that present candidates to clients. \
    Write in a confident, factual, third-person professional register. \
    Respond with the requested content only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations, headings or apologies.";

/// Professional summary prompt.
/// Replace: {factual_instruction}, {candidate_json}, {job_context}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{factual_instruction}

CANDIDATE PROFILE:
{candidate_json}

{job_context}

Write a professional summary of 3 to 5 sentences for this candidate's competence file.
Lead with seniority and core domain, then the strongest evidence from the experience history,
then what the candidate brings to the target role when one is given.
Return plain text only."#;

/// Technical skills prompt. The reply must be one comma-separated line.
/// Replace: {factual_instruction}, {candidate_json}, {job_context}
pub const TECHNICAL_SKILLS_PROMPT_TEMPLATE: &str = r#"{factual_instruction}

CANDIDATE PROFILE:
{candidate_json}

{job_context}

List the candidate's technical skills: languages, frameworks, databases, cloud platforms and tools.
Use canonical product spelling (e.g. "PostgreSQL", "Kubernetes", "Node.js").
Put skills that match the target role first. Do not add skills absent from the profile.
Return ONE line of comma-separated skills and nothing else."#;

/// Experience narrative prompt.
/// Replace: {factual_instruction}, {candidate_json}, {job_context}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"{factual_instruction}

CANDIDATE PROFILE:
{candidate_json}

{job_context}

Write a short narrative (one paragraph, at most 120 words) describing the candidate's career
trajectory across the experience entries above: scope, progression, industries and recurring
achievements. Emphasize what is relevant to the target role when one is given.
Return plain text only."#;

/// Job context block. Replace: {job_json}
pub const JOB_CONTEXT_TEMPLATE: &str = r#"TARGET ROLE (use only to choose emphasis, never as a source of facts about the candidate):
{job_json}"#;

/// Used when the request carries no job description.
pub const NO_JOB_CONTEXT: &str = "TARGET ROLE: not specified. Write for a general client audience.";
