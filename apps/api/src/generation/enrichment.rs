//! Enrichment Orchestrator: fans the fixed AI task set out over a bounded worker pool.
//!
//! Flow: build three tasks (summary, technical skills, experience) sharing one session id →
//!       run_batch with the shared deadline → require at least one success →
//!       map each successful output into its `EnrichedContent` field.
//!
//! Zero successes is fatal. A document is either fully caller-authored or carries
//! at least one AI contribution; placeholder content is never substituted.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::batch::{run_batch, BatchConfig, TaskOutcome};
use crate::generation::prompts::{
    ENRICHMENT_SYSTEM, EXPERIENCE_PROMPT_TEMPLATE, JOB_CONTEXT_TEMPLATE, NO_JOB_CONTEXT,
    SUMMARY_PROMPT_TEMPLATE, TECHNICAL_SKILLS_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::FACTUAL_INSTRUCTION;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::candidate::{CandidateData, JobDescription};
use crate::models::enriched::{CategorizedSkills, EnrichedContent, EnrichedExperience};

/// Successful tasks needed for the batch to count.
const MIN_SUCCESSFUL_TASKS: usize = 1;

// ────────────────────────────────────────────────────────────────────────────
// Task model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnrichmentSection {
    Summary,
    TechnicalSkills,
    Experience,
}

impl EnrichmentSection {
    pub const ALL: [EnrichmentSection; 3] = [
        EnrichmentSection::Summary,
        EnrichmentSection::TechnicalSkills,
        EnrichmentSection::Experience,
    ];
}

impl fmt::Display for EnrichmentSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnrichmentSection::Summary => "summary",
            EnrichmentSection::TechnicalSkills => "technical-skills",
            EnrichmentSection::Experience => "experience",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Generate,
}

/// Read-only snapshot shared by every task of one run.
#[derive(Debug, Clone)]
pub struct EnrichmentInput {
    pub candidate: CandidateData,
    pub job_description: Option<JobDescription>,
}

/// One unit of AI work. Created per run, discarded after aggregation.
#[derive(Debug, Clone)]
pub struct EnrichmentTask {
    pub section: EnrichmentSection,
    pub input: Arc<EnrichmentInput>,
    pub kind: TaskKind,
    pub correlation_id: Uuid,
    pub session_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Provider seam
// ────────────────────────────────────────────────────────────────────────────

/// Produces the raw text output for one enrichment task.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn generate(&self, task: &EnrichmentTask) -> Result<String, LlmError>;
}

/// Production provider backed by the single `LlmClient`.
pub struct LlmEnrichmentProvider {
    llm: LlmClient,
}

impl LlmEnrichmentProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl EnrichmentProvider for LlmEnrichmentProvider {
    async fn generate(&self, task: &EnrichmentTask) -> Result<String, LlmError> {
        let prompt = build_prompt(task);
        self.llm.call_text(&prompt, ENRICHMENT_SYSTEM).await
    }
}

/// Fills the section's template with the candidate snapshot and job context.
pub fn build_prompt(task: &EnrichmentTask) -> String {
    let template = match task.section {
        EnrichmentSection::Summary => SUMMARY_PROMPT_TEMPLATE,
        EnrichmentSection::TechnicalSkills => TECHNICAL_SKILLS_PROMPT_TEMPLATE,
        EnrichmentSection::Experience => EXPERIENCE_PROMPT_TEMPLATE,
    };

    let candidate = &task.input.candidate;
    // Contact details stay out of the prompt.
    let candidate_json = serde_json::to_string_pretty(&serde_json::json!({
        "name": candidate.full_name(),
        "title": candidate.title,
        "years_of_experience": candidate.years_of_experience,
        "summary": candidate.summary,
        "skills": candidate.skills,
        "certifications": candidate.certifications,
        "education": candidate.education,
        "languages": candidate.languages,
        "experience": candidate.experience,
    }))
    .unwrap_or_default();

    let job_context = match &task.input.job_description {
        Some(jd) => JOB_CONTEXT_TEMPLATE.replace(
            "{job_json}",
            &serde_json::to_string_pretty(jd).unwrap_or_default(),
        ),
        None => NO_JOB_CONTEXT.to_string(),
    };

    template
        .replace("{factual_instruction}", FACTUAL_INSTRUCTION)
        .replace("{candidate_json}", &candidate_json)
        .replace("{job_context}", &job_context)
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct EnrichmentOrchestrator {
    provider: Arc<dyn EnrichmentProvider>,
    config: BatchConfig,
}

impl EnrichmentOrchestrator {
    pub fn new(provider: Arc<dyn EnrichmentProvider>, config: BatchConfig) -> Self {
        Self { provider, config }
    }

    /// The fixed task set for one run, all sharing `session_id`.
    pub fn build_tasks(
        candidate: &CandidateData,
        job_description: Option<&JobDescription>,
        session_id: Uuid,
    ) -> Vec<EnrichmentTask> {
        let input = Arc::new(EnrichmentInput {
            candidate: candidate.clone(),
            job_description: job_description.cloned(),
        });
        EnrichmentSection::ALL
            .iter()
            .map(|&section| EnrichmentTask {
                section,
                input: Arc::clone(&input),
                kind: TaskKind::Generate,
                correlation_id: Uuid::new_v4(),
                session_id,
            })
            .collect()
    }

    /// Runs the batch and aggregates successful outputs.
    ///
    /// Returns `AppError::EnrichmentFailed` when no task succeeded in time.
    pub async fn enrich(
        &self,
        candidate: &CandidateData,
        job_description: Option<&JobDescription>,
    ) -> Result<EnrichedContent, AppError> {
        let session_id = Uuid::new_v4();
        let tasks = Self::build_tasks(candidate, job_description, session_id);
        info!(
            "Starting enrichment session {} with {} tasks (max in flight {}, timeout {:?})",
            session_id,
            tasks.len(),
            self.config.max_in_flight,
            self.config.timeout
        );

        let jobs = tasks
            .into_iter()
            .map(|task| {
                let provider = Arc::clone(&self.provider);
                let section = task.section;
                let job = async move {
                    let output = provider.generate(&task).await?;
                    if output.trim().is_empty() {
                        return Err(LlmError::EmptyContent);
                    }
                    info!(
                        "Enrichment task {} ({}) completed",
                        task.correlation_id, task.section
                    );
                    Ok(output)
                };
                (section, job)
            })
            .collect::<Vec<_>>();

        let report = run_batch(jobs, self.config).await;

        for (section, outcome) in &report.outcomes {
            match outcome {
                TaskOutcome::Succeeded(_) => {}
                TaskOutcome::Failed(reason) => {
                    warn!("Enrichment session {session_id}: {section} failed: {reason}")
                }
                TaskOutcome::TimedOut => {
                    warn!("Enrichment session {session_id}: {section} timed out")
                }
            }
        }

        let report = report
            .require_successes(MIN_SUCCESSFUL_TASKS)
            .map_err(|e| AppError::EnrichmentFailed {
                detail: e.to_string(),
            })?;

        info!(
            "Enrichment session {} finished: {}/{} tasks succeeded",
            session_id,
            report.success_count(),
            report.total()
        );

        Ok(aggregate(report.into_successes()))
    }
}

/// Maps successful task outputs into their `EnrichedContent` fields.
///
/// summary → single string; technical skills → comma-split list;
/// experience → one narrative entry.
pub fn aggregate(results: impl IntoIterator<Item = (EnrichmentSection, String)>) -> EnrichedContent {
    let mut content = EnrichedContent::default();
    for (section, output) in results {
        let output = output.trim();
        match section {
            EnrichmentSection::Summary => {
                content.enhanced_summary = Some(output.to_string());
            }
            EnrichmentSection::TechnicalSkills => {
                let technical: Vec<String> = output
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if !technical.is_empty() {
                    content.categorized_skills = Some(CategorizedSkills {
                        technical,
                        ..Default::default()
                    });
                }
            }
            EnrichmentSection::Experience => {
                content.enriched_experience = Some(vec![EnrichedExperience {
                    description: Some(output.to_string()),
                    ..Default::default()
                }]);
            }
        }
    }
    content
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    /// Scripted provider: per-section reply, optional delay, call counter.
    pub(crate) struct ScriptedProvider {
        pub replies: HashMap<EnrichmentSection, Result<String, u16>>,
        pub delays: HashMap<EnrichmentSection, Duration>,
        pub calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub(crate) fn all_ok() -> Self {
            Self::with(&[
                (EnrichmentSection::Summary, Ok("Enhanced summary from AI.")),
                (EnrichmentSection::TechnicalSkills, Ok("Rust, Kubernetes, PostgreSQL")),
                (EnrichmentSection::Experience, Ok("A decade of platform work.")),
            ])
        }

        pub(crate) fn all_failing() -> Self {
            Self::with(&[
                (EnrichmentSection::Summary, Err(500)),
                (EnrichmentSection::TechnicalSkills, Err(500)),
                (EnrichmentSection::Experience, Err(503)),
            ])
        }

        pub(crate) fn with(replies: &[(EnrichmentSection, Result<&str, u16>)]) -> Self {
            Self {
                replies: replies
                    .iter()
                    .map(|(s, r)| (*s, r.map(str::to_string)))
                    .collect(),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EnrichmentProvider for ScriptedProvider {
        async fn generate(&self, task: &EnrichmentTask) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&task.section) {
                tokio::time::sleep(*delay).await;
            }
            match self.replies.get(&task.section) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(status)) => Err(LlmError::Api {
                    status: *status,
                    message: "scripted failure".to_string(),
                }),
                None => Err(LlmError::EmptyContent),
            }
        }
    }

    fn config() -> BatchConfig {
        BatchConfig {
            max_in_flight: 3,
            timeout: Duration::from_secs(90),
        }
    }

    fn candidate() -> CandidateData {
        CandidateData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            skills: vec!["Rust".to_string()],
            summary: Some("Original summary".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_tasks_share_session_and_differ_in_correlation() {
        let session = Uuid::new_v4();
        let tasks = EnrichmentOrchestrator::build_tasks(&candidate(), None, session);
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.session_id == session));
        assert!(tasks.iter().all(|t| t.kind == TaskKind::Generate));
        assert_ne!(tasks[0].correlation_id, tasks[1].correlation_id);
        let sections: Vec<EnrichmentSection> = tasks.iter().map(|t| t.section).collect();
        assert_eq!(sections, EnrichmentSection::ALL.to_vec());
    }

    #[test]
    fn test_prompt_excludes_contact_details_and_includes_job_context() {
        let jd = JobDescription {
            description: "Platform role at Contoso".to_string(),
            ..Default::default()
        };
        let tasks = EnrichmentOrchestrator::build_tasks(&candidate(), Some(&jd), Uuid::new_v4());
        let prompt = build_prompt(&tasks[0]);
        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("Platform role at Contoso"));
        assert!(!prompt.contains("ada@example.com"));
        assert!(!prompt.contains("{candidate_json}"));
    }

    #[test]
    fn test_prompt_without_job_description() {
        let tasks = EnrichmentOrchestrator::build_tasks(&candidate(), None, Uuid::new_v4());
        let prompt = build_prompt(&tasks[1]);
        assert!(prompt.contains(NO_JOB_CONTEXT));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn test_aggregate_mapping_rules() {
        let content = aggregate(vec![
            (EnrichmentSection::Summary, "  Sharp summary  ".to_string()),
            (EnrichmentSection::TechnicalSkills, "Rust, , Go ,SQL".to_string()),
            (EnrichmentSection::Experience, "Narrative".to_string()),
        ]);
        assert_eq!(content.enhanced_summary.as_deref(), Some("Sharp summary"));
        assert_eq!(
            content.categorized_skills.unwrap().technical,
            vec!["Rust".to_string(), "Go".to_string(), "SQL".to_string()]
        );
        let experience = content.enriched_experience.unwrap();
        assert_eq!(experience.len(), 1);
        assert_eq!(experience[0].description.as_deref(), Some("Narrative"));
    }

    #[tokio::test]
    async fn test_enrich_all_tasks_succeed() {
        let provider = Arc::new(ScriptedProvider::all_ok());
        let orchestrator = EnrichmentOrchestrator::new(provider.clone(), config());
        let content = orchestrator.enrich(&candidate(), None).await.unwrap();
        assert_eq!(provider.call_count(), 3);
        assert_eq!(content.enhanced_summary.as_deref(), Some("Enhanced summary from AI."));
        assert_eq!(content.categorized_skills.unwrap().technical.len(), 3);
        assert!(content.enriched_experience.is_some());
    }

    #[tokio::test]
    async fn test_enrich_partial_success_is_not_an_error() {
        let provider = Arc::new(ScriptedProvider::with(&[
            (EnrichmentSection::Summary, Err(500)),
            (EnrichmentSection::TechnicalSkills, Ok("Rust")),
            (EnrichmentSection::Experience, Err(500)),
        ]));
        let orchestrator = EnrichmentOrchestrator::new(provider, config());
        let content = orchestrator.enrich(&candidate(), None).await.unwrap();
        assert!(content.enhanced_summary.is_none());
        assert!(content.enriched_experience.is_none());
        assert_eq!(content.categorized_skills.unwrap().technical, vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn test_enrich_zero_successes_is_fatal() {
        let orchestrator =
            EnrichmentOrchestrator::new(Arc::new(ScriptedProvider::all_failing()), config());
        let err = orchestrator.enrich(&candidate(), None).await.unwrap_err();
        match err {
            AppError::EnrichmentFailed { detail } => {
                assert!(detail.contains("0 of 3"));
                assert!(detail.contains("summary"));
            }
            other => panic!("expected EnrichmentFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_output_counts_as_failure() {
        let provider = Arc::new(ScriptedProvider::with(&[
            (EnrichmentSection::Summary, Ok("   ")),
            (EnrichmentSection::TechnicalSkills, Err(500)),
            (EnrichmentSection::Experience, Err(500)),
        ]));
        let orchestrator = EnrichmentOrchestrator::new(provider, config());
        assert!(orchestrator.enrich(&candidate(), None).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_task_is_ignored_not_fatal() {
        let mut provider = ScriptedProvider::all_ok();
        provider
            .delays
            .insert(EnrichmentSection::Experience, Duration::from_secs(300));
        let orchestrator = EnrichmentOrchestrator::new(Arc::new(provider), config());
        let content = orchestrator.enrich(&candidate(), None).await.unwrap();
        assert!(content.enhanced_summary.is_some());
        assert!(content.enriched_experience.is_none());
    }
}
