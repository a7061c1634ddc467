//! Document Generation Pipeline: orchestrates one competence file end to end.
//!
//! Flow: validate → extract client info → content gate → (skip or enrich) →
//!       merge enhanced summary → compose → export (raw-markup fallback) →
//!       resolve candidate → upload → record → respond.
//!
//! Asymmetry kept on purpose: a renderer failure degrades to raw markup and the
//! request still succeeds, while an enrichment failure is fatal and produces nothing.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{export_with_fallback, Artifact, DocumentRenderer};
use crate::generation::client_info::{extract_client_info, ClientInfo};
use crate::generation::content_gate::decide;
use crate::generation::enrichment::EnrichmentOrchestrator;
use crate::models::candidate::{CandidateData, JobDescription, ManagerContact};
use crate::models::document::{ArtifactFormat, DocumentSnapshot, NewDocument, OutputFormat};
use crate::models::enriched::EnrichedContent;
use crate::models::section::Section;
use crate::render::{inject_preview_banner, CompositionInput, TemplateComposer};
use crate::storage::DocumentStore;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "ANTHROPIC_API_KEY is not configured. \
    AI enrichment is required because no section content was supplied.";

const FILENAME_SUFFIX: &str = "Competence_File";

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub candidate: CandidateData,
    pub template: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub job_description: Option<JobDescription>,
    #[serde(default)]
    pub manager_contact: Option<ManagerContact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub document_id: Uuid,
    pub url: String,
    pub filename: String,
    pub format: ArtifactFormat,
    pub client: String,
    pub job_title: String,
    pub enriched: bool,
}

/// Rejects malformed requests before any pipeline stage runs.
pub fn validate(request: &GenerateRequest) -> Result<(), AppError> {
    if request.candidate.full_name().is_empty() {
        return Err(AppError::Validation(
            "candidate must have a first or last name".to_string(),
        ));
    }
    if request.template.trim().is_empty() {
        return Err(AppError::Validation("template cannot be empty".to_string()));
    }

    let mut ids = HashSet::new();
    for section in &request.sections {
        let id = section.id.trim();
        if id.is_empty() {
            return Err(AppError::Validation("section id cannot be empty".to_string()));
        }
        if !ids.insert(id) {
            return Err(AppError::Validation(format!("duplicate section id '{id}'")));
        }
    }
    Ok(())
}

/// Keeps alphanumeric characters only.
pub fn sanitize_filename_part(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// `{Name}_{Client}_Competence_File.{ext}`
pub fn build_filename(candidate: &CandidateData, client: &str, format: ArtifactFormat) -> String {
    let name = match sanitize_filename_part(&candidate.full_name()) {
        n if n.is_empty() => "Candidate".to_string(),
        n => n,
    };
    let client = match sanitize_filename_part(client) {
        c if c.is_empty() => "Client".to_string(),
        c => c,
    };
    format!("{name}_{client}_{FILENAME_SUFFIX}.{}", format.extension())
}

pub struct DocumentPipeline {
    store: Arc<dyn DocumentStore>,
    renderer: Arc<dyn DocumentRenderer>,
    /// `None` when no AI credential is configured.
    enrichment: Option<EnrichmentOrchestrator>,
}

impl DocumentPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        renderer: Arc<dyn DocumentRenderer>,
        enrichment: Option<EnrichmentOrchestrator>,
    ) -> Self {
        Self {
            store,
            renderer,
            enrichment,
        }
    }

    /// Runs the generate operation.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, AppError> {
        validate(&request)?;

        let client_info = extract_client_info(request.job_description.as_ref());
        info!(
            "Generating competence file for '{}': client='{}', role='{}'",
            request.candidate.full_name(),
            client_info.client,
            client_info.job_title
        );

        let gate = decide(&request.sections, request.format);
        info!(
            "Content gate: contentful_sections={}, enrichment_required={}",
            gate.has_contentful_sections, gate.enrichment_required
        );

        let enriched = if gate.enrichment_required {
            let orchestrator = self
                .enrichment
                .as_ref()
                .ok_or_else(|| AppError::Configuration(MISSING_CREDENTIAL_MESSAGE.to_string()))?;
            Some(
                orchestrator
                    .enrich(&request.candidate, request.job_description.as_ref())
                    .await?,
            )
        } else {
            None
        };

        let composer = TemplateComposer::for_template(&request.template);
        let html = compose(&composer, &request, enriched.as_ref());

        let target = match request.format {
            OutputFormat::Document => ArtifactFormat::Pdf,
            OutputFormat::Draft => ArtifactFormat::Html,
        };
        let artifact = export_with_fallback(self.renderer.as_ref(), &html, target).await;
        if artifact.format != target {
            warn!("Requested {:?} but delivering {:?}", target, artifact.format);
        }

        self.persist(request, composer, client_info, artifact, enriched.is_some())
            .await
    }

    async fn persist(
        &self,
        request: GenerateRequest,
        composer: TemplateComposer,
        client_info: ClientInfo,
        artifact: Artifact,
        enriched: bool,
    ) -> Result<GenerateResponse, AppError> {
        let candidate_id = self.store.resolve_candidate(&request.candidate).await?;
        let document_id = Uuid::new_v4();
        let filename = build_filename(&request.candidate, &client_info.client, artifact.format);

        let url = self
            .store
            .upload_artifact(candidate_id, document_id, &filename, &artifact)
            .await?;

        let template = composer.template_id().to_string();
        let row = self
            .store
            .create_document(NewDocument {
                id: document_id,
                candidate_id,
                template: template.clone(),
                filename: filename.clone(),
                format: artifact.format,
                artifact_url: url.clone(),
                client: client_info.client.clone(),
                job_title: client_info.job_title.clone(),
                enriched,
                snapshot: DocumentSnapshot {
                    candidate: request.candidate,
                    template,
                    sections: request.sections,
                    job_description: request.job_description,
                    manager_contact: request.manager_contact,
                },
            })
            .await?;

        info!("Stored competence file {} ({})", row.id, filename);

        Ok(GenerateResponse {
            success: true,
            document_id: row.id,
            url,
            filename,
            format: artifact.format,
            client: client_info.client,
            job_title: client_info.job_title,
            enriched,
        })
    }

    /// Re-composes a stored document with a preview banner.
    ///
    /// Enrichment is best effort here: any failure is logged and the preview
    /// falls back to raw data. Nothing is rendered, uploaded or stored.
    pub async fn preview(&self, document_id: Uuid) -> Result<String, AppError> {
        let row = self
            .store
            .get_document(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))?;

        let snapshot: DocumentSnapshot = serde_json::from_value(row.snapshot).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Stored snapshot for {document_id} is unreadable: {e}"
            ))
        })?;

        let gate = decide(&snapshot.sections, OutputFormat::Document);
        let enriched = match (&self.enrichment, gate.enrichment_required) {
            (Some(orchestrator), true) => orchestrator
                .enrich(&snapshot.candidate, snapshot.job_description.as_ref())
                .await
                .map_err(|e| warn!("Preview enrichment for {document_id} skipped: {e}"))
                .ok(),
            (None, true) => {
                warn!("Preview enrichment for {document_id} skipped: no AI credential");
                None
            }
            (_, false) => None,
        };

        let request = GenerateRequest {
            candidate: snapshot.candidate,
            template: snapshot.template,
            sections: snapshot.sections,
            format: OutputFormat::Document,
            job_description: snapshot.job_description,
            manager_contact: snapshot.manager_contact,
        };
        let composer = TemplateComposer::for_template(&request.template);
        let html = compose(&composer, &request, enriched.as_ref());
        Ok(inject_preview_banner(&html))
    }
}

/// Merges the enhanced summary into a copy of the candidate and composes the document.
fn compose(
    composer: &TemplateComposer,
    request: &GenerateRequest,
    enriched: Option<&EnrichedContent>,
) -> String {
    let mut candidate = request.candidate.clone();
    if let Some(enriched) = enriched {
        enriched.merge_into(&mut candidate);
    }
    composer.compose(&CompositionInput {
        candidate: &candidate,
        enriched,
        sections: &request.sections,
        job_description: request.job_description.as_ref(),
        manager_contact: request.manager_contact.as_ref(),
    })
}
