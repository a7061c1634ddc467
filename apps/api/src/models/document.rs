use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::candidate::{CandidateData, JobDescription, ManagerContact};
use crate::models::section::Section;

/// Requested export format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Final printable document, rendered to PDF.
    #[default]
    Document,
    /// Editable markup; never rendered and never enriched.
    Draft,
}

/// Format of the artifact actually produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    Pdf,
    Html,
}

impl ArtifactFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Pdf => "pdf",
            ArtifactFormat::Html => "html",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ArtifactFormat::Pdf => "application/pdf",
            ArtifactFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.extension()
    }
}

/// Everything needed to re-compose a stored document for preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub candidate: CandidateData,
    pub template: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub job_description: Option<JobDescription>,
    #[serde(default)]
    pub manager_contact: Option<ManagerContact>,
}

/// Metadata record for a generated competence file.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub template: String,
    pub filename: String,
    pub format: String,
    pub artifact_url: String,
    pub client: String,
    pub job_title: String,
    pub enriched: bool,
    pub snapshot: Value,
    pub created_at: DateTime<Utc>,
}

/// Values for a new document record. The id is chosen up front so the artifact
/// key can carry it; the store assigns the timestamp.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub template: String,
    pub filename: String,
    pub format: ArtifactFormat,
    pub artifact_url: String,
    pub client: String,
    pub job_title: String,
    pub enriched: bool,
    pub snapshot: DocumentSnapshot,
}
