//! Persistence collaborator: candidate records, document metadata and artifact upload.
//!
//! PostgreSQL holds candidates and documents; artifacts go to S3 (MinIO locally)
//! under `competence-files/{candidate_id}/{document_id}/{filename}`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::export::Artifact;
use crate::models::candidate::CandidateData;
use crate::models::document::{DocumentRow, NewDocument};

const ARTIFACT_PREFIX: &str = "competence-files";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("artifact upload failed: {0}")]
    Upload(String),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Existing candidate id by id, then email, then name pair; otherwise a new record.
    async fn resolve_candidate(&self, candidate: &CandidateData) -> Result<Uuid, StoreError>;

    /// Uploads the artifact and returns its public URL.
    async fn upload_artifact(
        &self,
        candidate_id: Uuid,
        document_id: Uuid,
        filename: &str,
        artifact: &Artifact,
    ) -> Result<String, StoreError>;

    async fn create_document(&self, document: NewDocument) -> Result<DocumentRow, StoreError>;

    async fn get_document(&self, id: Uuid) -> Result<Option<DocumentRow>, StoreError>;
}

/// One step of the candidate lookup, tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateLookup {
    Id(Uuid),
    Email(String),
    Name { first: String, last: String },
}

/// Lookup steps the candidate's fields allow, in priority order.
pub fn lookup_plan(candidate: &CandidateData) -> Vec<CandidateLookup> {
    let mut plan = Vec::new();
    if let Some(id) = candidate.id {
        plan.push(CandidateLookup::Id(id));
    }
    if let Some(email) = candidate.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        plan.push(CandidateLookup::Email(email.to_lowercase()));
    }
    let (first, last) = (candidate.first_name.trim(), candidate.last_name.trim());
    if !first.is_empty() && !last.is_empty() {
        plan.push(CandidateLookup::Name {
            first: first.to_string(),
            last: last.to_string(),
        });
    }
    plan
}

pub fn artifact_key(candidate_id: Uuid, document_id: Uuid, filename: &str) -> String {
    format!("{ARTIFACT_PREFIX}/{candidate_id}/{document_id}/{filename}")
}

pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

/// PostgreSQL + S3 implementation.
pub struct PgDocumentStore {
    db: PgPool,
    s3: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl PgDocumentStore {
    pub fn new(db: PgPool, s3: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            db,
            s3,
            bucket,
            public_base_url,
        }
    }

    async fn find_candidate(&self, lookup: &CandidateLookup) -> Result<Option<Uuid>, StoreError> {
        let found = match lookup {
            CandidateLookup::Id(id) => {
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM candidates WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?
            }
            CandidateLookup::Email(email) => {
                sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM candidates WHERE lower(email) = $1 ORDER BY created_at LIMIT 1",
                )
                .bind(email)
                .fetch_optional(&self.db)
                .await?
            }
            CandidateLookup::Name { first, last } => {
                sqlx::query_scalar::<_, Uuid>(
                    r#"
                    SELECT id FROM candidates
                    WHERE lower(first_name) = lower($1) AND lower(last_name) = lower($2)
                    ORDER BY created_at
                    LIMIT 1
                    "#,
                )
                .bind(first)
                .bind(last)
                .fetch_optional(&self.db)
                .await?
            }
        };
        Ok(found)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn resolve_candidate(&self, candidate: &CandidateData) -> Result<Uuid, StoreError> {
        for lookup in lookup_plan(candidate) {
            if let Some(id) = self.find_candidate(&lookup).await? {
                info!("Resolved candidate {id} via {lookup:?}");
                return Ok(id);
            }
        }

        let id = candidate.id.unwrap_or_else(Uuid::new_v4);
        sqlx::query(
            r#"
            INSERT INTO candidates (id, first_name, last_name, email, phone, title, location)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(candidate.first_name.trim())
        .bind(candidate.last_name.trim())
        .bind(candidate.email.as_deref().map(str::trim))
        .bind(candidate.phone.as_deref())
        .bind(candidate.title.as_deref())
        .bind(candidate.location.as_deref())
        .execute(&self.db)
        .await?;

        info!("Created candidate {id}");
        Ok(id)
    }

    async fn upload_artifact(
        &self,
        candidate_id: Uuid,
        document_id: Uuid,
        filename: &str,
        artifact: &Artifact,
    ) -> Result<String, StoreError> {
        let key = artifact_key(candidate_id, document_id, filename);
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(artifact.bytes.clone()))
            .content_type(artifact.format.content_type())
            .send()
            .await
            .map_err(|e| StoreError::Upload(e.to_string()))?;

        info!("Uploaded artifact to s3://{}/{}", self.bucket, key);
        Ok(public_url(&self.public_base_url, &key))
    }

    async fn create_document(&self, document: NewDocument) -> Result<DocumentRow, StoreError> {
        let snapshot = serde_json::to_value(&document.snapshot)?;
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            INSERT INTO competence_documents
                (id, candidate_id, template, filename, format, artifact_url,
                 client, job_title, enriched, snapshot)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(document.id)
        .bind(document.candidate_id)
        .bind(&document.template)
        .bind(&document.filename)
        .bind(document.format.as_str())
        .bind(&document.artifact_url)
        .bind(&document.client)
        .bind(&document.job_title)
        .bind(document.enriched)
        .bind(&snapshot)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn get_document(&self, id: Uuid) -> Result<Option<DocumentRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, DocumentRow>("SELECT * FROM competence_documents WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?,
        )
    }
}
