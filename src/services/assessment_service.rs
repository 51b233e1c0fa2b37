use async_trait::async_trait;

use crate::database::document_store::{Collection, DocumentStore};
use crate::dto::assessment_dto::AssessmentPayload;
use crate::error::{Error, Result};
use crate::models::assessment::Assessment;
use crate::services::builder_service::AssessmentSink;
use crate::utils::{ids, time::now};

#[derive(Clone)]
pub struct AssessmentService {
    store: DocumentStore,
}

impl AssessmentService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// The earliest stored assessment for the job, if any.
    pub async fn get_by_job(&self, job_id: &str) -> Result<Option<Assessment>> {
        let assessments: Vec<Assessment> = self.store.all(Collection::Assessments).await?;
        Ok(assessments.into_iter().find(|a| a.job_id == job_id))
    }

    pub async fn require_by_job(&self, job_id: &str) -> Result<Assessment> {
        self.get_by_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No assessment for job {}", job_id)))
    }

    pub async fn create(&self, payload: AssessmentPayload) -> Result<Assessment> {
        let job_id = payload
            .job_id
            .clone()
            .filter(|j| !j.trim().is_empty())
            .ok_or_else(|| Error::InvalidField {
                field: "jobId".to_string(),
                message: "jobId is required".to_string(),
            })?;
        let timestamp = now();
        let assessment = Assessment {
            id: payload.id.unwrap_or_else(ids::new_id),
            job_id,
            title: payload.title,
            domain: payload.domain,
            sections: payload.sections,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.insert(assessment).await
    }

    /// Full replace of the job's assessment. The path job id wins over the
    /// body, and so does the stored assessment's id: the document served by
    /// [`get_by_job`](Self::get_by_job) is the one overwritten, keeping its
    /// `createdAt`. With nothing stored yet the body is inserted as new.
    pub async fn replace(&self, job_id: &str, payload: AssessmentPayload) -> Result<Assessment> {
        let timestamp = now();
        match self.get_by_job(job_id).await? {
            Some(current) => {
                if payload.id.as_deref().is_some_and(|id| id != current.id) {
                    tracing::debug!(
                        job_id,
                        assessment_id = %current.id,
                        "ignoring body id on assessment replace"
                    );
                }
                let assessment = Assessment {
                    id: current.id,
                    job_id: job_id.to_string(),
                    title: payload.title,
                    domain: payload.domain,
                    sections: payload.sections,
                    created_at: current.created_at,
                    updated_at: timestamp,
                };
                self.store
                    .put(Collection::Assessments, &assessment.id, &assessment)
                    .await?;
                Ok(assessment)
            }
            None => {
                self.insert(Assessment {
                    id: payload.id.unwrap_or_else(ids::new_id),
                    job_id: job_id.to_string(),
                    title: payload.title,
                    domain: payload.domain,
                    sections: payload.sections,
                    created_at: timestamp,
                    updated_at: timestamp,
                })
                .await
            }
        }
    }

    pub async fn insert(&self, assessment: Assessment) -> Result<Assessment> {
        self.store
            .insert(Collection::Assessments, &assessment.id, &assessment)
            .await?;
        tracing::info!(
            assessment_id = %assessment.id,
            job_id = %assessment.job_id,
            sections = assessment.sections.len(),
            "assessment created"
        );
        Ok(assessment)
    }
}

#[async_trait]
impl AssessmentSink for AssessmentService {
    async fn create_assessment(&self, assessment: Assessment) -> Result<Assessment> {
        self.insert(assessment).await
    }
}
