use std::sync::Arc;

use crate::database::local_storage::LocalStorage;
use crate::dto::assessment_dto::{DraftView, EvaluateResponse, SetAnswerPayload, SubmitPayload};
use crate::error::{Error, Result};
use crate::models::answer::ResponseSet;
use crate::models::assessment::Assessment;
use crate::models::response_draft::ResponseDraft;
use crate::models::submission::{Submission, SubmissionStatus};
use crate::services::assessment_service::AssessmentService;
use crate::services::grading_service::GradingService;
use crate::services::job_service::JobService;
use crate::services::notification_service::{NotificationLevel, Notifier};
use crate::services::submission_service::SubmissionService;
use crate::services::validation_service::ValidationService;
use crate::services::visibility_service::VisibilityService;
use crate::utils::{ids, time::now};

pub fn draft_key(assessment_id: &str, candidate_id: &str) -> String {
    format!("assessment-responses-{}:{}", assessment_id, candidate_id)
}

/// Drives a candidate through an assessment: drafts, evaluation and the final
/// submission.
#[derive(Clone)]
pub struct ResponseService {
    storage: LocalStorage,
    assessments: AssessmentService,
    jobs: JobService,
    submissions: SubmissionService,
    notifier: Arc<dyn Notifier>,
}

impl ResponseService {
    pub fn new(
        storage: LocalStorage,
        assessments: AssessmentService,
        jobs: JobService,
        submissions: SubmissionService,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            assessments,
            jobs,
            submissions,
            notifier,
        }
    }

    pub fn evaluate(assessment: &Assessment, responses: &ResponseSet) -> EvaluateResponse {
        let errors = ValidationService::validate_all(assessment, responses);
        EvaluateResponse {
            visible_question_ids: VisibilityService::visible_question_ids(assessment, responses),
            valid: errors.is_empty(),
            errors,
        }
    }

    pub async fn load_draft(&self, job_id: &str, candidate_id: &str) -> Result<DraftView> {
        let assessment = self.assessments.require_by_job(job_id).await?;
        let draft = self.read_draft(&assessment.id, candidate_id).await?;
        Ok(view(&assessment, candidate_id, draft))
    }

    pub async fn set_answer(
        &self,
        job_id: &str,
        candidate_id: &str,
        payload: SetAnswerPayload,
    ) -> Result<DraftView> {
        let assessment = self.assessments.require_by_job(job_id).await?;
        if assessment.find_question(&payload.question_id).is_none() {
            return Err(Error::InvalidField {
                field: "questionId".to_string(),
                message: format!("Unknown question {}", payload.question_id),
            });
        }

        let mut draft = self.read_draft(&assessment.id, candidate_id).await?;
        draft.set_answer(&payload.question_id, payload.value, now())?;
        self.storage
            .set_json(&draft_key(&assessment.id, candidate_id), &draft)
            .await?;
        Ok(view(&assessment, candidate_id, draft))
    }

    /// Validates and records a submission. On failure the errors are kept on
    /// the draft so the candidate sees them on reload.
    pub async fn submit(&self, job_id: &str, payload: SubmitPayload) -> Result<Submission> {
        let assessment = self.assessments.require_by_job(job_id).await?;
        let key = draft_key(&assessment.id, &payload.candidate_id);
        let mut draft = self.read_draft(&assessment.id, &payload.candidate_id).await?;
        if !draft.status.can_transition_to(SubmissionStatus::Completed) {
            self.notifier
                .notify(NotificationLevel::Error, "Failed to submit assessment");
            return Err(Error::Conflict(format!(
                "Candidate {} has already submitted this assessment",
                payload.candidate_id
            )));
        }
        let responses = payload.responses.unwrap_or_else(|| draft.responses.clone());

        let errors = ValidationService::validate_all(&assessment, &responses);
        if !errors.is_empty() {
            tracing::info!(
                job_id,
                candidate_id = %payload.candidate_id,
                invalid = errors.len(),
                "submission rejected by validation"
            );
            draft.responses = responses;
            draft.errors = errors.clone();
            draft.updated_at = Some(now());
            self.storage.set_json(&key, &draft).await?;
            return Err(Error::InvalidResponses(errors));
        }

        let scores = match payload.category_scores {
            Some(categories) => GradingService::score(categories)?,
            None => {
                let department = match self.jobs.get_by_id(job_id).await {
                    Ok(job) => job.department,
                    Err(Error::NotFound(_)) => None,
                    Err(e) => return Err(e),
                };
                GradingService::synthetic_scores(department.as_deref(), &mut rand::thread_rng())
            }
        };

        let submission = Submission {
            id: ids::new_id(),
            candidate_id: payload.candidate_id.clone(),
            job_id: job_id.to_string(),
            assessment_id: Some(assessment.id.clone()),
            responses,
            scores,
            time_spent: payload.time_spent.unwrap_or(0),
            submitted_at: now(),
            status: SubmissionStatus::Completed,
            evaluated_by: None,
            evaluated_at: None,
        };

        let stored = match self.submissions.record(submission).await {
            Ok(stored) => stored,
            Err(e) => {
                self.notifier
                    .notify(NotificationLevel::Error, "Failed to submit assessment");
                return Err(e);
            }
        };

        draft.complete(stored.responses.clone(), now())?;
        self.storage.set_json(&key, &draft).await?;
        self.notifier
            .notify(NotificationLevel::Success, "Assessment submitted successfully!");
        tracing::info!(
            job_id,
            candidate_id = %stored.candidate_id,
            overall = stored.scores.overall(),
            qualified = GradingService::is_qualified(&stored.scores),
            "assessment submitted"
        );
        Ok(stored)
    }

    async fn read_draft(&self, assessment_id: &str, candidate_id: &str) -> Result<ResponseDraft> {
        Ok(self
            .storage
            .get_json(&draft_key(assessment_id, candidate_id))
            .await?
            .unwrap_or_default())
    }
}

fn view(assessment: &Assessment, candidate_id: &str, draft: ResponseDraft) -> DraftView {
    DraftView {
        assessment_id: assessment.id.clone(),
        candidate_id: candidate_id.to_string(),
        visible_question_ids: VisibilityService::visible_question_ids(assessment, &draft.responses),
        responses: draft.responses,
        errors: draft.errors,
        status: draft.status,
        updated_at: draft.updated_at,
    }
}
