use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::FieldErrors;
use crate::models::answer::{AnswerValue, ResponseSet};
use crate::models::assessment::Section;
use crate::models::submission::{CategoryScores, Submission, SubmissionStatus};
use crate::utils::validation::non_blank;

/// Full assessment document as sent by clients for create and replace.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    pub id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
    #[validate(custom(function = "non_blank", message = "Assessment title is required"))]
    pub title: String,
    pub domain: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "At least one section is required"))]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluateRequest {
    pub responses: ResponseSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub visible_question_ids: Vec<String>,
    pub errors: FieldErrors,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetAnswerPayload {
    #[validate(custom(function = "non_blank"))]
    pub question_id: String,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub assessment_id: String,
    pub candidate_id: String,
    pub responses: ResponseSet,
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
    pub visible_question_ids: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    #[validate(custom(function = "non_blank"))]
    pub candidate_id: String,
    /// Falls back to the stored draft when absent.
    pub responses: Option<ResponseSet>,
    pub category_scores: Option<CategoryScores>,
    pub time_spent: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmissionQuery {
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    #[serde(flatten)]
    pub submission: Submission,
    pub qualified: bool,
}
