use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::Stage;
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateListQuery {
    pub search: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    #[validate(custom(function = "non_blank"))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(range(max = 100))]
    pub assessment_score: Option<u32>,
    pub rejection_reason: Option<String>,
    pub resume: Option<String>,
    pub phone: Option<String>,
    pub experience: Option<u32>,
    /// Attached to the timeline event when the stage changes.
    pub note: Option<String>,
    /// Full replacement of the candidate's notes.
    pub notes: Option<Vec<NotePayload>>,
}

/// A note as sent by clients. Mentions are always re-derived from `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub id: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
