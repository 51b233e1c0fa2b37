use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::JobStatus;
use crate::utils::validation::non_blank;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobSort {
    #[default]
    Order,
    Title,
    CreatedAt,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<JobSort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1), custom(function = "non_blank"))]
    pub title: String,
    pub status: Option<JobStatus>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub seniority: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub order: Option<i64>,
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1), custom(function = "non_blank"))]
    pub title: Option<String>,
    pub status: Option<JobStatus>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub seniority: Option<String>,
    pub tags: Option<Vec<String>>,
    pub archive_reason: Option<String>,
    pub applicant_count: Option<u32>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderJobPayload {
    pub from_order: Option<i64>,
    pub to_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalytics {
    pub job_id: String,
    pub total_candidates: usize,
    pub stage_counts: BTreeMap<String, usize>,
    /// Hired candidates as a whole percentage of all candidates.
    pub conversion_rate: u32,
    /// Candidates with a submission as a whole percentage of all candidates.
    pub assessment_completion: u32,
    pub average_score: Option<u32>,
}
