use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::assessment_dto::{SubmissionQuery, SubmissionResult},
    error::{Error, Result},
    services::grading_service::GradingService,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/submissions",
    params(
        ("jobId" = Option<String>, Query, description = "Only submissions for this job")
    ),
    responses(
        (status = 200, description = "Stored submissions")
    )
)]
#[axum::debug_handler]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<SubmissionQuery>,
) -> Result<impl IntoResponse> {
    let submissions = state
        .submission_service
        .list(query.job_id.as_deref())
        .await?;
    Ok(Json(submissions))
}

#[utoipa::path(
    get,
    path = "/api/submissions/{candidate_id}",
    params(
        ("candidate_id" = String, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Submission with qualification verdict", body = SubmissionResult),
        (status = 404, description = "Candidate has not submitted")
    )
)]
#[axum::debug_handler]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<impl IntoResponse> {
    let submission = state
        .submission_service
        .find_by_candidate(&candidate_id)
        .await?
        .ok_or_else(|| Error::NotFound("Submission not found".to_string()))?;
    let qualified = GradingService::is_qualified(&submission.scores);
    Ok(Json(SubmissionResult {
        submission,
        qualified,
    }))
}
