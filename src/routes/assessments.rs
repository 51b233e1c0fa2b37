use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::assessment_dto::{AssessmentPayload, EvaluateRequest, SetAnswerPayload, SubmitPayload},
    error::Result,
    services::response_service::ResponseService,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/assessments/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "The job's assessment, or null", body = Assessment)
    )
)]
#[axum::debug_handler]
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse> {
    let assessment = state.assessment_service.get_by_job(&job_id).await?;
    Ok(Json(assessment))
}

#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = AssessmentPayload,
    responses(
        (status = 201, description = "Assessment created", body = Assessment),
        (status = 400, description = "Missing title, sections or jobId"),
        (status = 409, description = "An assessment with this id exists")
    )
)]
#[axum::debug_handler]
pub async fn create_assessment(
    State(state): State<AppState>,
    Json(payload): Json<AssessmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let assessment = state.assessment_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(assessment)))
}

#[utoipa::path(
    put,
    path = "/api/assessments/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    request_body = AssessmentPayload,
    responses(
        (status = 200, description = "Assessment replaced", body = Assessment),
        (status = 400, description = "Missing title or sections"),
        (status = 409, description = "Body id belongs to another assessment")
    )
)]
#[axum::debug_handler]
pub async fn replace_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<AssessmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let assessment = state.assessment_service.replace(&job_id, payload).await?;
    Ok(Json(assessment))
}

#[utoipa::path(
    post,
    path = "/api/assessments/{job_id}/evaluate",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Visible questions and validation errors", body = EvaluateResponse),
        (status = 404, description = "No assessment for the job")
    )
)]
#[axum::debug_handler]
pub async fn evaluate_responses(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<EvaluateRequest>,
) -> Result<impl IntoResponse> {
    let assessment = state.assessment_service.require_by_job(&job_id).await?;
    Ok(Json(ResponseService::evaluate(&assessment, &payload.responses)))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{job_id}/responses/{candidate_id}",
    params(
        ("job_id" = String, Path, description = "Job ID"),
        ("candidate_id" = String, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Saved draft", body = DraftView),
        (status = 404, description = "No assessment for the job")
    )
)]
#[axum::debug_handler]
pub async fn get_draft(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let draft = state.response_service.load_draft(&job_id, &candidate_id).await?;
    Ok(Json(draft))
}

#[utoipa::path(
    patch,
    path = "/api/assessments/{job_id}/responses/{candidate_id}",
    params(
        ("job_id" = String, Path, description = "Job ID"),
        ("candidate_id" = String, Path, description = "Candidate ID")
    ),
    request_body = SetAnswerPayload,
    responses(
        (status = 200, description = "Draft after the answer was stored", body = DraftView),
        (status = 400, description = "Unknown question"),
        (status = 404, description = "No assessment for the job"),
        (status = 409, description = "Assessment already submitted")
    )
)]
#[axum::debug_handler]
pub async fn set_answer(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    Json(payload): Json<SetAnswerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let draft = state
        .response_service
        .set_answer(&job_id, &candidate_id, payload)
        .await?;
    Ok(Json(draft))
}

#[utoipa::path(
    post,
    path = "/api/assessments/{job_id}/submit",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    request_body = SubmitPayload,
    responses(
        (status = 201, description = "Submission recorded", body = Submission),
        (status = 400, description = "Answers failed validation"),
        (status = 404, description = "No assessment for the job"),
        (status = 409, description = "Candidate already submitted")
    )
)]
#[axum::debug_handler]
pub async fn submit_assessment(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(payload): Json<SubmitPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let submission = state.response_service.submit(&job_id, payload).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}
