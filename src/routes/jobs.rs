use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery, ReorderJobPayload, ReorderResponse, UpdateJobPayload},
    error::Result,
    services::job_service::JobService,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on title or tags"),
        ("status" = Option<String>, Query, description = "active or archived"),
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("pageSize" = Option<usize>, Query, description = "Items per page, default 10"),
        ("sort" = Option<String>, Query, description = "order, title or createdAt")
    ),
    responses(
        (status = 200, description = "Page of jobs")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.list(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Job),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(&id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&id, payload).await?;
    Ok(Json(job))
}

#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/reorder",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    request_body = ReorderJobPayload,
    responses(
        (status = 200, description = "Job moved", body = ReorderResponse),
        (status = 404, description = "Job not found"),
        (status = 409, description = "fromOrder does not match the stored order")
    )
)]
#[axum::debug_handler]
pub async fn reorder_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReorderJobPayload>,
) -> Result<impl IntoResponse> {
    state.job_service.reorder(&id, payload).await?;
    Ok(Json(ReorderResponse { success: true }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/analytics",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Hiring funnel for the job", body = JobAnalytics),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn job_analytics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(&id).await?;
    let candidates = state.candidate_service.all().await?;
    let submissions = state.submission_service.list(Some(&job.id)).await?;
    Ok(Json(JobService::analytics(&job.id, &candidates, &submissions)))
}
