use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::candidate_dto::{CandidateListQuery, UpdateCandidatePayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or email"),
        ("stage" = Option<String>, Query, description = "Pipeline stage"),
        ("jobId" = Option<String>, Query, description = "Only candidates for this job"),
        ("page" = Option<usize>, Query, description = "Page number, from 1"),
        ("pageSize" = Option<usize>, Query, description = "Items per page, default 50")
    ),
    responses(
        (status = 200, description = "Page of candidates, newest first")
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse> {
    let page = state.candidate_service.list(query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = String, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate found", body = Candidate),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_by_id(&id).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    patch,
    path = "/api/candidates/{id}",
    params(
        ("id" = String, Path, description = "Candidate ID")
    ),
    request_body = UpdateCandidatePayload,
    responses(
        (status = 200, description = "Candidate updated", body = Candidate),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.update(&id, payload).await?;
    Ok(Json(candidate))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/timeline",
    params(
        ("id" = String, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Timeline events, oldest first")
    )
)]
#[axum::debug_handler]
pub async fn candidate_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let events = state.candidate_service.timeline(&id).await?;
    Ok(Json(events))
}
