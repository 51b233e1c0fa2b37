pub mod assessments;
pub mod candidates;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod submissions;

use axum::{
    response::Json,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;

use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        jobs::list_jobs,
        jobs::create_job,
        jobs::get_job,
        jobs::update_job,
        jobs::reorder_job,
        jobs::job_analytics,
        candidates::list_candidates,
        candidates::get_candidate,
        candidates::update_candidate,
        candidates::candidate_timeline,
        assessments::get_assessment,
        assessments::create_assessment,
        assessments::replace_assessment,
        assessments::evaluate_responses,
        assessments::get_draft,
        assessments::set_answer,
        assessments::submit_assessment,
        submissions::list_submissions,
        submissions::get_submission,
        notifications::list_notifications,
        notifications::stream_notifications,
        notifications::dismiss_notification
    ),
    info(title = "TalentFlow API")
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Every API route, bound to `state`. Cross-cutting layers are added by the
/// caller.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/:id", get(jobs::get_job).patch(jobs::update_job))
        .route("/api/jobs/:id/reorder", patch(jobs::reorder_job))
        .route("/api/jobs/:id/analytics", get(jobs::job_analytics))
        .route("/api/candidates", get(candidates::list_candidates))
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate).patch(candidates::update_candidate),
        )
        .route(
            "/api/candidates/:id/timeline",
            get(candidates::candidate_timeline),
        )
        .route("/api/assessments", post(assessments::create_assessment))
        .route(
            "/api/assessments/:job_id",
            get(assessments::get_assessment).put(assessments::replace_assessment),
        )
        .route(
            "/api/assessments/:job_id/evaluate",
            post(assessments::evaluate_responses),
        )
        .route(
            "/api/assessments/:job_id/responses/:candidate_id",
            get(assessments::get_draft).patch(assessments::set_answer),
        )
        .route(
            "/api/assessments/:job_id/submit",
            post(assessments::submit_assessment),
        )
        .route("/api/submissions", get(submissions::list_submissions))
        .route(
            "/api/submissions/:candidate_id",
            get(submissions::get_submission),
        )
        .route(
            "/api/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/notifications/stream",
            get(notifications::stream_notifications),
        )
        .route(
            "/api/notifications/:id",
            axum::routing::delete(notifications::dismiss_notification),
        )
        .with_state(state)
}
