pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::{document_store::DocumentStore, local_storage::LocalStorage};
use crate::services::{
    assessment_service::AssessmentService, candidate_service::CandidateService,
    job_service::JobService, notification_service::NotificationHub,
    response_service::ResponseService, submission_service::SubmissionService,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub job_service: JobService,
    pub candidate_service: CandidateService,
    pub assessment_service: AssessmentService,
    pub submission_service: SubmissionService,
    pub response_service: ResponseService,
    pub notifications: NotificationHub,
}

impl AppState {
    /// Wires every service over `pool`. Spawns the submission store task, so
    /// it must run inside a tokio runtime.
    pub fn new(pool: SqlitePool) -> Self {
        let store = DocumentStore::new(pool.clone());
        let storage = LocalStorage::new(pool.clone());
        let notifications = NotificationHub::default();

        let job_service = JobService::new(store.clone());
        let candidate_service = CandidateService::new(store.clone());
        let assessment_service = AssessmentService::new(store);
        let submission_service = SubmissionService::spawn(storage.clone());
        let response_service = ResponseService::new(
            storage,
            assessment_service.clone(),
            job_service.clone(),
            submission_service.clone(),
            Arc::new(notifications.clone()),
        );

        Self {
            pool,
            job_service,
            candidate_service,
            assessment_service,
            submission_service,
            response_service,
            notifications,
        }
    }
}
