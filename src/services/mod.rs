pub mod assessment_service;
pub mod builder_service;
pub mod candidate_service;
pub mod grading_service;
pub mod job_service;
pub mod notification_service;
pub mod response_service;
pub mod seed_service;
pub mod submission_service;
pub mod validation_service;
pub mod visibility_service;
