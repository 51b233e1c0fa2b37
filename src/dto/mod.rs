pub mod assessment_dto;
pub mod candidate_dto;
pub mod common;
pub mod job_dto;
