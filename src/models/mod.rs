pub mod answer;
pub mod assessment;
pub mod candidate;
pub mod job;
pub mod question;
pub mod response_draft;
pub mod submission;
pub mod timeline;
