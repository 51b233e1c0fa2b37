use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldErrors, Result};
use crate::models::answer::{AnswerValue, ResponseSet};
use crate::models::submission::SubmissionStatus;

/// In-progress answers for one candidate on one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDraft {
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default)]
    pub errors: FieldErrors,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ResponseDraft {
    fn default() -> Self {
        Self {
            responses: ResponseSet::new(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::NotStarted,
            updated_at: None,
        }
    }
}

impl ResponseDraft {
    /// Records an answer, drops any error shown for that question and marks
    /// the draft as started. A submitted draft is read-only.
    pub fn set_answer(&mut self, question_id: &str, value: AnswerValue, at: DateTime<Utc>) -> Result<()> {
        self.advance(SubmissionStatus::InProgress)?;
        self.responses.set(question_id, value);
        self.errors.remove(question_id);
        self.updated_at = Some(at);
        Ok(())
    }

    /// Marks the draft as submitted with the answers that were recorded.
    pub fn complete(&mut self, responses: ResponseSet, at: DateTime<Utc>) -> Result<()> {
        self.advance(SubmissionStatus::Completed)?;
        self.responses = responses;
        self.errors.clear();
        self.updated_at = Some(at);
        Ok(())
    }

    fn advance(&mut self, next: SubmissionStatus) -> Result<()> {
        if self.status == next {
            return Ok(());
        }
        if !self.status.can_transition_to(next) {
            return Err(Error::Conflict(format!(
                "Assessment is {} and cannot move to {}",
                self.status.as_str(),
                next.as_str()
            )));
        }
        self.status = next;
        Ok(())
    }
}
