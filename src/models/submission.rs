use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::ResponseSet;

/// The four graded categories, each an integer in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub aptitude: u32,
    pub communication: u32,
    pub subjective: u32,
    pub coding: u32,
}

impl CategoryScores {
    /// Arithmetic mean of the four categories, halves rounded up.
    pub fn overall(&self) -> u32 {
        let sum = self.aptitude + self.communication + self.subjective + self.coding;
        (sum + 2) / 4
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> {
        [
            ("aptitude", self.aptitude),
            ("communication", self.communication),
            ("subjective", self.subjective),
            ("coding", self.coding),
        ]
        .into_iter()
    }
}

/// Category scores together with their derived overall score.
///
/// `overall` is never read from input: deserialising goes through
/// [`CategoryScores`] and recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryScores")]
pub struct Scores {
    aptitude: u32,
    communication: u32,
    subjective: u32,
    coding: u32,
    overall: u32,
}

impl From<CategoryScores> for Scores {
    fn from(categories: CategoryScores) -> Self {
        Self {
            aptitude: categories.aptitude,
            communication: categories.communication,
            subjective: categories.subjective,
            coding: categories.coding,
            overall: categories.overall(),
        }
    }
}

impl Scores {
    pub fn categories(&self) -> CategoryScores {
        CategoryScores {
            aptitude: self.aptitude,
            communication: self.communication,
            subjective: self.subjective,
            coding: self.coding,
        }
    }

    pub fn overall(&self) -> u32 {
        self.overall
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    NotStarted,
    InProgress,
    Completed,
    Evaluated,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::NotStarted => "not-started",
            SubmissionStatus::InProgress => "in-progress",
            SubmissionStatus::Completed => "completed",
            SubmissionStatus::Evaluated => "evaluated",
        }
    }

    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (NotStarted, InProgress)
                | (NotStarted, Completed)
                | (InProgress, Completed)
                | (Completed, Evaluated)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub candidate_id: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<String>,
    #[serde(default)]
    pub responses: ResponseSet,
    pub scores: Scores,
    /// Minutes spent on the assessment.
    #[serde(default)]
    pub time_spent: u32,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
}
