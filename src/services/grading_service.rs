use rand::Rng;

use crate::error::{Error, Result};
use crate::models::submission::{CategoryScores, Scores};

/// Minimum overall score for a candidate to qualify.
pub const QUALIFICATION_THRESHOLD: u32 = 70;

const MAX_SCORE: u32 = 100;
const SYNTHETIC_FLOOR: i32 = 30;
const JITTER: i32 = 15;

pub struct GradingService;

impl GradingService {
    /// Checks every category is within `[0, 100]` and derives the overall score.
    pub fn score(categories: CategoryScores) -> Result<Scores> {
        if let Some((name, value)) = categories.iter().find(|(_, v)| *v > MAX_SCORE) {
            return Err(Error::InvalidField {
                field: format!("categoryScores.{}", name),
                message: format!("Score must be between 0 and 100, got {}", value),
            });
        }
        Ok(Scores::from(categories))
    }

    pub fn is_qualified(scores: &Scores) -> bool {
        scores.overall() >= QUALIFICATION_THRESHOLD
    }

    /// Department-keyed starting point for generated scores.
    pub fn baseline(department: Option<&str>) -> CategoryScores {
        let (aptitude, communication, subjective, coding) = match department {
            Some("Engineering") => (80, 70, 75, 85),
            Some("Design") => (75, 85, 80, 60),
            Some("Product") => (85, 80, 85, 70),
            Some("Marketing") => (70, 90, 85, 50),
            _ => (70, 75, 70, 65),
        };
        CategoryScores {
            aptitude,
            communication,
            subjective,
            coding,
        }
    }

    /// Baseline plus per-category jitter in `[-15, 14]`, clamped to `[30, 100]`.
    pub fn synthetic_scores<R: Rng + ?Sized>(department: Option<&str>, rng: &mut R) -> Scores {
        let base = Self::baseline(department);
        let mut jitter = |value: u32| -> u32 {
            (value as i32 + rng.gen_range(-JITTER..JITTER)).clamp(SYNTHETIC_FLOOR, MAX_SCORE as i32)
                as u32
        };
        Scores::from(CategoryScores {
            aptitude: jitter(base.aptitude),
            communication: jitter(base.communication),
            subjective: jitter(base.subjective),
            coding: jitter(base.coding),
        })
    }
}
