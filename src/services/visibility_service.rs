use serde_json::Value as JsonValue;

use crate::models::answer::{AnswerValue, ResponseSet};
use crate::models::assessment::Assessment;
use crate::models::question::{ConditionOperator, Question};

/// Decides which questions are shown for a given set of answers. Pure and
/// recomputed on every change.
pub struct VisibilityService;

impl VisibilityService {
    pub fn is_visible(question: &Question, responses: &ResponseSet) -> bool {
        let Some(condition) = &question.condition else {
            return true;
        };
        let answer = responses.get(&condition.depends_on);

        match condition.operator() {
            ConditionOperator::Equals => strictly_equals(answer, &condition.value),
            ConditionOperator::NotEquals => !strictly_equals(answer, &condition.value),
            ConditionOperator::Contains => match answer {
                Some(answer) if !answer.is_empty() => answer
                    .display_string()
                    .contains(&stringify(&condition.value)),
                _ => false,
            },
        }
    }

    pub fn visible_question_ids(assessment: &Assessment, responses: &ResponseSet) -> Vec<String> {
        assessment
            .questions()
            .filter(|q| Self::is_visible(q, responses))
            .map(|q| q.id.clone())
            .collect()
    }
}

/// Only a text answer can equal a string value; selections never do.
fn strictly_equals(answer: Option<&AnswerValue>, expected: &JsonValue) -> bool {
    match (answer.and_then(AnswerValue::as_text), expected.as_str()) {
        (Some(answer), Some(expected)) => answer == expected,
        _ => false,
    }
}

fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}
