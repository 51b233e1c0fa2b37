use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    #[serde(default, alias = "conditional", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    ShortText,
    LongText,
    Numeric,
    FileUpload,
}

impl QuestionType {
    pub fn is_text(&self) -> bool {
        matches!(self, QuestionType::ShortText | QuestionType::LongText)
    }
}

/// Bounds for an answer. `min`/`max` apply to numeric questions,
/// `minLength`/`maxLength` to text questions; other fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Single-parent visibility rule: the question shows when the answer to
/// `depends_on` satisfies the comparison against `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub depends_on: String,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default, rename = "condition", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
}

impl Condition {
    pub fn equals(depends_on: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            depends_on: depends_on.into(),
            value: value.into(),
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Unknown or missing keywords fall back to equality.
    pub fn operator(&self) -> ConditionOperator {
        match self.keyword.as_deref() {
            Some("not_equals") => ConditionOperator::NotEquals,
            Some("contains") => ConditionOperator::Contains,
            _ => ConditionOperator::Equals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_reads_both_condition_spellings() {
        let authored: Question = serde_json::from_value(json!({
            "id": "q2",
            "type": "short-text",
            "title": "Which one?",
            "required": false,
            "condition": { "dependsOn": "q1", "value": "Other" }
        }))
        .unwrap();
        assert_eq!(authored.condition, Some(Condition::equals("q1", "Other")));

        let rich: Question = serde_json::from_value(json!({
            "id": "q3",
            "type": "long-text",
            "title": "Tell us more",
            "conditional": { "dependsOn": "q1", "condition": "not_equals", "value": "No" }
        }))
        .unwrap();
        let condition = rich.condition.unwrap();
        assert_eq!(condition.operator(), ConditionOperator::NotEquals);
        assert!(!rich.required);
    }

    #[test]
    fn unknown_keyword_means_equality() {
        let condition = Condition::equals("q1", "Yes").with_keyword("starts_with");
        assert_eq!(condition.operator(), ConditionOperator::Equals);
    }

    #[test]
    fn question_types_use_kebab_case() {
        let encoded = serde_json::to_value([QuestionType::MultiChoice, QuestionType::FileUpload]).unwrap();
        assert_eq!(encoded, json!(["multi-choice", "file-upload"]));
    }
}
