use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A respondent's answer: free text (also numeric input and uploaded file
/// names) or the selected options of a multi-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.is_empty(),
            AnswerValue::Choices(choices) => choices.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Choices(_) => None,
        }
    }

    /// String form used for substring matching; selections are joined with `,`.
    pub fn display_string(&self) -> String {
        match self {
            AnswerValue::Text(text) => text.clone(),
            AnswerValue::Choices(choices) => choices.join(","),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Choices(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(value: Vec<&str>) -> Self {
        AnswerValue::Choices(value.into_iter().map(str::to_string).collect())
    }
}

/// Question id → current answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<String, AnswerValue>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.set(question_id, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnswerValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, AnswerValue)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_set_reads_strings_and_arrays() {
        let responses: ResponseSet = serde_json::from_value(json!({
            "q1": "JavaScript",
            "q2": ["React", "Django"],
            "q3": ""
        }))
        .unwrap();

        assert_eq!(responses.get("q1"), Some(&AnswerValue::from("JavaScript")));
        assert_eq!(
            responses.get("q2").map(AnswerValue::display_string).as_deref(),
            Some("React,Django")
        );
        assert!(responses.get("q3").unwrap().is_empty());
        assert_eq!(responses.len(), 3);
    }

    #[test]
    fn numbers_are_not_answers() {
        let parsed = serde_json::from_value::<ResponseSet>(json!({ "q1": 5 }));
        assert!(parsed.is_err());
    }
}
