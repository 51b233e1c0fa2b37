use crate::error::FieldErrors;
use crate::models::answer::{AnswerValue, ResponseSet};
use crate::models::assessment::Assessment;
use crate::models::question::{Question, QuestionType};

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Per-question answer checks. Each question yields at most one message;
/// when several bounds fail the later check wins. A bound of zero is unset.
pub struct ValidationService;

impl ValidationService {
    pub fn validate_answer(question: &Question, answer: Option<&AnswerValue>) -> Option<String> {
        let empty = answer.map_or(true, AnswerValue::is_empty);
        if question.required && empty {
            return Some(REQUIRED_MESSAGE.to_string());
        }

        let (Some(rule), Some(text)) = (question.validation, answer.and_then(AnswerValue::as_text))
        else {
            return None;
        };
        if text.is_empty() {
            return None;
        }

        let mut error = None;
        if question.question_type.is_text() {
            let length = text.chars().count();
            if let Some(min) = rule.min_length.filter(|m| *m > 0) {
                if length < min {
                    error = Some(format!("Minimum {} characters required", min));
                }
            }
            if let Some(max) = rule.max_length.filter(|m| *m > 0) {
                if length > max {
                    error = Some(format!("Maximum {} characters allowed", max));
                }
            }
        } else if question.question_type == QuestionType::Numeric {
            if let Some(value) = leading_number(text) {
                if let Some(min) = rule.min.filter(|m| *m != 0.0) {
                    if value < min {
                        error = Some(format!("Minimum value is {}", min));
                    }
                }
                if let Some(max) = rule.max.filter(|m| *m != 0.0) {
                    if value > max {
                        error = Some(format!("Maximum value is {}", max));
                    }
                }
            }
        }
        error
    }

    /// Validates every question of every section, hidden ones included.
    pub fn validate_all(assessment: &Assessment, responses: &ResponseSet) -> FieldErrors {
        assessment
            .questions()
            .filter_map(|q| {
                Self::validate_answer(q, responses.get(&q.id)).map(|message| (q.id.clone(), message))
            })
            .collect()
    }
}

/// Longest numeric prefix of `text`: `"50kg"` reads as 50, `"kg"` as nothing.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::ValidationRule;

    fn question(question_type: QuestionType, required: bool, validation: Option<ValidationRule>) -> Question {
        Question {
            id: "q1".into(),
            question_type,
            title: "Question".into(),
            required,
            options: None,
            correct_answer: None,
            validation,
            condition: None,
        }
    }

    #[test]
    fn required_rejects_missing_and_empty_answers() {
        let q = question(QuestionType::MultiChoice, true, None);
        let required = Some(REQUIRED_MESSAGE.to_string());

        assert_eq!(ValidationService::validate_answer(&q, None), required);
        assert_eq!(ValidationService::validate_answer(&q, Some(&"".into())), required);
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&Vec::<String>::new().into())),
            required
        );
        assert_eq!(ValidationService::validate_answer(&q, Some(&vec!["React"].into())), None);
    }

    #[test]
    fn numeric_bounds() {
        let rule = ValidationRule {
            min: Some(60.0),
            max: Some(100.0),
            ..Default::default()
        };
        let q = question(QuestionType::Numeric, true, Some(rule));

        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"50".into())).as_deref(),
            Some("Minimum value is 60")
        );
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"150".into())).as_deref(),
            Some("Maximum value is 100")
        );
        assert_eq!(ValidationService::validate_answer(&q, Some(&"80".into())), None);
        assert_eq!(ValidationService::validate_answer(&q, Some(&"eighty".into())), None);
    }

    #[test]
    fn zero_bounds_are_unset() {
        let rule = ValidationRule {
            min: Some(0.0),
            max: Some(100.0),
            min_length: Some(0),
            max_length: Some(500),
        };
        let q = question(QuestionType::Numeric, false, Some(rule));
        assert_eq!(ValidationService::validate_answer(&q, Some(&"-5".into())), None);
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"101".into())).as_deref(),
            Some("Maximum value is 100")
        );

        let text = question(QuestionType::ShortText, false, Some(ValidationRule {
            max_length: Some(0),
            ..Default::default()
        }));
        assert_eq!(ValidationService::validate_answer(&text, Some(&"anything".into())), None);
    }

    #[test]
    fn numeric_answers_read_their_leading_number() {
        let rule = ValidationRule {
            min: Some(10.0),
            max: Some(50.0),
            ..Default::default()
        };
        let q = question(QuestionType::Numeric, false, Some(rule));

        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"60kg".into())).as_deref(),
            Some("Maximum value is 50")
        );
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&" 2.5e0 years".into())).as_deref(),
            Some("Minimum value is 10")
        );
        assert_eq!(ValidationService::validate_answer(&q, Some(&"42 hours".into())), None);
        assert_eq!(ValidationService::validate_answer(&q, Some(&"kg 60".into())), None);
    }

    #[test]
    fn leading_number_follows_float_prefix_rules() {
        assert_eq!(leading_number("50kg"), Some(50.0));
        assert_eq!(leading_number("-.5x"), Some(-0.5));
        assert_eq!(leading_number("7."), Some(7.0));
        assert_eq!(leading_number("3e"), Some(3.0));
        assert_eq!(leading_number("1e2"), Some(100.0));
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn text_length_counts_characters() {
        let rule = ValidationRule {
            min_length: Some(3),
            max_length: Some(5),
            ..Default::default()
        };
        let q = question(QuestionType::ShortText, false, Some(rule));

        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"ab".into())).as_deref(),
            Some("Minimum 3 characters required")
        );
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"abcdef".into())).as_deref(),
            Some("Maximum 5 characters allowed")
        );
        assert_eq!(ValidationService::validate_answer(&q, Some(&"ééé".into())), None);
    }

    #[test]
    fn later_check_overwrites_earlier() {
        let rule = ValidationRule {
            min_length: Some(10),
            max_length: Some(2),
            ..Default::default()
        };
        let q = question(QuestionType::LongText, false, Some(rule));
        assert_eq!(
            ValidationService::validate_answer(&q, Some(&"abcd".into())).as_deref(),
            Some("Maximum 2 characters allowed")
        );
    }

    #[test]
    fn optional_empty_answer_skips_bounds() {
        let rule = ValidationRule {
            min_length: Some(50),
            ..Default::default()
        };
        let q = question(QuestionType::LongText, false, Some(rule));
        assert_eq!(ValidationService::validate_answer(&q, Some(&"".into())), None);
        assert_eq!(ValidationService::validate_answer(&q, None), None);
    }

    #[test]
    fn length_rules_ignored_for_choice_questions() {
        let rule = ValidationRule {
            min_length: Some(50),
            min: Some(10.0),
            ..Default::default()
        };
        let q = question(QuestionType::SingleChoice, false, Some(rule));
        assert_eq!(ValidationService::validate_answer(&q, Some(&"5".into())), None);
    }
}
