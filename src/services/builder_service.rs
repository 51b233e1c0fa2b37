use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, Section};
use crate::models::question::{Condition, Question, QuestionType, ValidationRule};
use crate::utils::{ids, time::now};

const DEFAULT_OPTION_COUNT: usize = 4;

/// Where a finished assessment goes when the builder saves it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentSink: Send + Sync {
    async fn create_assessment(&self, assessment: Assessment) -> Result<Assessment>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuilderError {
    #[error("Assessment title is required")]
    MissingTitle,
    #[error("At least one section is required")]
    NoSections,
    #[error("Section {0} does not exist")]
    SectionOutOfRange(usize),
    #[error("Question {question} does not exist in section {section}")]
    QuestionOutOfRange { section: usize, question: usize },
    #[error("Option {option} does not exist on question {question}")]
    OptionOutOfRange { question: usize, option: usize },
}

impl BuilderError {
    pub fn field(&self) -> &'static str {
        match self {
            BuilderError::MissingTitle => "title",
            BuilderError::NoSections
            | BuilderError::SectionOutOfRange(_)
            | BuilderError::QuestionOutOfRange { .. }
            | BuilderError::OptionOutOfRange { .. } => "sections",
        }
    }
}

impl From<BuilderError> for Error {
    fn from(err: BuilderError) -> Self {
        Error::InvalidField {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// One field of a question, replaced verbatim. Changing the type keeps
/// options and validation as they are.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionUpdate {
    Type(QuestionType),
    Title(String),
    Required(bool),
    Options(Option<Vec<String>>),
    CorrectAnswer(Option<usize>),
    Validation(Option<ValidationRule>),
    Condition(Option<Condition>),
}

/// In-memory assessment draft. Nothing is persisted until [`save`].
///
/// [`save`]: AssessmentBuilder::save
#[derive(Debug, Clone)]
pub struct AssessmentBuilder {
    job_id: String,
    title: String,
    domain: Option<String>,
    sections: Vec<Section>,
    next_section: usize,
    next_question: usize,
}

impl AssessmentBuilder {
    pub fn new(job_id: impl Into<String>, domain: Option<&str>) -> Self {
        let mut builder = Self {
            job_id: job_id.into(),
            title: format!("{} Assessment", domain.unwrap_or("General")),
            domain: domain.map(str::to_string),
            sections: Vec::new(),
            next_section: 1,
            next_question: 1,
        };
        builder.add_section();
        builder
    }

    /// Starts from a stored assessment. Saving still creates a new document.
    pub fn from_assessment(assessment: &Assessment) -> Self {
        let mut builder = Self {
            job_id: assessment.job_id.clone(),
            title: assessment.title.clone(),
            domain: assessment.domain.clone(),
            sections: assessment.sections.clone(),
            next_section: assessment.sections.len() + 1,
            next_question: assessment.questions().count() + 1,
        };
        builder.skip_taken_ids();
        builder
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_domain(&mut self, domain: Option<String>) {
        self.domain = domain;
    }

    /// Appends "Section N" holding one default question.
    pub fn add_section(&mut self) -> &Section {
        let id = self.fresh_section_id();
        let question = self.default_question();
        let title = format!("Section {}", self.sections.len() + 1);
        self.sections.push(Section {
            id,
            title,
            questions: vec![question],
        });
        &self.sections[self.sections.len() - 1]
    }

    pub fn rename_section(&mut self, section: usize, title: impl Into<String>) -> std::result::Result<(), BuilderError> {
        self.section_mut(section)?.title = title.into();
        Ok(())
    }

    pub fn remove_section(&mut self, section: usize) -> std::result::Result<Section, BuilderError> {
        if section >= self.sections.len() {
            return Err(BuilderError::SectionOutOfRange(section));
        }
        Ok(self.sections.remove(section))
    }

    /// Appends a default question with open validation bounds.
    pub fn add_question(&mut self, section: usize) -> std::result::Result<&Question, BuilderError> {
        if section >= self.sections.len() {
            return Err(BuilderError::SectionOutOfRange(section));
        }
        let mut question = self.default_question();
        question.validation = Some(ValidationRule {
            min: Some(0.0),
            max: Some(100.0),
            min_length: Some(0),
            max_length: Some(500),
        });
        let questions = &mut self.sections[section].questions;
        questions.push(question);
        Ok(&questions[questions.len() - 1])
    }

    pub fn update_question(
        &mut self,
        section: usize,
        question: usize,
        update: QuestionUpdate,
    ) -> std::result::Result<(), BuilderError> {
        let target = self.question_mut(section, question)?;
        match update {
            QuestionUpdate::Type(question_type) => target.question_type = question_type,
            QuestionUpdate::Title(title) => target.title = title,
            QuestionUpdate::Required(required) => target.required = required,
            QuestionUpdate::Options(options) => target.options = options,
            QuestionUpdate::CorrectAnswer(answer) => target.correct_answer = answer,
            QuestionUpdate::Validation(rule) => target.validation = rule,
            QuestionUpdate::Condition(condition) => target.condition = condition,
        }
        Ok(())
    }

    pub fn update_option(
        &mut self,
        section: usize,
        question: usize,
        option: usize,
        value: impl Into<String>,
    ) -> std::result::Result<(), BuilderError> {
        let target = self.question_mut(section, question)?;
        let slot = target
            .options
            .as_mut()
            .and_then(|options| options.get_mut(option))
            .ok_or(BuilderError::OptionOutOfRange { question, option })?;
        *slot = value.into();
        Ok(())
    }

    /// Removes a question unless it is the last one in its section.
    pub fn remove_question(&mut self, section: usize, question: usize) -> std::result::Result<(), BuilderError> {
        let questions = &mut self.section_mut(section)?.questions;
        if questions.len() <= 1 {
            return Ok(());
        }
        if question >= questions.len() {
            return Err(BuilderError::QuestionOutOfRange { section, question });
        }
        questions.remove(question);
        Ok(())
    }

    /// Questions a condition may depend on: all of them, the edited one
    /// included.
    pub fn condition_candidates(&self) -> Vec<&Question> {
        self.sections.iter().flat_map(|s| s.questions.iter()).collect()
    }

    /// Checks the draft and hands it to `sink` as a new assessment.
    pub async fn save(&self, sink: &dyn AssessmentSink) -> Result<Assessment> {
        if self.title.trim().is_empty() {
            return Err(BuilderError::MissingTitle.into());
        }
        if self.sections.is_empty() {
            return Err(BuilderError::NoSections.into());
        }

        let timestamp = now();
        let assessment = Assessment {
            id: ids::new_id(),
            job_id: self.job_id.clone(),
            title: self.title.clone(),
            domain: self.domain.clone(),
            sections: self.sections.clone(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        sink.create_assessment(assessment).await
    }

    fn section_mut(&mut self, section: usize) -> std::result::Result<&mut Section, BuilderError> {
        self.sections
            .get_mut(section)
            .ok_or(BuilderError::SectionOutOfRange(section))
    }

    fn question_mut(&mut self, section: usize, question: usize) -> std::result::Result<&mut Question, BuilderError> {
        self.section_mut(section)?
            .questions
            .get_mut(question)
            .ok_or(BuilderError::QuestionOutOfRange { section, question })
    }

    fn default_question(&mut self) -> Question {
        Question {
            id: self.fresh_question_id(),
            question_type: QuestionType::SingleChoice,
            title: String::new(),
            required: true,
            options: Some(vec![String::new(); DEFAULT_OPTION_COUNT]),
            correct_answer: Some(0),
            validation: None,
            condition: None,
        }
    }

    fn fresh_question_id(&mut self) -> String {
        self.skip_taken_ids();
        let id = format!("q{}", self.next_question);
        self.next_question += 1;
        id
    }

    fn fresh_section_id(&mut self) -> String {
        self.skip_taken_ids();
        let id = format!("section-{}", self.next_section);
        self.next_section += 1;
        id
    }

    fn skip_taken_ids(&mut self) {
        while self.condition_candidates().iter().any(|q| q.id == format!("q{}", self.next_question)) {
            self.next_question += 1;
        }
        while self.sections.iter().any(|s| s.id == format!("section-{}", self.next_section)) {
            self.next_section += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_builder_has_one_default_section() {
        let builder = AssessmentBuilder::new("job-1", Some("Engineering"));
        assert_eq!(builder.title(), "Engineering Assessment");
        assert_eq!(builder.sections().len(), 1);

        let section = &builder.sections()[0];
        assert_eq!(section.title, "Section 1");
        let question = &section.questions[0];
        assert_eq!(question.question_type, QuestionType::SingleChoice);
        assert_eq!(question.options.as_ref().map(Vec::len), Some(4));
        assert_eq!(question.correct_answer, Some(0));
        assert!(question.required);

        assert_eq!(AssessmentBuilder::new("job-1", None).title(), "General Assessment");
    }

    #[test]
    fn added_questions_carry_default_validation() {
        let mut builder = AssessmentBuilder::new("job-1", None);
        let added = builder.add_question(0).unwrap().clone();
        assert_eq!(
            added.validation,
            Some(ValidationRule {
                min: Some(0.0),
                max: Some(100.0),
                min_length: Some(0),
                max_length: Some(500),
            })
        );
        builder.add_section();
        assert_eq!(builder.sections()[1].title, "Section 2");

        let ids: HashSet<&str> = builder.condition_candidates().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn default_numeric_question_accepts_negative_answers() {
        use crate::services::validation_service::ValidationService;

        let mut builder = AssessmentBuilder::new("job-1", None);
        builder.add_question(0).unwrap();
        builder
            .update_question(0, 1, QuestionUpdate::Type(QuestionType::Numeric))
            .unwrap();

        let question = &builder.sections()[0].questions[1];
        assert_eq!(ValidationService::validate_answer(question, Some(&"-5".into())), None);
        assert_eq!(
            ValidationService::validate_answer(question, Some(&"120".into())).as_deref(),
            Some("Maximum value is 100")
        );
    }

    #[test]
    fn last_question_cannot_be_removed() {
        let mut builder = AssessmentBuilder::new("job-1", None);
        builder.remove_question(0, 0).unwrap();
        assert_eq!(builder.sections()[0].questions.len(), 1);

        builder.add_question(0).unwrap();
        builder.remove_question(0, 0).unwrap();
        assert_eq!(builder.sections()[0].questions.len(), 1);
    }

    #[test]
    fn update_replaces_a_single_field() {
        let mut builder = AssessmentBuilder::new("job-1", None);
        builder
            .update_question(0, 0, QuestionUpdate::Type(QuestionType::Numeric))
            .unwrap();
        builder.update_option(0, 0, 2, "Maybe").unwrap();

        let question = &builder.sections()[0].questions[0];
        assert_eq!(question.question_type, QuestionType::Numeric);
        assert_eq!(question.options.as_ref().unwrap()[2], "Maybe");

        assert_eq!(
            builder.update_question(3, 0, QuestionUpdate::Required(false)),
            Err(BuilderError::SectionOutOfRange(3))
        );
        assert_eq!(
            builder.update_option(0, 0, 9, "x"),
            Err(BuilderError::OptionOutOfRange { question: 0, option: 9 })
        );
    }

    #[test]
    fn editing_a_stored_assessment_keeps_ids_unique() {
        let mut original = AssessmentBuilder::new("job-1", None);
        original.add_question(0).unwrap();
        let stored = Assessment {
            id: "a1".into(),
            job_id: "job-1".into(),
            title: original.title().to_string(),
            domain: None,
            sections: original.sections().to_vec(),
            created_at: now(),
            updated_at: now(),
        };

        let mut builder = AssessmentBuilder::from_assessment(&stored);
        builder.add_question(0).unwrap();
        builder.add_section();
        let ids: HashSet<&str> = builder.condition_candidates().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        let section_ids: HashSet<&str> = builder.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(section_ids.len(), 2);
    }

    #[tokio::test]
    async fn blank_title_never_reaches_the_sink() {
        let mut builder = AssessmentBuilder::new("job-1", None);
        builder.set_title("   ");

        let mut sink = MockAssessmentSink::new();
        sink.expect_create_assessment().times(0);

        match builder.save(&sink).await {
            Err(Error::InvalidField { field, message }) => {
                assert_eq!(field, "title");
                assert_eq!(message, "Assessment title is required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_sections_never_reach_the_sink() {
        let mut builder = AssessmentBuilder::new("job-1", None);
        builder.remove_section(0).unwrap();

        let mut sink = MockAssessmentSink::new();
        sink.expect_create_assessment().times(0);

        match builder.save(&sink).await {
            Err(Error::InvalidField { field, message }) => {
                assert_eq!(field, "sections");
                assert_eq!(message, "At least one section is required");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_creates_a_new_document_each_time() {
        let builder = AssessmentBuilder::new("job-7", Some("Design"));

        let mut sink = MockAssessmentSink::new();
        sink.expect_create_assessment()
            .times(2)
            .returning(|assessment| Ok(assessment));

        let first = builder.save(&sink).await.unwrap();
        let second = builder.save(&sink).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.job_id, "job-7");
        assert_eq!(first.sections, second.sections);
    }
}
