use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::error::Result;
use crate::models::answer::ResponseSet;
use crate::models::candidate::{Candidate, Stage};
use crate::models::job::{Job, JobStatus};
use crate::models::question::{QuestionType, ValidationRule};
use crate::models::submission::{Submission, SubmissionStatus};
use crate::models::timeline::{TimelineEvent, TimelineEventType};
use crate::services::builder_service::{AssessmentBuilder, BuilderError, QuestionUpdate};
use crate::services::grading_service::GradingService;
use crate::utils::{ids, time::days_ago, time::now};
use crate::AppState;

const JOB_COUNT: usize = 25;
const ASSESSED_JOBS: usize = 3;
const TIMELINE_EVENTS: usize = 100;

const JOB_TITLES: &[&str] = &[
    "Frontend Developer", "Backend Developer", "Full Stack Developer", "DevOps Engineer",
    "Data Scientist", "Product Manager", "UX Designer", "QA Engineer", "Mobile Developer",
    "Security Engineer", "Cloud Architect", "Machine Learning Engineer", "Technical Writer",
    "Scrum Master", "Business Analyst", "Database Administrator", "Site Reliability Engineer",
    "AI Engineer", "Blockchain Developer", "Game Developer", "Embedded Systems Engineer",
    "Network Engineer", "Systems Administrator", "Technical Lead", "Engineering Manager",
];
const DEPARTMENTS: &[&str] = &["Engineering", "Product", "Design", "Marketing", "Sales", "HR", "Finance"];
const LOCATIONS: &[&str] = &["New York", "San Francisco", "London", "Berlin", "Remote", "Toronto"];
const SENIORITIES: &[&str] = &["Junior", "Mid", "Senior", "Lead", "Principal"];
const ARCHIVE_REASONS: &[&str] = &["Position Filled", "Budget Cut", "Role Canceled", "Requirements Changed"];
const TAGS: &[&str] = &[
    "React", "Node.js", "Python", "Java", "AWS", "Docker", "Kubernetes", "MongoDB",
    "PostgreSQL", "TypeScript", "GraphQL", "Redis", "Elasticsearch", "Microservices",
    "Machine Learning", "AI", "Blockchain", "Mobile", "iOS", "Android", "Flutter",
    "Vue.js", "Angular", "Spring Boot", "Django", "Flask", "Express.js", "Next.js",
];
const SKILLS: &[&str] = &["JavaScript", "Python", "React", "Node.js", "SQL", "AWS"];
const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Jessica",
    "William", "Ashley", "James", "Amanda", "Christopher", "Stephanie", "Daniel",
    "Melissa", "Matthew", "Nicole", "Anthony", "Elizabeth", "Mark", "Helen",
    "Donald", "Deborah", "Steven", "Rachel", "Paul", "Carolyn", "Andrew", "Janet",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
    "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
    "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedReport {
    pub jobs: usize,
    pub candidates: usize,
    pub assessments: usize,
    pub events: usize,
    pub submissions_added: usize,
}

/// Fills an empty database with sample data. When jobs already exist only
/// submissions are topped up, for candidates that have none.
pub async fn seed(state: &AppState, candidate_count: usize) -> Result<SeedReport> {
    let mut rng = StdRng::from_entropy();
    let mut report = SeedReport::default();

    if state.job_service.count().await? == 0 {
        let jobs = generate_jobs(&mut rng);
        let candidates = generate_candidates(&mut rng, &jobs, candidate_count);
        let events = generate_events(&mut rng, &candidates);

        state.job_service.bulk_put(&jobs).await?;
        state.candidate_service.bulk_put(&candidates).await?;
        state.candidate_service.bulk_put_events(&events).await?;

        let active: Vec<&Job> = jobs.iter().filter(|j| j.status == JobStatus::Active).collect();
        for (i, job) in active.iter().take(ASSESSED_JOBS).enumerate() {
            let builder = if i % 2 == 0 {
                technical_assessment(job)?
            } else {
                behavioral_assessment(job)?
            };
            builder.save(&state.assessment_service).await?;
            report.assessments += 1;
        }

        report.jobs = jobs.len();
        report.candidates = candidates.len();
        report.events = events.len();
    }

    let jobs = state.job_service.all().await?;
    let candidates = state.candidate_service.all().await?;
    let submissions = generate_submissions(&mut rng, &jobs, &candidates);
    let outcome = state.submission_service.merge(submissions).await?;
    report.submissions_added = outcome.added.len();

    tracing::info!(
        jobs = report.jobs,
        candidates = report.candidates,
        assessments = report.assessments,
        events = report.events,
        submissions_added = report.submissions_added,
        submissions_total = outcome.total,
        "seed complete"
    );
    Ok(report)
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn pick_many<R: Rng>(rng: &mut R, items: &[&str], count: usize) -> Vec<String> {
    items
        .choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

fn generate_jobs<R: Rng>(rng: &mut R) -> Vec<Job> {
    (0..JOB_COUNT)
        .map(|i| {
            let title = pick(rng, JOB_TITLES);
            let status = if rng.gen_bool(0.7) {
                JobStatus::Active
            } else {
                JobStatus::Archived
            };
            let archive_reason =
                (status == JobStatus::Archived).then(|| pick(rng, ARCHIVE_REASONS).to_string());
            let tag_count = rng.gen_range(2..7);
            Job {
                id: format!("job-{}", i + 1),
                title: title.to_string(),
                slug: ids::slugify(title),
                status,
                department: Some(pick(rng, DEPARTMENTS).to_string()),
                location: Some(pick(rng, LOCATIONS).to_string()),
                seniority: Some(pick(rng, SENIORITIES).to_string()),
                tags: pick_many(rng, TAGS, tag_count),
                order: i as i64 + 1,
                archive_reason,
                applicant_count: rng.gen_range(5..55),
                description: None,
                requirements: Vec::new(),
                created_at: days_ago(30, rng.gen()),
                updated_at: now(),
            }
        })
        .collect()
}

fn generate_candidates<R: Rng>(rng: &mut R, jobs: &[Job], count: usize) -> Vec<Candidate> {
    let active: Vec<&Job> = jobs.iter().filter(|j| j.status == JobStatus::Active).collect();
    let Some(first_active) = active.first() else {
        return Vec::new();
    };

    (0..count)
        .map(|i| {
            let first = pick(rng, FIRST_NAMES);
            let last = pick(rng, LAST_NAMES);
            let job = active.choose(rng).unwrap_or(first_active);
            let skill_count = rng.gen_range(2..6);
            Candidate {
                id: format!("candidate-{}", i + 1),
                name: format!("{} {}", first, last),
                email: format!("{}.{}@email.com", first.to_lowercase(), last.to_lowercase()),
                stage: *Stage::ALL.choose(rng).unwrap_or(&Stage::Applied),
                job_id: job.id.clone(),
                skills: pick_many(rng, SKILLS, skill_count),
                assessment_score: Some(rng.gen_range(60..100)),
                rejection_reason: None,
                resume: None,
                phone: None,
                experience: None,
                notes: vec![],
                created_at: days_ago(60, rng.gen()),
                updated_at: now(),
            }
        })
        .collect()
}

fn generate_events<R: Rng>(rng: &mut R, candidates: &[Candidate]) -> Vec<TimelineEvent> {
    if candidates.is_empty() {
        return Vec::new();
    }
    (0..TIMELINE_EVENTS)
        .map(|i| {
            let candidate = &candidates[rng.gen_range(0..candidates.len())];
            TimelineEvent {
                id: format!("event-{}", i + 1),
                candidate_id: candidate.id.clone(),
                event_type: TimelineEventType::StageChange,
                from_stage: Some(Stage::Applied),
                to_stage: Some(candidate.stage),
                note: None,
                created_at: days_ago(30, rng.gen()),
            }
        })
        .collect()
}

fn generate_submissions<R: Rng>(rng: &mut R, jobs: &[Job], candidates: &[Candidate]) -> Vec<Submission> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(i, candidate)| {
            let job = jobs.iter().find(|j| j.id == candidate.job_id)?;
            let department = job.department.as_deref();
            let area = department.map(str::to_lowercase).unwrap_or_else(|| "professional".into());
            let responses = ResponseSet::new()
                .with("apt1", pick(rng, &["36", "32", "40", "38"]))
                .with("apt2", pick(rng, &["50 km/h", "60 km/h", "70 km/h", "80 km/h"]))
                .with(
                    "comm1",
                    format!(
                        "I prefer a collaborative {} environment with clear communication and growth opportunities.",
                        area
                    ),
                )
                .with(
                    "feed1",
                    format!(
                        "The {} assessment was comprehensive and relevant to the role requirements.",
                        department.unwrap_or("role")
                    ),
                );
            Some(Submission {
                id: format!("submission-{}", i + 1),
                candidate_id: candidate.id.clone(),
                job_id: job.id.clone(),
                assessment_id: None,
                responses,
                scores: GradingService::synthetic_scores(department, rng),
                time_spent: rng.gen_range(40..60),
                submitted_at: days_ago(15, rng.gen()),
                status: SubmissionStatus::Completed,
                evaluated_by: None,
                evaluated_at: None,
            })
        })
        .collect()
}

fn technical_assessment(job: &Job) -> std::result::Result<AssessmentBuilder, BuilderError> {
    let mut builder = AssessmentBuilder::new(job.id.clone(), job.department.as_deref());
    builder.set_title("Technical Skills Assessment");
    builder.rename_section(0, "Programming Knowledge")?;
    builder.update_question(0, 0, QuestionUpdate::Title("Which programming language do you prefer?".into()))?;
    builder.update_question(
        0,
        0,
        QuestionUpdate::Options(Some(
            ["JavaScript", "Python", "Java", "C++", "Other"].map(String::from).to_vec(),
        )),
    )?;

    builder.add_question(0)?;
    builder.update_question(0, 1, QuestionUpdate::Type(QuestionType::MultiChoice))?;
    builder.update_question(0, 1, QuestionUpdate::Title("Which frameworks have you worked with?".into()))?;
    builder.update_question(0, 1, QuestionUpdate::Required(false))?;
    builder.update_question(0, 1, QuestionUpdate::CorrectAnswer(None))?;
    builder.update_question(0, 1, QuestionUpdate::Validation(None))?;
    builder.update_question(
        0,
        1,
        QuestionUpdate::Options(Some(
            ["React", "Vue.js", "Angular", "Express.js", "Django", "Spring Boot"]
                .map(String::from)
                .to_vec(),
        )),
    )?;

    builder.add_question(0)?;
    builder.update_question(0, 2, QuestionUpdate::Type(QuestionType::Numeric))?;
    builder.update_question(0, 2, QuestionUpdate::Title("Years of experience".into()))?;
    builder.update_question(0, 2, QuestionUpdate::Options(None))?;
    builder.update_question(0, 2, QuestionUpdate::CorrectAnswer(None))?;
    builder.update_question(
        0,
        2,
        QuestionUpdate::Validation(Some(ValidationRule {
            min: Some(0.0),
            max: Some(50.0),
            ..Default::default()
        })),
    )?;
    Ok(builder)
}

fn behavioral_assessment(job: &Job) -> std::result::Result<AssessmentBuilder, BuilderError> {
    let mut builder = AssessmentBuilder::new(job.id.clone(), job.department.as_deref());
    builder.set_title("Behavioral Assessment");
    builder.rename_section(0, "Work Style")?;
    builder.update_question(0, 0, QuestionUpdate::Title("Do you prefer working in teams?".into()))?;
    builder.update_question(
        0,
        0,
        QuestionUpdate::Options(Some(["Yes", "No", "Sometimes"].map(String::from).to_vec())),
    )?;

    builder.add_question(0)?;
    builder.update_question(0, 1, QuestionUpdate::Type(QuestionType::LongText))?;
    builder.update_question(
        0,
        1,
        QuestionUpdate::Title("Describe a challenging project you worked on".into()),
    )?;
    builder.update_question(0, 1, QuestionUpdate::Options(None))?;
    builder.update_question(0, 1, QuestionUpdate::CorrectAnswer(None))?;
    builder.update_question(
        0,
        1,
        QuestionUpdate::Validation(Some(ValidationRule {
            min_length: Some(50),
            max_length: Some(500),
            ..Default::default()
        })),
    )?;
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::pool::create_pool;

    #[tokio::test]
    async fn seeds_once_and_tops_up_submissions() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let state = AppState::new(pool);

        let first = seed(&state, 40).await.unwrap();
        assert_eq!(first.jobs, JOB_COUNT);
        assert_eq!(first.candidates, 40);
        assert_eq!(first.events, TIMELINE_EVENTS);
        assert_eq!(first.submissions_added, 40);

        let second = seed(&state, 40).await.unwrap();
        assert_eq!(second.jobs, 0);
        assert_eq!(second.submissions_added, 0);

        let submissions = state.submission_service.list(None).await.unwrap();
        assert_eq!(submissions.len(), 40);
        assert!(submissions
            .iter()
            .all(|s| s.scores.overall() == s.scores.categories().overall()));
    }

    #[test]
    fn technical_template_has_bounded_numeric_question() {
        let job = generate_jobs(&mut StdRng::seed_from_u64(1)).remove(0);
        let builder = technical_assessment(&job).unwrap();
        let questions = &builder.sections()[0].questions;

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].question_type, QuestionType::Numeric);
        assert_eq!(
            questions[2].validation,
            Some(ValidationRule {
                min: Some(0.0),
                max: Some(50.0),
                ..Default::default()
            })
        );
        assert!(questions[2].required);
    }
}
