use std::collections::{BTreeMap, HashSet};

use crate::database::document_store::{Collection, DocumentStore};
use crate::dto::common::Paginated;
use crate::dto::job_dto::{
    CreateJobPayload, JobAnalytics, JobListQuery, JobSort, ReorderJobPayload, UpdateJobPayload,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, Stage};
use crate::models::job::{Job, JobStatus};
use crate::models::submission::Submission;
use crate::utils::{ids, time::now};

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone)]
pub struct JobService {
    store: DocumentStore,
}

impl JobService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: JobListQuery) -> Result<Paginated<Job>> {
        let mut jobs: Vec<Job> = self.store.all(Collection::Jobs).await?;

        match query.sort.unwrap_or_default() {
            JobSort::Order => jobs.sort_by_key(|j| j.order),
            JobSort::Title => jobs.sort_by(|a, b| a.title.cmp(&b.title)),
            JobSort::CreatedAt => jobs.sort_by_key(|j| j.created_at),
        }

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            jobs.retain(|job| {
                job.title.to_lowercase().contains(&needle)
                    || job.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
            });
        }
        if let Some(status) = query.status {
            jobs.retain(|job| job.status == status);
        }

        Ok(Paginated::from_items(
            jobs,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Job> {
        self.store
            .get(Collection::Jobs, id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn count(&self) -> Result<i64> {
        self.store.count(Collection::Jobs).await
    }

    pub async fn all(&self) -> Result<Vec<Job>> {
        self.store.all(Collection::Jobs).await
    }

    pub async fn create(&self, payload: CreateJobPayload) -> Result<Job> {
        let order = match payload.order {
            Some(order) => order,
            None => {
                let jobs: Vec<Job> = self.store.all(Collection::Jobs).await?;
                jobs.iter().map(|j| j.order).max().unwrap_or(0) + 1
            }
        };
        let timestamp = now();
        let job = Job {
            id: ids::new_id(),
            slug: ids::slugify(&payload.title),
            title: payload.title.trim().to_string(),
            status: payload.status.unwrap_or(JobStatus::Active),
            department: payload.department,
            location: payload.location,
            seniority: payload.seniority,
            tags: payload.tags,
            order,
            archive_reason: None,
            applicant_count: 0,
            description: payload.description,
            requirements: payload.requirements,
            created_at: timestamp,
            updated_at: timestamp,
        };
        self.store.insert(Collection::Jobs, &job.id, &job).await?;
        tracing::info!(job_id = %job.id, order = job.order, "job created");
        Ok(job)
    }

    pub async fn update(&self, id: &str, payload: UpdateJobPayload) -> Result<Job> {
        let mut job = self.get_by_id(id).await?;

        if let Some(title) = payload.title {
            job.slug = ids::slugify(&title);
            job.title = title.trim().to_string();
        }
        if let Some(status) = payload.status {
            job.status = status;
        }
        if let Some(department) = payload.department {
            job.department = Some(department);
        }
        if let Some(location) = payload.location {
            job.location = Some(location);
        }
        if let Some(seniority) = payload.seniority {
            job.seniority = Some(seniority);
        }
        if let Some(tags) = payload.tags {
            job.tags = tags;
        }
        if let Some(reason) = payload.archive_reason {
            job.archive_reason = Some(reason);
        }
        if let Some(count) = payload.applicant_count {
            job.applicant_count = count;
        }
        if let Some(description) = payload.description {
            job.description = Some(description);
        }
        if let Some(requirements) = payload.requirements {
            job.requirements = requirements;
        }
        job.updated_at = now();

        self.store.put(Collection::Jobs, &job.id, &job).await?;
        Ok(job)
    }

    /// Moves a job to `to_order`, shifting the jobs in between by one so
    /// orders stay contiguous.
    pub async fn reorder(&self, id: &str, payload: ReorderJobPayload) -> Result<()> {
        let mut jobs: Vec<Job> = self.store.all(Collection::Jobs).await?;
        let from = jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| j.order)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        if let Some(expected) = payload.from_order {
            if expected != from {
                return Err(Error::Conflict(format!(
                    "Job {} is at position {}, not {}",
                    id, from, expected
                )));
            }
        }

        let highest = jobs.iter().map(|j| j.order).max().unwrap_or(from);
        let to = payload.to_order.clamp(1, highest.max(1));
        if to == from {
            return Ok(());
        }

        let timestamp = now();
        let mut changed = Vec::new();
        for job in jobs.iter_mut() {
            let next = if job.id == id {
                to
            } else if from < to && job.order > from && job.order <= to {
                job.order - 1
            } else if to < from && job.order >= to && job.order < from {
                job.order + 1
            } else {
                continue;
            };
            job.order = next;
            job.updated_at = timestamp;
            changed.push((job.id.clone(), job.clone()));
        }

        self.store.bulk_put(Collection::Jobs, &changed).await?;
        tracing::info!(job_id = %id, from, to, shifted = changed.len() - 1, "job reordered");
        Ok(())
    }

    pub async fn bulk_put(&self, jobs: &[Job]) -> Result<()> {
        let docs: Vec<(String, &Job)> = jobs.iter().map(|j| (j.id.clone(), j)).collect();
        self.store.bulk_put(Collection::Jobs, &docs).await
    }

    /// Funnel for one job from its candidates and their submissions.
    pub fn analytics(job_id: &str, candidates: &[Candidate], submissions: &[Submission]) -> JobAnalytics {
        let applicants: Vec<&Candidate> = candidates.iter().filter(|c| c.job_id == job_id).collect();
        let total = applicants.len();

        let mut stage_counts: BTreeMap<String, usize> =
            Stage::ALL.iter().map(|s| (s.as_str().to_string(), 0)).collect();
        for candidate in &applicants {
            *stage_counts.entry(candidate.stage.as_str().to_string()).or_default() += 1;
        }
        let hired = stage_counts.get(Stage::Hired.as_str()).copied().unwrap_or(0);

        let applicant_ids: HashSet<&str> = applicants.iter().map(|c| c.id.as_str()).collect();
        let scores: Vec<u32> = submissions
            .iter()
            .filter(|s| s.job_id == job_id && applicant_ids.contains(s.candidate_id.as_str()))
            .map(|s| s.scores.overall())
            .collect();

        let percent = |part: usize| -> u32 {
            if total == 0 {
                0
            } else {
                (part as f64 / total as f64 * 100.0).round() as u32
            }
        };
        let average_score = if scores.is_empty() {
            None
        } else {
            let sum: u32 = scores.iter().sum();
            Some((sum as f64 / scores.len() as f64).round() as u32)
        };

        JobAnalytics {
            job_id: job_id.to_string(),
            total_candidates: total,
            stage_counts,
            conversion_rate: percent(hired),
            assessment_completion: percent(scores.len()),
            average_score,
        }
    }
}
