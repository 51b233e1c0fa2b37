use std::collections::HashSet;

use crate::database::document_store::{Collection, DocumentStore};
use crate::dto::candidate_dto::{CandidateListQuery, NotePayload, UpdateCandidatePayload};
use crate::dto::common::Paginated;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateNote};
use crate::models::timeline::{TimelineEvent, TimelineEventType};
use crate::utils::{ids, time::now};

const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct CandidateService {
    store: DocumentStore,
}

impl CandidateService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: CandidateListQuery) -> Result<Paginated<Candidate>> {
        let mut candidates: Vec<Candidate> = self.store.all(Collection::Candidates).await?;
        candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            candidates.retain(|c| {
                c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
            });
        }
        if let Some(stage) = query.stage {
            candidates.retain(|c| c.stage == stage);
        }
        if let Some(job_id) = query.job_id.as_deref().filter(|s| !s.is_empty()) {
            candidates.retain(|c| c.job_id == job_id);
        }

        Ok(Paginated::from_items(
            candidates,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        ))
    }

    pub async fn all(&self) -> Result<Vec<Candidate>> {
        self.store.all(Collection::Candidates).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Candidate> {
        self.store
            .get(Collection::Candidates, id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    /// Applies the provided fields. A stage change and every newly added
    /// note are recorded on the candidate's timeline before the candidate is
    /// saved.
    pub async fn update(&self, id: &str, payload: UpdateCandidatePayload) -> Result<Candidate> {
        let mut candidate = self.get_by_id(id).await?;
        let timestamp = now();

        let notes = payload
            .notes
            .map(|notes| {
                notes
                    .into_iter()
                    .map(|n| note_from_payload(n, timestamp))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        if let Some(stage) = payload.stage.filter(|s| *s != candidate.stage) {
            let event = TimelineEvent {
                id: ids::new_id(),
                candidate_id: candidate.id.clone(),
                event_type: TimelineEventType::StageChange,
                from_stage: Some(candidate.stage),
                to_stage: Some(stage),
                note: payload.note.clone(),
                created_at: timestamp,
            };
            self.store
                .insert(Collection::TimelineEvents, &event.id, &event)
                .await?;
            tracing::info!(
                candidate_id = %candidate.id,
                from = candidate.stage.as_str(),
                to = stage.as_str(),
                "candidate stage changed"
            );
            candidate.stage = stage;
        }

        if let Some(notes) = notes {
            let known: HashSet<&str> = candidate.notes.iter().map(|n| n.id.as_str()).collect();
            for note in notes.iter().filter(|n| !known.contains(n.id.as_str())) {
                let event = TimelineEvent {
                    id: ids::new_id(),
                    candidate_id: candidate.id.clone(),
                    event_type: TimelineEventType::NoteAdded,
                    from_stage: None,
                    to_stage: None,
                    note: Some(note.content.clone()),
                    created_at: timestamp,
                };
                self.store
                    .insert(Collection::TimelineEvents, &event.id, &event)
                    .await?;
                tracing::debug!(
                    candidate_id = %candidate.id,
                    note_id = %note.id,
                    mentions = note.mentions.len(),
                    "candidate note added"
                );
            }
            candidate.notes = notes;
        }

        if let Some(name) = payload.name {
            candidate.name = name;
        }
        if let Some(email) = payload.email {
            candidate.email = email;
        }
        if let Some(job_id) = payload.job_id {
            candidate.job_id = job_id;
        }
        if let Some(skills) = payload.skills {
            candidate.skills = skills;
        }
        if let Some(score) = payload.assessment_score {
            candidate.assessment_score = Some(score);
        }
        if let Some(reason) = payload.rejection_reason {
            candidate.rejection_reason = Some(reason);
        }
        if let Some(resume) = payload.resume {
            candidate.resume = Some(resume);
        }
        if let Some(phone) = payload.phone {
            candidate.phone = Some(phone);
        }
        if let Some(experience) = payload.experience {
            candidate.experience = Some(experience);
        }
        candidate.updated_at = timestamp;

        self.store
            .put(Collection::Candidates, &candidate.id, &candidate)
            .await?;
        Ok(candidate)
    }

    pub async fn timeline(&self, candidate_id: &str) -> Result<Vec<TimelineEvent>> {
        let mut events: Vec<TimelineEvent> = self.store.all(Collection::TimelineEvents).await?;
        events.retain(|e| e.candidate_id == candidate_id);
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    pub async fn bulk_put(&self, candidates: &[Candidate]) -> Result<()> {
        let docs: Vec<(String, &Candidate)> = candidates.iter().map(|c| (c.id.clone(), c)).collect();
        self.store.bulk_put(Collection::Candidates, &docs).await
    }

    pub async fn bulk_put_events(&self, events: &[TimelineEvent]) -> Result<()> {
        let docs: Vec<(String, &TimelineEvent)> = events.iter().map(|e| (e.id.clone(), e)).collect();
        self.store.bulk_put(Collection::TimelineEvents, &docs).await
    }
}

fn note_from_payload(note: NotePayload, at: chrono::DateTime<chrono::Utc>) -> Result<CandidateNote> {
    if note.content.trim().is_empty() {
        return Err(Error::InvalidField {
            field: "notes".to_string(),
            message: "Note content must not be blank".to_string(),
        });
    }
    Ok(CandidateNote {
        id: note.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(ids::new_id),
        mentions: CandidateNote::mentions_in(&note.content),
        content: note.content,
        author: note.author,
        created_at: note.created_at.unwrap_or(at),
    })
}
