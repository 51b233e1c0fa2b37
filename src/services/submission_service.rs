use std::collections::HashSet;

use tokio::sync::{mpsc, oneshot};

use crate::database::local_storage::LocalStorage;
use crate::error::{Error, Result};
use crate::models::submission::Submission;

/// Local storage key holding every submission as one JSON array.
pub const SUBMISSIONS_KEY: &str = "assessmentSubmissions";

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub added: Vec<Submission>,
    /// Candidate ids whose incoming submission was dropped because one was
    /// already stored.
    pub skipped: Vec<String>,
    pub total: usize,
}

enum Command {
    Merge {
        incoming: Vec<Submission>,
        reply: oneshot::Sender<Result<MergeOutcome>>,
    },
    List {
        reply: oneshot::Sender<Result<Vec<Submission>>>,
    },
}

/// Handle to the task that owns the submissions list. Every read-merge-write
/// runs on that one task, so concurrent submits cannot lose each other's
/// entries.
#[derive(Clone)]
pub struct SubmissionService {
    commands: mpsc::Sender<Command>,
}

impl SubmissionService {
    /// Spawns the owning task. Must be called inside a tokio runtime.
    pub fn spawn(storage: LocalStorage) -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(run(storage, receiver));
        Self { commands }
    }

    /// Adds submissions for candidates that have none yet; existing entries
    /// always win.
    pub async fn merge(&self, incoming: Vec<Submission>) -> Result<MergeOutcome> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Merge { incoming, reply }).await?;
        response.await.map_err(|_| stopped())?
    }

    /// Stores one submission, rejecting a second one from the same candidate.
    pub async fn record(&self, submission: Submission) -> Result<Submission> {
        let candidate_id = submission.candidate_id.clone();
        let mut outcome = self.merge(vec![submission]).await?;
        match outcome.added.pop() {
            Some(stored) => Ok(stored),
            None => Err(Error::Conflict(format!(
                "Candidate {} has already submitted this assessment",
                candidate_id
            ))),
        }
    }

    pub async fn list(&self, job_id: Option<&str>) -> Result<Vec<Submission>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::List { reply }).await?;
        let mut submissions = response.await.map_err(|_| stopped())??;
        if let Some(job_id) = job_id {
            submissions.retain(|s| s.job_id == job_id);
        }
        Ok(submissions)
    }

    pub async fn find_by_candidate(&self, candidate_id: &str) -> Result<Option<Submission>> {
        Ok(self
            .list(None)
            .await?
            .into_iter()
            .find(|s| s.candidate_id == candidate_id))
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| stopped())
    }
}

fn stopped() -> Error {
    Error::Internal("submission store is not running".to_string())
}

async fn run(storage: LocalStorage, mut commands: mpsc::Receiver<Command>) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Merge { incoming, reply } => {
                let _ = reply.send(merge(&storage, incoming).await);
            }
            Command::List { reply } => {
                let _ = reply.send(load(&storage).await);
            }
        }
    }
    tracing::debug!("submission store stopped");
}

async fn load(storage: &LocalStorage) -> Result<Vec<Submission>> {
    Ok(storage.get_json(SUBMISSIONS_KEY).await?.unwrap_or_default())
}

async fn merge(storage: &LocalStorage, incoming: Vec<Submission>) -> Result<MergeOutcome> {
    let mut submissions = load(storage).await?;
    let mut seen: HashSet<String> = submissions.iter().map(|s| s.candidate_id.clone()).collect();

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    for submission in incoming {
        if seen.insert(submission.candidate_id.clone()) {
            added.push(submission);
        } else {
            skipped.push(submission.candidate_id);
        }
    }

    if !added.is_empty() {
        submissions.extend(added.iter().cloned());
        storage.set_json(SUBMISSIONS_KEY, &submissions).await?;
    }
    tracing::info!(
        added = added.len(),
        skipped = skipped.len(),
        total = submissions.len(),
        "submissions merged"
    );

    Ok(MergeOutcome {
        added,
        skipped,
        total: submissions.len(),
    })
}
