//! Shared job registry
//!
//! Process-wide state object created at startup: maps job ids to their
//! records and parked progress receivers. Each job record has exactly one
//! writer (its orchestrator task) plus concurrent readers (HTTP handlers);
//! entries for different jobs are mutated independently under the RwLocks.
//!
//! Lifecycle: entries are added at submission, the progress receiver is
//! removed when the first stream reader claims it, and terminal jobs are
//! evicted (records and artifact files) by the retention sweep.

use crate::progress::{self, ProgressReceiver, ProgressSender};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use storymix_common::Emotion;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// Per-sentence outcome recorded for the metadata endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SentenceRecord {
    pub index: usize,
    pub text: String,
    pub emotion: Emotion,
    pub failed: bool,
    /// Failure detail, present only when `failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Everything the registry tracks about one job
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: Uuid,
    pub story: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub dominant_emotion: Option<Emotion>,
    pub sentences: Vec<SentenceRecord>,
    /// Voice-only narration export
    pub voice_path: Option<PathBuf>,
    /// Final mixed artifact
    pub mix_path: Option<PathBuf>,
}

/// Shared state accessible by all components
///
/// Uses RwLock for concurrent read access with per-job writes.
pub struct SharedState {
    jobs: RwLock<HashMap<Uuid, JobRecord>>,
    /// Parked receivers; removed at first claim (single-shot read)
    receivers: RwLock<HashMap<Uuid, ProgressReceiver>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            receivers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job and its progress channel; returns the job id and
    /// the producer half handed to the orchestrator task.
    pub async fn create_job(&self, story: String) -> (Uuid, ProgressSender) {
        let id = Uuid::new_v4();
        let (tx, rx) = progress::channel();

        let record = JobRecord {
            id,
            story,
            status: JobStatus::Running,
            created_at: Utc::now(),
            finished_at: None,
            dominant_emotion: None,
            sentences: Vec::new(),
            voice_path: None,
            mix_path: None,
        };

        self.jobs.write().await.insert(id, record);
        self.receivers.write().await.insert(id, rx);

        (id, tx)
    }

    /// Claim the progress receiver for a job. Returns `None` for unknown
    /// ids and for jobs whose stream has already been claimed.
    pub async fn take_receiver(&self, id: Uuid) -> Option<ProgressReceiver> {
        self.receivers.write().await.remove(&id)
    }

    /// Snapshot of a job record
    pub async fn get_job(&self, id: Uuid) -> Option<JobRecord> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Apply a mutation to a job record (no-op for unknown ids)
    pub async fn update_job<F>(&self, id: Uuid, f: F)
    where
        F: FnOnce(&mut JobRecord),
    {
        if let Some(record) = self.jobs.write().await.get_mut(&id) {
            f(record);
        }
    }

    /// Transition a job to a terminal status
    pub async fn finish_job(&self, id: Uuid, status: JobStatus) {
        self.update_job(id, |record| {
            record.status = status;
            record.finished_at = Some(Utc::now());
        })
        .await;
    }

    /// Evict terminal jobs older than `ttl`, removing registry entries,
    /// parked receivers, and artifact files. Returns the eviction count.
    pub async fn sweep_expired(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::hours(1));

        let expired: Vec<JobRecord> = {
            let jobs = self.jobs.read().await;
            jobs.values()
                .filter(|record| {
                    record.status.is_terminal()
                        && record.finished_at.map(|at| at < cutoff).unwrap_or(false)
                })
                .cloned()
                .collect()
        };

        if expired.is_empty() {
            return 0;
        }

        let mut jobs = self.jobs.write().await;
        let mut receivers = self.receivers.write().await;
        for record in &expired {
            jobs.remove(&record.id);
            receivers.remove(&record.id);
            for path in [&record.voice_path, &record.mix_path].into_iter().flatten() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!("Failed to remove artifact {}: {}", path.display(), e);
                }
            }
            info!("Evicted expired job {}", record.id);
        }

        expired.len()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
