//! Pipeline supervisor: a bounded job queue with an inspectable status board.
//!
//! Every slow pipeline tail (Submit, Return) runs as a supervised job rather
//! than a detached task: the job gets an id, its state transitions are
//! recorded on a shared board, and failures keep their error text so an
//! operator can find and re-drive the affected record.

use std::future::Future;
use std::sync::Arc;

use chrono::Local;
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

use crate::domain::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: String,
    pub label: String,
    pub state: JobState,
    pub error: Option<String>,
    pub enqueued_at: String,
    pub finished_at: Option<String>,
}

struct Job {
    id: String,
    fut: BoxFuture<'static, Result<(), ServiceError>>,
}

pub struct PipelineSupervisor {
    tx: mpsc::Sender<Job>,
    board: Arc<DashMap<String, JobRecord>>,
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl PipelineSupervisor {
    /// Spawn the dispatcher. `workers` bounds how many jobs run at once,
    /// `depth` bounds the queue; enqueueing past the bound waits for space.
    pub fn start(workers: usize, depth: usize) -> Arc<Self> {
        let (tx, mut rx) = mpsc::channel::<Job>(depth.max(1));
        let board: Arc<DashMap<String, JobRecord>> = Arc::new(DashMap::new());
        let permits = Arc::new(Semaphore::new(workers.max(1)));

        let dispatcher_board = board.clone();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let board = dispatcher_board.clone();
                tokio::spawn(async move {
                    if let Some(mut record) = board.get_mut(&job.id) {
                        record.state = JobState::Running;
                    }
                    let result = job.fut.await;
                    if let Some(mut record) = board.get_mut(&job.id) {
                        record.finished_at = Some(now());
                        match result {
                            Ok(()) => record.state = JobState::Done,
                            Err(e) => {
                                tracing::error!("pipeline job {} failed: {}", job.id, e);
                                record.state = JobState::Failed;
                                record.error = Some(e.to_string());
                            }
                        }
                    }
                    drop(permit);
                });
            }
        });

        Arc::new(Self { tx, board })
    }

    /// Enqueue a pipeline tail. Returns the job id immediately; the caller
    /// acks the request without waiting for the pipeline.
    pub async fn enqueue<F>(&self, label: &str, fut: F) -> String
    where
        F: Future<Output = Result<(), ServiceError>> + Send + 'static,
    {
        let id = Uuid::new_v4().to_string();
        self.board.insert(
            id.clone(),
            JobRecord {
                id: id.clone(),
                label: label.to_string(),
                state: JobState::Queued,
                error: None,
                enqueued_at: now(),
                finished_at: None,
            },
        );

        let job = Job {
            id: id.clone(),
            fut: fut.boxed(),
        };
        if self.tx.send(job).await.is_err() {
            tracing::error!("pipeline queue closed, job {} dropped", id);
            if let Some(mut record) = self.board.get_mut(&id) {
                record.state = JobState::Failed;
                record.error = Some("pipeline queue closed".to_string());
                record.finished_at = Some(now());
            }
        }
        id
    }

    pub fn job(&self, id: &str) -> Option<JobRecord> {
        self.board.get(id).map(|r| r.clone())
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        let mut all: Vec<JobRecord> = self.board.iter().map(|r| r.clone()).collect();
        all.sort_by(|a, b| a.enqueued_at.cmp(&b.enqueued_at));
        all
    }

    /// Poll until the job leaves the queued/running states. Test and
    /// operator-tooling helper; the HTTP surface only reads the board.
    pub async fn wait_for(&self, id: &str, timeout: std::time::Duration) -> Option<JobRecord> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(record) = self.job(id) {
                if matches!(record.state, JobState::Done | JobState::Failed) {
                    return Some(record);
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return self.job(id);
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}
