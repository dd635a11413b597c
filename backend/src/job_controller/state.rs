//! Manages the state of long-running, asynchronous background jobs.
//!
//! Archive imports can touch many forms and records, so they run outside the
//! request/response cycle (see `services/forms/import.rs`) and are tracked here.
//!
//! The main components are:
//! - `JobsState`: a clonable, thread-safe struct holding the status of every job.
//!   It is injected into the Actix application state in `main.rs`.
//! - `JobUpdate`: the message a background job sends to report a status change.
//! - `start_job_updater`: a long-running task that applies `JobUpdate` messages
//!   from an MPSC channel to the shared `JobsState`.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job ID to current status. Read by the status endpoint, written only by
    /// `start_job_updater` (and by the scheduler registering a new job).
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Background tasks push their `JobUpdate`s through this sender.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// Creates the shared state and the receiver `start_job_updater` drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }
}

/// A status update for one background job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// Applies every `JobUpdate` received on `rx` to the shared `jobs` map until
/// all senders are gone.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id.clone(), update.status);
    }
}
