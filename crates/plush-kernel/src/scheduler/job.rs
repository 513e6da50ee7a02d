//! Job records for processes the supervisor is collecting.
//!
//! One record per live child: process id, the command name it was spawned
//! for, whether it runs in the background, and — for foreground children —
//! the watchdog deadline. Records exist only while the process is awaited;
//! a completed background job is reported once and forgotten.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Bookkeeping for one supervised process.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// OS process id.
    pub pid: u32,
    /// Command name the process was spawned for.
    pub command: String,
    /// True for background jobs (no watchdog, asynchronous reporting).
    pub background: bool,
    /// Watchdog deadline; None for background jobs.
    pub deadline: Option<Instant>,
}

/// Table of live jobs.
#[derive(Default)]
pub struct JobTable {
    jobs: Mutex<HashMap<u32, JobRecord>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a process.
    pub async fn insert(&self, record: JobRecord) {
        let mut jobs = self.jobs.lock().await;
        jobs.insert(record.pid, record);
    }

    /// Stop tracking a process.
    pub async fn remove(&self, pid: u32) -> Option<JobRecord> {
        let mut jobs = self.jobs.lock().await;
        jobs.remove(&pid)
    }

    /// True if the process is being tracked.
    pub async fn contains(&self, pid: u32) -> bool {
        let jobs = self.jobs.lock().await;
        jobs.contains_key(&pid)
    }

    /// Number of live jobs.
    pub async fn len(&self) -> usize {
        let jobs = self.jobs.lock().await;
        jobs.len()
    }

    /// True if no jobs are tracked.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of all records.
    pub async fn list(&self) -> Vec<JobRecord> {
        let jobs = self.jobs.lock().await;
        jobs.values().cloned().collect()
    }
}
