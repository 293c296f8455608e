//! Cooperative jobs.
//!
//! Long runs are split into units (one sequence directory, one baked
//! frame). A job does one unit per [`Job::tick`], so a host event loop can
//! interleave ticks with its own work. Cancellation is checked at the top
//! of each tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// State of a job after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// More units remain.
    Running,
    /// Every unit was processed.
    Finished,
    /// The job stopped because it was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Returns true once the job will do no more work.
    pub fn is_done(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A unit-at-a-time task.
pub trait Job {
    /// Processes the next unit.
    fn tick(&mut self) -> JobStatus;

    /// Token that cancels this job.
    fn cancel_token(&self) -> CancelToken;

    /// Units processed so far and total units.
    fn progress(&self) -> (usize, usize);
}

/// Ticks `job` until it finishes or is cancelled.
pub fn run_to_completion<J: Job + ?Sized>(job: &mut J) -> JobStatus {
    loop {
        let status = job.tick();
        if status.is_done() {
            return status;
        }
    }
}
