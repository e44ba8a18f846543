use std::time::Duration;

use crate::{JobId, JobSubmission};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadGenres,
    Upload {
        submission: u64,
        request: JobSubmission,
    },
    /// Replaces any running poll loop with one for `job_id`.
    StartPolling { job_id: JobId, interval: Duration },
    StopPolling { job_id: JobId },
}
