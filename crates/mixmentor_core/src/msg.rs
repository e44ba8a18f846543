use serde_json::Value;

use crate::{AudioFile, JobId, Mode};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application finished wiring; applies the initial mode and loads genres.
    Started,
    /// User picked an analysis mode tab.
    ModeSelected(Mode),
    /// Genre vocabulary fetch finished. Empty on any failure.
    GenresLoaded(Vec<String>),
    /// User picked a genre key.
    GenreSelected(String),
    /// User picked a vocal style.
    VocalStyleSelected(String),
    /// User picked (or cleared) the main audio file.
    AudioSelected(Option<AudioFile>),
    /// User picked (or cleared) the mix reference file.
    ReferenceSelected(Option<AudioFile>),
    /// User clicked Analyze (`demo = false`) or Demo (`demo = true`).
    SubmitClicked { demo: bool },
    /// Bytes of the multipart body handed to the transport so far.
    UploadProgress { submission: u64, sent: u64, total: u64 },
    /// Upload request finished.
    UploadFinished {
        submission: u64,
        result: Result<JobId, UploadFailure>,
    },
    /// One status fetch for a job succeeded.
    PollResult { job_id: JobId, report: PollReport },
    /// One status fetch for a job failed at the transport or HTTP level.
    PollFailed { job_id: JobId, message: String },
}

/// Body of `GET /api/jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollReport {
    pub status: String,
    pub stage: Option<String>,
    pub progress: Option<f64>,
    pub result: Option<Value>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailure {
    /// Non-2xx response.
    Rejected { status: u16 },
    /// 2xx response without a usable job id.
    InvalidResponse,
    /// Body exceeds the configured upload cap; nothing was sent.
    TooLarge,
    /// Transport failure.
    Network,
}
