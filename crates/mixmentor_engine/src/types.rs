use std::fmt;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Server-issued job identifier.
pub type JobId = String;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    GenresLoaded(Result<Vec<String>, ApiError>),
    UploadProgress {
        submission: u64,
        sent: u64,
        total: u64,
    },
    UploadCompleted {
        submission: u64,
        result: Result<JobCreated, ApiError>,
    },
    PollCompleted {
        job_id: JobId,
        result: Result<StatusReport, ApiError>,
    },
    ResultFetched {
        job_id: JobId,
        result: Result<Value, ApiError>,
    },
    HealthChecked(Result<bool, ApiError>),
}

/// Body of a successful `POST /api/jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobCreated {
    pub job_id: JobId,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `GET /api/jobs/{job_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub status: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusReport {
    /// No further transitions follow a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "done" | "failed" | "not_found")
    }
}

/// A multipart upload, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub data: Bytes,
}

impl UploadForm {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.data.len() as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: u64 },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "upload too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("engine thread stopped")]
    Disconnected,
}
