use std::time::Duration;

use mentor_logging::{mentor_debug, mentor_error, mentor_warn};
use mixmentor_core::{Effect, JobSubmission, Msg, PollReport, UploadFailure};
use mixmentor_engine::{
    ApiError, EngineCommand, EngineError, EngineEvent, EngineHandle, FailureKind, FilePart,
    StatusReport, UploadForm,
};

/// Turns core effects into engine commands and engine events into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadGenres => self.engine.send(EngineCommand::LoadGenres),
                Effect::Upload {
                    submission,
                    request,
                } => {
                    let form = upload_form(&request);
                    mentor_debug!(
                        "Upload form #{}: {} fields, {} files, {} bytes",
                        submission,
                        form.fields.len(),
                        form.files.len(),
                        form.total_bytes()
                    );
                    self.engine
                        .send(EngineCommand::Submit { submission, form });
                }
                Effect::StartPolling { job_id, interval } => {
                    self.engine
                        .send(EngineCommand::StartPolling { job_id, interval });
                }
                Effect::StopPolling { job_id } => {
                    self.engine.send(EngineCommand::StopPolling { job_id });
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event the core cares about.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.and_then(map_event))
    }
}

/// Builds the multipart form for one submission.
pub fn upload_form(request: &JobSubmission) -> UploadForm {
    UploadForm {
        fields: request
            .text_fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
        files: request
            .file_fields()
            .into_iter()
            .map(|(field, file)| FilePart {
                field: field.to_string(),
                file_name: file.name.clone(),
                data: file.data.clone(),
            })
            .collect(),
    }
}

pub fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::GenresLoaded(result) => {
            Some(Msg::GenresLoaded(result.unwrap_or_default()))
        }
        EngineEvent::UploadProgress {
            submission,
            sent,
            total,
        } => Some(Msg::UploadProgress {
            submission,
            sent,
            total,
        }),
        EngineEvent::UploadCompleted { submission, result } => {
            let result = match result {
                Ok(created) => Ok(created.job_id),
                Err(err) => {
                    mentor_error!("Submission #{} failed: {}", submission, err);
                    Err(upload_failure(&err))
                }
            };
            Some(Msg::UploadFinished { submission, result })
        }
        EngineEvent::PollCompleted { job_id, result } => match result {
            Ok(report) => {
                if let Some(reported) = report.job_id.as_deref() {
                    if reported != job_id {
                        mentor_warn!(
                            "Status for job {} answered as {}; ignored",
                            job_id,
                            reported
                        );
                        return None;
                    }
                }
                Some(Msg::PollResult {
                    job_id,
                    report: poll_report(report),
                })
            }
            Err(err) => {
                mentor_warn!("Status request for job {} failed: {}", job_id, err);
                Some(Msg::PollFailed {
                    job_id,
                    message: err.to_string(),
                })
            }
        },
        other => {
            mentor_debug!("Engine event not routed to the core: {:?}", other);
            None
        }
    }
}

fn upload_failure(err: &ApiError) -> UploadFailure {
    match err.kind {
        FailureKind::HttpStatus(status) => UploadFailure::Rejected { status },
        FailureKind::Decode => UploadFailure::InvalidResponse,
        FailureKind::TooLarge { .. } => UploadFailure::TooLarge,
        FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
            UploadFailure::Network
        }
    }
}

fn poll_report(report: StatusReport) -> PollReport {
    PollReport {
        status: report.status,
        stage: report.stage,
        progress: report.progress,
        result: report.result,
        error: report.error,
    }
}
