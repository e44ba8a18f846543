use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use mentor_logging::{mentor_debug, mentor_error, mentor_warn};

use crate::client::{ApiSettings, ChannelEventSink, EventSink, JobApi, ReqwestJobApi};
use crate::poller::Poller;
use crate::{EngineError, EngineEvent, JobId, UploadForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    LoadGenres,
    Submit { submission: u64, form: UploadForm },
    StartPolling { job_id: JobId, interval: Duration },
    StopPolling { job_id: JobId },
    FetchResult { job_id: JobId },
    CheckHealth,
}

/// Runs engine commands on a background tokio runtime and hands events back
/// to the caller's thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let api = ReqwestJobApi::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn JobApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let _guard = runtime.enter();
            let mut poller = Poller::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { job_id, interval } => {
                        poller.start(job_id, interval, api.clone(), sink.clone());
                    }
                    EngineCommand::StopPolling { job_id } => {
                        if !poller.stop_job(&job_id) {
                            mentor_debug!("No poll loop running for job {}", job_id);
                        }
                    }
                    command => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), command, sink).await;
                        });
                    }
                }
            }

            poller.stop();
            mentor_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            mentor_error!("Engine thread is gone; command dropped");
        }
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

async fn handle_command(api: &dyn JobApi, command: EngineCommand, sink: Arc<dyn EventSink>) {
    match command {
        EngineCommand::LoadGenres => {
            let result = api.genres().await;
            if let Err(err) = &result {
                mentor_warn!("Genre list request failed: {}", err);
            }
            sink.emit(EngineEvent::GenresLoaded(result));
        }
        EngineCommand::Submit { submission, form } => {
            let result = api.create_job(submission, form, sink.clone()).await;
            sink.emit(EngineEvent::UploadCompleted { submission, result });
        }
        EngineCommand::FetchResult { job_id } => {
            let result = api.job_result(&job_id).await;
            sink.emit(EngineEvent::ResultFetched { job_id, result });
        }
        EngineCommand::CheckHealth => {
            sink.emit(EngineEvent::HealthChecked(api.health().await));
        }
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling { .. } => {}
    }
}
