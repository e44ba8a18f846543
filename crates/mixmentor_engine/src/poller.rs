use std::sync::Arc;
use std::time::Duration;

use mentor_logging::{mentor_debug, mentor_info};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, JobApi, JobId};

struct ActiveLoop {
    job_id: JobId,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the single job status poll loop.
///
/// Starting a loop always cancels the previous one first, so at most one loop
/// exists at any time. Must be used from within a tokio runtime.
#[derive(Default)]
pub struct Poller {
    active: Option<ActiveLoop>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        job_id: JobId,
        interval: Duration,
        api: Arc<dyn JobApi>,
        sink: Arc<dyn EventSink>,
    ) {
        self.stop();
        mentor_info!("Polling job {} every {:?}", job_id, interval);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            job_id.clone(),
            interval,
            api,
            sink,
            cancel.clone(),
        ));
        self.active = Some(ActiveLoop {
            job_id,
            cancel,
            handle,
        });
    }

    /// Cancels the running loop, if any, and returns its job id.
    pub fn stop(&mut self) -> Option<JobId> {
        let active = self.active.take()?;
        active.cancel.cancel();
        mentor_debug!("Stopped polling job {}", active.job_id);
        Some(active.job_id)
    }

    /// Cancels the running loop only if it belongs to `job_id`.
    pub fn stop_job(&mut self, job_id: &str) -> bool {
        if self.active_job() != Some(job_id) {
            return false;
        }
        self.stop().is_some()
    }

    pub fn active_job(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.job_id.as_str())
    }

    /// True while a loop is scheduled and has not finished on its own.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One status fetch per tick. Each fetch is awaited before the next tick is
/// taken, so fetches for a job never overlap. Ends on cancellation or after
/// delivering a terminal status.
async fn poll_loop(
    job_id: JobId,
    interval: Duration,
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.job_status(&job_id) => result,
        };

        let terminal = matches!(&result, Ok(report) if report.is_terminal());
        mentor_debug!("Poll tick for job {} (terminal={})", job_id, terminal);
        sink.emit(EngineEvent::PollCompleted {
            job_id: job_id.clone(),
            result,
        });
        if terminal {
            break;
        }
    }
}
