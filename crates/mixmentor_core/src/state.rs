use mentor_logging::{mentor_debug, mentor_info, mentor_warn};

use crate::msg::{PollReport, UploadFailure};
use crate::render::{render_result, ResultView};
use crate::result::ResultDocument;
use crate::submission::{upload_progress, AudioFile, JobSubmission, UPLOAD_SHARE};
use crate::translate::stage_label;
use crate::view_model::{AppViewModel, ModeTab};
use crate::vocabulary::{GenreList, VOCAL_STYLES};
use crate::{Effect, POLL_INTERVAL};

/// Server-issued job identifier.
pub type JobId = String;

pub const STATUS_SELECT_FILE: &str = "Vennligst velg en lydfil.";
pub const STATUS_UPLOADING: &str = "Laster opp...";
pub const STATUS_QUEUED: &str = "I kø.";
pub const STATUS_UPLOAD_FAILED: &str = "Opplasting feilet.";
pub const STATUS_UPLOAD_NETWORK: &str = "Nettverksfeil under opplasting.";
pub const STATUS_UPLOAD_TOO_LARGE: &str = "Filen er for stor til å lastes opp.";
pub const STATUS_POLL_ERROR: &str = "Feil ved statusoppdatering, prøver igjen.";
pub const STATUS_DONE: &str = "Analyse ferdig.";
pub const STATUS_FAILED: &str = "Analyse feilet.";
pub const STATUS_MALFORMED_RESULT: &str = "Analyse feilet: ugyldig resultat.";

pub const LABEL_UPLOADING: &str = "Laster opp";
pub const LABEL_COMPLETE: &str = "Ferdig";
pub const LABEL_FAILED: &str = "Feilet";

/// Progress shown while the backend reports none, or zero.
pub const DEFAULT_STAGE_PROGRESS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Vocal,
    Mix,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Vocal, Mode::Mix];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Vocal => "vocal",
            Mode::Mix => "mix",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Vocal => "Vokal",
            Mode::Mix => "Miks/Master",
        }
    }
}

/// Where the current submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Uploading,
    Queued,
    Ingest,
    Processing,
    Done,
    Failed,
}

impl JobPhase {
    /// Maps a backend `status` value. Unrecognised non-terminal values count as processing.
    pub fn from_status(status: &str) -> JobPhase {
        match status {
            "queued" => JobPhase::Queued,
            "ingest" => JobPhase::Ingest,
            "done" => JobPhase::Done,
            "failed" | "not_found" => JobPhase::Failed,
            _ => JobPhase::Processing,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Done | JobPhase::Failed)
    }
}

/// The single controller state. All mutation goes through the transition methods.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    started: bool,
    mode: Mode,
    genres: GenreList,
    genres_loaded: bool,
    genre: String,
    vocal_style: String,
    audio: Option<AudioFile>,
    reference: Option<AudioFile>,
    submission_seq: u64,
    uploading: Option<u64>,
    active_job: Option<JobId>,
    polling_active: bool,
    phase: JobPhase,
    status: String,
    progress: f32,
    progress_label: String,
    result: Option<ResultView>,
    document: Option<ResultDocument>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        let genres = GenreList::fallback();
        let genre = genres.first().to_string();
        Self {
            started: false,
            mode: Mode::default(),
            genres,
            genres_loaded: false,
            genre,
            vocal_style: VOCAL_STYLES[0].to_string(),
            audio: None,
            reference: None,
            submission_seq: 0,
            uploading: None,
            active_job: None,
            polling_active: false,
            phase: JobPhase::Idle,
            status: String::new(),
            progress: 0.0,
            progress_label: String::new(),
            result: None,
            document: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mode: self.mode,
            tabs: Mode::ALL
                .iter()
                .map(|mode| ModeTab {
                    mode: *mode,
                    label: mode.label(),
                    active: *mode == self.mode,
                })
                .collect(),
            vocal_style_visible: self.mode == Mode::Vocal,
            reference_visible: self.mode == Mode::Mix,
            genre_options: self.genres.options(),
            genres_from_backend: self.genres.is_from_backend(),
            selected_genre: self.genre.clone(),
            vocal_styles: VOCAL_STYLES.iter().map(|s| s.to_string()).collect(),
            selected_vocal_style: self.vocal_style.clone(),
            audio_name: self.audio.as_ref().map(|file| file.name.clone()),
            reference_name: self.reference.as_ref().map(|file| file.name.clone()),
            phase: self.phase,
            status: self.status.clone(),
            progress: self.progress,
            progress_percent: percent(self.progress),
            progress_label: self.progress_label.clone(),
            active_job: self.active_job.clone(),
            polling_active: self.polling_active,
            result: self.result.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn active_job(&self) -> Option<&str> {
        self.active_job.as_deref()
    }

    pub fn is_polling(&self) -> bool {
        self.polling_active
    }

    pub fn genres(&self) -> &GenreList {
        &self.genres
    }

    pub fn genres_loaded(&self) -> bool {
        self.genres_loaded
    }

    /// The last successfully parsed result document, if any.
    pub fn result_document(&self) -> Option<&ResultDocument> {
        self.document.as_ref()
    }

    /// Applies the initial mode and requests the vocabulary, once.
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        self.select_mode(Mode::default());
        vec![Effect::LoadGenres]
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.dirty = true;
    }

    /// Installs the vocabulary. Only the first delivery is used.
    pub fn apply_genres(&mut self, keys: Vec<String>) {
        if self.genres_loaded {
            mentor_debug!("Ignoring repeated genre list delivery");
            return;
        }
        self.genres_loaded = true;
        self.genres = GenreList::from_backend(keys);
        if !self.genres.is_from_backend() {
            mentor_warn!("Genre list unavailable; using built-in fallback");
        }
        if !self.genres.contains(&self.genre) {
            self.genre = self.genres.first().to_string();
        }
        self.dirty = true;
    }

    pub fn select_genre(&mut self, key: &str) {
        if !self.genres.contains(key) {
            mentor_warn!("Ignoring unknown genre selection {:?}", key);
            return;
        }
        self.genre = key.to_string();
        self.dirty = true;
    }

    pub fn select_vocal_style(&mut self, style: &str) {
        if !VOCAL_STYLES.contains(&style) {
            mentor_warn!("Ignoring unknown vocal style {:?}", style);
            return;
        }
        self.vocal_style = style.to_string();
        self.dirty = true;
    }

    pub fn select_audio(&mut self, file: Option<AudioFile>) {
        self.audio = file;
        self.dirty = true;
    }

    pub fn select_reference(&mut self, file: Option<AudioFile>) {
        self.reference = file;
        self.dirty = true;
    }

    /// Validates the form and starts an upload. Any running poll loop is
    /// stopped before the new submission goes out.
    pub fn begin_submission(&mut self, demo: bool) -> Vec<Effect> {
        if !demo && self.audio.is_none() {
            self.status = STATUS_SELECT_FILE.to_string();
            self.dirty = true;
            return Vec::new();
        }

        let request = JobSubmission {
            mode: self.mode,
            genre: self.genre.clone(),
            vocal_style: (self.mode == Mode::Vocal).then(|| self.vocal_style.clone()),
            audio: if demo { None } else { self.audio.clone() },
            reference: if demo || self.mode != Mode::Mix {
                None
            } else {
                self.reference.clone()
            },
            is_demo: demo,
        };

        let mut effects = Vec::with_capacity(2);
        if let Some(job_id) = self.stop_polling() {
            effects.push(Effect::StopPolling { job_id });
        }

        self.submission_seq += 1;
        let submission = self.submission_seq;
        self.uploading = Some(submission);
        self.phase = JobPhase::Uploading;
        self.status = STATUS_UPLOADING.to_string();
        self.set_progress(0.0, LABEL_UPLOADING);
        self.dirty = true;

        mentor_info!(
            "Submission #{} mode={} genre={} demo={} bytes={}",
            submission,
            request.mode.as_str(),
            request.genre,
            demo,
            request.upload_bytes()
        );
        effects.push(Effect::Upload {
            submission,
            request,
        });
        effects
    }

    pub fn on_upload_progress(&mut self, submission: u64, sent: u64, total: u64) {
        if self.uploading != Some(submission) {
            return;
        }
        self.set_progress(upload_progress(sent, total), LABEL_UPLOADING);
        self.dirty = true;
    }

    pub fn on_upload_finished(
        &mut self,
        submission: u64,
        result: Result<JobId, UploadFailure>,
    ) -> Vec<Effect> {
        if self.uploading != Some(submission) {
            mentor_debug!("Dropping upload result for superseded submission #{}", submission);
            return Vec::new();
        }
        self.uploading = None;
        self.dirty = true;

        match result {
            Ok(job_id) => {
                mentor_info!("Submission #{} accepted as job {}", submission, job_id);
                self.active_job = Some(job_id.clone());
                self.polling_active = true;
                self.phase = JobPhase::Queued;
                self.status = STATUS_QUEUED.to_string();
                self.set_progress(UPLOAD_SHARE, &stage_label("queued"));
                vec![Effect::StartPolling {
                    job_id,
                    interval: POLL_INTERVAL,
                }]
            }
            Err(failure) => {
                self.phase = JobPhase::Failed;
                self.status = match failure {
                    UploadFailure::Network => STATUS_UPLOAD_NETWORK,
                    UploadFailure::TooLarge => STATUS_UPLOAD_TOO_LARGE,
                    UploadFailure::Rejected { .. } | UploadFailure::InvalidResponse => {
                        STATUS_UPLOAD_FAILED
                    }
                }
                .to_string();
                Vec::new()
            }
        }
    }

    /// Applies one status report. Reports for anything but the active job are ignored.
    pub fn on_poll_result(&mut self, job_id: &str, report: PollReport) -> Vec<Effect> {
        if !self.is_current_poll(job_id) {
            mentor_debug!("Dropping stale poll result for job {}", job_id);
            return Vec::new();
        }
        self.dirty = true;

        let phase = JobPhase::from_status(&report.status);
        match phase {
            JobPhase::Done => {
                match ResultDocument::from_value(report.result) {
                    Ok(doc) => {
                        mentor_info!("Job {} complete", job_id);
                        self.result = Some(render_result(&doc));
                        self.document = Some(doc);
                        self.phase = JobPhase::Done;
                        self.status = STATUS_DONE.to_string();
                        self.set_progress(1.0, LABEL_COMPLETE);
                    }
                    Err(err) => {
                        mentor_warn!("Job {} finished with unusable result: {}", job_id, err);
                        self.phase = JobPhase::Failed;
                        self.status = STATUS_MALFORMED_RESULT.to_string();
                        self.set_progress(1.0, LABEL_FAILED);
                    }
                }
                self.finish_polling()
            }
            JobPhase::Failed => {
                mentor_info!(
                    "Job {} failed (status={}, error={:?})",
                    job_id,
                    report.status,
                    report.error
                );
                self.phase = JobPhase::Failed;
                self.status = match report.error.as_deref().map(str::trim) {
                    Some(error) if !error.is_empty() => format!("Analyse feilet: {error}"),
                    _ => STATUS_FAILED.to_string(),
                };
                self.set_progress(1.0, LABEL_FAILED);
                self.finish_polling()
            }
            _ => {
                let label = stage_label(report.stage.as_deref().unwrap_or(&report.status));
                mentor_debug!("Job {} at {} ({:?})", job_id, label, report.progress);
                self.phase = phase;
                self.status = format!("Prosesserer: {label}");
                // A zero (or missing) progress would drop the bar below the upload share.
                let progress = report
                    .progress
                    .map(|p| p as f32)
                    .filter(|p| *p > 0.0)
                    .unwrap_or(DEFAULT_STAGE_PROGRESS);
                self.set_progress(progress, &format!("Steg: {label}"));
                Vec::new()
            }
        }
    }

    /// A failed status fetch. Polling carries on with the next tick.
    pub fn on_poll_error(&mut self, job_id: &str, message: &str) {
        if !self.is_current_poll(job_id) {
            return;
        }
        mentor_warn!("Polling job {} failed: {}", job_id, message);
        self.status = STATUS_POLL_ERROR.to_string();
        self.dirty = true;
    }

    fn is_current_poll(&self, job_id: &str) -> bool {
        self.polling_active && self.active_job.as_deref() == Some(job_id)
    }

    fn finish_polling(&mut self) -> Vec<Effect> {
        match self.stop_polling() {
            Some(job_id) => vec![Effect::StopPolling { job_id }],
            None => Vec::new(),
        }
    }

    /// Clears the polling flag and returns the job whose loop must be cancelled.
    fn stop_polling(&mut self) -> Option<JobId> {
        if !self.polling_active {
            return None;
        }
        self.polling_active = false;
        self.active_job.clone()
    }

    fn set_progress(&mut self, value: f32, label: &str) {
        self.progress = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.progress_label = label.to_string();
    }
}

fn percent(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 100.0).round() as u8
}
