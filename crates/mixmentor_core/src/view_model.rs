use crate::{JobId, JobPhase, Mode, ResultView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTab {
    pub mode: Mode,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub mode: Mode,
    pub tabs: Vec<ModeTab>,
    pub vocal_style_visible: bool,
    pub reference_visible: bool,
    /// `(key, label)` pairs; the key is what gets submitted.
    pub genre_options: Vec<(String, String)>,
    pub genres_from_backend: bool,
    pub selected_genre: String,
    pub vocal_styles: Vec<String>,
    pub selected_vocal_style: String,
    pub audio_name: Option<String>,
    pub reference_name: Option<String>,
    pub phase: JobPhase,
    pub status: String,
    /// Overall progress in `[0, 1]`.
    pub progress: f32,
    pub progress_percent: u8,
    pub progress_label: String,
    pub active_job: Option<JobId>,
    pub polling_active: bool,
    pub result: Option<ResultView>,
    pub dirty: bool,
}
