use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => state.start(),
        Msg::ModeSelected(mode) => {
            state.select_mode(mode);
            Vec::new()
        }
        Msg::GenresLoaded(keys) => {
            state.apply_genres(keys);
            Vec::new()
        }
        Msg::GenreSelected(key) => {
            state.select_genre(&key);
            Vec::new()
        }
        Msg::VocalStyleSelected(style) => {
            state.select_vocal_style(&style);
            Vec::new()
        }
        Msg::AudioSelected(file) => {
            state.select_audio(file);
            Vec::new()
        }
        Msg::ReferenceSelected(file) => {
            state.select_reference(file);
            Vec::new()
        }
        Msg::SubmitClicked { demo } => state.begin_submission(demo),
        Msg::UploadProgress {
            submission,
            sent,
            total,
        } => {
            state.on_upload_progress(submission, sent, total);
            Vec::new()
        }
        Msg::UploadFinished { submission, result } => state.on_upload_finished(submission, result),
        Msg::PollResult { job_id, report } => state.on_poll_result(&job_id, report),
        Msg::PollFailed { job_id, message } => {
            state.on_poll_error(&job_id, &message);
            Vec::new()
        }
    };

    (state, effects)
}
