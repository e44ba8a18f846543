//! MixMentor core: pure job lifecycle state machine, translation tables and
//! result rendering. No I/O happens here.
use std::time::Duration;

mod effect;
mod msg;
mod render;
mod result;
mod state;
mod submission;
mod translate;
mod update;
mod view_model;
mod vocabulary;

pub use effect::Effect;
pub use msg::{Msg, PollReport, UploadFailure};
pub use render::{
    render_result, Card, CardKind, ResultView, ScoreEntry, APPENDIX_TITLE, AB_COMPARE_TITLE,
    BPM_KEY_TITLE, MATCH_SUGGESTIONS_TITLE, MIXING_TITLE, RECOMMENDATIONS_TITLE, RECORDING_TITLE,
    SCORES_TITLE, SUMMARY_TITLE,
};
pub use result::{AbCompare, BpmKey, Recommendations, ResultDocument, ResultParseError};
pub use state::{
    AppState, JobId, JobPhase, Mode, DEFAULT_STAGE_PROGRESS, LABEL_COMPLETE, LABEL_FAILED,
    LABEL_UPLOADING, STATUS_DONE, STATUS_FAILED, STATUS_MALFORMED_RESULT, STATUS_POLL_ERROR,
    STATUS_QUEUED, STATUS_SELECT_FILE, STATUS_UPLOADING, STATUS_UPLOAD_FAILED,
    STATUS_UPLOAD_NETWORK, STATUS_UPLOAD_TOO_LARGE,
};
pub use submission::{upload_progress, AudioFile, JobSubmission, UPLOAD_SHARE};
pub use translate::{genre_label, score_label, stage_label};
pub use update::update;
pub use view_model::{AppViewModel, ModeTab};
pub use vocabulary::{GenreList, FALLBACK_GENRES, VOCAL_STYLES};

/// Fixed cadence of job status polling.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
