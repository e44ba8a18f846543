use std::sync::Once;

use mixmentor_core::{
    update, upload_progress, AppState, AudioFile, Effect, JobPhase, JobSubmission, Mode, Msg,
    UploadFailure, POLL_INTERVAL, STATUS_QUEUED, STATUS_SELECT_FILE, STATUS_UPLOAD_FAILED,
    STATUS_UPLOAD_NETWORK, UPLOAD_SHARE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mentor_logging::initialize_for_tests);
}

fn started() -> AppState {
    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = update(state, Msg::GenresLoaded(Vec::new()));
    state
}

fn find_upload(effects: &[Effect]) -> (u64, JobSubmission) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Upload {
                submission,
                request,
            } => Some((*submission, request.clone())),
            _ => None,
        })
        .expect("upload effect")
}

fn take_audio() -> AudioFile {
    AudioFile::new("take.wav", vec![0u8; 64])
}

#[test]
fn submit_without_file_sends_nothing() {
    init_logging();
    let (mut state, effects) = update(started(), Msg::SubmitClicked { demo: false });

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, STATUS_SELECT_FILE);
    assert_eq!(view.phase, JobPhase::Idle);
    assert!(state.consume_dirty());
}

#[test]
fn vocal_submission_carries_style_and_audio() {
    init_logging();
    let (state, _) = update(started(), Msg::AudioSelected(Some(take_audio())));
    let (state, _) = update(
        state,
        Msg::ReferenceSelected(Some(AudioFile::new("ref.wav", vec![1u8; 8]))),
    );
    let (state, effects) = update(state, Msg::SubmitClicked { demo: false });

    let (submission, request) = find_upload(&effects);
    assert_eq!(submission, 1);
    assert_eq!(
        request.text_fields(),
        vec![
            ("mode", "vocal".to_string()),
            ("genre", "Rap/Trap".to_string()),
            ("vocal_style", "Rap".to_string()),
        ]
    );
    let files: Vec<_> = request
        .file_fields()
        .into_iter()
        .map(|(field, file)| (field, file.name.clone()))
        .collect();
    // The reference file is only sent in mix mode.
    assert_eq!(files, vec![("audio", "take.wav".to_string())]);
    assert_eq!(state.view().phase, JobPhase::Uploading);
}

#[test]
fn mix_submission_attaches_reference_without_style() {
    init_logging();
    let (state, _) = update(started(), Msg::ModeSelected(Mode::Mix));
    let (state, _) = update(state, Msg::GenreSelected("Techno".to_string()));
    let (state, _) = update(state, Msg::AudioSelected(Some(take_audio())));
    let (state, _) = update(
        state,
        Msg::ReferenceSelected(Some(AudioFile::new("ref.wav", vec![1u8; 8]))),
    );
    let (_state, effects) = update(state, Msg::SubmitClicked { demo: false });

    let (_, request) = find_upload(&effects);
    assert_eq!(
        request.text_fields(),
        vec![("mode", "mix".to_string()), ("genre", "Techno".to_string())]
    );
    let fields: Vec<_> = request.file_fields().into_iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec!["audio", "reference"]);
    assert_eq!(request.upload_bytes(), 72);
}

#[test]
fn demo_submission_omits_files() {
    init_logging();
    let (state, _) = update(started(), Msg::AudioSelected(Some(take_audio())));
    let (_state, effects) = update(state, Msg::SubmitClicked { demo: true });

    let (_, request) = find_upload(&effects);
    assert!(request.is_demo);
    assert!(request.file_fields().is_empty());
    assert_eq!(
        request.text_fields().last(),
        Some(&("demo", "true".to_string()))
    );
}

#[test]
fn upload_progress_stays_within_upload_share() {
    let total = 1_000u64;
    let mut last = 0.0f32;
    for sent in (0..=total).step_by(50) {
        let value = upload_progress(sent, total);
        assert!((0.0..=UPLOAD_SHARE).contains(&value));
        assert!(value >= last);
        last = value;
    }
    assert_eq!(upload_progress(total, total), UPLOAD_SHARE);
    assert_eq!(upload_progress(5_000, total), UPLOAD_SHARE);
    assert_eq!(upload_progress(10, 0), 0.0);
}

#[test]
fn upload_progress_updates_view_for_current_submission_only() {
    init_logging();
    let (state, _) = update(started(), Msg::SubmitClicked { demo: true });
    let (state, _) = update(
        state,
        Msg::UploadProgress {
            submission: 1,
            sent: 50,
            total: 100,
        },
    );
    assert!((state.view().progress - 0.1).abs() < 1e-6);

    let (state, _) = update(
        state,
        Msg::UploadProgress {
            submission: 7,
            sent: 100,
            total: 100,
        },
    );
    assert!((state.view().progress - 0.1).abs() < 1e-6);
}

#[test]
fn accepted_upload_starts_polling() {
    init_logging();
    let (state, _) = update(started(), Msg::SubmitClicked { demo: true });
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            submission: 1,
            result: Ok("job-1".to_string()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "job-1".to_string(),
            interval: POLL_INTERVAL,
        }]
    );
    let view = state.view();
    assert_eq!(view.phase, JobPhase::Queued);
    assert_eq!(view.status, STATUS_QUEUED);
    assert_eq!(view.progress, UPLOAD_SHARE);
    assert_eq!(view.progress_label, "I kø");
    assert_eq!(view.active_job.as_deref(), Some("job-1"));
    assert!(view.polling_active);
}

#[test]
fn failed_upload_does_not_poll() {
    init_logging();
    let (state, _) = update(started(), Msg::SubmitClicked { demo: true });
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            submission: 1,
            result: Err(UploadFailure::Rejected { status: 500 }),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status, STATUS_UPLOAD_FAILED);
    assert_eq!(state.view().phase, JobPhase::Failed);
    assert!(!state.view().polling_active);

    let (state, _) = update(state, Msg::SubmitClicked { demo: true });
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            submission: 2,
            result: Err(UploadFailure::Network),
        },
    );
    assert_eq!(state.view().status, STATUS_UPLOAD_NETWORK);
}

#[test]
fn resubmission_stops_previous_poll_loop() {
    init_logging();
    let (state, _) = update(started(), Msg::SubmitClicked { demo: true });
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            submission: 1,
            result: Ok("job-1".to_string()),
        },
    );

    let (state, effects) = update(state, Msg::SubmitClicked { demo: true });
    assert_eq!(
        effects[0],
        Effect::StopPolling {
            job_id: "job-1".to_string()
        }
    );
    assert!(matches!(effects[1], Effect::Upload { submission: 2, .. }));
    assert!(!state.view().polling_active);

    // A late upload answer for the first submission must not restart anything.
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            submission: 1,
            result: Ok("job-stale".to_string()),
        },
    );
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            submission: 2,
            result: Ok("job-2".to_string()),
        },
    );
    let starts = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::StartPolling { .. }))
        .count();
    assert_eq!(starts, 1);
    assert_eq!(state.view().active_job.as_deref(), Some("job-2"));
}
