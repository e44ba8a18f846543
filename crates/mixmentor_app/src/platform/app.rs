use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use mentor_logging::{mentor_debug, mentor_error, mentor_info};
use mixmentor_core::{
    render_result, update, AppState, AppViewModel, AudioFile, GenreList, JobPhase, Msg,
    ResultDocument, VOCAL_STYLES,
};
use mixmentor_engine::{export_report, EngineCommand, EngineError, EngineEvent, EngineHandle};

use super::cli::{AnalyzeArgs, Cli, Command};
use super::config::{self, AppConfig, Overrides};
use super::effects::EffectRunner;
use super::{logging, ui};

/// How long one wait for an engine event lasts before the loop re-checks its exit condition.
const EVENT_WAIT: Duration = Duration::from_millis(100);

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let file_config = config::load_file_config(&cli.config)?;
    let config = config::resolve(&Overrides::from(&cli), file_config);
    logging::initialize(config.log_destination, config.log_level);
    mentor_info!("mixmentor starting against {}", config.api.base_url);

    let engine = EngineHandle::new(config.api.clone()).context("starting engine")?;
    let runner = EffectRunner::new(engine);

    match cli.into_command() {
        Command::Analyze(args) => analyze(runner, &config, args),
        Command::Result {
            job_id,
            appendix,
            save,
        } => show_stored_result(&runner, &config, &job_id, appendix, save),
        Command::Health => health(&runner, &config),
        Command::Genres => genres(&runner),
    }
}

/// Owns the controller state and feeds it messages, running the effects each
/// transition asks for.
pub(crate) struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub(crate) fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub(crate) fn state(&self) -> &AppState {
        &self.state
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Dispatches engine events until `done` holds, handing every changed view to `on_view`.
    pub(crate) fn pump_until(
        &mut self,
        done: impl Fn(&AppState) -> bool,
        mut on_view: impl FnMut(&AppViewModel),
    ) -> Result<(), EngineError> {
        loop {
            if self.state.consume_dirty() {
                on_view(&self.state.view());
            }
            if done(&self.state) {
                return Ok(());
            }
            if let Some(msg) = self.runner.next_msg(EVENT_WAIT)? {
                self.dispatch(msg);
            }
        }
    }
}

fn analyze(
    runner: EffectRunner,
    config: &AppConfig,
    args: AnalyzeArgs,
) -> anyhow::Result<ExitCode> {
    let audio = args.audio.as_deref().map(read_audio).transpose()?;
    let reference = args.reference.as_deref().map(read_audio).transpose()?;

    let mut session = Session::new(runner);
    session.dispatch(Msg::Started);
    session.pump_until(AppState::genres_loaded, |_| {})?;

    session.dispatch(Msg::ModeSelected(args.mode.into()));
    if let Some(genre) = args.genre {
        if !session.state().genres().contains(&genre) {
            bail!("unknown genre {genre:?}; run `mixmentor genres` for the list");
        }
        session.dispatch(Msg::GenreSelected(genre));
    }
    if let Some(style) = args.vocal_style {
        if !VOCAL_STYLES.contains(&style.as_str()) {
            bail!(
                "unknown vocal style {style:?}; expected one of {}",
                VOCAL_STYLES.join(", ")
            );
        }
        session.dispatch(Msg::VocalStyleSelected(style));
    }
    session.dispatch(Msg::AudioSelected(audio));
    session.dispatch(Msg::ReferenceSelected(reference));

    for line in ui::layout::form_lines(&session.state().view()) {
        println!("{line}");
    }

    session.dispatch(Msg::SubmitClicked { demo: args.demo });
    if session.state().phase() == JobPhase::Idle {
        println!("{}", session.state().view().status);
        return Ok(ExitCode::from(2));
    }

    let mut last_line = String::new();
    session.pump_until(
        |state| state.phase().is_terminal(),
        |view| {
            let line = ui::render::status_line(view);
            if line != last_line {
                println!("{line}");
                last_line = line;
            }
        },
    )?;

    let view = session.state().view();
    if let Some(result) = &view.result {
        println!();
        for line in ui::render::result_lines(result, args.appendix) {
            println!("{line}");
        }
    }

    if session.state().phase() != JobPhase::Done {
        return Ok(ExitCode::FAILURE);
    }
    if let (Some(job_id), Some(document)) =
        (session.state().active_job(), session.state().result_document())
    {
        if let Some(dir) = args.save.or_else(|| config.output_dir.clone()) {
            save_document(&dir, job_id, document)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn show_stored_result(
    runner: &EffectRunner,
    config: &AppConfig,
    job_id: &str,
    appendix: bool,
    save: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    runner.engine().send(EngineCommand::FetchResult {
        job_id: job_id.to_string(),
    });
    let fetched = wait_for(runner.engine(), |event| match event {
        EngineEvent::ResultFetched { result, .. } => Some(result),
        _ => None,
    })?;

    let value = match fetched {
        Ok(value) => value,
        Err(err) => {
            mentor_error!("Fetching result for job {} failed: {}", job_id, err);
            eprintln!("Kunne ikke hente resultat for {job_id}: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let document = match ResultDocument::from_value(Some(value)) {
        Ok(document) => document,
        Err(err) => {
            mentor_error!("Stored result for job {} is unusable: {}", job_id, err);
            eprintln!("Ugyldig resultat for {job_id}: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    for line in ui::render::result_lines(&render_result(&document), appendix) {
        println!("{line}");
    }
    if let Some(dir) = save.or_else(|| config.output_dir.clone()) {
        save_document(&dir, job_id, &document)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn health(runner: &EffectRunner, config: &AppConfig) -> anyhow::Result<ExitCode> {
    runner.engine().send(EngineCommand::CheckHealth);
    let result = wait_for(runner.engine(), |event| match event {
        EngineEvent::HealthChecked(result) => Some(result),
        _ => None,
    })?;
    match result {
        Ok(true) => {
            println!("Backend OK ({})", config.api.base_url);
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            println!("Backend svarer, men er ikke klar ({})", config.api.base_url);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            println!("Backend utilgjengelig ({}): {err}", config.api.base_url);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn genres(runner: &EffectRunner) -> anyhow::Result<ExitCode> {
    runner.engine().send(EngineCommand::LoadGenres);
    let keys = wait_for(runner.engine(), |event| match event {
        EngineEvent::GenresLoaded(result) => Some(result.unwrap_or_default()),
        _ => None,
    })?;
    let list = GenreList::from_backend(keys);
    for line in ui::layout::genre_lines(&list.options(), list.is_from_backend()) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Blocks until `pick` accepts an engine event. Other events are dropped.
fn wait_for<T>(
    engine: &EngineHandle,
    mut pick: impl FnMut(EngineEvent) -> Option<T>,
) -> Result<T, EngineError> {
    loop {
        if let Some(event) = engine.recv_timeout(EVENT_WAIT)? {
            match pick(event) {
                Some(value) => return Ok(value),
                None => mentor_debug!("Ignoring unrelated engine event"),
            }
        }
    }
}

fn read_audio(path: &Path) -> anyhow::Result<AudioFile> {
    let data = fs::read(path).with_context(|| format!("reading audio file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(AudioFile::new(name, data))
}

fn save_document(dir: &Path, job_id: &str, document: &ResultDocument) -> anyhow::Result<()> {
    let path = export_report(dir, job_id, document)
        .with_context(|| format!("saving result for job {job_id}"))?;
    mentor_info!("Saved result for job {} to {:?}", job_id, path);
    println!("Lagret: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixmentor_core::{CardKind, STATUS_DONE, STATUS_UPLOAD_FAILED};
    use mixmentor_engine::ApiSettings;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // The server is declared first so it drops before the runtime that started it.
    struct Backend {
        server: MockServer,
        runtime: tokio::runtime::Runtime,
    }

    impl Backend {
        fn start() -> Self {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            let server = runtime.block_on(MockServer::start());
            runtime.block_on(
                Mock::given(method("GET"))
                    .and(path("/api/genres"))
                    .respond_with(
                        ResponseTemplate::new(200).set_body_json(json!({ "genres": ["Pop", "Rock"] })),
                    )
                    .mount(&server),
            );
            Self { server, runtime }
        }

        fn mount(&self, mock: Mock) {
            self.runtime.block_on(mock.mount(&self.server));
        }

        fn session(&self) -> Session {
            let engine = EngineHandle::new(ApiSettings {
                base_url: self.server.uri(),
                ..ApiSettings::default()
            })
            .unwrap();
            Session::new(EffectRunner::new(engine))
        }
    }

    fn loaded(session: &mut Session) {
        session.dispatch(Msg::Started);
        session
            .pump_until(AppState::genres_loaded, |_| {})
            .unwrap();
    }

    #[test]
    fn demo_job_runs_to_completion() {
        let backend = Backend::start();
        backend.mount(
            Mock::given(method("POST"))
                .and(path("/api/jobs"))
                .and(body_string_contains("name=\"demo\""))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({ "job_id": "job-1", "status": "queued" })),
                )
                .expect(1),
        );
        backend.mount(
            Mock::given(method("GET"))
                .and(path("/api/jobs/job-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "job_id": "job-1",
                    "status": "processing",
                    "stage": "processing",
                    "progress": 0.5
                })))
                .up_to_n_times(1),
        );
        backend.mount(
            Mock::given(method("GET"))
                .and(path("/api/jobs/job-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "job_id": "job-1",
                    "status": "done",
                    "progress": 1.0,
                    "result": { "summary": "Fin demo.", "scores": { "loudness": 80.4 } }
                }))),
        );

        let mut session = backend.session();
        loaded(&mut session);
        assert_eq!(
            session.state().genres().keys(),
            &["Pop".to_string(), "Rock".to_string()]
        );

        session.dispatch(Msg::SubmitClicked { demo: true });
        let mut seen = Vec::new();
        session
            .pump_until(
                |state| state.phase().is_terminal(),
                |view| seen.push(view.progress),
            )
            .unwrap();

        let view = session.state().view();
        assert_eq!(view.phase, JobPhase::Done);
        assert_eq!(view.status, STATUS_DONE);
        assert_eq!(view.progress, 1.0);
        assert_eq!(view.active_job.as_deref(), Some("job-1"));
        assert!(!view.polling_active);
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
        let result = view.result.expect("rendered result");
        assert_eq!(
            result.kinds(),
            vec![
                CardKind::Summary,
                CardKind::Scores,
                CardKind::Recommendations,
                CardKind::Appendix,
            ]
        );
    }

    #[test]
    fn rejected_upload_fails_without_polling() {
        let backend = Backend::start();
        backend.mount(
            Mock::given(method("POST"))
                .and(path("/api/jobs"))
                .respond_with(ResponseTemplate::new(500)),
        );

        let mut session = backend.session();
        loaded(&mut session);
        session.dispatch(Msg::AudioSelected(Some(AudioFile::new(
            "take.wav",
            vec![1u8; 1024],
        ))));
        session.dispatch(Msg::SubmitClicked { demo: false });
        session
            .pump_until(|state| state.phase().is_terminal(), |_| {})
            .unwrap();

        assert_eq!(session.state().phase(), JobPhase::Failed);
        assert_eq!(session.state().view().status, STATUS_UPLOAD_FAILED);
        assert!(!session.state().is_polling());
    }

    #[test]
    fn missing_file_stays_idle() {
        let backend = Backend::start();
        let mut session = backend.session();
        loaded(&mut session);

        session.dispatch(Msg::SubmitClicked { demo: false });
        assert_eq!(session.state().phase(), JobPhase::Idle);
        assert_eq!(
            session.state().view().status,
            mixmentor_core::STATUS_SELECT_FILE
        );
    }
}
