use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mixmentor_core::Mode;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "mixmentor.ron";

/// Command-line arguments for mixmentor
#[derive(Parser, Debug)]
#[command(name = "mixmentor")]
#[command(about = "Upload a recording to the MixMentor backend and show the analysis")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "MIXMENTOR_BASE_URL")]
    pub base_url: Option<String>,

    /// Optional RON configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Where log output goes
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogDestination>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

impl Cli {
    /// The subcommand to run. Bare invocation means `analyze`.
    pub fn into_command(self) -> Command {
        match self.command {
            Some(command) => command,
            None => Command::Analyze(self.analyze),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Upload audio (or request a demo) and follow the job to completion
    Analyze(AnalyzeArgs),
    /// Render a stored result by job id
    Result {
        job_id: String,
        /// Expand the technical appendix
        #[arg(long)]
        appendix: bool,
        /// Also write the document as JSON into this directory
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Check that the backend answers
    Health,
    /// List the genre vocabulary
    Genres,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    /// Analysis mode
    #[arg(long, value_enum, default_value_t = ModeArg::Vocal)]
    pub mode: ModeArg,

    /// Genre key, as listed by `mixmentor genres`
    #[arg(long)]
    pub genre: Option<String>,

    /// Vocal style (vocal mode only)
    #[arg(long = "style")]
    pub vocal_style: Option<String>,

    /// Main audio file
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Reference track (mix mode only)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Ask the backend for a demo analysis; no audio is uploaded
    #[arg(long)]
    pub demo: bool,

    /// Expand the technical appendix
    #[arg(long)]
    pub appendix: bool,

    /// Write the finished result as JSON into this directory
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Vocal,
    Mix,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Vocal => Mode::Vocal,
            ModeArg::Mix => Mode::Mix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mixmentor").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn bare_invocation_analyzes() {
        let cli = parse(&["--audio", "take.wav", "--genre", "Pop", "--style", "Rap"]);
        match cli.into_command() {
            Command::Analyze(args) => {
                assert_eq!(args.mode, ModeArg::Vocal);
                assert_eq!(args.audio, Some(PathBuf::from("take.wav")));
                assert_eq!(args.genre.as_deref(), Some("Pop"));
                assert_eq!(args.vocal_style.as_deref(), Some("Rap"));
                assert!(!args.demo);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn result_subcommand_takes_job_id() {
        let cli = parse(&["result", "abc-123", "--appendix"]);
        assert_eq!(
            cli.into_command(),
            Command::Result {
                job_id: "abc-123".to_string(),
                appendix: true,
                save: None,
            }
        );
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = parse(&["health", "--base-url", "http://backend:5005", "--log", "both"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://backend:5005"));
        assert_eq!(cli.log, Some(LogDestination::Both));
        assert_eq!(cli.into_command(), Command::Health);
    }

    #[test]
    fn mix_mode_parses() {
        let cli = parse(&["analyze", "--mode", "mix", "--demo"]);
        match cli.into_command() {
            Command::Analyze(args) => {
                assert_eq!(Mode::from(args.mode), Mode::Mix);
                assert!(args.demo);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
