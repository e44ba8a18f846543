//! Application configuration.
//!
//! Values come from, in order of precedence: command-line flags, the
//! `MIXMENTOR_BASE_URL` environment variable (folded into the flag by clap),
//! the optional RON file, and built-in defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use mentor_logging::{mentor_info, mentor_warn};
use mixmentor_engine::ApiSettings;
use serde::{Deserialize, Serialize};

use super::cli::Cli;
use super::logging::LogDestination;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Contents of `mixmentor.ron`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub max_upload_mb: Option<u64>,
    pub log_destination: Option<LogDestination>,
    pub log_level: Option<String>,
    pub output_dir: Option<PathBuf>,
}

/// Values given on the command line (or through the environment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub log_destination: Option<LogDestination>,
    pub log_level: Option<String>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            log_destination: cli.log,
            log_level: cli.log_level.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    /// Where finished results are exported when no `--save` is given.
    pub output_dir: Option<PathBuf>,
}

/// Reads the config file. A missing file yields defaults.
pub fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("reading config file {}", path.display()))
        }
    };
    let config = ron::from_str(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    mentor_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

pub fn resolve(overrides: &Overrides, file: FileConfig) -> AppConfig {
    let mut api = ApiSettings::default();
    if let Some(base_url) = overrides.base_url.clone().or(file.base_url) {
        api.base_url = base_url;
    }
    if let Some(secs) = file.connect_timeout_secs {
        api.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(mb) = file.max_upload_mb {
        api.max_upload_bytes = mb.saturating_mul(1024 * 1024);
    }

    let level_name = overrides.log_level.as_deref().or(file.log_level.as_deref());
    let log_level = match level_name {
        Some(name) => mentor_logging::parse_level(name).unwrap_or_else(|| {
            mentor_warn!("Unknown log level {:?}; using {}", name, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    AppConfig {
        api,
        log_destination: overrides
            .log_destination
            .or(file.log_destination)
            .unwrap_or_default(),
        log_level,
        output_dir: file.output_dir,
    }
}
