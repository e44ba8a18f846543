//! Terminal front-end: argument parsing, configuration, logging and the
//! message loop that connects the core state machine to the engine.

mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
