#![deny(missing_docs)]
//! Shared logging utilities for the MixMentor workspace.
//!
//! Every crate logs through the `mentor_*` macros so the facade can be swapped
//! in one place. The binary installs the real logger; tests use
//! [`initialize_for_tests`].

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! mentor_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!(target: "mixmentor", $($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! mentor_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!(target: "mixmentor", $($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! mentor_info {
    ($($arg:tt)*) => {{
        $crate::log::info!(target: "mixmentor", $($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! mentor_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!(target: "mixmentor", $($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! mentor_error {
    ($($arg:tt)*) => {{
        $crate::log::error!(target: "mixmentor", $($arg)*);
    }};
}

/// Parses a level name such as `"debug"` or `"warn"`, case-insensitively.
///
/// Unknown names yield `None` so callers can fall back to their own default.
pub fn parse_level(name: &str) -> Option<log::LevelFilter> {
    name.trim().parse::<log::LevelFilter>().ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
