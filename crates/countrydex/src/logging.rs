//! Diagnostics for countrydex.
//!
//! Fetch progress, favourites persistence and storage activity are reported
//! through `tracing`. Everything goes to stderr: stdout carries the rendered
//! country list, which must stay clean when piped (notably `--format json`).

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much diagnostic output to emit, set by `-q` / `-v` / `-vv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Load summaries and favourite changes.
    #[default]
    Normal,
    /// Requests, renders and storage writes.
    Verbose,
    /// Everything.
    Trace,
}

impl Verbosity {
    /// The most detailed level shown.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Install the stderr subscriber for the `countrydex` target.
///
/// `RUST_LOG` overrides `verbosity` when set, e.g.
/// `RUST_LOG=countrydex=debug,reqwest=debug` to also see HTTP client logs.
/// Calling this more than once is harmless.
///
/// # Examples
///
/// ```no_run
/// use countrydex::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("countrydex={}", verbosity.level());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Warnings only, captured by the test harness.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
