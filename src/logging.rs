//! Tracing subscriber setup for the command-line binary.

use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Maps `-v` occurrences to a default log level.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` directives, when set, take precedence over the
/// verbosity-derived default. Calling this more than once is harmless: later
/// calls leave the first subscriber in place.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbosity).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = tracing::subscriber::set_global_default(subscriber);
}
