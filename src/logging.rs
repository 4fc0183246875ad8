//! Subscriber setup for binaries and tests that embed the engine.

use tracing_subscriber::{fmt, EnvFilter};

use crate::types::{CheckError, Result};

/// Level applied to every target other than this crate when only a bare level is given.
const OTHER_TARGETS: &str = "warn";

/// Installs a global `fmt` subscriber.
///
/// A bare level such as `"debug"` applies to this crate's events only, other targets
/// stay at `warn`. Anything containing `=` or `,` is taken as a full `EnvFilter`
/// directive list.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(log_filter(level)?)
        .with_target(true)
        .try_init()
        .map_err(|_| CheckError::Logging("logging already initialized".into()))
}

fn log_filter(level: &str) -> Result<EnvFilter> {
    let directives = if level.contains(|c: char| c == '=' || c == ',') {
        level.to_owned()
    } else {
        format!("{OTHER_TARGETS},{}={level}", env!("CARGO_CRATE_NAME"))
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| CheckError::Logging(format!("invalid directives {directives:?}: {e}")))
}
