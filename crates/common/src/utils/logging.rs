use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when the server runs with verbose diagnostics enabled.
pub const DEBUG_FILTER: &str = "debug,tower_http=debug,axum=info";
/// Default filter for normal operation.
pub const INFO_FILTER: &str = "info,tower_http=info,axum=info";

/// Pick the default filter for the given verbosity.
pub fn default_filter(debug: bool) -> &'static str {
    if debug { DEBUG_FILTER } else { INFO_FILTER }
}

/// Initialize tracing subscriber with sensible defaults and stdout writer.
/// - Respects `RUST_LOG` if set
/// - Falls back to `info,tower_http=info,axum=info`
pub fn init_logging_default() {
    init_logging_with(INFO_FILTER);
}

/// Same as [`init_logging_default`] but with a caller supplied fallback filter.
pub fn init_logging_with(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, otherwise uses `default_filter`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Logging for command line tools: stderr only, so stdout stays clean for output.
pub fn init_logging_stderr(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_selects_filter() {
        assert_eq!(default_filter(true), DEBUG_FILTER);
        assert_eq!(default_filter(false), INFO_FILTER);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging_default();
        init_logging_with(DEBUG_FILTER);
        init_logging_json(INFO_FILTER);
    }
}
