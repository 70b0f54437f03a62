//! Tracing bootstrap shared by the binaries.
//!
//! Logs go to stderr so the REPL's stdout stays clean. `RUST_LOG`, when set,
//! overrides the configured filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },
}

/// Installs the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed (by an earlier
/// call or by the host process), which is not an error.
///
/// # Errors
/// - Returns [`LoggingError::InvalidFilter`] when `filter` is not a valid
///   tracing directive.
pub fn init_logging(filter: &str) -> Result<bool, LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => {
            EnvFilter::try_new(filter.trim()).map_err(|source| LoggingError::InvalidFilter {
                filter: filter.to_string(),
                source,
            })?
        }
    };

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}
