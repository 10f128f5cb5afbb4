//! Structured logging set-up.
//!
//! Every component logs through `tracing`; this module installs the
//! process-wide subscriber once at start-up.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directive used when none is supplied or the supplied one is unusable.
pub const DEFAULT_DIRECTIVE: &str = "info";

const MAX_DIRECTIVE_LENGTH: usize = 4096;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(#[from] tracing_subscriber::util::TryInitError);

/// Builds a filter from `directive`, falling back to [`DEFAULT_DIRECTIVE`]
/// for blank, oversized or invalid input.
#[must_use]
pub fn filter_for(directive: Option<&str>) -> EnvFilter {
    directive
        .map(str::trim)
        .filter(|raw| !raw.is_empty() && raw.len() <= MAX_DIRECTIVE_LENGTH)
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs a formatting subscriber filtered by `directive`, typically the
/// value of `RUST_LOG`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init(directive: Option<&str>) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter_for(directive))
        .try_init()?;
    Ok(())
}
