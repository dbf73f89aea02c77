use tracing_subscriber::EnvFilter;

use crate::config::app_config::DEFAULT_LOG_FILTER;

/// Parses the configured filter directives, falling back to the default
/// level when they do not parse.
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global `tracing` subscriber.
///
/// Returns false when the host already installed one.
pub fn init_tracing(log_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(log_filter))
        .try_init()
        .is_ok()
}
