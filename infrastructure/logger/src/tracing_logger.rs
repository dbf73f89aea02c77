use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// Forwards the business `Logger` port to `tracing` under a fixed target.
pub struct TracingLogger;

impl TracingLogger {
    pub const TARGET: &'static str = "card_reader";
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: TracingLogger::TARGET, "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: TracingLogger::TARGET, "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: TracingLogger::TARGET, "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: TracingLogger::TARGET, "{}", message);
    }
}
