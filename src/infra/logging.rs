//! Logger capabilities for [`crate::ClientConfig`].

use tracing::error;

use crate::domain::{LogContext, SdkLogger};

/// Discards everything. Used when no logger is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl SdkLogger for NoopLogger {
    fn error(&self, _message: &str, _context: &LogContext) {}
}

/// Forwards failures to the `tracing` subscriber installed by the host application.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SdkLogger for TracingLogger {
    fn error(&self, message: &str, context: &LogContext) {
        error!(endpoint = %context.endpoint, error = %context.error, "{}", message);
    }
}
