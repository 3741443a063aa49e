//! Domain traits defining contracts for external collaborators.

use async_trait::async_trait;
use serde_json::Value;

use super::request::{ApiRequest, TransportError, TransportResponse};

/// HTTP transport used by the dispatcher.
///
/// Implementations must return `Ok` for every HTTP exchange that produced a
/// response, whatever its status, and `Err` only when no response exists.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute exactly one HTTP exchange
    async fn execute(&self, request: ApiRequest) -> Result<TransportResponse, TransportError>;
}

/// Structured context attached to a logged failure.
#[derive(Debug, Clone, PartialEq)]
pub struct LogContext {
    pub endpoint: String,
    /// Remote body when one was received, otherwise the local error text
    pub error: Value,
}

/// Logging capability injected through [`crate::ClientConfig`].
pub trait SdkLogger: Send + Sync {
    fn error(&self, message: &str, context: &LogContext);
}
