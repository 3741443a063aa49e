//! Mock implementations for testing.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use crate::domain::{
    ApiRequest, HttpTransport, LogContext, SdkLogger, TransportError, TransportResponse,
};

/// Configuration for mock behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
    pub response: TransportResponse,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            should_fail: false,
            error_message: None,
            response: TransportResponse::json(200, &json!({"success": true, "status": "success"})),
        }
    }
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Transport spy: records every request and answers from its [`MockConfig`]
pub struct MockTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    config: MockConfig,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            config,
        }
    }

    /// Answer every request with `status` and a JSON body.
    #[must_use]
    pub fn responding(status: u16, body: Value) -> Self {
        Self::with_response(TransportResponse::json(status, &body))
    }

    #[must_use]
    pub fn with_response(response: TransportResponse) -> Self {
        Self::with_config(MockConfig {
            response,
            ..MockConfig::default()
        })
    }

    /// Fail every request below HTTP, as a dropped connection would.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// All requests seen so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(TransportError(msg));
        }
        Ok(self.config.response.clone())
    }
}

/// Logger that keeps every reported failure
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(String, LogContext)>>,
}

impl RecordingLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(String, LogContext)> {
        self.entries.lock().unwrap().clone()
    }
}

impl SdkLogger for RecordingLogger {
    fn error(&self, message: &str, context: &LogContext) {
        self.entries
            .lock()
            .unwrap()
            .push((message.to_string(), context.clone()));
    }
}
