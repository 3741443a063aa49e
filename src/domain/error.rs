//! Error types for the SDK.
//!
//! Every operation returns [`ApiResult`]. The three failure classes a caller
//! can observe at call time are local validation, a remote HTTP error status,
//! and a transport failure with no interpretable response. Configuration
//! errors are only produced while building a [`crate::ClientConfig`].

use serde_json::Value;
use thiserror::Error;

use super::types::ResponseEnvelope;

/// Fallback message used when the remote body carries no `message`.
pub const DEFAULT_FAILURE_MESSAGE: &str = "API request failed";

/// Result alias used by every client operation.
pub type ApiResult<T> = Result<T, SdkError>;

/// Configuration errors raised while constructing the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API key is required to initialize the Mutasiku SDK")]
    MissingApiKey,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Local validation failures. No request is issued when one of these occurs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Minimum transfer amount is {minimum}")]
    BelowMinimum { minimum: i64 },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("{0}")]
    Invalid(String),
}

/// Coarse classification of an [`SdkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Remote,
    Transport,
}

/// Failure side of every client operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SdkError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The remote service answered with a non-success HTTP status.
    #[error("Remote error ({status}): {message}")]
    Remote {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// No interpretable response was received.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SdkError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Message suitable for the `message` field of a failure envelope.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Remote { message, .. } => message.clone(),
            Self::Transport(message) => message.clone(),
        }
    }

    /// Raw remote body, present only for remote failures.
    #[must_use]
    pub fn remote_body(&self) -> Option<&Value> {
        match self {
            Self::Remote { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Render this error in the uniform envelope shape.
    ///
    /// Validation failures carry no `status`.
    #[must_use]
    pub fn to_envelope(&self) -> ResponseEnvelope {
        let status = match self.kind() {
            ErrorKind::Validation => None,
            ErrorKind::Remote | ErrorKind::Transport => Some("error".to_string()),
        };
        ResponseEnvelope {
            success: false,
            status,
            message: Some(self.message()),
            data: None,
            error: self.remote_body().cloned(),
            extra: Default::default(),
        }
    }
}

impl From<SdkError> for ResponseEnvelope {
    fn from(err: SdkError) -> Self {
        err.to_envelope()
    }
}

impl ResponseEnvelope {
    /// Collapse an operation result into the single envelope shape.
    pub fn from_result(result: ApiResult<ResponseEnvelope>) -> Self {
        result.unwrap_or_else(Self::from)
    }
}
