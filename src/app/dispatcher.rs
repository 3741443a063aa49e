//! Request dispatcher.
//!
//! Turns an endpoint, payload and verb into one [`ApiRequest`], runs it
//! through the configured [`HttpTransport`] and normalizes the outcome.
//! Remote and transport failures are reported through the configured
//! [`crate::domain::SdkLogger`] before being returned.

use std::sync::Arc;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::ClientConfig;
use crate::domain::{
    API_KEY_HEADER, ApiRequest, ApiResult, DEFAULT_FAILURE_MESSAGE, HttpMethod, HttpTransport,
    LogContext, Payload, RequestBody, ResponseEnvelope, SdkError, TransportResponse,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds, sends and normalizes API requests
#[derive(Clone)]
pub struct Dispatcher {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request for `endpoint` without sending it.
    ///
    /// For GET and DELETE a JSON object payload is moved into the query
    /// string; null entries are dropped.
    pub fn build_request(
        &self,
        endpoint: &str,
        payload: Payload,
        method: HttpMethod,
    ) -> ApiResult<ApiRequest> {
        let mut url = format!("{}{}", self.config.base_url(), endpoint);

        let mut headers = vec![(API_KEY_HEADER.to_string(), self.config.api_key().to_string())];
        if !payload.is_multipart() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        let body = if method.carries_body() {
            match payload {
                Payload::None => RequestBody::Empty,
                Payload::Json(value) => RequestBody::Json(value),
                Payload::Multipart(form) => RequestBody::Multipart(form),
            }
        } else {
            if let Payload::Json(Value::Object(map)) = &payload {
                let pairs = query_pairs(map);
                if !pairs.is_empty() {
                    url = append_query(&url, &pairs)?;
                }
            }
            RequestBody::Empty
        };

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send one request and normalize the result.
    #[instrument(skip(self, payload))]
    pub async fn dispatch(
        &self,
        endpoint: &str,
        payload: Payload,
        method: HttpMethod,
    ) -> ApiResult<ResponseEnvelope> {
        let request = self
            .build_request(endpoint, payload, method)
            .map_err(|e| self.report(endpoint, e))?;

        debug!(url = %request.url, "Dispatching API request");

        let outcome = match self.transport.execute(request).await {
            Ok(response) => normalize(response),
            Err(e) => Err(SdkError::Transport(e.0)),
        };

        outcome.map_err(|e| self.report(endpoint, e))
    }

    fn report(&self, endpoint: &str, err: SdkError) -> SdkError {
        let detail = err
            .remote_body()
            .cloned()
            .unwrap_or_else(|| Value::String(err.message()));

        error!(endpoint = %endpoint, error = %err, "API request failed");
        self.config.logger().error(
            "API request failed",
            &LogContext {
                endpoint: endpoint.to_string(),
                error: detail,
            },
        );
        err
    }
}

/// Stringified query entries, skipping nulls. Strings are sent unquoted.
fn query_pairs(map: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key.clone(), s.clone())),
            other => Some((key.clone(), other.to_string())),
        })
        .collect()
}

fn append_query(url: &str, pairs: &[(String, String)]) -> ApiResult<String> {
    let mut parsed =
        Url::parse(url).map_err(|e| SdkError::Transport(format!("Invalid URL {url}: {e}")))?;
    parsed
        .query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Ok(parsed.into())
}

fn normalize(response: TransportResponse) -> ApiResult<ResponseEnvelope> {
    if response.is_success() {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            // 204 and friends: nothing to decode
            return Ok(ResponseEnvelope::empty_success());
        }
        return serde_json::from_slice::<Value>(&response.body)
            .map(ResponseEnvelope::from_body)
            .map_err(|e| SdkError::Transport(format!("Invalid response body: {e}")));
    }

    let body = if response.body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice::<Value>(&response.body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&response.body).into_owned())
            }),
        )
    };

    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

    Err(SdkError::Remote {
        status: response.status,
        message,
        body,
    })
}
