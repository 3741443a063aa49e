//! Production transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use tracing::{debug, error, instrument};

use crate::domain::{
    ApiRequest, ConfigError, FormPart, HttpMethod, HttpTransport, MultipartForm, RequestBody,
    TransportError, TransportResponse,
};

/// [`HttpTransport`] over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// Wrap an existing client, e.g. one with a proxy configured.
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn to_reqwest_form(form: MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.parts {
        out = match part {
            FormPart::Text { name, value } => out.text(name, value),
            FormPart::File {
                name,
                file_name,
                mime_type,
                bytes,
            } => {
                let mut file = Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime_type {
                    file = file
                        .mime_str(&mime)
                        .map_err(|e| TransportError(format!("invalid mime type {mime}: {e}")))?;
                }
                out.part(name, file)
            }
        };
    }
    Ok(out)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: ApiRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .http_client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            // reqwest sets the multipart content type with its boundary
            RequestBody::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, "HTTP request failed");
            TransportError(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!(status = status, error = %e, "Failed to read response body");
            TransportError(e.to_string())
        })?;

        debug!(status = status, bytes = body.len(), "HTTP exchange complete");

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), Method::DELETE);
        assert_eq!(to_reqwest_method(HttpMethod::Patch), Method::PATCH);
    }

    #[test]
    fn test_form_rejects_invalid_mime() {
        let form = MultipartForm::new().file(
            "qrImage",
            "qr.png",
            Some("not a mime".to_string()),
            vec![1, 2, 3],
        );
        assert!(to_reqwest_form(form).is_err());
    }

    #[test]
    fn test_form_accepts_text_and_file() {
        let form = MultipartForm::new()
            .text("action", "dana-qris-create")
            .file("qrImage", "qr.png", Some("image/png".to_string()), vec![0x89]);
        assert!(to_reqwest_form(form).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let result = transport
            .execute(ApiRequest {
                method: HttpMethod::Get,
                url: "http://127.0.0.1:1/api/v1/accounts".to_string(),
                headers: vec![],
                body: RequestBody::Empty,
            })
            .await;
        assert!(result.is_err());
    }
}
