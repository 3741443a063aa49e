//! Client configuration.
//!
//! The API key is mandatory: every constructor fails with
//! [`ConfigError::MissingApiKey`] when it is absent or blank, so a
//! misconfigured client never reaches the network.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::{ConfigError, SdkLogger};
use crate::infra::NoopLogger;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://mutasiku.co.id";

/// Default transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable client configuration
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: Arc<SecretString>,
    logger: Arc<dyn SdkLogger>,
    timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Configuration against the production host with a no-op logger.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from the environment (and `.env` when present).
    ///
    /// - `MUTASIKU_API_KEY` (required)
    /// - `MUTASIKU_BASE_URL` (optional)
    /// - `MUTASIKU_TIMEOUT_SECS` (optional, default 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("MUTASIKU_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let mut builder = Self::builder().api_key(api_key);

        if let Some(url) = env::var("MUTASIKU_BASE_URL").ok().filter(|u| !u.is_empty()) {
            builder = builder.base_url(url);
        }

        if let Ok(raw) = env::var("MUTASIKU_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                ConfigError::Environment(format!("MUTASIKU_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    pub fn logger(&self) -> &Arc<dyn SdkLogger> {
        &self.logger
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    logger: Option<Arc<dyn SdkLogger>>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn SdkLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        Ok(ClientConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: Arc::new(SecretString::from(api_key)),
            logger: self.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_fails() {
        assert_eq!(
            ClientConfig::builder().build().unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            ClientConfig::new("   ").unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("key_123").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), "key_123");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_base_url_override_is_normalized() {
        let config = ClientConfig::builder()
            .api_key("key")
            .base_url("http://127.0.0.1:8080/")
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ClientConfig::builder()
            .api_key("key")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    // Single test so the process environment is never mutated concurrently.
    #[test]
    fn test_from_env() {
        // SAFETY: no other test in this crate touches the MUTASIKU_* variables
        unsafe {
            env::set_var("MUTASIKU_API_KEY", "env_key");
            env::set_var("MUTASIKU_BASE_URL", "http://localhost:9000/");
            env::set_var("MUTASIKU_TIMEOUT_SECS", "7");
        }
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key(), "env_key");
        assert_eq!(config.base_url(), "http://localhost:9000");
        assert_eq!(config.timeout(), Duration::from_secs(7));

        unsafe {
            env::set_var("MUTASIKU_TIMEOUT_SECS", "soon");
        }
        assert_eq!(
            ClientConfig::from_env().unwrap_err(),
            ConfigError::Environment("MUTASIKU_TIMEOUT_SECS is not a number: soon".to_string())
        );

        unsafe {
            env::remove_var("MUTASIKU_TIMEOUT_SECS");
            env::remove_var("MUTASIKU_BASE_URL");
            env::remove_var("MUTASIKU_API_KEY");
        }
        assert_eq!(
            ClientConfig::from_env().unwrap_err(),
            ConfigError::MissingApiKey
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("super_secret_key").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super_secret_key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
