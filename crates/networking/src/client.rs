//! Remote moderation service client
//!
//! The service takes `POST {service_url}/moderate` with a JSON body
//! `{"content": "..."}` and answers `{"flagged": bool}`.

use crate::error::{Result, ServiceError};
use crate::retry::{retry, RetryConfig};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Service Trait
// =============================================================================

/// A service that judges whether content is toxic or otherwise not allowed
#[async_trait]
pub trait ModerationService: Send + Sync {
    /// Ask the service whether `content` should be blocked
    ///
    /// An error means no judgement was made; it never means "not flagged".
    async fn is_flagged(&self, content: &str) -> Result<bool>;
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the moderation client
#[derive(Debug, Clone)]
pub struct ModerationClientConfig {
    /// Base service URL, without the `/moderate` path
    pub service_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

impl Default for ModerationClientConfig {
    fn default() -> Self {
        Self {
            service_url: "https://content-moderation-server.onrender.com".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("Stellar-Press/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl ModerationClientConfig {
    /// Create a new config with a service URL
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL of the moderation endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/moderate", self.service_url.trim_end_matches('/'))
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    flagged: bool,
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the remote moderation service
///
/// # Examples
/// ```no_run
/// use networking::{ModerationClient, ModerationClientConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ModerationClient::new(ModerationClientConfig::default())?;
///
///     if client.moderate("Hello, world").await? {
///         println!("blocked");
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ModerationClient {
    client: ReqwestClient,
    config: ModerationClientConfig,
}

impl ModerationClient {
    /// Create a new moderation client
    pub fn new(config: ModerationClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ServiceError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Check content, retrying transient failures
    pub async fn moderate(&self, content: &str) -> Result<bool> {
        let result = retry(
            self.config.retry.clone(),
            ServiceError::is_retryable,
            || self.send(content),
        )
        .await;

        if let Err(err) = &result {
            tracing::warn!(endpoint = %self.config.endpoint(), error = %err, "moderation request failed");
        }

        result
    }

    /// Issue a single moderation request
    async fn send(&self, content: &str) -> Result<bool> {
        let mut req = self
            .client
            .post(self.config.endpoint())
            .json(&ModerationRequest { content });

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            };
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(format!("Failed to read response: {}", e)))?;

        let parsed: ModerationResponse =
            serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(parsed.flagged)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ModerationClientConfig {
        &self.config
    }
}

#[async_trait]
impl ModerationService for ModerationClient {
    async fn is_flagged(&self, content: &str) -> Result<bool> {
        self.moderate(content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = ModerationClientConfig::new("http://localhost:8080/")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("TestAgent/1.0")
            .with_header("X-Api-Key", "secret")
            .with_retry(RetryConfig::none());

        assert_eq!(config.endpoint(), "http://localhost:8080/moderate");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "TestAgent/1.0");
        assert_eq!(config.default_headers.get("X-Api-Key").map(String::as_str), Some("secret"));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_config_default() {
        let config = ModerationClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("Stellar-Press/"));
        assert_eq!(
            config.endpoint(),
            "https://content-moderation-server.onrender.com/moderate"
        );
    }

    #[test]
    fn test_client_new() {
        let client = ModerationClient::new(ModerationClientConfig::new("http://localhost")).unwrap();
        assert_eq!(client.config().service_url, "http://localhost");
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_string(&ModerationRequest { content: "hi" }).unwrap();
        assert_eq!(json, r#"{"content":"hi"}"#);
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let parsed: ModerationResponse =
            serde_json::from_str(r#"{"flagged": true, "scores": {"toxicity": 0.9}}"#).unwrap();
        assert!(parsed.flagged);
    }
}
