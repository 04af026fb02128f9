//! Core-node HTTP client.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::domain::{Arrival, ArrivalWindow, StopId, StopResult};
use crate::gate::SECRET_HEADER;

use super::error::UpstreamError;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the arrivals route on a core node.
const ARRIVALS_PATH: &str = "/api/v1/arrivals";

/// Maximum number of body characters kept for diagnostics.
const MAX_LOGGED_BODY: usize = 500;

/// Configuration for the upstream client.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Base URL of the core node, without a trailing slash
    pub base_url: String,
    /// Shared secret sent with every request
    pub secret: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Create a config for the given core node.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the shared secret.
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret.filter(|s| !s.is_empty());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body returned by a core node. Every field may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireEnvelope {
    stop_name: Option<String>,
    arrivals: Option<Vec<Arrival>>,
}

/// Client for a core node's arrivals route.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
}

impl UpstreamClient {
    /// Create a new client. The secret and timeout are fixed for its
    /// lifetime.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(secret) = &config.secret {
            let mut value =
                HeaderValue::from_str(secret).map_err(|_| UpstreamError::InvalidSecret)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(SECRET_HEADER), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(UpstreamError::Http)?;

        Ok(Self {
            http,
            url: format!("{}{ARRIVALS_PATH}", config.base_url),
        })
    }

    /// Full URL of the core node's arrivals route.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch arrivals for one stop from the core node.
    ///
    /// Makes exactly one attempt. A 200 response without an `arrivals`
    /// field is an empty result, not an error.
    pub async fn fetch_arrivals(
        &self,
        stop: &StopId,
        window: ArrivalWindow,
    ) -> Result<StopResult, UpstreamError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("stopId", stop.as_str().to_string()),
                ("minutes", window.as_mins().to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
            tracing::warn!(
                %stop,
                status = status.as_u16(),
                %body,
                "upstream returned an error status"
            );
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}

/// Decode a core node's 200 body.
fn parse_body(body: &str) -> Result<StopResult, UpstreamError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(StopResult::empty());
    }

    let envelope: WireEnvelope =
        serde_json::from_str(trimmed).map_err(|e| UpstreamError::Json {
            message: e.to_string(),
        })?;

    Ok(StopResult::new(
        envelope.stop_name.unwrap_or_default(),
        envelope.arrivals.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = UpstreamConfig::new("http://core:8080/")
            .with_secret(Some("s3cr3t".to_string()))
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "http://core:8080");
        assert_eq!(config.secret.as_deref(), Some("s3cr3t"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn config_defaults() {
        let config = UpstreamConfig::new("http://core:8080");

        assert_eq!(config.secret, None);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn empty_secret_is_not_sent() {
        let config = UpstreamConfig::new("http://core").with_secret(Some(String::new()));
        assert_eq!(config.secret, None);
    }

    #[test]
    fn client_creation() {
        let client = UpstreamClient::new(UpstreamConfig::new("http://core:8080")).unwrap();
        assert_eq!(client.url(), "http://core:8080/api/v1/arrivals");
    }

    #[test]
    fn secret_must_be_a_header_value() {
        let config = UpstreamConfig::new("http://core").with_secret(Some("bad\nsecret".into()));
        assert!(matches!(
            UpstreamClient::new(config),
            Err(UpstreamError::InvalidSecret)
        ));
    }

    #[test]
    fn parse_full_body() {
        let body = r#"{
            "stop_id": "8220DB001348",
            "stop_name": "Main Street",
            "arrivals": [
                {
                    "route": "46A",
                    "headsign": "Phoenix Park",
                    "agency": "Dublin Bus",
                    "scheduled_arrival": "2026-10-16T10:10:00+01:00",
                    "real_time_arrival": null,
                    "stop_id": "8220DB001348"
                },
                {
                    "route": "145",
                    "headsign": "Heuston",
                    "agency": null,
                    "scheduled_arrival": "2026-10-16T10:05:00+01:00",
                    "real_time_arrival": "2026-10-16T10:07:00+01:00",
                    "stop_id": "8220DB001348"
                }
            ]
        }"#;

        let result = parse_body(body).unwrap();
        assert_eq!(result.stop_name, "Main Street");
        // Re-sorted into display order
        let routes: Vec<_> = result.arrivals.iter().map(|a| a.route.as_str()).collect();
        assert_eq!(routes, vec!["145", "46A"]);
    }

    #[test]
    fn missing_arrivals_is_empty() {
        let result = parse_body(r#"{"stop_name": "Main Street"}"#).unwrap();
        assert_eq!(result.stop_name, "Main Street");
        assert!(result.arrivals.is_empty());

        assert!(parse_body(r#"{"arrivals": null}"#).unwrap().is_empty());
        assert!(parse_body("{}").unwrap().is_empty());
        assert!(parse_body("").unwrap().is_empty());
        assert!(parse_body("null").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            parse_body("<html>oops</html>"),
            Err(UpstreamError::Json { .. })
        ));
        assert!(matches!(
            parse_body(r#"{"arrivals": [{"route": 46}]}"#),
            Err(UpstreamError::Json { .. })
        ));
    }
}
