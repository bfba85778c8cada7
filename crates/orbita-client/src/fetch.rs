//! HTTP fetch wrapper
//!
//! [`HttpFetcher`] issues GET requests against the configured backend, parses
//! the body as JSON and classifies every failure into a [`FetchError`]:
//! transport problems become `Network` or `Timeout`, non-success statuses
//! become `Http` with the raw body, and unparseable bodies become
//! `MalformedResponse`. It never retries.

use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::telemetry::{default_telemetry, Telemetry};
use crate::{FetchError, Result};

// =============================================================================
// Request Types
// =============================================================================

/// A GET request against a backend endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Endpoint path relative to the base URL (e.g., "education-content")
    pub path: String,
    /// Query parameters, sent in insertion order
    pub params: Vec<(String, String)>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Per-request timeout, overriding the client default
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    /// Create a GET request for an endpoint path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            headers: HashMap::new(),
            timeout: None,
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set a deadline for this request only
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// HTTP client for the content backend
///
/// Cloning is cheap; clones share the connection pool, configuration and
/// telemetry sink.
///
/// # Examples
/// ```
/// use orbita_client::{ClientConfig, FetchRequest, HttpFetcher};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let fetcher = HttpFetcher::new(ClientConfig::from_env())?;
///
///     let request = FetchRequest::get("education-content")
///         .param("cursor", 0)
///         .param("limit", 10);
///     let envelope = fetcher.get_json(&request).await?;
///
///     println!("status: {}", envelope["status"]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HttpFetcher {
    client: ReqwestClient,
    config: Arc<ClientConfig>,
    telemetry: Arc<dyn Telemetry>,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Create a new fetcher
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::InvalidInput(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
            telemetry: default_telemetry(),
        })
    }

    /// Replace the telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the telemetry sink
    pub fn telemetry(&self) -> &Arc<dyn Telemetry> {
        &self.telemetry
    }

    /// Issue a GET request and parse the body as JSON
    ///
    /// Exactly one network call is made. The body of a non-success response
    /// is captured verbatim and never parsed.
    pub async fn get_json(&self, request: &FetchRequest) -> Result<Value> {
        let url = self.config.endpoint_url(&request.path);

        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&request.params);

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }
        for (key, value) in &request.headers {
            req = req.header(key, value);
        }
        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        self.telemetry.debug(
            "request_started",
            &[("url", url.clone()), ("params", format_params(&request.params))],
        );

        let response = req.send().await.map_err(|e| {
            let err = FetchError::from_transport(e);
            self.report_failure(&url, &err);
            err
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let err = FetchError::from_transport(e);
            self.report_failure(&url, &err);
            err
        })?;

        if !status.is_success() {
            let err = FetchError::Http {
                status: status.as_u16(),
                body,
            };
            self.report_failure(&url, &err);
            return Err(err);
        }

        let value = serde_json::from_str::<Value>(&body).map_err(|e| {
            let err = FetchError::MalformedResponse(e.to_string());
            self.report_failure(&url, &err);
            err
        })?;

        self.telemetry.debug(
            "request_completed",
            &[("url", url), ("status", status.as_u16().to_string())],
        );

        Ok(value)
    }

    fn report_failure(&self, url: &str, err: &FetchError) {
        self.telemetry.error(
            "request_failed",
            &[
                ("url", url.to_string()),
                ("kind", format!("{:?}", err.kind())),
                ("error", err.to_string()),
            ],
        );
    }
}

fn format_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
