//! Client configuration
//!
//! The only environment-driven value is the backend base URL; everything else
//! is set through the builder methods.

use std::collections::HashMap;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://back.lda-orbita.earth/api/v1/";

/// Environment variable that overrides the base URL
pub const BASE_URL_ENV: &str = "ORBITA_API_URL";

/// Configuration for the content client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://back.lda-orbita.earth/api/v1/")
    pub base_url: String,
    /// Default request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: format!("Orbita-Explorer/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create a config from `ORBITA_API_URL`, falling back to the default URL
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn from_override(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Set the default request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
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

    /// Join an endpoint path onto the base URL
    ///
    /// Exactly one `/` separates the two parts regardless of how either side
    /// is written.
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }
}
