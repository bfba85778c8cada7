//! Content client
//!
//! [`ContentClient`] is the one value screens hold to reach the backend. It
//! owns the shared [`HttpFetcher`] and hands out stateless services, so
//! tests can point everything at a mock server by changing the base URL.

use orbita_client::{ClientConfig, EnvelopeLayout, HttpFetcher, Result, Telemetry};
use std::sync::Arc;

use crate::education::EducationService;
use crate::gallery::GalleryService;
use crate::missions::MissionService;
use crate::planets::PlanetService;

/// Endpoint and envelope layout of one backend resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Endpoint path relative to the base URL
    pub endpoint: String,
    /// Where the payload sits inside the response envelope
    pub layout: EnvelopeLayout,
}

impl Resource {
    /// Create a resource description
    pub fn new(endpoint: impl Into<String>, layout: EnvelopeLayout) -> Self {
        Self {
            endpoint: endpoint.into(),
            layout,
        }
    }

    /// Same layout, endpoint extended by one path segment
    ///
    /// The segment is percent-encoded.
    pub fn child(&self, segment: &str) -> Self {
        Self {
            endpoint: format!(
                "{}/{}",
                self.endpoint.trim_end_matches('/'),
                urlencoding::encode(segment)
            ),
            layout: self.layout.clone(),
        }
    }
}

/// Entry point to the content services
///
/// # Example
///
/// ```no_run
/// # use app_core::ContentClient;
/// # use orbita_client::ClientConfig;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ContentClient::new(ClientConfig::from_env())?;
/// let page = client.missions().page(0, 6).await?;
/// println!("Got {} missions", page.items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContentClient {
    fetcher: HttpFetcher,
}

impl ContentClient {
    /// Create a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(config)?,
        })
    }

    /// Create a client around an existing fetcher
    pub fn from_fetcher(fetcher: HttpFetcher) -> Self {
        Self { fetcher }
    }

    /// Replace the telemetry sink used by every service
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.fetcher = self.fetcher.with_telemetry(telemetry);
        self
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    /// Planet data service
    pub fn planets(&self) -> PlanetService {
        PlanetService::new(self.fetcher.clone())
    }

    /// Space mission service
    pub fn missions(&self) -> MissionService {
        MissionService::new(self.fetcher.clone())
    }

    /// Educational content service
    pub fn education(&self) -> EducationService {
        EducationService::new(self.fetcher.clone())
    }

    /// Image gallery service
    pub fn gallery(&self) -> GalleryService {
        GalleryService::new(self.fetcher.clone())
    }
}
