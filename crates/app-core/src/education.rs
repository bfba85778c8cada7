//! Educational content
//!
//! Guides and interactive activities per planet, served by a paginated
//! endpoint.

use orbita_client::{Aggregator, CursorPager, EnvelopeLayout, HttpFetcher, HttpPager, Page, Result};
use serde::{Deserialize, Serialize};

use crate::client::Resource;
use crate::filters::filter_by;

/// Kind of educational entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Reading material
    Guide,
    /// Hands-on activity
    Interactive,
}

impl ContentType {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Guide => "guide",
            ContentType::Interactive => "interactive",
        }
    }
}

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// No prior knowledge
    Beginner,
    /// Some background
    Intermediate,
    /// Solid background
    Advanced,
}

/// Educational content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationContent {
    /// Entry identifier
    pub id: String,
    /// Body identifier of the entry's planet
    pub planet_code: String,
    /// Guide or interactive activity
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Title
    pub title: String,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Estimated time to complete
    #[serde(default)]
    pub duration_minutes: u32,
    /// Topics covered
    #[serde(default)]
    pub topics: Vec<String>,
    /// Summary
    #[serde(default)]
    pub description: String,
    /// Key takeaways (guides)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
    /// Safety notes (activities)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<Vec<String>>,
    /// Activity kind (activities)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    /// Steps to follow (activities)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
}

/// Entries for one planet, by body identifier
pub fn by_planet_code(entries: &[EducationContent], planet_code: &str) -> Vec<EducationContent> {
    filter_by(entries, |e| e.planet_code.as_str(), planet_code)
}

/// Entries of one kind
pub fn by_content_type(entries: &[EducationContent], kind: ContentType) -> Vec<EducationContent> {
    filter_by(entries, |e| &e.content_type, &kind)
}

/// Educational content service
#[derive(Debug, Clone)]
pub struct EducationService {
    fetcher: HttpFetcher,
    resource: Resource,
}

impl EducationService {
    /// Create an education service with the default resource layout
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            resource: Resource::new("education-content", EnvelopeLayout::nested(2)),
        }
    }

    /// Override the endpoint and envelope layout
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// The endpoint and envelope layout in use
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Pager over the education collection
    pub fn pager(&self) -> HttpPager<EducationContent> {
        HttpPager::new(
            self.fetcher.clone(),
            self.resource.endpoint.clone(),
            self.resource.layout.clone(),
        )
    }

    /// Fetch one page of entries
    pub async fn page(&self, cursor: u64, limit: u32) -> Result<Page<EducationContent>> {
        self.pager().fetch_page(cursor, limit).await
    }

    /// Fetch every entry, `page_size` at a time
    pub async fn all(&self, page_size: u32) -> Result<Vec<EducationContent>> {
        let pager = self.pager();
        Aggregator::new(&pager)
            .with_telemetry(self.fetcher.telemetry().clone())
            .fetch_all(page_size)
            .await
    }

    /// Every entry for one planet
    pub async fn by_planet(
        &self,
        planet_code: &str,
        page_size: u32,
    ) -> Result<Vec<EducationContent>> {
        let entries = self.all(page_size).await?;
        Ok(by_planet_code(&entries, planet_code))
    }

    /// Every entry of one kind
    pub async fn by_type(
        &self,
        kind: ContentType,
        page_size: u32,
    ) -> Result<Vec<EducationContent>> {
        let entries = self.all(page_size).await?;
        Ok(by_content_type(&entries, kind))
    }
}
