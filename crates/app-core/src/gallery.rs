//! Image gallery
//!
//! Planet image galleries. The backend answers one query with a whole
//! gallery object (no pagination); grouping by mission happens client-side.

use orbita_client::{EnvelopeLayout, FetchRequest, HttpFetcher, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::client::Resource;
use crate::filters::filter_where;

/// Default `type` query value
pub const DEFAULT_KIND: &str = "planets";

/// One gallery image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Caption
    pub title: String,
    /// NASA image library identifier
    #[serde(rename = "nasaId")]
    pub nasa_id: String,
    /// Image URL
    pub url: String,
    /// Where the image comes from
    #[serde(default)]
    pub source: String,
    /// Search keywords, used for mission grouping
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ImageItem {
    /// Whether any keyword of the image belongs to the mission group
    pub fn in_group(&self, group_key: &str) -> bool {
        let group_key = group_key.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| group_key.contains(&normalize_keyword(keyword)))
    }
}

/// Gallery returned for one query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGallery {
    /// Search suggestions offered by the backend
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Mission group keys the query matched
    #[serde(default)]
    pub matched_group_keys: Vec<String>,
    /// Total number of images known for the query
    #[serde(default)]
    pub total_items: u64,
    /// Images in backend order
    #[serde(default)]
    pub items: Vec<ImageItem>,
}

/// Query parameters of a gallery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryQuery {
    /// Content kind (`planets` unless stated otherwise)
    pub kind: String,
    /// Comma-separated NASA ids to restrict to
    pub nasa_ids: String,
    /// Free-text keyword
    pub keyword: String,
}

impl Default for GalleryQuery {
    fn default() -> Self {
        Self {
            kind: DEFAULT_KIND.to_string(),
            nasa_ids: String::new(),
            keyword: String::new(),
        }
    }
}

impl GalleryQuery {
    /// Query filtered by a free-text keyword
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Restrict to the given NASA ids
    pub fn with_nasa_ids(mut self, nasa_ids: impl Into<String>) -> Self {
        self.nasa_ids = nasa_ids.into();
        self
    }

    /// Set the content kind
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }
}

/// Lower-case a keyword and join its words with `_`
///
/// "Mars Exploration Rover" becomes "mars_exploration_rover", the form used
/// in mission group keys.
pub fn normalize_keyword(keyword: &str) -> String {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(&keyword.to_lowercase(), "_").into_owned()
}

/// Images belonging to a mission group, in original order
pub fn filter_by_group(items: &[ImageItem], group_key: &str) -> Vec<ImageItem> {
    filter_where(items, |item| item.in_group(group_key))
}

/// Image gallery service
#[derive(Debug, Clone)]
pub struct GalleryService {
    fetcher: HttpFetcher,
    resource: Resource,
}

impl GalleryService {
    /// Create a gallery service with the default resource layout
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            resource: Resource::new("files", EnvelopeLayout::nested(2)),
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

    /// Fetch the gallery of a planet (by gallery slug, e.g. "marte")
    pub async fn images(&self, planet_slug: &str, query: &GalleryQuery) -> Result<ImageGallery> {
        let resource = self.resource.child(planet_slug);
        let request = FetchRequest::get(resource.endpoint.clone())
            .param("type", &query.kind)
            .param("nasaIds", &query.nasa_ids)
            .param("keyword", &query.keyword);

        let envelope = self.fetcher.get_json(&request).await?;
        let gallery: ImageGallery = resource.layout.decode(&envelope)?;

        self.fetcher.telemetry().debug(
            "gallery_loaded",
            &[
                ("planet", planet_slug.to_string()),
                ("items", gallery.items.len().to_string()),
                ("total", gallery.total_items.to_string()),
            ],
        );
        Ok(gallery)
    }

    /// Images of a planet that belong to a mission group
    pub async fn images_by_group(
        &self,
        planet_slug: &str,
        group_key: &str,
    ) -> Result<Vec<ImageItem>> {
        let gallery = self.images(planet_slug, &GalleryQuery::default()).await?;
        Ok(filter_by_group(&gallery.items, group_key))
    }

    /// Gallery of a planet filtered server-side by keyword
    pub async fn images_by_keyword(
        &self,
        planet_slug: &str,
        keyword: &str,
    ) -> Result<ImageGallery> {
        self.images(planet_slug, &GalleryQuery::keyword(keyword)).await
    }
}
