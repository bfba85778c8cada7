//! Cursor pagination
//!
//! A [`CursorPager`] fetches one page of a collection for a cursor and a
//! limit. [`HttpPager`] is the backend implementation; screens and the
//! aggregator only depend on the trait.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

use crate::envelope::EnvelopeLayout;
use crate::fetch::{FetchRequest, HttpFetcher};
use crate::{FetchError, Result};

/// One page of a cursor-paginated collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in backend order
    pub items: Vec<T>,
    /// Cursor to send for the next page; opaque to the client
    pub next_cursor: u64,
    /// Whether the backend has more items after this page
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A final page with the given items
    pub fn last(items: Vec<T>, cursor: u64) -> Self {
        Self {
            items,
            next_cursor: cursor,
            has_more: false,
        }
    }
}

/// Source of cursor-paginated pages
#[async_trait]
pub trait CursorPager: Send + Sync {
    /// The record type of the collection
    type Item: Send;

    /// Fetch the page starting at `cursor` with at most `limit` items
    async fn fetch_page(&self, cursor: u64, limit: u32) -> Result<Page<Self::Item>>;
}

/// Decode a page from a full response envelope
///
/// The payload found at the layout's path must be an object with an array
/// under the layout's items field, a numeric `nextCursor` and a boolean
/// `hasMore`. A final page may omit `nextCursor`; it then echoes `cursor`.
pub fn parse_page<T: DeserializeOwned>(
    envelope: &Value,
    layout: &EnvelopeLayout,
    cursor: u64,
) -> Result<Page<T>> {
    let payload = layout.unwrap(envelope)?;
    let object = payload.as_object().ok_or_else(|| {
        FetchError::InvalidShape(format!("page at {} is not an object", layout.describe()))
    })?;

    let raw_items = object
        .get(layout.items_field())
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FetchError::InvalidShape(format!(
                "missing array `{}` at {}",
                layout.items_field(),
                layout.describe()
            ))
        })?;

    let has_more = object
        .get("hasMore")
        .and_then(Value::as_bool)
        .ok_or_else(|| FetchError::InvalidShape("missing boolean `hasMore`".to_string()))?;

    let next_cursor = match object.get("nextCursor") {
        Some(value) if !value.is_null() => value.as_u64().ok_or_else(|| {
            FetchError::InvalidShape(format!("`nextCursor` is not a cursor: {}", value))
        })?,
        _ if !has_more => cursor,
        _ => {
            return Err(FetchError::InvalidShape(
                "missing `nextCursor` on a page with `hasMore`".to_string(),
            ))
        }
    };

    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            T::deserialize(raw).map_err(|e| {
                FetchError::InvalidShape(format!("item {} at cursor {}: {}", index, cursor, e))
            })
        })
        .collect::<Result<Vec<T>>>()?;

    Ok(Page {
        items,
        next_cursor,
        has_more,
    })
}

/// Cursor pager backed by an HTTP endpoint
///
/// # Examples
/// ```
/// use orbita_client::{ClientConfig, CursorPager, EnvelopeLayout, HttpFetcher, HttpPager};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let fetcher = HttpFetcher::new(ClientConfig::from_env())?;
///     let pager: HttpPager<serde_json::Value> =
///         HttpPager::new(fetcher, "education-content", EnvelopeLayout::nested(2));
///
///     let page = pager.fetch_page(0, 10).await?;
///     println!("{} items, more: {}", page.items.len(), page.has_more);
///     Ok(())
/// }
/// ```
pub struct HttpPager<T> {
    fetcher: HttpFetcher,
    endpoint: String,
    layout: EnvelopeLayout,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpPager<T> {
    fn clone(&self) -> Self {
        Self {
            fetcher: self.fetcher.clone(),
            endpoint: self.endpoint.clone(),
            layout: self.layout.clone(),
            _item: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for HttpPager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPager")
            .field("endpoint", &self.endpoint)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T> HttpPager<T> {
    /// Create a pager for an endpoint with its envelope layout
    pub fn new(fetcher: HttpFetcher, endpoint: impl Into<String>, layout: EnvelopeLayout) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            layout,
            _item: PhantomData,
        }
    }

    /// Endpoint path relative to the base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Envelope layout of this endpoint
    pub fn layout(&self) -> &EnvelopeLayout {
        &self.layout
    }

    /// Build the request for a page
    pub fn request(&self, cursor: u64, limit: u32) -> FetchRequest {
        FetchRequest::get(self.endpoint.clone())
            .param("cursor", cursor)
            .param("limit", limit)
    }
}

#[async_trait]
impl<T> CursorPager for HttpPager<T>
where
    T: DeserializeOwned + Send,
{
    type Item = T;

    async fn fetch_page(&self, cursor: u64, limit: u32) -> Result<Page<T>> {
        if limit == 0 {
            return Err(FetchError::InvalidInput("page limit must be positive".to_string()));
        }

        let envelope = self.fetcher.get_json(&self.request(cursor, limit)).await?;
        let page = parse_page(&envelope, &self.layout, cursor).map_err(|err| {
            self.fetcher.telemetry().error(
                "page_rejected",
                &[
                    ("endpoint", self.endpoint.clone()),
                    ("cursor", cursor.to_string()),
                    ("error", err.to_string()),
                ],
            );
            err
        })?;

        self.fetcher.telemetry().debug(
            "page_fetched",
            &[
                ("endpoint", self.endpoint.clone()),
                ("cursor", cursor.to_string()),
                ("limit", limit.to_string()),
                ("items", page.items.len().to_string()),
                ("next_cursor", page.next_cursor.to_string()),
                ("has_more", page.has_more.to_string()),
            ],
        );

        Ok(page)
    }
}
