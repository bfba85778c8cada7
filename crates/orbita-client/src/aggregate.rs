//! Full-collection aggregation
//!
//! The [`Aggregator`] walks a [`CursorPager`] from cursor 0 until the backend
//! reports no more pages, concatenating items in the order they arrive.
//! Pages are fetched strictly one after another because each cursor comes
//! from the previous response.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::pager::{CursorPager, Page};
use crate::telemetry::{default_telemetry, Telemetry};
use crate::{FetchError, Result};

/// Drives a pager to exhaustion
///
/// # Examples
/// ```
/// use orbita_client::{Aggregator, CancellationToken, CursorPager};
///
/// async fn example<P: CursorPager>(pager: &P) -> orbita_client::Result<usize> {
///     let token = CancellationToken::new();
///     let items = Aggregator::new(pager)
///         .with_cancellation(token)
///         .fetch_all(25)
///         .await?;
///     Ok(items.len())
/// }
/// ```
pub struct Aggregator<'p, P: ?Sized> {
    pager: &'p P,
    telemetry: Arc<dyn Telemetry>,
    cancel: Option<CancellationToken>,
}

impl<'p, P> Aggregator<'p, P>
where
    P: CursorPager + ?Sized,
{
    /// Create an aggregator over a pager
    pub fn new(pager: &'p P) -> Self {
        Self {
            pager,
            telemetry: default_telemetry(),
            cancel: None,
        }
    }

    /// Replace the telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Stop issuing requests once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fetch every page and return all items in backend order
    ///
    /// Stops when a page reports `has_more == false`, or when a page claims
    /// more items but hands back the cursor it was requested with; the items
    /// gathered through that page are returned in the latter case. Any pager
    /// error aborts the run and is returned unchanged. Cancellation yields
    /// [`FetchError::Cancelled`] and never a partial list.
    pub async fn fetch_all(&self, page_size: u32) -> Result<Vec<P::Item>> {
        if page_size == 0 {
            return Err(FetchError::InvalidInput("page size must be positive".to_string()));
        }

        let mut items = Vec::new();
        let mut cursor = 0u64;
        let mut pages = 0usize;

        loop {
            if self.is_cancelled() {
                self.report_cancelled(pages);
                return Err(FetchError::Cancelled);
            }

            let Page {
                items: page_items,
                next_cursor,
                has_more,
            } = match self.next_page(cursor, page_size).await {
                Ok(page) => page,
                Err(FetchError::Cancelled) => {
                    self.report_cancelled(pages);
                    return Err(FetchError::Cancelled);
                }
                Err(err) => {
                    self.telemetry.error(
                        "aggregation_failed",
                        &[
                            ("cursor", cursor.to_string()),
                            ("pages", pages.to_string()),
                            ("kind", format!("{:?}", err.kind())),
                        ],
                    );
                    return Err(err);
                }
            };

            pages += 1;
            self.telemetry.debug(
                "aggregation_page",
                &[
                    ("cursor", cursor.to_string()),
                    ("limit", page_size.to_string()),
                    ("items", page_items.len().to_string()),
                ],
            );
            items.extend(page_items);

            if !has_more {
                break;
            }
            if next_cursor == cursor {
                self.telemetry.warn(
                    "pagination_stalled",
                    &[("cursor", cursor.to_string()), ("pages", pages.to_string())],
                );
                break;
            }
            cursor = next_cursor;
        }

        self.telemetry.info(
            "aggregation_complete",
            &[("pages", pages.to_string()), ("items", items.len().to_string())],
        );

        Ok(items)
    }

    async fn next_page(&self, cursor: u64, limit: u32) -> Result<Page<P::Item>> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(FetchError::Cancelled),
                    page = self.pager.fetch_page(cursor, limit) => page,
                }
            }
            None => self.pager.fetch_page(cursor, limit).await,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    fn report_cancelled(&self, pages: usize) {
        self.telemetry
            .info("aggregation_cancelled", &[("pages", pages.to_string())]);
    }
}

/// Fetch a whole collection with the default telemetry and no cancellation
pub async fn fetch_all<P>(pager: &P, page_size: u32) -> Result<Vec<P::Item>>
where
    P: CursorPager + ?Sized,
{
    Aggregator::new(pager).fetch_all(page_size).await
}
