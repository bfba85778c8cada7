//! Paged list controller
//!
//! Drives an infinite-scroll list from a [`CursorPager`]: the first page on
//! refresh, the next page each time the view reaches the end. Items already
//! on screen survive a failed load.

use orbita_client::telemetry::default_telemetry;
use orbita_client::{CursorPager, FetchError, Page, Result, Telemetry};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Point-in-time copy of a list's state, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    /// Items in backend order
    pub items: Vec<T>,
    /// Cursor of the next page
    pub cursor: u64,
    /// Whether another page can be loaded
    pub has_more: bool,
    /// First load in flight (nothing on screen yet)
    pub loading: bool,
    /// Refresh in flight over existing items
    pub refreshing: bool,
    /// Next-page load in flight
    pub loading_more: bool,
    /// Last failure, cleared by the next successful load
    pub error: Option<FetchError>,
}

impl<T> Default for ListSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            has_more: true,
            loading: false,
            refreshing: false,
            loading_more: false,
            error: None,
        }
    }
}

impl<T> ListSnapshot<T> {
    /// Check if any load is in flight
    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing || self.loading_more
    }
}

#[derive(Debug)]
struct ListState<T> {
    view: ListSnapshot<T>,
    // Bumped by every refresh; a next-page result from an older generation
    // is dropped.
    generation: u64,
}

/// Infinite-scroll controller over a [`CursorPager`]
///
/// # Example
///
/// ```no_run
/// # use app_state::PagedList;
/// # use app_core::ContentClient;
/// # use orbita_client::ClientConfig;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ContentClient::new(ClientConfig::from_env())?;
/// let list = PagedList::new(client.missions().pager(), 6);
///
/// list.refresh().await?;
/// while list.load_more().await? {}
/// println!("{} missions", list.snapshot().items.len());
/// # Ok(())
/// # }
/// ```
pub struct PagedList<P: CursorPager> {
    pager: P,
    page_size: u32,
    state: Mutex<ListState<P::Item>>,
    cancel: CancellationToken,
    telemetry: Arc<dyn Telemetry>,
}

impl<P> PagedList<P>
where
    P: CursorPager,
    P::Item: Clone,
{
    /// Create a list that loads `page_size` items per page
    pub fn new(pager: P, page_size: u32) -> Self {
        Self {
            pager,
            page_size,
            state: Mutex::new(ListState {
                view: ListSnapshot::default(),
                generation: 0,
            }),
            cancel: CancellationToken::new(),
            telemetry: default_telemetry(),
        }
    }

    /// Replace the telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Page size requested on every load
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ListSnapshot<P::Item> {
        self.state.lock().view.clone()
    }

    /// Number of items on screen
    pub fn len(&self) -> usize {
        self.state.lock().view.items.len()
    }

    /// Check if no items are on screen
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the list has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reload from cursor 0, replacing the items on success
    ///
    /// Returns the number of items loaded, or 0 when a newer refresh
    /// replaced this one before it finished. On failure the items already on
    /// screen are kept and the error is recorded and returned.
    pub async fn refresh(&self) -> Result<usize> {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            if state.view.items.is_empty() {
                state.view.loading = true;
            } else {
                state.view.refreshing = true;
            }
            state.view.loading_more = false;
            state.view.error = None;
            state.generation
        };

        let result = self.load(0).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            // A newer refresh owns the state now
            return result.map(|_| 0);
        }
        state.view.loading = false;
        state.view.refreshing = false;

        match result {
            Ok(page) => {
                let count = page.items.len();
                state.view.items = page.items;
                state.view.has_more = page.has_more && page.next_cursor != 0;
                state.view.cursor = page.next_cursor;
                self.telemetry.debug(
                    "list_refreshed",
                    &[("items", count.to_string()), ("has_more", page.has_more.to_string())],
                );
                Ok(count)
            }
            Err(err) => {
                self.record_failure(&mut state.view, "refresh", &err);
                Err(err)
            }
        }
    }

    /// Load the next page and append it
    ///
    /// Returns `Ok(false)` without a request when the list is exhausted or
    /// a load is already running; `Ok(true)` when a page was appended.
    pub async fn load_more(&self) -> Result<bool> {
        let (cursor, generation) = {
            let mut state = self.state.lock();
            if !state.view.has_more || state.view.is_busy() {
                return Ok(false);
            }
            state.view.loading_more = true;
            (state.view.cursor, state.generation)
        };

        let result = self.load(cursor).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            return result.map(|_| false);
        }
        state.view.loading_more = false;

        match result {
            Ok(page) => {
                let added = page.items.len();
                state.view.items.extend(page.items);
                // A page that claims more but does not advance ends the list
                state.view.has_more = page.has_more && page.next_cursor != cursor;
                state.view.cursor = page.next_cursor;
                state.view.error = None;
                self.telemetry.debug(
                    "list_page_appended",
                    &[
                        ("cursor", cursor.to_string()),
                        ("added", added.to_string()),
                        ("total", state.view.items.len().to_string()),
                    ],
                );
                Ok(true)
            }
            Err(err) => {
                self.record_failure(&mut state.view, "load_more", &err);
                Err(err)
            }
        }
    }

    /// Cancel the in-flight load and every later one
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    async fn load(&self, cursor: u64) -> Result<Page<P::Item>> {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FetchError::Cancelled),
            page = self.pager.fetch_page(cursor, self.page_size) => page,
        }
    }

    fn record_failure(&self, view: &mut ListSnapshot<P::Item>, operation: &str, err: &FetchError) {
        self.telemetry.warn(
            "list_load_failed",
            &[
                ("operation", operation.to_string()),
                ("cursor", view.cursor.to_string()),
                ("kind", format!("{:?}", err.kind())),
                ("error", err.to_string()),
            ],
        );
        view.error = Some(err.clone());
    }
}
