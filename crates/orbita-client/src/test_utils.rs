//! Test utilities for pagination
//!
//! A scripted page source that replays canned responses and records the
//! cursors it was asked for.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

use crate::pager::{CursorPager, Page};
use crate::{FetchError, Result};

/// Split `items` into well-formed pages of `limit` items
///
/// Cursors are item offsets. An empty collection yields a single empty page.
pub fn paged<T: Clone>(items: &[T], limit: usize) -> Vec<Result<Page<T>>> {
    if items.is_empty() {
        return vec![Ok(Page::last(Vec::new(), 0))];
    }

    items
        .chunks(limit)
        .enumerate()
        .map(|(index, chunk)| {
            let end = index * limit + chunk.len();
            Ok(Page {
                items: chunk.to_vec(),
                next_cursor: end as u64,
                has_more: end < items.len(),
            })
        })
        .collect()
}

/// Pager that replays a fixed script of responses
pub struct ScriptedPager<T> {
    responses: Mutex<VecDeque<Result<Page<T>>>>,
    requests: Mutex<Vec<(u64, u32)>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl<T> ScriptedPager<T> {
    /// Create a pager from responses served in order
    pub fn new(responses: Vec<Result<Page<T>>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    /// Cancel `token` once the `calls`-th request has been answered
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    /// Number of pages requested so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Cursors in request order
    pub fn requested_cursors(&self) -> Vec<u64> {
        self.requests.lock().iter().map(|(c, _)| *c).collect()
    }

    /// Limits in request order
    pub fn requested_limits(&self) -> Vec<u32> {
        self.requests.lock().iter().map(|(_, l)| *l).collect()
    }
}

#[async_trait]
impl<T: Send> CursorPager for ScriptedPager<T> {
    type Item = T;

    async fn fetch_page(&self, cursor: u64, limit: u32) -> Result<Page<T>> {
        let calls = {
            let mut requests = self.requests.lock();
            requests.push((cursor, limit));
            requests.len()
        };

        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::InvalidInput("script exhausted".to_string())));

        if let Some((after, token)) = &self.cancel_after {
            if calls == *after {
                token.cancel();
            }
        }

        response
    }
}

#[test]
fn test_paged_shapes() {
    let pages = paged(&[1, 2, 3, 4, 5], 2);
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0], Ok(Page { items: vec![1, 2], next_cursor: 2, has_more: true }));
    assert_eq!(pages[2], Ok(Page { items: vec![5], next_cursor: 5, has_more: false }));

    let empty = paged::<u8>(&[], 3);
    assert_eq!(empty, vec![Ok(Page::last(Vec::new(), 0))]);
}
