//! Simulated paged API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use pagewise::prelude::*;

/// One record served by [`SimulatedApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: usize,
    pub title: String,
}

/// Offset-paginated API over `total` generated rows.
///
/// Every `fail_every`-th request fails once; the retried request succeeds.
#[derive(Debug)]
pub struct SimulatedApi {
    page_size: usize,
    total: usize,
    fail_every: Option<usize>,
    latency: Duration,
    requests: AtomicUsize,
}

impl SimulatedApi {
    pub fn new(page_size: usize, total: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total,
            fail_every: None,
            latency: Duration::ZERO,
            requests: AtomicUsize::new(0),
        }
    }

    /// Fail every `n`-th request. `0` disables failures.
    pub fn fail_every(mut self, n: usize) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Requests served so far, failed ones included.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher<usize, Row> for SimulatedApi {
    async fn fetch_page(&self, key: Option<usize>) -> Result<Page<usize, Row>, PageError> {
        let request = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let offset = key.unwrap_or(0);
        debug!("Request {}: offset {}", request, offset);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(n) = self.fail_every
            && request % n == 0
        {
            info!("Request {}: injected failure", request);
            return Err(PageError::new(format!("request {} timed out", request)));
        }

        let end = (offset + self.page_size).min(self.total);
        let rows = (offset..end)
            .map(|id| Row {
                id,
                title: format!("Row #{}", id + 1),
            })
            .collect();
        let page = Page::new(rows);
        Ok(if end < self.total { page.with_next_key(end) } else { page })
    }
}
