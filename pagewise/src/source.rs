//! Paged data source contracts.

use async_trait::async_trait;

use crate::value::{Page, PageError, PagedValue};

/// A source of paged snapshots observed by paged views.
///
/// The source owns the pagination session. Views only read snapshots and ask
/// for more; results never come back through the call itself but through
/// the next snapshot.
#[async_trait]
pub trait PagedSource: Send + Sync + 'static {
    /// Page key type.
    type Key: Clone + Send + Sync + 'static;
    /// Item type.
    type Item: Send + Sync + 'static;

    /// Current snapshot.
    fn value(&self) -> PagedValue<Self::Key, Self::Item>;

    /// Start a fresh pagination session, discarding any previous one.
    async fn initial_load(&self);

    /// Request the page identified by `key`.
    async fn load_more(&self, key: Self::Key);
}

/// Fetches a single page. `None` asks for the first page.
#[async_trait]
pub trait PageFetcher<K, V>: Send + Sync + 'static {
    /// Fetch the page identified by `key`.
    async fn fetch_page(&self, key: Option<K>) -> Result<Page<K, V>, PageError>;
}
