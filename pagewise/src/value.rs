//! Paged value snapshots and page batches.

use thiserror::Error;

/// Error carried inside a paged value snapshot.
///
/// Snapshots are cloned on every read, so the error is a plain message
/// rather than a boxed source error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PageError {
    /// Error message
    pub message: String,
}

impl PageError {
    /// Create a new page error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for PageError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for PageError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Snapshot of pagination progress.
///
/// `Data` may carry a trailing `error` next to a non-empty item list. That
/// is a failed *subsequent* page fetch: the pages loaded before it stay
/// visible. `next_page_key` is `None` once pagination is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub enum PagedValue<K, V> {
    /// The first page is being fetched.
    Loading,
    /// The first page failed to load.
    Error(PageError),
    /// At least one page has loaded.
    Data {
        /// Items of every page loaded so far, in order.
        items: Vec<V>,
        /// Key of the next page, if there is one.
        next_page_key: Option<K>,
        /// Failure of the most recent subsequent page fetch.
        error: Option<PageError>,
    },
}

impl<K, V> Default for PagedValue<K, V> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<K, V> PagedValue<K, V> {
    /// Create a data snapshot without a trailing error.
    pub fn data(items: Vec<V>, next_page_key: Option<K>) -> Self {
        Self::Data {
            items,
            next_page_key,
            error: None,
        }
    }

    /// Check if the first page is still loading
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the first page failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Loaded items, or an empty slice before the first page arrives.
    pub fn items(&self) -> &[V] {
        match self {
            Self::Data { items, .. } => items,
            _ => &[],
        }
    }

    /// Key of the next page, if any.
    pub fn next_page_key(&self) -> Option<&K> {
        match self {
            Self::Data { next_page_key, .. } => next_page_key.as_ref(),
            _ => None,
        }
    }

    /// The trailing page error carried by a `Data` snapshot.
    ///
    /// The initial-load error of an `Error` snapshot is not
    /// returned here; the two are rendered differently.
    pub fn trailing_error(&self) -> Option<&PageError> {
        match self {
            Self::Data { error, .. } => error.as_ref(),
            _ => None,
        }
    }

    /// Returns `true` when more pages can be requested.
    pub fn has_more(&self) -> bool {
        self.next_page_key().is_some()
    }
}

/// One batch of items returned by a page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<K, V> {
    items: Vec<V>,
    next_key: Option<K>,
}

impl<K, V> Page<K, V> {
    /// Creates a last page (no next key).
    pub fn new(items: Vec<V>) -> Self {
        Self {
            items,
            next_key: None,
        }
    }

    /// Sets the key used to fetch the page after this one.
    pub fn with_next_key(mut self, key: K) -> Self {
        self.next_key = Some(key);
        self
    }

    /// Returns a reference to the items in this page.
    pub fn items(&self) -> &[V] {
        &self.items
    }

    /// Returns the key of the following page, if available.
    pub fn next_key(&self) -> Option<&K> {
        self.next_key.as_ref()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_key.is_some()
    }

    /// Consumes the page and returns its items and next key.
    pub fn into_parts(self) -> (Vec<V>, Option<K>) {
        (self.items, self.next_key)
    }
}
