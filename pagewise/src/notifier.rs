//! Paged source backed by a page fetcher.

use std::fmt::Debug;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use log::{debug, warn};

use crate::source::{PageFetcher, PagedSource};
use crate::value::{Page, PageError, PagedValue};
use crate::wakeup::{WakeupHandle, WakeupSender};

/// Paged source that drives a [`PageFetcher`].
///
/// Pages are appended in order. A failed subsequent page keeps the items
/// already loaded and shows up as the trailing error of the snapshot. Every
/// state change bumps the generation, marks the notifier dirty and sends a
/// wakeup signal.
///
/// # Example
///
/// ```ignore
/// let notifier = Arc::new(PagedValueNotifier::new(MyApi::new()));
/// notifier.install_wakeup(sender);
/// let list = PagedListView::new(Arc::clone(&notifier), RowBuilder, &render_loop);
/// ```
#[derive(Debug)]
pub struct PagedValueNotifier<K, V, F> {
    fetcher: F,
    state: RwLock<PagedValue<K, V>>,
    /// Incremented by every `initial_load`; late responses of older sessions
    /// are dropped.
    session: AtomicU64,
    loading_more: AtomicBool,
    generation: AtomicU64,
    dirty: AtomicBool,
    wakeup: WakeupHandle,
}

impl<K, V, F> PagedValueNotifier<K, V, F>
where
    K: Clone + PartialEq + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: PageFetcher<K, V>,
{
    /// Create a notifier in the `Loading` state. Nothing is fetched until
    /// `initial_load` runs.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: RwLock::new(PagedValue::Loading),
            session: AtomicU64::new(0),
            loading_more: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            dirty: AtomicBool::new(false),
            wakeup: WakeupHandle::new(),
        }
    }

    /// Install the sender signalled on every emitted snapshot.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.wakeup.install(sender);
    }

    /// The page fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Number of snapshots emitted so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Check if a snapshot was emitted since the last `clear_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while a subsequent page is being fetched.
    pub fn is_loading_more(&self) -> bool {
        self.loading_more.load(Ordering::SeqCst)
    }

    /// Restart pagination from the first page.
    pub async fn refresh(&self) {
        self.initial_load().await;
    }

    /// Retry whatever failed last.
    ///
    /// An initial-load error restarts the session. A trailing error is
    /// cleared (and emitted) before the failed page is requested again.
    pub async fn retry(&self) {
        match self.snapshot() {
            PagedValue::Error(_) => {
                debug!("Retrying initial load");
                self.initial_load().await;
            }
            PagedValue::Data {
                next_page_key: Some(key),
                error: Some(_),
                ..
            } => {
                debug!("Retrying page {:?}", key);
                self.update(|value| {
                    if let PagedValue::Data { error, .. } = value {
                        *error = None;
                    }
                });
                self.load_more(key).await;
            }
            _ => debug!("Nothing to retry"),
        }
    }

    fn snapshot(&self) -> PagedValue<K, V> {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn emit(&self, value: PagedValue<K, V>) {
        self.update(|state| *state = value);
    }

    fn update(&self, f: impl FnOnce(&mut PagedValue<K, V>)) {
        {
            let mut guard = self.state.write().unwrap_or_else(|poisoned| {
                warn!("Paged state lock poisoned, recovering");
                poisoned.into_inner()
            });
            f(&mut *guard);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.dirty.store(true, Ordering::SeqCst);
        self.wakeup.send();
    }

    fn is_current(&self, session: u64) -> bool {
        self.session.load(Ordering::SeqCst) == session
    }
}

#[async_trait]
impl<K, V, F> PagedSource for PagedValueNotifier<K, V, F>
where
    K: Clone + PartialEq + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: PageFetcher<K, V>,
{
    type Key = K;
    type Item = V;

    fn value(&self) -> PagedValue<K, V> {
        self.snapshot()
    }

    async fn initial_load(&self) {
        let session = self.session.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading_more.store(false, Ordering::SeqCst);
        self.emit(PagedValue::Loading);
        debug!("Session {}: loading first page", session);

        let result = self.fetcher.fetch_page(None).await;
        if !self.is_current(session) {
            debug!("Session {}: discarding first page of a replaced session", session);
            return;
        }

        match result {
            Ok(page) => {
                let (items, next_page_key) = page.into_parts();
                debug!("Session {}: first page with {} items", session, items.len());
                self.emit(PagedValue::data(items, next_page_key));
            }
            Err(error) => {
                warn!("Session {}: first page failed: {}", session, error);
                self.emit(PagedValue::Error(error));
            }
        }
    }

    async fn load_more(&self, key: K) {
        let session = self.session.load(Ordering::SeqCst);
        if self.snapshot().next_page_key() != Some(&key) {
            debug!("Ignoring request for stale page {:?}", key);
            return;
        }
        if self
            .loading_more
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Page {:?} requested while another page is loading", key);
            return;
        }

        let result: Result<Page<K, V>, PageError> = self.fetcher.fetch_page(Some(key.clone())).await;
        if !self.is_current(session) {
            debug!("Session {}: discarding page {:?} of a replaced session", session, key);
            return;
        }
        self.loading_more.store(false, Ordering::SeqCst);

        match result {
            Ok(page) => {
                let (new_items, next) = page.into_parts();
                debug!("Page {:?}: {} items, more: {}", key, new_items.len(), next.is_some());
                self.update(|value| {
                    if let PagedValue::Data {
                        items,
                        next_page_key,
                        error,
                    } = value
                    {
                        items.extend(new_items);
                        *next_page_key = next;
                        *error = None;
                    }
                });
            }
            Err(failure) => {
                warn!("Page {:?} failed: {}", key, failure);
                self.update(|value| {
                    if let PagedValue::Data { error, .. } = value {
                        *error = Some(failure);
                    }
                });
            }
        }
    }
}
