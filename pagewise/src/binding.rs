//! Binding between a paged source and a view instance.
//!
//! The binding owns the view's fetch latch. It starts a pagination session
//! when attached, restarts it when the source is replaced, and schedules the
//! next-page fetch when the trigger slot is rendered.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::builder::{BuildContext, PagedBuilder};
use crate::frame::{FrameScheduler, RenderLoop, Spawn};
use crate::latch::FetchLatch;
use crate::plan::{Footer, Slot, SlotPlan};
use crate::source::PagedSource;
use crate::value::PagedValue;

/// Pagination state of one view instance.
pub struct PagedBinding<S: PagedSource> {
    source: Arc<S>,
    latch: FetchLatch,
    trigger_index: usize,
    scheduler: FrameScheduler,
    spawner: Arc<dyn Spawn>,
}

impl<S: PagedSource> fmt::Debug for PagedBinding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedBinding")
            .field("latch", &self.latch)
            .field("trigger_index", &self.trigger_index)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<S: PagedSource> PagedBinding<S> {
    /// Bind to `source` and start its initial load.
    pub fn attach(source: Arc<S>, trigger_index: usize, render_loop: &RenderLoop) -> Self {
        let binding = Self {
            source,
            latch: FetchLatch::new(),
            trigger_index,
            scheduler: render_loop.scheduler().clone(),
            spawner: Arc::clone(render_loop.spawner()),
        };
        binding.start_session();
        binding
    }

    /// Replace the bound source.
    ///
    /// Identity is pointer identity. A different source gets a fresh latch
    /// and one initial load; a fetch still running against the old source
    /// only clears the old latch. Returns `false` if `source` is already bound.
    pub fn rebind(&mut self, source: Arc<S>) -> bool {
        if Arc::ptr_eq(&self.source, &source) {
            return false;
        }
        debug!(
            "Rebinding paged view (previous fetch in flight: {})",
            self.latch.is_in_flight()
        );
        self.source = source;
        self.latch = FetchLatch::new();
        self.start_session();
        true
    }

    fn start_session(&self) {
        let source = Arc::clone(&self.source);
        self.spawner.spawn(Box::pin(async move {
            source.initial_load().await;
        }));
    }

    /// The bound source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Current snapshot of the bound source.
    pub fn snapshot(&self) -> PagedValue<S::Key, S::Item> {
        self.source.value()
    }

    /// Returns `true` while a next-page fetch is scheduled or running.
    pub fn is_fetch_in_flight(&self) -> bool {
        self.latch.is_in_flight()
    }

    /// The latch guarding this view's fetches.
    pub fn latch(&self) -> &FetchLatch {
        &self.latch
    }

    /// Distance from the end at which the next page is requested.
    pub fn trigger_index(&self) -> usize {
        self.trigger_index
    }

    /// Change the trigger distance for subsequent renders.
    pub fn set_trigger_index(&mut self, trigger_index: usize) {
        self.trigger_index = trigger_index;
    }

    /// The content slot that schedules the next fetch for `item_count` items.
    ///
    /// `None` when the trigger distance exceeds the item count. A distance
    /// of 0 yields `item_count`, which is never a content slot.
    pub fn trigger_slot(&self, item_count: usize) -> Option<usize> {
        item_count.checked_sub(self.trigger_index)
    }

    /// Called while content slot `index` is being rendered.
    ///
    /// Schedules the next-page fetch if this is the trigger slot, a next key
    /// exists and no fetch is in flight. Returns `true` if it scheduled one.
    pub fn on_content_slot(&self, index: usize, item_count: usize, next_page_key: Option<&S::Key>) -> bool {
        let Some(key) = next_page_key else {
            return false;
        };
        if self.trigger_slot(item_count) != Some(index) {
            return false;
        }
        if !self.latch.try_acquire() {
            return false;
        }
        self.schedule_fetch(key.clone());
        true
    }

    fn schedule_fetch(&self, key: S::Key) {
        let source = Arc::clone(&self.source);
        let latch = self.latch.clone();
        let spawner = Arc::clone(&self.spawner);
        debug!("Next page fetch scheduled during frame {}", self.scheduler.frame());

        self.scheduler.add_post_frame_callback(move || {
            // The error is read when the callback runs, not when it was queued.
            if let Some(error) = source.value().trailing_error() {
                debug!("Skipping next page fetch, trailing error: {}", error);
                latch.release();
                return;
            }
            spawner.spawn(Box::pin(async move {
                source.load_more(key).await;
                latch.release();
            }));
        });
    }

    /// Build the node for slot `index` of `plan`, running the trigger check
    /// for content slots.
    ///
    /// Returns `None` for indices past the last slot.
    pub fn build_slot<B>(
        &self,
        builder: &B,
        cx: &BuildContext<'_>,
        plan: &SlotPlan<'_, S::Key, S::Item>,
        index: usize,
    ) -> Option<B::Node>
    where
        B: PagedBuilder<S::Item>,
    {
        match plan.slot(index)? {
            Slot::Item(index) => {
                self.on_content_slot(index, plan.items.len(), plan.next_page_key);
                Some(builder.item(cx, plan.items, index))
            }
            Slot::Footer(Footer::Indicator) => Some(builder.load_more_indicator(cx)),
            Slot::Footer(Footer::Error(error)) => Some(builder.load_more_error(cx, error)),
        }
    }
}
