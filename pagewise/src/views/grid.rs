//! Paged grid view.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::binding::PagedBinding;
use crate::builder::{BuildContext, PagedBuilder};
use crate::config::{GridDelegate, PagedViewConfig};
use crate::error::PagerError;
use crate::frame::{FrameScheduler, RenderLoop};
use crate::host::{GridHost, GridLayout};
use crate::plan::RenderPlan;
use crate::source::PagedSource;

use super::PagedFrame;

/// A grid that requests the next page as the user scrolls toward its end.
///
/// Same pagination rules as [`PagedListView`](super::PagedListView); the
/// footer occupies the slot after the last item.
pub struct PagedGridView<S: PagedSource, B> {
    binding: PagedBinding<S>,
    builder: B,
    config: PagedViewConfig,
    layout: GridLayout,
    scheduler: FrameScheduler,
}

impl<S: PagedSource, B> fmt::Debug for PagedGridView<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedGridView")
            .field("binding", &self.binding)
            .field("config", &self.config)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<S, B> PagedGridView<S, B>
where
    S: PagedSource,
    B: PagedBuilder<S::Item>,
{
    /// Create a grid with the default configuration and start the source's
    /// initial load.
    ///
    /// Only `delegate` can be rejected; the default configuration always
    /// validates.
    pub fn new(
        source: Arc<S>,
        builder: B,
        delegate: GridDelegate,
        render_loop: &RenderLoop,
    ) -> Result<Self, PagerError> {
        Self::with_config(source, builder, delegate, PagedViewConfig::default(), render_loop)
    }

    /// Create a grid with `config`.
    pub fn with_config(
        source: Arc<S>,
        builder: B,
        delegate: GridDelegate,
        config: PagedViewConfig,
        render_loop: &RenderLoop,
    ) -> Result<Self, PagerError> {
        delegate.validate()?;
        config.validate()?;
        let binding = PagedBinding::attach(source, config.load_more_trigger_index, render_loop);
        Ok(Self {
            binding,
            builder,
            config,
            layout: GridLayout {
                delegate,
                semantic_child_count: None,
            },
            scheduler: render_loop.scheduler().clone(),
        })
    }

    /// Announce a different slot count to accessibility services.
    pub fn semantic_child_count(mut self, count: usize) -> Self {
        self.layout.semantic_child_count = Some(count);
        self
    }

    /// Bind to another source. See [`PagedBinding::rebind`].
    pub fn set_source(&mut self, source: Arc<S>) -> bool {
        self.binding.rebind(source)
    }

    /// Replace the slot arrangement.
    pub fn set_delegate(&mut self, delegate: GridDelegate) -> Result<(), PagerError> {
        delegate.validate()?;
        self.layout.delegate = delegate;
        Ok(())
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: PagedViewConfig) -> Result<(), PagerError> {
        config.validate()?;
        self.binding.set_trigger_index(config.load_more_trigger_index);
        self.config = config;
        Ok(())
    }

    /// The bound source.
    pub fn source(&self) -> &Arc<S> {
        self.binding.source()
    }

    /// Pagination state of this view.
    pub fn binding(&self) -> &PagedBinding<S> {
        &self.binding
    }

    /// Grid layout handed to the host.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Render the current snapshot through `host`.
    pub fn render<H>(&self, host: &mut H) -> PagedFrame<B::Node, H::Output>
    where
        H: GridHost<B::Node>,
    {
        let value = self.binding.snapshot();
        let cx = BuildContext {
            frame: self.scheduler.frame(),
            scroll: &self.config.scroll,
        };

        match RenderPlan::for_value(&value) {
            RenderPlan::Loading => PagedFrame::Loading(self.builder.loading(&cx)),
            RenderPlan::Error(error) => PagedFrame::Error(self.builder.error(&cx, error)),
            RenderPlan::Empty => PagedFrame::Empty(self.builder.empty(&cx)),
            RenderPlan::Slots(plan) => {
                let slot_count = plan.slot_count();
                trace!("Frame {}: grid with {} slots", cx.frame, slot_count);
                let output = host.build_grid(
                    &self.config.scroll,
                    &self.layout,
                    slot_count,
                    &mut |index| self.binding.build_slot(&self.builder, &cx, &plan, index),
                );
                PagedFrame::Items(output)
            }
        }
    }
}
