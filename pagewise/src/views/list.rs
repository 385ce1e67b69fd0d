//! Paged list view.

use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::binding::PagedBinding;
use crate::builder::{BuildContext, SeparatedBuilder};
use crate::config::PagedViewConfig;
use crate::error::PagerError;
use crate::frame::{FrameScheduler, RenderLoop};
use crate::host::ListHost;
use crate::plan::RenderPlan;
use crate::source::PagedSource;

use super::PagedFrame;

/// A list that requests the next page as the user scrolls toward its end.
pub struct PagedListView<S: PagedSource, B> {
    binding: PagedBinding<S>,
    builder: B,
    config: PagedViewConfig,
    scheduler: FrameScheduler,
}

impl<S: PagedSource, B> fmt::Debug for PagedListView<S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedListView")
            .field("binding", &self.binding)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S, B> PagedListView<S, B>
where
    S: PagedSource,
    B: SeparatedBuilder<S::Item>,
{
    /// Create a list with the default configuration and start the source's
    /// initial load.
    ///
    /// Infallible because the default configuration always validates; use
    /// [`with_config`](Self::with_config) for anything else.
    pub fn new(source: Arc<S>, builder: B, render_loop: &RenderLoop) -> Self {
        Self::attach(source, builder, PagedViewConfig::default(), render_loop)
    }

    /// Create a list with `config`, rejecting options a host cannot use.
    pub fn with_config(
        source: Arc<S>,
        builder: B,
        config: PagedViewConfig,
        render_loop: &RenderLoop,
    ) -> Result<Self, PagerError> {
        config.validate()?;
        Ok(Self::attach(source, builder, config, render_loop))
    }

    fn attach(source: Arc<S>, builder: B, config: PagedViewConfig, render_loop: &RenderLoop) -> Self {
        let binding = PagedBinding::attach(source, config.load_more_trigger_index, render_loop);
        Self {
            binding,
            builder,
            config,
            scheduler: render_loop.scheduler().clone(),
        }
    }

    /// Bind to another source. See [`PagedBinding::rebind`].
    pub fn set_source(&mut self, source: Arc<S>) -> bool {
        self.binding.rebind(source)
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

    /// Current configuration.
    pub fn config(&self) -> &PagedViewConfig {
        &self.config
    }

    /// Render the current snapshot through `host`.
    ///
    /// Call between `begin_frame` and `end_frame`; a next-page fetch found
    /// here is only issued when the frame ends.
    pub fn render<H>(&self, host: &mut H) -> PagedFrame<B::Node, H::Output>
    where
        H: ListHost<B::Node>,
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
                trace!("Frame {}: list with {} slots", cx.frame, slot_count);
                let output = host.build_list(
                    &self.config.scroll,
                    slot_count,
                    &mut |index| self.binding.build_slot(&self.builder, &cx, &plan, index),
                    &mut |index| self.builder.separator(&cx, index),
                );
                PagedFrame::Items(output)
            }
        }
    }
}
