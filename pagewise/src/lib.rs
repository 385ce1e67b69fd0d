pub mod binding;
pub mod builder;
pub mod config;
pub mod error;
pub mod frame;
pub mod host;
pub mod latch;
pub mod notifier;
pub mod plan;
pub mod source;
pub mod value;
pub mod views;
pub mod wakeup;

pub use error::PagerError;
pub use frame::RenderLoop;

pub mod prelude {
    pub use crate::binding::PagedBinding;
    pub use crate::builder::{BuildContext, PagedBuilder, SeparatedBuilder};
    pub use crate::config::{
        Axis, Clip, DragStartBehavior, GridDelegate, KeyboardDismissBehavior, Padding,
        PagedViewConfig, ScrollConfig, ScrollControllerId, ScrollPhysics,
    };
    pub use crate::error::PagerError;
    pub use crate::frame::{BlockingSpawner, FrameScheduler, RenderLoop, Spawn};
    pub use crate::host::{GridFrame, GridHost, GridLayout, ListFrame, ListHost, WindowedGrid, WindowedList};
    pub use crate::notifier::PagedValueNotifier;
    pub use crate::plan::{Footer, RenderPlan, Slot, SlotPlan};
    pub use crate::source::{PageFetcher, PagedSource};
    pub use crate::value::{Page, PageError, PagedValue};
    pub use crate::views::{PagedFrame, PagedGridView, PagedListView};
    pub use crate::wakeup::{WakeupReceiver, WakeupSender};
}
