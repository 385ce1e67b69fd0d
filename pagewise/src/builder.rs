//! Builder callbacks that turn snapshots into host nodes.

use crate::config::ScrollConfig;
use crate::value::PageError;

/// Information available to every builder call.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Frame being rendered.
    pub frame: u64,
    /// Scroll options of the view being rendered.
    pub scroll: &'a ScrollConfig,
}

/// Builds the nodes of a paged view.
///
/// `Node` is whatever the render host composes: a widget, a line of text, a
/// draw command.
pub trait PagedBuilder<V> {
    /// Host node type.
    type Node;

    /// Node for the item at `index`. `items` holds every loaded item.
    fn item(&self, cx: &BuildContext<'_>, items: &[V], index: usize) -> Self::Node;

    /// Shown instead of the host when the source has no items at all.
    fn empty(&self, cx: &BuildContext<'_>) -> Self::Node;

    /// Shown while the first page loads.
    fn loading(&self, cx: &BuildContext<'_>) -> Self::Node;

    /// Shown when the first page failed.
    fn error(&self, cx: &BuildContext<'_>, error: &PageError) -> Self::Node;

    /// Footer shown while more pages are available.
    fn load_more_indicator(&self, cx: &BuildContext<'_>) -> Self::Node;

    /// Footer shown when a subsequent page failed.
    fn load_more_error(&self, cx: &BuildContext<'_>, error: &PageError) -> Self::Node;
}

/// Builder for the list variant, which also draws separators.
pub trait SeparatedBuilder<V>: PagedBuilder<V> {
    /// Separator placed after slot `index`.
    fn separator(&self, cx: &BuildContext<'_>, index: usize) -> Self::Node;
}
