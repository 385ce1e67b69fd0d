//! Paged list and grid views.
//!
//! Both variants share [`PagedBinding`](crate::binding::PagedBinding) and
//! differ only in the host shape they hand their slots to.

mod grid;
mod list;

pub use grid::PagedGridView;
pub use list::PagedListView;

/// Result of rendering a paged view for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PagedFrame<N, O> {
    /// The loading view; the host was not involved.
    Loading(N),
    /// The initial-error view; the host was not involved.
    Error(N),
    /// The empty view; the host was not involved.
    Empty(N),
    /// What the host produced from the item and footer slots.
    Items(O),
}

impl<N, O> PagedFrame<N, O> {
    /// The host output, if items were rendered.
    pub fn items(&self) -> Option<&O> {
        match self {
            Self::Items(output) => Some(output),
            _ => None,
        }
    }

    /// Consume the frame and return the host output, if items were rendered.
    pub fn into_items(self) -> Option<O> {
        match self {
            Self::Items(output) => Some(output),
            _ => None,
        }
    }
}
