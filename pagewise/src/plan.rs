//! Mapping a snapshot to the slots a view renders.

use crate::value::{PageError, PagedValue};

/// What a view renders for one snapshot.
#[derive(Debug)]
pub enum RenderPlan<'a, K, V> {
    /// First page still loading; only the loading view is shown.
    Loading,
    /// First page failed; only the initial-error view is shown.
    Error(&'a PageError),
    /// Loaded but no items; the empty view replaces the host entirely.
    Empty,
    /// Items are handed to the host.
    Slots(SlotPlan<'a, K, V>),
}

impl<'a, K, V> RenderPlan<'a, K, V> {
    /// Plan the render of `value`.
    pub fn for_value(value: &'a PagedValue<K, V>) -> Self {
        match value {
            PagedValue::Loading => Self::Loading,
            PagedValue::Error(error) => Self::Error(error),
            PagedValue::Data { items, .. } if items.is_empty() => Self::Empty,
            PagedValue::Data {
                items,
                next_page_key,
                error,
            } => Self::Slots(SlotPlan {
                items,
                next_page_key: next_page_key.as_ref(),
                error: error.as_ref(),
            }),
        }
    }
}

/// Content slots plus an optional trailing footer slot.
#[derive(Debug)]
pub struct SlotPlan<'a, K, V> {
    /// Loaded items, never empty.
    pub items: &'a [V],
    /// Key of the next page.
    pub next_page_key: Option<&'a K>,
    /// Trailing error of the last page fetch.
    pub error: Option<&'a PageError>,
}

// Manual impls: derive would require `K: Clone` and `V: Clone`.
impl<K, V> Clone for SlotPlan<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for SlotPlan<'_, K, V> {}

/// Content of the footer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footer<'a> {
    /// More pages are coming.
    Indicator,
    /// The last page fetch failed.
    Error(&'a PageError),
}

/// What occupies a given slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Item at this index.
    Item(usize),
    /// The trailing footer.
    Footer(Footer<'a>),
}

impl<'a, K, V> SlotPlan<'a, K, V> {
    /// Footer shown after the items, if any.
    ///
    /// An error wins over the loading indicator.
    pub fn footer(&self) -> Option<Footer<'a>> {
        match (self.error, self.next_page_key) {
            (Some(error), _) => Some(Footer::Error(error)),
            (None, Some(_)) => Some(Footer::Indicator),
            (None, None) => None,
        }
    }

    /// Total slots handed to the host.
    pub fn slot_count(&self) -> usize {
        self.items.len() + usize::from(self.footer().is_some())
    }

    /// Resolve a slot index. Returns `None` past the last slot.
    pub fn slot(&self, index: usize) -> Option<Slot<'a>> {
        if index < self.items.len() {
            Some(Slot::Item(index))
        } else if index == self.items.len() {
            self.footer().map(Slot::Footer)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(items: Vec<u32>, next: Option<&'static str>, error: Option<&str>) -> PagedValue<&'static str, u32> {
        PagedValue::Data {
            items,
            next_page_key: next,
            error: error.map(PageError::new),
        }
    }

    #[test]
    fn test_loading_and_error_skip_slots() {
        let loading: PagedValue<&str, u32> = PagedValue::Loading;
        assert!(matches!(RenderPlan::for_value(&loading), RenderPlan::Loading));

        let failed: PagedValue<&str, u32> = PagedValue::Error(PageError::new("down"));
        assert!(matches!(RenderPlan::for_value(&failed), RenderPlan::Error(e) if e.message == "down"));
    }

    #[test]
    fn test_empty_ignores_next_key() {
        let value = data(vec![], Some("p2"), None);
        assert!(matches!(RenderPlan::for_value(&value), RenderPlan::Empty));
    }

    #[test]
    fn test_footer_indicator_when_more_pages() {
        let value = data((0..10).collect(), Some("p2"), None);
        let RenderPlan::Slots(plan) = RenderPlan::for_value(&value) else {
            panic!("expected slots");
        };
        assert_eq!(plan.slot_count(), 11);
        assert_eq!(plan.slot(9), Some(Slot::Item(9)));
        assert_eq!(plan.slot(10), Some(Slot::Footer(Footer::Indicator)));
        assert_eq!(plan.slot(11), None);
    }

    #[test]
    fn test_no_footer_when_exhausted() {
        let value = data(vec![1, 2, 3], None, None);
        let RenderPlan::Slots(plan) = RenderPlan::for_value(&value) else {
            panic!("expected slots");
        };
        assert_eq!(plan.footer(), None);
        assert_eq!(plan.slot_count(), 3);
        assert_eq!(plan.slot(3), None);
    }

    #[test]
    fn test_error_footer_wins() {
        let value = data(vec![1, 2, 3], Some("p2"), Some("timeout"));
        let RenderPlan::Slots(plan) = RenderPlan::for_value(&value) else {
            panic!("expected slots");
        };
        assert!(matches!(plan.footer(), Some(Footer::Error(e)) if e.message == "timeout"));
        assert_eq!(plan.slot_count(), 4);
    }
}
