//! Render host contracts and headless windowed hosts.
//!
//! A host decides which slots to realize in a frame and asks the view to
//! build exactly those. The windowed hosts below realize the slots inside a
//! scroll window, which is enough to drive pagination without a real toolkit.

use std::ops::Range;

use crate::config::{GridDelegate, ScrollConfig};
use crate::error::PagerError;

/// A scrolling list primitive.
pub trait ListHost<N> {
    /// What a frame of this host produces.
    type Output;

    /// Lay out `slot_count` slots, building only the ones the host realizes.
    ///
    /// `item(i)` returns `None` for indices outside `0..slot_count`.
    /// `separator(i)` builds the separator that follows slot `i`; there are
    /// `slot_count - 1` separator positions.
    fn build_list(
        &mut self,
        scroll: &ScrollConfig,
        slot_count: usize,
        item: &mut dyn FnMut(usize) -> Option<N>,
        separator: &mut dyn FnMut(usize) -> N,
    ) -> Self::Output;
}

/// Grid layout options forwarded to a grid host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Slot arrangement.
    pub delegate: GridDelegate,
    /// Slot count announced to accessibility services, if it differs from
    /// the number of built slots.
    pub semantic_child_count: Option<usize>,
}

/// A scrolling grid primitive.
pub trait GridHost<N> {
    /// What a frame of this host produces.
    type Output;

    /// Lay out `slot_count` slots in rows, building only the realized ones.
    fn build_grid(
        &mut self,
        scroll: &ScrollConfig,
        layout: &GridLayout,
        slot_count: usize,
        item: &mut dyn FnMut(usize) -> Option<N>,
    ) -> Self::Output;
}

/// Frame produced by [`WindowedList`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListFrame<N> {
    /// Total number of slots in the list.
    pub slot_count: usize,
    /// Realized slots, with their indices, in order.
    pub slots: Vec<(usize, N)>,
    /// Realized separators, keyed by the slot they follow.
    pub separators: Vec<(usize, N)>,
}

/// List host that realizes the slots inside a scroll window.
///
/// The window spans `viewport` slots starting at the scroll offset, plus the
/// cache extent (counted in slots) on both sides.
#[derive(Debug, Clone)]
pub struct WindowedList {
    offset: usize,
    viewport: usize,
    last_slot_count: usize,
}

impl WindowedList {
    /// Create a host showing `viewport` slots.
    pub fn new(viewport: usize) -> Result<Self, PagerError> {
        if viewport == 0 {
            return Err(PagerError::EmptyViewport { unit: "slot" });
        }
        Ok(Self {
            offset: 0,
            viewport,
            last_slot_count: 0,
        })
    }

    /// First visible slot.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of visible slots.
    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// Scroll so that `index` is the first visible slot.
    ///
    /// Clamped against the slot count on the next frame.
    pub fn scroll_to(&mut self, index: usize) {
        self.offset = index;
    }

    /// Scroll by `delta` slots.
    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta);
    }

    /// Scroll to the last slot known from the previous frame.
    pub fn scroll_to_end(&mut self) {
        self.offset = max_offset(self.last_slot_count, self.viewport);
    }

    /// Returns `true` when the previous frame showed its last slot.
    pub fn at_end(&self) -> bool {
        self.offset >= max_offset(self.last_slot_count, self.viewport)
    }

    /// Visible slots for `slot_count` slots, after clamping the offset.
    pub fn visible_range(&self, slot_count: usize) -> Range<usize> {
        let start = self.offset.min(max_offset(slot_count, self.viewport));
        start..(start + self.viewport).min(slot_count)
    }

    fn realized_range(&self, scroll: &ScrollConfig, slot_count: usize) -> Range<usize> {
        let visible = self.visible_range(slot_count);
        let cache = cache_slots(scroll);
        visible.start.saturating_sub(cache)..visible.end.saturating_add(cache).min(slot_count)
    }
}

impl<N> ListHost<N> for WindowedList {
    type Output = ListFrame<N>;

    fn build_list(
        &mut self,
        scroll: &ScrollConfig,
        slot_count: usize,
        item: &mut dyn FnMut(usize) -> Option<N>,
        separator: &mut dyn FnMut(usize) -> N,
    ) -> ListFrame<N> {
        self.offset = self.visible_range(slot_count).start;
        self.last_slot_count = slot_count;

        let realized = self.realized_range(scroll, slot_count);
        let mut slots = Vec::with_capacity(realized.len());
        let mut separators = Vec::with_capacity(realized.len());
        for index in realized.clone() {
            let Some(node) = item(index) else {
                continue;
            };
            slots.push((index, node));
            if index + 1 < realized.end {
                separators.push((index, separator(index)));
            }
        }
        log::trace!("List realized slots {:?} of {}", realized, slot_count);

        ListFrame {
            slot_count,
            slots,
            separators,
        }
    }
}

/// Frame produced by [`WindowedGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame<N> {
    /// Total number of slots in the grid.
    pub slot_count: usize,
    /// Slots per row used for this frame.
    pub cross_axis_count: usize,
    /// Realized rows, each holding its slots with their indices.
    pub rows: Vec<Vec<(usize, N)>>,
}

/// Grid host that realizes the rows inside a scroll window.
#[derive(Debug, Clone)]
pub struct WindowedGrid {
    first_row: usize,
    rows: usize,
    cross_axis_extent: f32,
    last_row_count: usize,
}

impl WindowedGrid {
    /// Create a host showing `rows` rows of a grid `cross_axis_extent` wide.
    pub fn new(rows: usize, cross_axis_extent: f32) -> Result<Self, PagerError> {
        if rows == 0 {
            return Err(PagerError::EmptyViewport { unit: "row" });
        }
        Ok(Self {
            first_row: 0,
            rows,
            cross_axis_extent,
            last_row_count: 0,
        })
    }

    /// First visible row.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Scroll by `delta` rows.
    pub fn scroll_by(&mut self, delta: isize) {
        self.first_row = self.first_row.saturating_add_signed(delta);
    }

    /// Scroll so that `row` is the first visible row.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.first_row = row;
    }

    /// Returns `true` when the previous frame showed its last row.
    pub fn at_end(&self) -> bool {
        self.first_row >= max_offset(self.last_row_count, self.rows)
    }

    /// Slots per row for `layout` at this host's width.
    pub fn cross_axis_count(&self, layout: &GridLayout) -> usize {
        layout.delegate.cross_axis_count(self.cross_axis_extent).max(1)
    }
}

impl<N> GridHost<N> for WindowedGrid {
    type Output = GridFrame<N>;

    fn build_grid(
        &mut self,
        scroll: &ScrollConfig,
        layout: &GridLayout,
        slot_count: usize,
        item: &mut dyn FnMut(usize) -> Option<N>,
    ) -> GridFrame<N> {
        let columns = self.cross_axis_count(layout);
        let row_count = slot_count.div_ceil(columns);
        self.first_row = self.first_row.min(max_offset(row_count, self.rows));
        self.last_row_count = row_count;

        let cache = cache_slots(scroll);
        let first = self.first_row.saturating_sub(cache);
        let last = self.first_row.saturating_add(self.rows).saturating_add(cache).min(row_count);

        let rows = (first..last)
            .map(|row| {
                let start = row * columns;
                let end = (start + columns).min(slot_count);
                (start..end)
                    .filter_map(|index| item(index).map(|node| (index, node)))
                    .collect()
            })
            .collect();
        log::trace!("Grid realized rows {}..{} of {}", first, last, row_count);

        GridFrame {
            slot_count,
            cross_axis_count: columns,
            rows,
        }
    }
}

fn max_offset(count: usize, window: usize) -> usize {
    count.saturating_sub(window)
}

fn cache_slots(scroll: &ScrollConfig) -> usize {
    match scroll.cache_extent {
        Some(extent) if extent > 0.0 => extent.ceil() as usize,
        _ => 0,
    }
}
