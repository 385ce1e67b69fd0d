//! Paged view configuration.
//!
//! Everything in [`ScrollConfig`] and [`GridDelegate`] is handed to the render
//! host untouched. Only [`PagedViewConfig::load_more_trigger_index`] is read
//! by the pagination logic itself.

use crate::error::PagerError;

/// Default distance from the end of the list at which the next page is
/// requested.
pub const DEFAULT_LOAD_MORE_TRIGGER_INDEX: usize = 3;

/// Main scroll direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Axis {
    /// Items stack top to bottom.
    #[default]
    Vertical,
    /// Items stack left to right.
    Horizontal,
}

/// How the host reacts to user scroll input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollPhysics {
    /// Whatever the host platform does by default.
    #[default]
    Platform,
    /// Stop hard at the edges.
    Clamping,
    /// Overscroll and spring back.
    Bouncing,
    /// Ignore user scroll input.
    NeverScrollable,
    /// Accept scroll input even when the content fits.
    AlwaysScrollable,
}

/// When a drag gesture is considered started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragStartBehavior {
    /// At the point where the drag was recognized.
    #[default]
    Start,
    /// At the point of the initial pointer down.
    Down,
}

/// Whether scrolling dismisses the on-screen keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardDismissBehavior {
    /// Never dismiss automatically.
    #[default]
    Manual,
    /// Dismiss as soon as a drag begins.
    OnDrag,
}

/// How content outside the viewport is clipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clip {
    /// No clipping.
    None,
    /// Clip without anti-aliasing.
    #[default]
    HardEdge,
    /// Clip with anti-aliasing.
    AntiAlias,
    /// Clip with anti-aliasing into an offscreen layer.
    AntiAliasWithSaveLayer,
}

/// Padding around the scrollable content.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    /// Top padding.
    pub top: f32,
    /// Right padding.
    pub right: f32,
    /// Bottom padding.
    pub bottom: f32,
    /// Left padding.
    pub left: f32,
}

impl Padding {
    /// Same padding on all sides.
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical and horizontal padding.
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

/// Opaque handle to a scroll position controller owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollControllerId(pub u64);

/// Scroll and layout options forwarded to the render host.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Main scroll direction.
    pub axis: Axis,
    /// Start at the end of the axis instead of the beginning.
    pub reverse: bool,
    /// External scroll position controller.
    pub controller: Option<ScrollControllerId>,
    /// Whether this is the primary scroll view of its screen.
    pub primary: Option<bool>,
    /// Scroll physics policy.
    pub physics: ScrollPhysics,
    /// Size to the content instead of filling the main axis.
    pub shrink_wrap: bool,
    /// Padding around the content.
    pub padding: Option<Padding>,
    /// Keep realized slots alive while scrolled out of view.
    pub add_automatic_keep_alives: bool,
    /// Wrap every slot in its own repaint boundary.
    pub add_repaint_boundaries: bool,
    /// Assign semantic indexes to slots.
    pub add_semantic_indexes: bool,
    /// Extra extent realized before and after the viewport.
    pub cache_extent: Option<f32>,
    /// When drags are considered started.
    pub drag_start_behavior: DragStartBehavior,
    /// Keyboard dismissal policy.
    pub keyboard_dismiss_behavior: KeyboardDismissBehavior,
    /// Identifier used to restore the scroll offset.
    pub restoration_id: Option<String>,
    /// Clipping of overflowing content.
    pub clip_behavior: Clip,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Vertical,
            reverse: false,
            controller: None,
            primary: None,
            physics: ScrollPhysics::Platform,
            shrink_wrap: false,
            padding: None,
            add_automatic_keep_alives: true,
            add_repaint_boundaries: true,
            add_semantic_indexes: true,
            cache_extent: None,
            drag_start_behavior: DragStartBehavior::Start,
            keyboard_dismiss_behavior: KeyboardDismissBehavior::Manual,
            restoration_id: None,
            clip_behavior: Clip::HardEdge,
        }
    }
}

impl ScrollConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scroll axis.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Scroll from the end of the axis.
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Attach an external scroll controller.
    pub fn controller(mut self, controller: ScrollControllerId) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Mark as (not) the primary scroll view.
    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Set the scroll physics.
    pub fn physics(mut self, physics: ScrollPhysics) -> Self {
        self.physics = physics;
        self
    }

    /// Size to the content.
    pub fn shrink_wrap(mut self) -> Self {
        self.shrink_wrap = true;
        self
    }

    /// Set the content padding.
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Toggle the keep-alive, repaint-boundary and semantic-index wrappers.
    pub fn slot_wrappers(mut self, keep_alives: bool, repaint_boundaries: bool, semantic_indexes: bool) -> Self {
        self.add_automatic_keep_alives = keep_alives;
        self.add_repaint_boundaries = repaint_boundaries;
        self.add_semantic_indexes = semantic_indexes;
        self
    }

    /// Set the cache extent.
    pub fn cache_extent(mut self, extent: f32) -> Self {
        self.cache_extent = Some(extent);
        self
    }

    /// Set the drag start behavior.
    pub fn drag_start_behavior(mut self, behavior: DragStartBehavior) -> Self {
        self.drag_start_behavior = behavior;
        self
    }

    /// Set the keyboard dismiss behavior.
    pub fn keyboard_dismiss_behavior(mut self, behavior: KeyboardDismissBehavior) -> Self {
        self.keyboard_dismiss_behavior = behavior;
        self
    }

    /// Set the restoration id.
    pub fn restoration_id(mut self, id: impl Into<String>) -> Self {
        self.restoration_id = Some(id.into());
        self
    }

    /// Set the clip behavior.
    pub fn clip_behavior(mut self, clip: Clip) -> Self {
        self.clip_behavior = clip;
        self
    }

    /// Check the values a host cannot interpret.
    pub fn validate(&self) -> Result<(), PagerError> {
        if let Some(extent) = self.cache_extent
            && (!extent.is_finite() || extent < 0.0)
        {
            return Err(PagerError::InvalidConfig {
                field: "cache_extent",
                reason: format!("must be a finite, non-negative number, got {}", extent),
            });
        }
        if let Some(padding) = self.padding {
            let sides = [padding.top, padding.right, padding.bottom, padding.left];
            if sides.iter().any(|side| side.is_nan() || *side < 0.0) {
                return Err(PagerError::InvalidConfig {
                    field: "padding",
                    reason: "sides must be zero or positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Per-view configuration shared by the list and grid variants.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedViewConfig {
    /// Distance from the last item at which the next page is requested.
    ///
    /// With `n` loaded items the fetch is scheduled while rendering item
    /// `n - load_more_trigger_index`. A value larger than `n` never fires.
    pub load_more_trigger_index: usize,
    /// Options forwarded to the host.
    pub scroll: ScrollConfig,
}

impl Default for PagedViewConfig {
    fn default() -> Self {
        Self {
            load_more_trigger_index: DEFAULT_LOAD_MORE_TRIGGER_INDEX,
            scroll: ScrollConfig::default(),
        }
    }
}

impl PagedViewConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the load-more trigger distance.
    pub fn load_more_trigger_index(mut self, index: usize) -> Self {
        self.load_more_trigger_index = index;
        self
    }

    /// Set the forwarded scroll options.
    pub fn scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    /// Validate the forwarded options.
    pub fn validate(&self) -> Result<(), PagerError> {
        self.scroll.validate()
    }
}

/// Slot arrangement of a grid host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridDelegate {
    /// A fixed number of slots per row.
    FixedCrossAxisCount {
        /// Slots per row.
        count: usize,
        /// Gap between rows.
        main_axis_spacing: f32,
        /// Gap between slots of one row.
        cross_axis_spacing: f32,
        /// Cross extent divided by main extent of a slot.
        child_aspect_ratio: f32,
    },
    /// As many slots per row as fit without exceeding a maximum width.
    MaxCrossAxisExtent {
        /// Largest allowed cross extent of a slot.
        max_cross_axis_extent: f32,
        /// Gap between rows.
        main_axis_spacing: f32,
        /// Gap between slots of one row.
        cross_axis_spacing: f32,
        /// Cross extent divided by main extent of a slot.
        child_aspect_ratio: f32,
    },
}

impl GridDelegate {
    /// `count` slots per row, no spacing, square slots.
    pub fn fixed(count: usize) -> Self {
        Self::FixedCrossAxisCount {
            count,
            main_axis_spacing: 0.0,
            cross_axis_spacing: 0.0,
            child_aspect_ratio: 1.0,
        }
    }

    /// Slots no wider than `max_extent`, no spacing, square slots.
    pub fn max_extent(max_extent: f32) -> Self {
        Self::MaxCrossAxisExtent {
            max_cross_axis_extent: max_extent,
            main_axis_spacing: 0.0,
            cross_axis_spacing: 0.0,
            child_aspect_ratio: 1.0,
        }
    }

    /// Number of slots per row for a given cross axis extent.
    ///
    /// Always at least 1 for a valid delegate.
    pub fn cross_axis_count(&self, cross_axis_extent: f32) -> usize {
        match *self {
            Self::FixedCrossAxisCount { count, .. } => count,
            Self::MaxCrossAxisExtent {
                max_cross_axis_extent,
                cross_axis_spacing,
                ..
            } => {
                let per_slot = max_cross_axis_extent + cross_axis_spacing;
                let count = (cross_axis_extent / per_slot).ceil();
                if count.is_finite() && count >= 1.0 {
                    count as usize
                } else {
                    1
                }
            }
        }
    }

    /// Reject delegates that cannot lay out a single slot.
    pub fn validate(&self) -> Result<(), PagerError> {
        let (main, cross, ratio) = match *self {
            Self::FixedCrossAxisCount {
                count,
                main_axis_spacing,
                cross_axis_spacing,
                child_aspect_ratio,
            } => {
                if count == 0 {
                    return Err(PagerError::ZeroCrossAxisCount);
                }
                (main_axis_spacing, cross_axis_spacing, child_aspect_ratio)
            }
            Self::MaxCrossAxisExtent {
                max_cross_axis_extent,
                main_axis_spacing,
                cross_axis_spacing,
                child_aspect_ratio,
            } => {
                positive("max_cross_axis_extent", max_cross_axis_extent)?;
                (main_axis_spacing, cross_axis_spacing, child_aspect_ratio)
            }
        };
        positive("child_aspect_ratio", ratio)?;
        non_negative("main_axis_spacing", main)?;
        non_negative("cross_axis_spacing", cross)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), PagerError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PagerError::InvalidGridDimension { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), PagerError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PagerError::InvalidConfig {
            field,
            reason: format!("must be zero or positive, got {}", value),
        })
    }
}
