/// Alignment for scroll-to-index requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// Place the item's leading edge at the viewport's leading edge.
    #[default]
    Start,
    /// Center the item in the viewport.
    Center,
    /// Place the item's trailing edge at the viewport's trailing edge.
    End,
    /// Scroll the shortest distance that brings the item fully into view;
    /// no-op when it already is.
    Nearest,
}

/// Axis along which the collection scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Vertical,
    Horizontal,
}

/// Container dimensions in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extent along the scroll axis.
    pub fn main(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Vertical => self.height,
            Direction::Horizontal => self.width,
        }
    }

    /// Extent across the scroll axis.
    pub fn cross(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Vertical => self.width,
            Direction::Horizontal => self.height,
        }
    }

    /// A zero-area viewport. Geometry reads from a detached host look like
    /// this; layout work is deferred rather than failed.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Travel direction of the most recent scroll delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// The window of indices that must currently be rendered.
///
/// `end` is exclusive; an empty window has `start == end`. The inclusive
/// `(first, last)` view used by the range-change protocol is available via
/// [`VisibleRange::first`] and [`VisibleRange::last`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range ({start}, {end})");
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// First index in the window, `None` when empty.
    pub fn first(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Last index in the window (inclusive), `None` when empty.
    pub fn last(&self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// A resolved item placement within the scrollable surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedItem {
    pub index: usize,
    /// Offset of the item's leading edge along the scroll axis.
    pub start: u64,
    /// Main-axis size (excludes spacing).
    pub size: u32,
    /// Offset across the scroll axis (non-zero for lane-based layouts).
    pub cross_start: u32,
    pub cross_size: u32,
}

impl PlacedItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

/// One programmatic scroll request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollToRequest {
    pub index: usize,
    pub align: Align,
}

/// Output of one layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutUpdate {
    /// The window to render, overscan included.
    pub range: VisibleRange,
    /// Best current estimate of the full scrollable extent. May shrink or
    /// grow as measurements replace estimates.
    pub total_extent: u64,
    /// Set when the real scroll position must move: scroll-to-index targets
    /// and anchor compensation after remeasure. The orchestrator applies it
    /// once and absorbs the resulting scroll event.
    pub corrected_offset: Option<u64>,
}
