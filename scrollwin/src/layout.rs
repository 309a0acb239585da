use alloc::boxed::Box;

use crate::error::LayoutError;
use crate::flow::{FlowLayout, FlowOptions};
use crate::grid::{GridLayout, GridOptions};
use crate::types::{Align, Direction, LayoutUpdate, PlacedItem, Size, VisibleRange};

/// The capability set every layout strategy implements.
///
/// A strategy owns no host state. The orchestrator feeds it geometry and
/// scroll input through the setters, then reads the resulting window back
/// via [`Layout::reflow`]. Setters are cheap bookkeeping; the computation
/// happens in one `reflow` call, which must stay inexpensive enough to run
/// at native scroll-event frequency.
pub trait Layout {
    /// Records the viewport dimensions.
    fn set_container_size(&mut self, size: Size);

    /// Records the total number of items.
    ///
    /// A pending scroll request targeting `index >= count` fails at the
    /// next [`Layout::reflow`] with [`LayoutError::TargetOutOfRange`].
    fn set_item_count(&mut self, count: usize);

    /// Records the current scroll position along the main axis.
    ///
    /// An externally driven offset change supersedes any pending scroll
    /// request still being refined.
    fn set_scroll_offset(&mut self, offset: u64);

    /// Feeds post-render measurements, keyed by index.
    ///
    /// Reconciles estimated against actual sizes; positions of items after
    /// a measured one shift accordingly. Strategies that size items
    /// uniformly may ignore this.
    fn update_item_sizes(&mut self, measurements: &[(usize, u32)]);

    /// Discards all measurements, reverting every item to its estimate.
    ///
    /// Called when the collection is replaced wholesale and index-based
    /// measurements no longer describe the items behind them.
    fn reset_item_sizes(&mut self);

    /// Records a pending scroll-to-index request, replacing any previous
    /// one. The request is consumed by subsequent reflows until the target
    /// is placed precisely, then cleared.
    fn request_scroll_to(&mut self, index: usize, align: Align);

    /// Drops the pending scroll request, if any.
    fn clear_scroll_request(&mut self);

    /// Recomputes the visible range and total extent from current inputs.
    fn reflow(&mut self) -> Result<LayoutUpdate, LayoutError>;

    /// Resolved placement of one item, `None` when out of bounds.
    fn item_position(&self, index: usize) -> Option<PlacedItem>;

    /// Visits the placement of every item in `range`.
    fn for_each_placed(&self, range: VisibleRange, f: &mut dyn FnMut(PlacedItem));
}

/// Which built-in strategy a [`LayoutConfig`] resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutKind {
    #[default]
    Flow,
    Grid,
}

/// Declarative layout configuration.
///
/// Resolved once into a strategy instance (see [`LayoutConfig::build`]);
/// thereafter the orchestrator only talks to the [`Layout`] interface.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutConfig {
    pub kind: LayoutKind,
    pub direction: Direction,
    /// Space between adjacent items; none after the last.
    pub spacing: u32,
    /// Main-axis size assumed for unmeasured items.
    pub estimated_item_size: u32,
    /// Cross-axis item size; only meaningful for lane-based strategies.
    pub item_cross_size: u32,
    /// Extra items kept rendered on both sides of the visible window.
    pub overscan: usize,
    pub padding_start: u32,
    pub padding_end: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            kind: LayoutKind::Flow,
            direction: Direction::Vertical,
            spacing: 0,
            estimated_item_size: 100,
            item_cross_size: 100,
            overscan: 1,
            padding_start: 0,
            padding_end: 0,
        }
    }
}

impl LayoutConfig {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_estimated_item_size(mut self, size: u32) -> Self {
        self.estimated_item_size = size;
        self
    }

    pub fn with_item_cross_size(mut self, size: u32) -> Self {
        self.item_cross_size = size;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    /// Resolves the configuration into a strategy instance.
    pub fn build(&self) -> Box<dyn Layout> {
        match self.kind {
            LayoutKind::Flow => {
                let est = self.estimated_item_size.max(1);
                let options = FlowOptions::new(move |_| est)
                    .with_direction(self.direction)
                    .with_spacing(self.spacing)
                    .with_overscan(self.overscan)
                    .with_padding(self.padding_start, self.padding_end);
                Box::new(FlowLayout::new(options))
            }
            LayoutKind::Grid => {
                let options = GridOptions::new(
                    self.estimated_item_size.max(1),
                    self.item_cross_size.max(1),
                )
                .with_direction(self.direction)
                .with_spacing(self.spacing)
                .with_overscan(self.overscan)
                .with_padding(self.padding_start, self.padding_end);
                Box::new(GridLayout::new(options))
            }
        }
    }
}

/// The accepted forms of "which layout should be active": a ready strategy
/// instance (boxed or concrete) or a configuration record the orchestrator
/// resolves once.
pub enum LayoutSpec {
    Instance(Box<dyn Layout>),
    Config(LayoutConfig),
}

impl LayoutSpec {
    pub fn into_layout(self) -> Box<dyn Layout> {
        match self {
            Self::Instance(layout) => layout,
            Self::Config(config) => config.build(),
        }
    }
}

impl From<Box<dyn Layout>> for LayoutSpec {
    fn from(layout: Box<dyn Layout>) -> Self {
        Self::Instance(layout)
    }
}

impl From<LayoutConfig> for LayoutSpec {
    fn from(config: LayoutConfig) -> Self {
        Self::Config(config)
    }
}

impl From<FlowLayout> for LayoutSpec {
    fn from(layout: FlowLayout) -> Self {
        Self::Instance(Box::new(layout))
    }
}

impl From<GridLayout> for LayoutSpec {
    fn from(layout: GridLayout) -> Self {
        Self::Instance(Box::new(layout))
    }
}

impl core::fmt::Debug for LayoutSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(..)"),
            Self::Config(config) => f.debug_tuple("Config").field(config).finish(),
        }
    }
}
