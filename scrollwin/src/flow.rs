use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cmp;

use crate::error::LayoutError;
use crate::fenwick::PrefixSums;
use crate::layout::Layout;
use crate::types::{
    Align, Direction, LayoutUpdate, PlacedItem, ScrollToRequest, Size, VisibleRange,
};

/// Size estimator for unmeasured items.
pub type EstimateFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;

/// Options for [`FlowLayout`].
///
/// Cheap to clone: the estimator is shared behind an `Arc`.
#[derive(Clone)]
pub struct FlowOptions {
    pub direction: Direction,
    pub estimate: EstimateFn,
    /// Space between adjacent items; none after the last.
    pub spacing: u32,
    /// Extra items kept in the window on both sides of the visible range.
    pub overscan: usize,
    pub padding_start: u32,
    pub padding_end: u32,
}

impl FlowOptions {
    pub fn new(estimate: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self {
            direction: Direction::Vertical,
            estimate: Arc::new(estimate),
            spacing: 0,
            overscan: 1,
            padding_start: 0,
            padding_end: 0,
        }
    }

    /// Options estimating every item at the same main-axis size.
    pub fn uniform(size: u32) -> Self {
        Self::new(move |_| size)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
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
}

impl core::fmt::Debug for FlowOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlowOptions")
            .field("direction", &self.direction)
            .field("spacing", &self.spacing)
            .field("overscan", &self.overscan)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .finish_non_exhaustive()
    }
}

/// The reference one-dimensional layout: items flow along the main axis,
/// sized by estimate until measured.
///
/// Positions and offset → index queries run over a prefix-sum tree, so a
/// reflow costs O(log n) regardless of collection size. Measurements of
/// items before the viewport's leading edge adjust the scroll offset so the
/// anchored item stays visually fixed; the adjustment is surfaced through
/// [`LayoutUpdate::corrected_offset`].
#[derive(Clone, Debug)]
pub struct FlowLayout {
    options: FlowOptions,
    container: Size,
    count: usize,
    scroll_offset: u64,
    sizes: Vec<u32>,
    measured: Vec<bool>,
    sums: PrefixSums,
    pending: Option<ScrollToRequest>,
    /// Offset moved by anchor-preserving remeasures since the last reflow.
    correction: Option<u64>,
}

impl FlowLayout {
    pub fn new(options: FlowOptions) -> Self {
        Self {
            options,
            container: Size::default(),
            count: 0,
            scroll_offset: 0,
            sizes: Vec::new(),
            measured: Vec::new(),
            sums: PrefixSums::default(),
            pending: None,
            correction: None,
        }
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Current content extent: padding plus every item and gap. Zero for an
    /// empty collection, padding notwithstanding.
    pub fn total_extent(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.options.padding_start as u64
            + self.sums.total()
            + self.options.padding_end as u64
    }

    pub fn max_scroll_offset(&self) -> u64 {
        let viewport = self.viewport_main();
        self.total_extent().saturating_sub(viewport)
    }

    fn viewport_main(&self) -> u64 {
        self.container.main(self.options.direction) as u64
    }

    fn start_of(&self, index: usize) -> u64 {
        self.options.padding_start as u64 + self.sums.prefix_sum(index)
    }

    /// Index of the item occupying `offset`, clamped into the collection.
    fn index_at(&self, offset: u64) -> usize {
        debug_assert!(self.count > 0);
        let padding = self.options.padding_start as u64;
        if offset < padding {
            return 0;
        }
        let consumed = self.sums.lower_bound(offset - padding);
        consumed.min(self.count - 1)
    }

    fn visible_range(&self, offset: u64, viewport: u64) -> VisibleRange {
        if self.count == 0 || viewport == 0 {
            return VisibleRange::EMPTY;
        }
        let last_unit = offset.saturating_add(viewport).saturating_sub(1);
        let first = self.index_at(offset);
        let last = self.index_at(cmp::max(last_unit, offset));
        VisibleRange::new(first, last + 1)
    }

    fn overscanned(&self, visible: VisibleRange) -> VisibleRange {
        if visible.is_empty() {
            return visible;
        }
        let overscan = self.options.overscan;
        VisibleRange::new(
            visible.start.saturating_sub(overscan),
            cmp::min(self.count, visible.end.saturating_add(overscan)),
        )
    }

    /// Offset that satisfies `align` for `index`, clamped to the scrollable
    /// maximum. Refined as estimates give way to measurements.
    fn scroll_target(&self, index: usize, align: Align) -> u64 {
        let start = self.start_of(index);
        let size = self.sizes[index] as u64;
        let end = start.saturating_add(size);
        let viewport = self.viewport_main();

        let raw = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(viewport),
            Align::Center => start
                .saturating_add(size / 2)
                .saturating_sub(viewport / 2),
            Align::Nearest => {
                let current = self.scroll_offset;
                let current_end = current.saturating_add(viewport);
                if start >= current && end <= current_end {
                    current
                } else if start < current {
                    start
                } else {
                    end.saturating_sub(viewport)
                }
            }
        };
        raw.min(self.max_scroll_offset())
    }
}

impl Layout for FlowLayout {
    fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    fn set_item_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        wdebug!(count, prev = self.count, "flow: item count change");
        self.count = count;
        if count < self.sizes.len() {
            self.sizes.truncate(count);
            self.measured.truncate(count);
        } else {
            self.sizes.reserve_exact(count - self.sizes.len());
            self.measured.reserve_exact(count - self.measured.len());
            for i in self.sizes.len()..count {
                self.sizes.push((self.options.estimate)(i));
                self.measured.push(false);
            }
        }
        self.sums = PrefixSums::build(&self.sizes, self.options.spacing);
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        if offset != self.scroll_offset && self.pending.is_some() {
            // An externally driven scroll supersedes the pending request.
            self.pending = None;
        }
        self.scroll_offset = offset;
    }

    fn update_item_sizes(&mut self, measurements: &[(usize, u32)]) {
        let mut anchored = false;
        for &(index, size) in measurements {
            if index >= self.count {
                // Stale measurement from a previous collection.
                continue;
            }
            let current = self.sizes[index];
            if current == size {
                self.measured[index] = true;
                continue;
            }
            let start = self.start_of(index);
            self.sizes[index] = size;
            self.measured[index] = true;
            let delta = size as i64 - current as i64;
            self.sums.add(index, delta);
            // Anchor preservation: resizing content before the viewport's
            // leading edge must not move what the user sees.
            if start < self.scroll_offset {
                self.scroll_offset = add_signed(self.scroll_offset, delta);
                anchored = true;
            }
        }
        if anchored {
            wtrace!(offset = self.scroll_offset, "flow: anchor compensation");
            self.correction = Some(self.scroll_offset);
        }
    }

    fn reset_item_sizes(&mut self) {
        wdebug!(count = self.count, "flow: reset to estimates");
        for (i, size) in self.sizes.iter_mut().enumerate() {
            *size = (self.options.estimate)(i);
        }
        self.measured.iter_mut().for_each(|m| *m = false);
        self.sums = PrefixSums::build(&self.sizes, self.options.spacing);
    }

    fn request_scroll_to(&mut self, index: usize, align: Align) {
        self.pending = Some(ScrollToRequest { index, align });
    }

    fn clear_scroll_request(&mut self) {
        self.pending = None;
    }

    fn reflow(&mut self) -> Result<LayoutUpdate, LayoutError> {
        if let Some(request) = self.pending {
            if request.index >= self.count {
                self.pending = None;
                return Err(LayoutError::TargetOutOfRange {
                    index: request.index,
                    count: self.count,
                });
            }
        }

        let mut corrected = self.correction.take();

        if let Some(request) = self.pending {
            let target = self.scroll_target(request.index, request.align);
            if target != self.scroll_offset {
                self.scroll_offset = target;
                corrected = Some(target);
            } else if self.measured[request.index] {
                // Target position is exact now; the request is satisfied.
                self.pending = None;
            }
        }

        let total = self.total_extent();
        let max_scroll = self.max_scroll_offset();
        if self.scroll_offset > max_scroll {
            // Extent shrank under the viewport; pull the offset back in.
            self.scroll_offset = max_scroll;
            corrected = Some(max_scroll);
        }

        let range = self.overscanned(self.visible_range(self.scroll_offset, self.viewport_main()));
        Ok(LayoutUpdate {
            range,
            total_extent: total,
            corrected_offset: corrected,
        })
    }

    fn item_position(&self, index: usize) -> Option<PlacedItem> {
        (index < self.count).then(|| PlacedItem {
            index,
            start: self.start_of(index),
            size: self.sizes[index],
            cross_start: 0,
            cross_size: self.container.cross(self.options.direction),
        })
    }

    fn for_each_placed(&self, range: VisibleRange, f: &mut dyn FnMut(PlacedItem)) {
        let end = cmp::min(range.end, self.count);
        if range.start >= end {
            return;
        }
        let cross_size = self.container.cross(self.options.direction);
        let spacing = self.options.spacing as u64;
        let mut start = self.start_of(range.start);
        for index in range.start..end {
            let size = self.sizes[index];
            f(PlacedItem {
                index,
                start,
                size,
                cross_start: 0,
                cross_size,
            });
            start = start.saturating_add(size as u64);
            if spacing > 0 && index + 1 < self.count {
                start = start.saturating_add(spacing);
            }
        }
    }
}

fn add_signed(base: u64, delta: i64) -> u64 {
    if delta >= 0 {
        base.saturating_add(delta as u64)
    } else {
        base.saturating_sub(delta.unsigned_abs())
    }
}
