use core::cmp;

use crate::error::LayoutError;
use crate::layout::Layout;
use crate::types::{
    Align, Direction, LayoutUpdate, PlacedItem, ScrollToRequest, Size, VisibleRange,
};

/// Options for [`GridLayout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    pub direction: Direction,
    /// Uniform main-axis item size.
    pub item_size: u32,
    /// Uniform cross-axis item size; determines how many lanes fit.
    pub item_cross_size: u32,
    /// Space between items on both axes.
    pub spacing: u32,
    /// Extra rows kept rendered on both sides of the visible window.
    pub overscan: usize,
    pub padding_start: u32,
    pub padding_end: u32,
}

impl GridOptions {
    pub fn new(item_size: u32, item_cross_size: u32) -> Self {
        Self {
            direction: Direction::Vertical,
            item_size: item_size.max(1),
            item_cross_size: item_cross_size.max(1),
            spacing: 0,
            overscan: 1,
            padding_start: 0,
            padding_end: 0,
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

/// A uniform grid: fixed-size items packed into as many lanes as the
/// container's cross extent holds, whole rows entering and leaving the
/// window together.
///
/// Per-item measurements are ignored; the configured item size is the
/// layout's single source of truth.
#[derive(Clone, Debug)]
pub struct GridLayout {
    options: GridOptions,
    container: Size,
    count: usize,
    scroll_offset: u64,
    pending: Option<ScrollToRequest>,
}

impl GridLayout {
    pub fn new(options: GridOptions) -> Self {
        Self {
            options,
            container: Size::default(),
            count: 0,
            scroll_offset: 0,
            pending: None,
        }
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Lanes that fit across the container; at least one.
    pub fn lanes(&self) -> usize {
        let cross = self.container.cross(self.options.direction) as u64;
        let step = (self.options.item_cross_size + self.options.spacing) as u64;
        // The last lane needs no trailing spacing.
        let fit = cross.saturating_add(self.options.spacing as u64) / step.max(1);
        cmp::max(1, fit as usize)
    }

    fn rows(&self) -> usize {
        self.count.div_ceil(self.lanes())
    }

    /// Main-axis distance from one row's start to the next.
    fn row_step(&self) -> u64 {
        (self.options.item_size + self.options.spacing) as u64
    }

    fn row_start(&self, row: usize) -> u64 {
        self.options.padding_start as u64 + row as u64 * self.row_step()
    }

    /// Row occupying `offset`, clamped into the collection.
    fn row_at(&self, offset: u64) -> usize {
        debug_assert!(self.count > 0);
        let padding = self.options.padding_start as u64;
        if offset < padding {
            return 0;
        }
        let row = ((offset - padding) / self.row_step()) as usize;
        cmp::min(row, self.rows() - 1)
    }

    pub fn total_extent(&self) -> u64 {
        let rows = self.rows() as u64;
        if rows == 0 {
            return 0;
        }
        self.options.padding_start as u64
            + rows * self.options.item_size as u64
            + (rows - 1) * self.options.spacing as u64
            + self.options.padding_end as u64
    }

    pub fn max_scroll_offset(&self) -> u64 {
        let viewport = self.container.main(self.options.direction) as u64;
        self.total_extent().saturating_sub(viewport)
    }

    fn visible_range(&self, offset: u64, viewport: u64) -> VisibleRange {
        if self.count == 0 || viewport == 0 {
            return VisibleRange::EMPTY;
        }
        let last_unit = offset.saturating_add(viewport).saturating_sub(1);
        let first_row = self.row_at(offset);
        let last_row = self.row_at(cmp::max(last_unit, offset));
        let overscan = self.options.overscan;
        let first_row = first_row.saturating_sub(overscan);
        let last_row = cmp::min(self.rows() - 1, last_row.saturating_add(overscan));
        let lanes = self.lanes();
        VisibleRange::new(first_row * lanes, cmp::min(self.count, (last_row + 1) * lanes))
    }

    fn scroll_target(&self, index: usize, align: Align) -> u64 {
        let start = self.row_start(index / self.lanes());
        let size = self.options.item_size as u64;
        let end = start.saturating_add(size);
        let viewport = self.container.main(self.options.direction) as u64;

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

impl Layout for GridLayout {
    fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    fn set_item_count(&mut self, count: usize) {
        self.count = count;
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        if offset != self.scroll_offset && self.pending.is_some() {
            self.pending = None;
        }
        self.scroll_offset = offset;
    }

    fn update_item_sizes(&mut self, _measurements: &[(usize, u32)]) {
        // Uniform sizing; measurements carry no information here.
    }

    fn reset_item_sizes(&mut self) {}

    fn request_scroll_to(&mut self, index: usize, align: Align) {
        self.pending = Some(ScrollToRequest { index, align });
    }

    fn clear_scroll_request(&mut self) {
        self.pending = None;
    }

    fn reflow(&mut self) -> Result<LayoutUpdate, LayoutError> {
        let mut corrected = None;

        if let Some(request) = self.pending.take() {
            if request.index >= self.count {
                return Err(LayoutError::TargetOutOfRange {
                    index: request.index,
                    count: self.count,
                });
            }
            let target = self.scroll_target(request.index, request.align);
            if target != self.scroll_offset {
                self.scroll_offset = target;
                corrected = Some(target);
            }
            // Uniform sizes leave nothing to refine; one pass settles it.
        }

        let total = self.total_extent();
        let max_scroll = self.max_scroll_offset();
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
            corrected = Some(max_scroll);
        }

        let viewport = self.container.main(self.options.direction) as u64;
        let range = self.visible_range(self.scroll_offset, viewport);
        Ok(LayoutUpdate {
            range,
            total_extent: total,
            corrected_offset: corrected,
        })
    }

    fn item_position(&self, index: usize) -> Option<PlacedItem> {
        if index >= self.count {
            return None;
        }
        let lanes = self.lanes();
        let lane = index % lanes;
        Some(PlacedItem {
            index,
            start: self.row_start(index / lanes),
            size: self.options.item_size,
            cross_start: lane as u32 * (self.options.item_cross_size + self.options.spacing),
            cross_size: self.options.item_cross_size,
        })
    }

    fn for_each_placed(&self, range: VisibleRange, f: &mut dyn FnMut(PlacedItem)) {
        let end = cmp::min(range.end, self.count);
        for index in range.start..end {
            if let Some(placed) = self.item_position(index) {
                f(placed);
            }
        }
    }
}
