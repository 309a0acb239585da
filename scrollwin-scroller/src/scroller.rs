use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use scrollwin::{
    Align, Layout, LayoutError, LayoutSpec, LayoutUpdate, PlacedItem, ScrollDirection,
    ScrollToRequest, Size, VisibleRange,
};

use crate::error::ScrollerError;
use crate::host::ScrollHost;
use crate::key::{ItemKey, KeySizeMap};

/// Key derivation for the measurement cache.
pub type KeyFn<T, K> = Arc<dyn Fn(&T, usize) -> K + Send + Sync>;

/// Subscriber callback for [`ScrollerEvent`]s.
pub type EventFn = Arc<dyn Fn(&ScrollerEvent) + Send + Sync>;

/// Notifications emitted by the scroller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollerEvent {
    /// The visible range changed; the view layer should reconcile children
    /// to exactly these indices.
    RangeChanged(VisibleRange),
    /// A pending scroll-to-index request became invalid when the item
    /// count changed underneath it.
    ScrollToFailed { index: usize, count: usize },
}

/// A scroll-to-index request waiting for host geometry.
#[derive(Clone, Copy, Debug)]
struct DeferredScroll {
    request: ScrollToRequest,
    seq: u64,
}

/// Orchestrates one scrollable host, one item collection, and one layout
/// strategy.
///
/// The embedder forwards host signals (`on_scroll`, `on_resize`) and drives
/// deferred work with `tick`; the scroller feeds geometry to the active
/// [`Layout`], reconciles the resulting window into the host (spacer
/// sizing, corrected offsets), and emits one range-change notification per
/// actual change.
///
/// Everything is synchronous and single-threaded; no recomputation ever
/// overlaps another.
pub struct Scroller<T, H, K = u64> {
    host: Option<H>,
    layout: Box<dyn Layout>,
    items: Vec<T>,
    /// Overrides `items.len()` for virtual collections of known size.
    count_override: Option<usize>,
    key_fn: KeyFn<T, K>,
    measured: KeySizeMap<K>,
    on_event: Option<EventFn>,

    emitted_range: Option<VisibleRange>,
    applied_extent: Option<u64>,
    /// Host offset expected to echo back after a corrected-offset write;
    /// the matching scroll event is absorbed without another layout pass.
    expected_echo: Option<u64>,
    last_offset: u64,
    scroll_direction: Option<ScrollDirection>,
    /// Viewport last handed to the layout; `None` until geometry exists.
    container: Option<Size>,
    deferred_scroll: Option<DeferredScroll>,
    scroll_seq: u64,
}

impl<T, H: ScrollHost> Scroller<T, H, u64> {
    /// Creates a scroller keyed by index.
    ///
    /// Use [`Scroller::with_key_fn`] when items carry a stable identity of
    /// their own, so measured sizes follow them across reorders.
    pub fn new(layout: impl Into<LayoutSpec>) -> Self {
        Self::with_key_fn(layout, |_item: &T, index| index as u64)
    }
}

impl<T, H: ScrollHost, K: ItemKey> Scroller<T, H, K> {
    pub fn with_key_fn(
        layout: impl Into<LayoutSpec>,
        key_fn: impl Fn(&T, usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            host: None,
            layout: layout.into().into_layout(),
            items: Vec::new(),
            count_override: None,
            key_fn: Arc::new(key_fn),
            measured: KeySizeMap::new(),
            on_event: None,
            emitted_range: None,
            applied_extent: None,
            expected_echo: None,
            last_offset: 0,
            scroll_direction: None,
            container: None,
            deferred_scroll: None,
            scroll_seq: 0,
        }
    }

    /// Binds the scrollable host. Rebinding replaces the previous host and
    /// repeats the initial reconciliation against it.
    pub fn bind(&mut self, host: H) -> Result<(), ScrollerError> {
        wdebug!("bind");
        self.host = Some(host);
        // The new host has seen neither a spacer nor a range yet.
        self.emitted_range = None;
        self.applied_extent = None;
        self.expected_echo = None;
        self.refresh_geometry()?;
        self.resume_deferred()
    }

    /// Unbinds the host: geometry observation stops and pending work is
    /// dropped. Returns the host for reuse.
    pub fn unbind(&mut self) -> Option<H> {
        wdebug!("unbind");
        self.deferred_scroll = None;
        self.layout.clear_scroll_request();
        self.expected_echo = None;
        self.emitted_range = None;
        self.applied_extent = None;
        self.container = None;
        self.host.take()
    }

    pub fn is_bound(&self) -> bool {
        self.host.is_some()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Replaces the item collection.
    ///
    /// The collection length becomes the item count (clearing any override
    /// from [`Scroller::set_item_count`]); index-based measurements are
    /// discarded and re-seeded from the keyed cache, so sizes follow item
    /// identity rather than position.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<(), ScrollerError> {
        self.items = items;
        self.count_override = None;
        self.layout.reset_item_sizes();
        self.apply_count()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Sets the total item count independently of the collection length,
    /// for virtual collections whose full contents never materialize.
    /// Existing measurements are kept: indices are assumed stable.
    pub fn set_item_count(&mut self, count: usize) -> Result<(), ScrollerError> {
        self.count_override = Some(count);
        self.apply_count()
    }

    pub fn item_count(&self) -> usize {
        self.count_override.unwrap_or(self.items.len())
    }

    /// Replaces the active layout strategy: a hard discontinuity. The
    /// previous strategy's state is discarded, the new strategy is fed the
    /// current geometry, and one immediate recomputation runs so no
    /// avoidable empty-range flash occurs.
    pub fn set_layout(&mut self, layout: impl Into<LayoutSpec>) -> Result<(), ScrollerError> {
        wdebug!("set_layout");
        self.layout = layout.into().into_layout();
        self.layout.set_item_count(self.item_count());
        if let Some(size) = self.container {
            self.layout.set_container_size(size);
        }
        if let Some(host) = &self.host {
            let offset = host.scroll_offset();
            self.layout.set_scroll_offset(offset);
            self.last_offset = offset;
        }
        self.reseed_measurements();
        // The new strategy's extent must reach the host even if it matches
        // the number already written.
        self.applied_extent = None;
        self.reconcile()
    }

    pub fn layout(&self) -> &dyn Layout {
        &*self.layout
    }

    /// Replaces the key function. Cached measurements describe identities
    /// produced by the old function, so the cache is dropped.
    pub fn set_key_fn(&mut self, key_fn: impl Fn(&T, usize) -> K + Send + Sync + 'static) {
        self.key_fn = Arc::new(key_fn);
        self.measured.clear();
    }

    pub fn key_fn(&self) -> &KeyFn<T, K> {
        &self.key_fn
    }

    pub fn set_on_event(&mut self, on_event: Option<impl Fn(&ScrollerEvent) + Send + Sync + 'static>) {
        self.on_event = on_event.map(|f| Arc::new(f) as EventFn);
    }

    /// Requests that `index` be scrolled into view with the given
    /// alignment.
    ///
    /// Fails fast when `index` is outside the collection. While the host is
    /// detached or sized zero the request suspends; the next
    /// [`Scroller::tick`] (or a bind/resize that produces geometry) retries
    /// it. A newer request supersedes a suspended one.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Result<(), ScrollerError> {
        let count = self.item_count();
        if index >= count {
            return Err(ScrollerError::IndexOutOfRange { index, count });
        }
        self.scroll_seq = self.scroll_seq.wrapping_add(1);
        let request = ScrollToRequest { index, align };
        if !self.has_geometry() || self.container.is_none_or(|size| size.is_empty()) {
            wtrace!(index, "scroll_to_index deferred until attach");
            self.deferred_scroll = Some(DeferredScroll {
                request,
                seq: self.scroll_seq,
            });
            return Ok(());
        }
        self.deferred_scroll = None;
        self.layout.request_scroll_to(request.index, request.align);
        self.reconcile()
    }

    /// Handles a scroll event from the bound scroll target.
    pub fn on_scroll(&mut self) -> Result<(), ScrollerError> {
        let Some(host) = &self.host else {
            return Ok(());
        };
        let offset = host.scroll_offset();
        if self.expected_echo == Some(offset) {
            // Our own corrected-offset write coming back; already laid out.
            self.expected_echo = None;
            return Ok(());
        }
        self.expected_echo = None;
        if offset != self.last_offset {
            self.scroll_direction = Some(if offset > self.last_offset {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            });
        }
        self.last_offset = offset;
        self.layout.set_scroll_offset(offset);
        self.reconcile()
    }

    /// Handles a resize of the bound container.
    pub fn on_resize(&mut self) -> Result<(), ScrollerError> {
        let Some(host) = &self.host else {
            return Ok(());
        };
        let Some(size) = host.viewport() else {
            return Ok(());
        };
        if self.container == Some(size) {
            return Ok(());
        }
        self.container = Some(size);
        self.layout.set_container_size(size);
        self.reconcile()?;
        self.resume_deferred()
    }

    /// One cooperative turn: retries work deferred while the host was
    /// detached or sized zero.
    pub fn tick(&mut self) -> Result<(), ScrollerError> {
        self.refresh_geometry()?;
        self.resume_deferred()
    }

    /// Feeds post-render measurements from the view layer.
    ///
    /// Sizes are remembered by item key, so they follow items across
    /// reorders and collection replacement.
    pub fn report_item_sizes(&mut self, measurements: &[(usize, u32)]) -> Result<(), ScrollerError> {
        for &(index, size) in measurements {
            if let Some(item) = self.items.get(index) {
                self.measured.insert((self.key_fn)(item, index), size);
            }
        }
        self.layout.update_item_sizes(measurements);
        self.reconcile()
    }

    /// The last emitted range; empty until a first reconciliation ran.
    pub fn visible_range(&self) -> VisibleRange {
        self.emitted_range.unwrap_or(VisibleRange::EMPTY)
    }

    /// The content extent last written to the host.
    pub fn total_extent(&self) -> u64 {
        self.applied_extent.unwrap_or(0)
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    /// Visits the placement of every item in the current window, together
    /// with the item value when the collection is materialized.
    pub fn for_each_window_item(&self, mut f: impl FnMut(PlacedItem, Option<&T>)) {
        let Some(range) = self.emitted_range else {
            return;
        };
        self.layout.for_each_placed(range, &mut |placed| {
            f(placed, self.items.get(placed.index));
        });
    }

    fn has_geometry(&self) -> bool {
        self.host
            .as_ref()
            .and_then(|h| h.viewport())
            .is_some_and(|size| !size.is_empty())
    }

    fn apply_count(&mut self) -> Result<(), ScrollerError> {
        let count = self.item_count();
        wdebug!(count, "item count change");
        self.layout.set_item_count(count);
        if let Some(deferred) = self.deferred_scroll {
            if deferred.request.index >= count {
                // The collection shrank under the suspended request.
                self.deferred_scroll = None;
                self.emit(ScrollerEvent::ScrollToFailed {
                    index: deferred.request.index,
                    count,
                });
            }
        }
        self.reseed_measurements();
        self.reconcile()
    }

    /// Replays cached measurements onto the layout by looking up each
    /// current item's key.
    fn reseed_measurements(&mut self) {
        if self.measured.is_empty() || self.items.is_empty() {
            return;
        }
        let mut seed: Vec<(usize, u32)> = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if let Some(&size) = self.measured.get(&(self.key_fn)(item, index)) {
                seed.push((index, size));
            }
        }
        if !seed.is_empty() {
            wtrace!(entries = seed.len(), "reseed measurements");
            self.layout.update_item_sizes(&seed);
        }
    }

    /// Pulls current geometry from the host into the layout, then runs one
    /// reconciliation. Deferred silently while no usable geometry exists;
    /// that state is expected and transient.
    fn refresh_geometry(&mut self) -> Result<(), ScrollerError> {
        let Some(host) = &self.host else {
            return Ok(());
        };
        let Some(size) = host.viewport() else {
            return Ok(());
        };
        if size.is_empty() {
            return Ok(());
        }
        let offset = host.scroll_offset();
        self.container = Some(size);
        self.layout.set_container_size(size);
        self.layout.set_scroll_offset(offset);
        self.last_offset = offset;
        self.reconcile()
    }

    fn resume_deferred(&mut self) -> Result<(), ScrollerError> {
        let Some(deferred) = self.deferred_scroll else {
            return Ok(());
        };
        if !self.has_geometry() {
            return Ok(());
        }
        self.deferred_scroll = None;
        if deferred.seq != self.scroll_seq {
            // A newer request superseded this continuation while it waited.
            return Ok(());
        }
        wtrace!(index = deferred.request.index, "deferred scroll_to_index resumes");
        self.layout
            .request_scroll_to(deferred.request.index, deferred.request.align);
        self.reconcile()
    }

    /// Runs one layout pass and reconciles its output into the host: at
    /// most one content-extent write, one corrected-offset write, and one
    /// range-change emission.
    fn reconcile(&mut self) -> Result<(), ScrollerError> {
        if self.host.is_none() || self.container.is_none_or(|size| size.is_empty()) {
            // No usable geometry; recomputation would run on zeros.
            return Ok(());
        }
        let update = match self.layout.reflow() {
            Ok(update) => update,
            Err(LayoutError::TargetOutOfRange { index, count }) => {
                // The strategy dropped the invalid request; report it and
                // finish the pass without it.
                self.emit(ScrollerEvent::ScrollToFailed { index, count });
                self.layout.reflow().map_err(ScrollerError::from)?
            }
            Err(err) => return Err(err.into()),
        };
        self.apply(update);
        Ok(())
    }

    fn apply(&mut self, update: LayoutUpdate) {
        if self.applied_extent != Some(update.total_extent) {
            self.applied_extent = Some(update.total_extent);
            if let Some(host) = &mut self.host {
                host.set_content_extent(update.total_extent);
            }
        }

        if let Some(corrected) = update.corrected_offset {
            self.last_offset = corrected;
            if let Some(host) = &mut self.host {
                if host.scroll_offset() != corrected {
                    host.set_scroll_offset(corrected);
                    self.expected_echo = Some(corrected);
                }
            }
        }

        if self.emitted_range != Some(update.range) {
            self.emitted_range = Some(update.range);
            wtrace!(
                start = update.range.start,
                end = update.range.end,
                "range change"
            );
            if let Some(host) = &mut self.host {
                host.on_range_changed(update.range);
            }
            self.emit(ScrollerEvent::RangeChanged(update.range));
        }
    }

    fn emit(&self, event: ScrollerEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(&event);
        }
    }
}

impl<T, H: ScrollHost, K: ItemKey> core::fmt::Debug for Scroller<T, H, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scroller")
            .field("bound", &self.host.is_some())
            .field("item_count", &self.item_count())
            .field("emitted_range", &self.emitted_range)
            .field("applied_extent", &self.applied_extent)
            .field("deferred_scroll", &self.deferred_scroll)
            .finish_non_exhaustive()
    }
}
