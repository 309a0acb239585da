use crate::*;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec;

use scrollwin::{
    Align, Direction, Layout, LayoutConfig, LayoutError, LayoutKind, LayoutUpdate, PlacedItem,
    Size, VisibleRange,
};

#[derive(Debug, Default)]
struct HostState {
    viewport: Option<Size>,
    scroll_offset: u64,
    content_extent: Option<u64>,
    extent_writes: usize,
    offset_writes: usize,
    ranges: Vec<VisibleRange>,
}

/// A scripted host: the test mutates its state the way a real container
/// would, then forwards the matching scroller entry point.
#[derive(Clone, Debug, Default)]
struct TestHost(Arc<Mutex<HostState>>);

impl TestHost {
    fn attached(width: u32, height: u32) -> Self {
        let host = Self::default();
        host.state().viewport = Some(Size::new(width, height));
        host
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.0.lock().unwrap()
    }
}

impl ScrollHost for TestHost {
    fn viewport(&self) -> Option<Size> {
        self.state().viewport
    }

    fn scroll_offset(&self) -> u64 {
        self.state().scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        let mut state = self.state();
        state.scroll_offset = offset;
        state.offset_writes += 1;
    }

    fn set_content_extent(&mut self, extent: u64) {
        let mut state = self.state();
        state.content_extent = Some(extent);
        state.extent_writes += 1;
    }

    fn on_range_changed(&mut self, range: VisibleRange) {
        self.state().ranges.push(range);
    }
}

fn flow10() -> LayoutConfig {
    LayoutConfig::default()
        .with_estimated_item_size(10)
        .with_overscan(0)
}

fn capture_events<T, H: ScrollHost, K: ItemKey>(
    scroller: &mut Scroller<T, H, K>,
) -> Arc<Mutex<Vec<ScrollerEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    scroller.set_on_event(Some(move |event: &ScrollerEvent| {
        sink.lock().unwrap().push(*event);
    }));
    events
}

#[test]
fn bind_emits_initial_range_and_extent_once() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    assert!(host.state().ranges.is_empty());

    scroller.bind(host.clone()).unwrap();
    let state = host.state();
    assert_eq!(state.ranges, vec![VisibleRange::new(0, 10)]);
    assert_eq!(state.content_extent, Some(1000));
    assert_eq!(state.extent_writes, 1);
}

#[test]
fn identical_geometry_emits_nothing_new() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();

    scroller.on_scroll().unwrap();
    scroller.on_resize().unwrap();
    scroller.tick().unwrap();

    let state = host.state();
    assert_eq!(state.ranges.len(), 1);
    assert_eq!(state.extent_writes, 1);
}

#[test]
fn scroll_events_move_the_window() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..1000).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();

    host.state().scroll_offset = 500;
    scroller.on_scroll().unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(50, 60));
    assert_eq!(scroller.scroll_direction(), Some(scrollwin::ScrollDirection::Forward));

    // Scenario: all the way to the bottom reaches the final index.
    host.state().scroll_offset = 9_900;
    scroller.on_scroll().unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(990, 1000));
    assert_eq!(scroller.visible_range().last(), Some(999));

    host.state().scroll_offset = 400;
    scroller.on_scroll().unwrap();
    assert_eq!(scroller.scroll_direction(), Some(scrollwin::ScrollDirection::Backward));
}

#[test]
fn empty_collection_has_empty_window_and_zero_extent() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items(Vec::new()).unwrap();
    scroller.bind(host.clone()).unwrap();

    let state = host.state();
    assert_eq!(state.content_extent, Some(0));
    assert_eq!(state.ranges, vec![VisibleRange::EMPTY]);
    drop(state);

    let mut visited = 0;
    scroller.for_each_window_item(|_, _| visited += 1);
    assert_eq!(visited, 0);
}

#[test]
fn collection_shrink_clamps_range_and_absorbs_echo() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();

    host.state().scroll_offset = 900;
    scroller.on_scroll().unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(90, 100));

    // Replacing with a shorter collection immediately pulls the range and
    // the real scroll position inside the new bounds.
    scroller.set_items((0..50).collect()).unwrap();
    let writes = {
        let state = host.state();
        assert_eq!(state.content_extent, Some(500));
        assert_eq!(state.scroll_offset, 400);
        assert_eq!(*state.ranges.last().unwrap(), VisibleRange::new(40, 50));
        state.offset_writes
    };
    assert!(scroller.visible_range().last().unwrap() <= 49);

    // The host echoes the corrected offset back as a scroll event; it must
    // be absorbed without another correction pass.
    scroller.on_scroll().unwrap();
    let state = host.state();
    assert_eq!(state.offset_writes, writes);
    assert_eq!(*state.ranges.last().unwrap(), VisibleRange::new(40, 50));
}

#[test]
fn scroll_to_index_out_of_range_fails_fast() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host).unwrap();

    assert!(matches!(
        scroller.scroll_to_index(100, Align::Start),
        Err(ScrollerError::IndexOutOfRange { index: 100, count: 100 })
    ));
}

#[test]
fn scroll_to_index_before_attach_resolves_after_tick() {
    let host = TestHost::default(); // detached: no viewport yet
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..1000).collect()).unwrap();

    // Issued before the host is part of a live view: suspends.
    scroller.scroll_to_index(500, Align::Center).unwrap();
    scroller.bind(host.clone()).unwrap();
    scroller.tick().unwrap();
    assert!(host.state().ranges.is_empty());

    // The host attaches; the next cooperative turn resolves the request.
    host.state().viewport = Some(Size::new(50, 100));
    scroller.tick().unwrap();

    let state = host.state();
    assert_eq!(state.scroll_offset, 4_955);
    let range = *state.ranges.last().unwrap();
    assert_eq!(range, VisibleRange::new(495, 506));
    assert!(range.contains(500));
}

#[test]
fn newer_request_supersedes_suspended_one() {
    let host = TestHost::default();
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..1000).collect()).unwrap();

    scroller.scroll_to_index(500, Align::Center).unwrap();
    scroller.scroll_to_index(100, Align::Start).unwrap();

    scroller.bind(host.clone()).unwrap();
    host.state().viewport = Some(Size::new(50, 100));
    scroller.tick().unwrap();

    let state = host.state();
    assert_eq!(state.scroll_offset, 1_000);
    assert_eq!(state.ranges.last().unwrap().first(), Some(100));
    // Only the winning request ever touched the scroll position.
    assert_eq!(state.offset_writes, 1);
}

#[test]
fn count_shrink_fails_suspended_request() {
    let host = TestHost::default();
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    let events = capture_events(&mut scroller);
    scroller.set_items((0..1000).collect()).unwrap();
    scroller.scroll_to_index(500, Align::Start).unwrap();

    scroller.set_items((0..10).collect()).unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec![ScrollerEvent::ScrollToFailed { index: 500, count: 10 }]
    );

    // Nothing left to resume once geometry appears.
    scroller.bind(host.clone()).unwrap();
    host.state().viewport = Some(Size::new(50, 100));
    scroller.tick().unwrap();
    assert_eq!(host.state().scroll_offset, 0);
}

#[test]
fn count_shrink_fails_request_already_delegated() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    let events = capture_events(&mut scroller);
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();

    // Resolves against estimates, but stays pending for refinement since
    // the target was never measured.
    scroller.scroll_to_index(90, Align::Start).unwrap();
    assert_eq!(host.state().scroll_offset, 900);

    scroller.set_items((0..50).collect()).unwrap();
    let events = events.lock().unwrap();
    assert!(events.contains(&ScrollerEvent::ScrollToFailed { index: 90, count: 50 }));
    // The pass still completed: range clamped into the new bounds.
    assert_eq!(scroller.visible_range(), VisibleRange::new(40, 50));
}

#[derive(Debug)]
struct Boom;

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("boom")
    }
}

impl core::error::Error for Boom {}

#[derive(Debug, Default)]
struct FailingLayout;

impl Layout for FailingLayout {
    fn set_container_size(&mut self, _size: Size) {}
    fn set_item_count(&mut self, _count: usize) {}
    fn set_scroll_offset(&mut self, _offset: u64) {}
    fn update_item_sizes(&mut self, _measurements: &[(usize, u32)]) {}
    fn reset_item_sizes(&mut self) {}
    fn request_scroll_to(&mut self, _index: usize, _align: Align) {}
    fn clear_scroll_request(&mut self) {}

    fn reflow(&mut self) -> Result<LayoutUpdate, LayoutError> {
        Err(LayoutError::strategy(Boom))
    }

    fn item_position(&self, _index: usize) -> Option<PlacedItem> {
        None
    }

    fn for_each_placed(&self, _range: VisibleRange, _f: &mut dyn FnMut(PlacedItem)) {}
}

#[test]
fn strategy_error_keeps_last_known_good_range() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 10));

    let failing: Box<dyn Layout> = Box::new(FailingLayout);
    assert!(matches!(
        scroller.set_layout(failing),
        Err(ScrollerError::Layout(LayoutError::Strategy(_)))
    ));

    // The rendered view must not collapse: the last good range stands.
    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 10));
    assert_eq!(host.state().ranges.len(), 1);
}

#[test]
fn layout_swap_recomputes_immediately_without_empty_flash() {
    let host = TestHost::attached(35, 20);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..90).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 2));
    assert_eq!(scroller.total_extent(), 900);

    let grid = LayoutConfig::new(LayoutKind::Grid)
        .with_estimated_item_size(10)
        .with_item_cross_size(10)
        .with_overscan(0);
    scroller.set_layout(grid).unwrap();

    // A 3-lane grid over the same 90 items: new window, new extent, and no
    // intermediate empty emission.
    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 6));
    assert_eq!(scroller.total_extent(), 300);
    assert!(host.state().ranges.iter().all(|range| !range.is_empty()));
}

#[test]
fn measurements_follow_item_keys_across_reorder() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<&'static str, TestHost, &'static str> =
        Scroller::with_key_fn(flow10(), |item, _| *item);
    scroller.set_items(vec!["alpha", "beta"]).unwrap();
    scroller.bind(host).unwrap();

    scroller.report_item_sizes(&[(0, 50)]).unwrap();
    assert_eq!(scroller.layout().item_position(0).unwrap().size, 50);
    assert_eq!(scroller.total_extent(), 60);

    // After the reorder the measured 50 follows "alpha" to index 1.
    scroller.set_items(vec!["beta", "alpha"]).unwrap();
    assert_eq!(scroller.layout().item_position(0).unwrap().size, 10);
    assert_eq!(scroller.layout().item_position(1).unwrap().size, 50);
    assert_eq!(scroller.total_extent(), 60);
}

#[test]
fn unchanged_measurements_write_nothing() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();

    // Measured sizes equal the estimates: extent and range are unchanged,
    // so neither is written again.
    scroller.report_item_sizes(&[(0, 10), (1, 10), (2, 10)]).unwrap();
    let state = host.state();
    assert_eq!(state.extent_writes, 1);
    assert_eq!(state.ranges.len(), 1);
}

#[test]
fn unbind_clears_pending_work_and_stops_observation() {
    let detached = TestHost::default();
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.scroll_to_index(50, Align::Start).unwrap();
    scroller.bind(detached).unwrap();

    let host = scroller.unbind().unwrap();
    assert!(!scroller.is_bound());
    scroller.on_scroll().unwrap();
    scroller.on_resize().unwrap();

    // The suspended request died with the binding.
    host.state().viewport = Some(Size::new(50, 100));
    scroller.bind(host.clone()).unwrap();
    scroller.tick().unwrap();
    assert_eq!(host.state().scroll_offset, 0);
}

#[test]
fn rebinding_is_idempotent() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).collect()).unwrap();
    scroller.bind(host.clone()).unwrap();
    scroller.bind(host.clone()).unwrap();

    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 10));
    assert_eq!(host.state().content_extent, Some(1000));
    scroller.tick().unwrap();
    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 10));
}

#[test]
fn window_items_expose_placements_and_values() {
    let host = TestHost::attached(50, 100);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(flow10());
    scroller.set_items((0..100).map(|i| i * 2).collect()).unwrap();
    scroller.bind(host).unwrap();

    let mut seen = Vec::new();
    scroller.for_each_window_item(|placed, item| {
        seen.push((placed.index, placed.start, *item.unwrap()));
    });
    assert_eq!(seen.len(), 10);
    assert_eq!(seen[0], (0, 0, 0));
    assert_eq!(seen[3], (3, 30, 6));
}

#[test]
fn horizontal_direction_uses_width_as_main_axis() {
    let host = TestHost::attached(100, 50);
    let layout = LayoutConfig::default()
        .with_estimated_item_size(10)
        .with_direction(Direction::Horizontal)
        .with_overscan(0);
    let mut scroller: Scroller<u32, TestHost> = Scroller::new(layout);
    scroller.set_items((0..1000).collect()).unwrap();
    scroller.bind(host).unwrap();

    assert_eq!(scroller.visible_range(), VisibleRange::new(0, 10));
}

#[test]
fn arena_handles_are_generational() {
    let mut arena: BindingArena<&'static str> = BindingArena::new();
    let first = arena.insert("first");
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.get(first), Some(&"first"));

    assert_eq!(arena.remove(first), Some("first"));
    assert!(arena.is_empty());
    assert_eq!(arena.get(first), None);
    assert_eq!(arena.remove(first), None);

    // The slot is recycled under a new generation: the old handle stays
    // dead.
    let second = arena.insert("second");
    assert_ne!(first, second);
    assert_eq!(arena.get(first), None);
    assert_eq!(arena.get(second), Some(&"second"));

    *arena.get_mut(second).unwrap() = "renamed";
    assert_eq!(arena.iter().copied().collect::<Vec<_>>(), vec!["renamed"]);
}

#[test]
fn binding_config_fails_fast_when_incomplete() {
    let empty: BindingConfig<&'static str, String> = BindingConfig::new();
    assert_eq!(empty.render().err(), Some(ConfigError::MissingRenderFn));
    assert_eq!(empty.key().err(), Some(ConfigError::MissingKeyFn));

    let config: BindingConfig<&'static str, String> = BindingConfig::new()
        .with_render(|item, index| format!("{index}:{item}"))
        .with_key(|_, index| index as u64);
    let render = config.render().unwrap();
    assert_eq!(render(&"row", 3), "3:row");
    assert_eq!((config.key().unwrap())(&"row", 3), 3);
}
