//! Drives a scroller against a simulated host: scroll frames come in, the
//! window and spacer go out.

use std::cell::RefCell;
use std::rc::Rc;

use scrollwin::{LayoutConfig, Size, VisibleRange};
use scrollwin_scroller::{ScrollHost, Scroller};

#[derive(Debug, Default)]
struct SimState {
    viewport: Option<Size>,
    scroll_offset: u64,
    content_extent: u64,
}

#[derive(Clone, Debug, Default)]
struct SimHost(Rc<RefCell<SimState>>);

impl ScrollHost for SimHost {
    fn viewport(&self) -> Option<Size> {
        self.0.borrow().viewport
    }

    fn scroll_offset(&self) -> u64 {
        self.0.borrow().scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.0.borrow_mut().scroll_offset = offset;
    }

    fn set_content_extent(&mut self, extent: u64) {
        self.0.borrow_mut().content_extent = extent;
        println!("  spacer resized to {extent}");
    }

    fn on_range_changed(&mut self, range: VisibleRange) {
        println!("  window now {:?}..{:?}", range.first(), range.last());
    }
}

fn main() {
    let host = SimHost::default();
    host.0.borrow_mut().viewport = Some(Size::new(320, 240));

    let layout = LayoutConfig::default()
        .with_estimated_item_size(24)
        .with_overscan(3);
    let mut scroller: Scroller<String, SimHost> = Scroller::new(layout);
    scroller
        .set_items((0..5_000).map(|i| format!("row {i}")).collect())
        .unwrap();
    scroller.bind(host.clone()).unwrap();

    for offset in [0u64, 2_400, 2_430, 60_000, 119_760] {
        println!("scroll event at {offset}:");
        host.0.borrow_mut().scroll_offset = offset;
        scroller.on_scroll().unwrap();
    }

    println!("rendering the final window:");
    scroller.for_each_window_item(|placed, item| {
        println!(
            "  {:>4} @ {:>6}: {}",
            placed.index,
            placed.start,
            item.unwrap()
        );
    });
}
