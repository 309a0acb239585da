//! Scroll-to-index issued before the host is attached: the request
//! suspends, survives the attach, and resolves on the next tick.

use std::cell::RefCell;
use std::rc::Rc;

use scrollwin::{Align, LayoutConfig, Size, VisibleRange};
use scrollwin_scroller::{ScrollHost, Scroller};

#[derive(Debug, Default)]
struct SimState {
    viewport: Option<Size>,
    scroll_offset: u64,
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
        println!("  scroll position corrected to {offset}");
    }

    fn set_content_extent(&mut self, _extent: u64) {}

    fn on_range_changed(&mut self, range: VisibleRange) {
        println!("  window now {:?}..{:?}", range.first(), range.last());
    }
}

fn main() {
    let host = SimHost::default();
    let mut scroller: Scroller<u32, SimHost> = Scroller::new(
        LayoutConfig::default()
            .with_estimated_item_size(20)
            .with_overscan(1),
    );
    scroller.set_items((0..10_000).collect()).unwrap();

    println!("requesting item 4321 centered before attach");
    scroller.scroll_to_index(4_321, Align::Center).unwrap();
    scroller.bind(host.clone()).unwrap();

    println!("tick with no geometry (nothing happens):");
    scroller.tick().unwrap();

    println!("host attaches, next tick resolves the request:");
    host.0.borrow_mut().viewport = Some(Size::new(320, 240));
    scroller.tick().unwrap();
}
