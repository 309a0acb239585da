//! Minimal flow layout walkthrough: a fixed-size list, a scroll, and a
//! scroll-to-index request.

use scrollwin::{Align, FlowLayout, FlowOptions, Layout, Size};

fn main() {
    let mut layout = FlowLayout::new(FlowOptions::uniform(24).with_overscan(2));
    layout.set_item_count(10_000);
    layout.set_container_size(Size::new(320, 240));

    let update = layout.reflow().unwrap();
    println!(
        "at top: window {:?}, extent {}",
        update.range, update.total_extent
    );

    layout.set_scroll_offset(120_000);
    let update = layout.reflow().unwrap();
    println!("after scroll: window {:?}", update.range);

    layout.request_scroll_to(7_500, Align::Center);
    let update = layout.reflow().unwrap();
    println!(
        "scroll-to 7500 centered: window {:?}, corrected offset {:?}",
        update.range, update.corrected_offset
    );

    layout.for_each_placed(update.range, &mut |placed| {
        println!("  item {} at {}..{}", placed.index, placed.start, placed.end());
    });
}
