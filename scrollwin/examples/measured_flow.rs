//! Estimate-then-measure: watch the extent and positions refine as real
//! sizes replace estimates, without moving the anchored item.

use scrollwin::{FlowLayout, FlowOptions, Layout, Size};

fn real_size(index: usize) -> u32 {
    40 + (index % 5) as u32 * 12
}

fn main() {
    let mut layout = FlowLayout::new(FlowOptions::uniform(48));
    layout.set_item_count(500);
    layout.set_container_size(Size::new(320, 240));
    layout.set_scroll_offset(4_800);

    let update = layout.reflow().unwrap();
    println!(
        "estimated: window {:?}, extent {}",
        update.range, update.total_extent
    );

    // The view layer reports what it actually rendered.
    let measured: Vec<(usize, u32)> = (update.range.start..update.range.end)
        .map(|i| (i, real_size(i)))
        .collect();
    layout.update_item_sizes(&measured);

    let update = layout.reflow().unwrap();
    println!(
        "measured: window {:?}, extent {}, corrected offset {:?}",
        update.range, update.total_extent, update.corrected_offset
    );
}
