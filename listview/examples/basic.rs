// Example: minimal usage and scroll-to helper.
use listview::{Align, ListEngine, ListOptions, Rect};

fn main() {
    let opts = ListOptions::fixed(24).with_initial_rect(Some(Rect::new(240, 320)));
    let mut e = ListEngine::with_items(opts, (0..1_000_000u64).map(|k| (k, 24)));
    e.set_scroll_offset(123_456);

    let mut items = Vec::new();
    e.collect_displayed_items(&mut items);
    println!("list_size={}", e.list_size());
    println!("window={:?}", e.visible_window());
    println!("first_displayed={:?}", items.first());

    let off = e.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={off}");
}
