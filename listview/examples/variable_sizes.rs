// Example: measured sizes and scroll jump prevention.
use listview::{Align, LayoutKind, LayoutSettings, ListEngine, ListOptions, Rect};

fn main() {
    let settings = LayoutSettings::new(LayoutKind::Variable, 10).with_spacing(2);
    let opts = ListOptions::new(settings).with_initial_rect(Some(Rect::new(30, 100)));
    let mut e = ListEngine::with_items(opts, (0..100u64).map(|k| (k, 10)));
    e.set_scroll_offset(200);

    println!(
        "before: off={} list={} window={:?}",
        e.scroll_offset(),
        e.list_size(),
        e.visible_window()
    );

    // A size change above the viewport moves the offset along, so the content stays put.
    let applied = e.set_instance_size(0, 30).unwrap_or_default();
    println!(
        "set_instance_size(0): applied={applied} off={} list={}",
        e.scroll_offset(),
        e.list_size()
    );

    // Overrides follow keys: reversing the data keeps item 0's size with key 0.
    let reversed: Vec<_> = (0..100u64).rev().map(|k| (k, 10)).collect();
    e.set_items(reversed);
    println!("after reverse: size(99)={:?}", e.item_size(99));

    let to = e.scroll_to_index(10, Align::Center);
    println!("scroll_to_index(10): off={to} window={:?}", e.visible_window());
}
