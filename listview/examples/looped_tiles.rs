// Example: a looped tile grid driven by scroll deltas.
use listview::{LayoutKind, LayoutSettings, ListEngine, ListOptions, Rect};

fn main() {
    let settings = LayoutSettings::new(LayoutKind::FixedTiles, 40)
        .with_tile_cross_size(40)
        .with_spacing(4)
        .with_cross_spacing(4)
        .with_looped(true);
    let opts = ListOptions::new(settings).with_initial_rect(Some(Rect::new(100, 180)));
    let mut e = ListEngine::with_items(opts, (0..30u64).map(|k| (k, 40)));

    println!(
        "per_line={} list={} loop={} looped={}",
        e.items_per_line(),
        e.list_size(),
        e.loop_size(),
        e.is_looped()
    );

    for delta in [-50i64, -50, 120, 300] {
        e.scroll_by(delta);
        let w = e.visible_window();
        let indices: Vec<usize> = w.indices().collect();
        println!("off={} first={} indices={indices:?}", e.scroll_offset(), w.first);
    }
}
