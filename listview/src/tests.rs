use crate::renderer::{AnyRenderer, FixedLines, LineMetrics, Renderer, VariableLines};
use crate::*;

use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use alloc::sync::Arc;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn items(sizes: &[u32]) -> Vec<(u64, u32)> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| (i as u64, s))
        .collect()
}

fn uniform(count: usize, size: u32) -> Vec<(u64, u32)> {
    (0..count as u64).map(|k| (k, size)).collect()
}

fn engine(settings: LayoutSettings, entries: Vec<(u64, u32)>, rect: Rect) -> ListEngine<u64> {
    let opts = ListOptions::new(settings).with_initial_rect(Some(rect));
    ListEngine::with_items(opts, entries)
}

fn fixed(count: usize, size: u32, viewport: u32) -> ListEngine<u64> {
    engine(
        LayoutSettings::new(LayoutKind::Fixed, size),
        uniform(count, size),
        Rect::new(viewport, 0),
    )
}

fn expected_item_start(sizes: &[u32], spacing: u32, padding_start: u32, index: usize) -> u64 {
    let mut off = padding_start as u64;
    for i in 0..index {
        off = off.saturating_add(sizes[i] as u64);
        if i + 1 < sizes.len() {
            off = off.saturating_add(spacing as u64);
        }
    }
    off
}

fn expected_list_size(sizes: &[u32], spacing: u32, padding_start: u32, padding_end: u32) -> u64 {
    let mut total = padding_start as u64 + padding_end as u64;
    for (i, &sz) in sizes.iter().enumerate() {
        total = total.saturating_add(sz as u64);
        if i + 1 < sizes.len() {
            total = total.saturating_add(spacing as u64);
        }
    }
    total
}

fn expected_index_at_offset(
    sizes: &[u32],
    spacing: u32,
    padding_start: u32,
    offset: u64,
) -> Option<usize> {
    let count = sizes.len();
    if count == 0 {
        return None;
    }
    let target = offset.saturating_sub(padding_start as u64);

    // An offset inside the spacing after item `i` resolves to `i`.
    let mut consumed = 0usize;
    let mut prefix = 0u64;
    for (i, &size) in sizes.iter().enumerate() {
        let mut seg = size as u64;
        if i + 1 < count {
            seg = seg.saturating_add(spacing as u64);
        }
        if prefix.saturating_add(seg) <= target {
            prefix = prefix.saturating_add(seg);
            consumed += 1;
        } else {
            break;
        }
    }
    Some(consumed.min(count - 1))
}

fn displayed(e: &ListEngine<u64>) -> Vec<DisplayedItem> {
    let mut out = Vec::new();
    e.collect_displayed_items(&mut out);
    out
}

#[test]
fn fixed_list_positions_and_window() {
    let mut e = fixed(100, 10, 35);
    assert_eq!(e.list_size(), 1000);
    assert_eq!(e.item_position(3), Some(30));
    assert_eq!(e.item_position_end(3), Some(40));
    assert_eq!(e.item_position(100), None);
    assert_eq!(e.max_visible_items(), 5);

    assert_eq!(
        e.visible_window(),
        VisibleWindow {
            first: 0,
            count: 4,
            total: 100
        }
    );

    e.set_scroll_offset(15);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (1, 4));

    e.set_scroll_offset(10_000);
    assert_eq!(e.scroll_offset(), 965);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (96, 4));
    assert_eq!(w.indices().collect::<Vec<_>>(), [96, 97, 98, 99]);
}

#[test]
fn padding_and_spacing_affect_list_and_loop_size() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10)
        .with_spacing(2)
        .with_padding(5, 7);
    let e = engine(settings, uniform(3, 10), Rect::new(20, 0));
    // 5 + (10+2) + (10+2) + 10 + 7
    assert_eq!(e.list_size(), 46);
    assert_eq!(e.loop_size(), 48);
    assert_eq!(e.item_position(0), Some(5));
    assert_eq!(e.item_position(1), Some(17));
    assert_eq!(e.max_scroll_offset(), 26);
}

#[test]
fn strict_visible_indexes_skip_partially_visible_items() {
    let mut e = fixed(100, 10, 35);
    e.set_scroll_offset(5);
    assert_eq!(e.first_visible_index(false), Some(0));
    assert_eq!(e.first_visible_index(true), Some(1));
    // Item 3 ends exactly at the viewport end.
    assert_eq!(e.last_visible_index(false), Some(3));
    assert_eq!(e.last_visible_index(true), Some(3));

    e.set_scroll_offset(6);
    assert_eq!(e.last_visible_index(false), Some(4));
    assert_eq!(e.last_visible_index(true), Some(3));
}

#[test]
fn variable_list_matches_brute_force() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let count = rng.gen_range_usize(1, 60);
        let sizes: Vec<u32> = (0..count).map(|_| rng.gen_range_u32(1, 40)).collect();
        let spacing = rng.gen_range_u32(0, 5);
        let padding_start = rng.gen_range_u32(0, 10);
        let padding_end = rng.gen_range_u32(0, 10);
        let viewport = rng.gen_range_u32(1, 120);

        let settings = LayoutSettings::new(LayoutKind::Variable, 10)
            .with_spacing(spacing)
            .with_padding(padding_start, padding_end);
        let mut e = engine(settings, items(&sizes), Rect::new(viewport, 0));

        assert_eq!(
            e.list_size(),
            expected_list_size(&sizes, spacing, padding_start, padding_end)
        );
        for i in 0..count {
            assert_eq!(
                e.item_position(i),
                Some(expected_item_start(&sizes, spacing, padding_start, i))
            );
            assert_eq!(e.item_size(i), Some(sizes[i]));
        }

        for _ in 0..10 {
            let offset = rng.gen_range_u64(0, e.list_size() + 50);
            e.set_scroll_offset(offset);
            let scroll = e.scroll_offset();
            assert!(scroll <= e.max_scroll_offset());
            assert_eq!(
                e.first_visible_index(false),
                expected_index_at_offset(&sizes, spacing, padding_start, scroll)
            );
            let last_offset = scroll + viewport as u64 - 1;
            assert_eq!(
                e.last_visible_index(false),
                expected_index_at_offset(&sizes, spacing, padding_start, last_offset)
            );
        }
    }
}

#[test]
fn fixed_tiles_pack_items_into_lines() {
    let settings = LayoutSettings::new(LayoutKind::FixedTiles, 10).with_tile_cross_size(20);
    let mut e = engine(settings, uniform(10, 10), Rect::new(25, 65));
    assert_eq!(e.items_per_line(), 3);
    assert_eq!(e.list_size(), 40);
    assert_eq!(e.item_position(2), Some(0));
    assert_eq!(e.item_position(4), Some(10));
    assert_eq!(e.item_position(9), Some(30));

    let w = e.visible_window();
    assert_eq!((w.first, w.count), (0, 9));

    e.set_scroll_offset(15);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (3, 7));

    // Narrower viewport: two tiles per line, five lines.
    e.set_rect(Rect::new(25, 45));
    assert_eq!(e.items_per_line(), 2);
    assert_eq!(e.list_size(), 50);
    assert_eq!(e.item_position(4), Some(20));
}

#[test]
fn minimum_window_pads_tiles_with_whole_lines() {
    let settings = LayoutSettings::new(LayoutKind::FixedTiles, 10)
        .with_tile_cross_size(20)
        .with_min_visible(2);
    let mut e = engine(settings, uniform(7, 10), Rect::new(10, 65));
    assert_eq!(e.items_per_line(), 3);
    assert_eq!(e.max_scroll_offset(), 20);

    // Only item 6 shows on the last line; the line before it pads the window.
    e.set_scroll_offset(20);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (3, 4));
    assert_eq!(w.indices().collect::<Vec<_>>(), [3, 4, 5, 6]);
    assert!(w.count <= e.max_visible_items());
}

#[test]
fn variable_tiles_use_the_largest_item_of_a_line() {
    let settings = LayoutSettings::new(LayoutKind::VariableTiles, 10).with_tile_cross_size(20);
    let mut e = engine(settings, items(&[5, 9, 3, 4, 4, 4, 7]), Rect::new(10, 60));
    assert_eq!(e.items_per_line(), 3);
    assert_eq!(e.item_position(4), Some(9));
    assert_eq!(e.item_position(6), Some(13));
    assert_eq!(e.list_size(), 20);

    assert_eq!(e.set_instance_size(3, 12), Ok(0));
    assert_eq!(e.list_size(), 28);
    assert_eq!(e.item_position(6), Some(21));

    // Shrinking an item that is not the largest of its line keeps the line.
    assert_eq!(e.set_instance_size(2, 1), Ok(0));
    assert_eq!(e.list_size(), 28);
}

#[test]
fn tiles_per_line_counts_cross_spacing_between_tiles() {
    use crate::renderer::tiles_per_line;
    assert_eq!(tiles_per_line(100, 30, 10), 2);
    assert_eq!(tiles_per_line(100, 30, 0), 3);
    assert_eq!(tiles_per_line(10, 30, 0), 1);
    assert_eq!(tiles_per_line(0, 0, 0), 1);
}

#[test]
fn looped_list_wraps_offsets_and_window() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_looped(true);
    let mut e = engine(settings, uniform(10, 10), Rect::new(25, 0));
    assert!(e.is_looped());
    assert_eq!(e.loop_size(), 100);
    assert_eq!(e.validate_position(250), 50);

    e.set_scroll_offset(95);
    let w = e.visible_window();
    assert_eq!(
        w,
        VisibleWindow {
            first: 9,
            count: 3,
            total: 10
        }
    );
    assert_eq!(w.indices().collect::<Vec<_>>(), [9, 0, 1]);
    assert!(e.is_displayed(0));
    assert!(!e.is_displayed(5));

    let items = displayed(&e);
    let starts: Vec<i64> = items.iter().map(|it| it.start).collect();
    assert_eq!(starts, [90, 100, 110]);
    assert_eq!(items[1].virtual_index, 10);
    assert_eq!(items[1].index, 0);

    e.scroll_by(-100);
    assert_eq!(e.scroll_offset(), 95);
    e.scroll_by(-96);
    assert_eq!(e.scroll_offset(), 99);
    e.scroll_by(1);
    assert_eq!(e.scroll_offset(), 0);
}

#[test]
fn scroll_by_extreme_deltas_stays_in_range() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_looped(true);
    let mut e = engine(settings, uniform(10, 10), Rect::new(25, 0));
    e.set_scroll_offset(50);
    e.scroll_by(i64::MAX);
    assert_eq!(e.scroll_offset(), 57);
    e.scroll_by(i64::MIN);
    assert_eq!(e.scroll_offset(), 49);

    let mut e = fixed(10, 10, 25);
    e.scroll_by(i64::MAX);
    assert_eq!(e.scroll_offset(), 75);
    e.scroll_by(i64::MIN);
    assert_eq!(e.scroll_offset(), 0);
}

#[test]
fn looping_engages_only_when_the_list_exceeds_the_viewport() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_looped(true);
    let mut e = engine(settings, uniform(2, 10), Rect::new(25, 0));
    assert!(!e.is_looped());
    e.set_scroll_offset(5);
    assert_eq!(e.scroll_offset(), 0);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (0, 2));

    e.set_viewport_size(15);
    assert!(e.is_looped());
}

#[test]
fn looped_virtual_starts_keep_padding_and_spacing_per_cycle() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10)
        .with_spacing(2)
        .with_padding(3, 0)
        .with_looped(true);
    let e = engine(settings, uniform(4, 10), Rect::new(20, 0));
    assert_eq!(e.list_size(), 49);
    assert_eq!(e.loop_size(), 51);

    let r = AnyRenderer::build(e.settings(), &[10; 4], e.rect());
    let r = r.as_renderer();
    assert_eq!(r.virtual_item_start(0), Some(3));
    assert_eq!(r.virtual_item_start(4), Some(54));
    assert_eq!(r.virtual_item_start(-1), Some(-12));
}

#[test]
fn min_visible_pads_the_window_and_clamps_at_the_end() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_min_visible(3);
    let mut e = engine(settings, uniform(100, 10), Rect::new(5, 0));
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (0, 3));

    e.set_scroll_offset(u64::MAX);
    assert_eq!(e.scroll_offset(), 995);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (97, 3));

    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_min_visible(5);
    let e = engine(settings, uniform(2, 10), Rect::new(5, 0));
    assert_eq!(e.visible_window().count, 2);
}

#[test]
fn overscan_extends_the_window_by_lines() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_overscan(2);
    let mut e = engine(settings, uniform(100, 10), Rect::new(35, 0));
    assert_eq!(e.max_visible_items(), 9);

    let w = e.visible_window();
    assert_eq!((w.first, w.count), (0, 6));

    e.set_scroll_offset(200);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (18, 8));
}

#[test]
fn empty_list_has_an_empty_window() {
    let mut e = fixed(0, 10, 35);
    assert!(e.visible_window().is_empty());
    assert_eq!(e.first_visible_index(false), None);
    assert_eq!(e.scroll_to_index(3, Align::Start), 0);
    assert!(displayed(&e).is_empty());
    e.set_scroll_offset(40);
    assert_eq!(e.scroll_offset(), 0);
}

#[test]
fn resize_before_viewport_compensates_scroll_offset() {
    let mut e = engine(
        LayoutSettings::new(LayoutKind::Variable, 10),
        uniform(100, 10),
        Rect::new(50, 0),
    );
    e.set_scroll_offset(200);

    assert_eq!(e.set_instance_size(5, 30), Ok(20));
    assert_eq!(e.scroll_offset(), 220);
    assert_eq!(e.item_position(20), Some(220));
    assert!(e.is_size_overridden(5));

    // Items at or below the viewport top do not move the offset.
    assert_eq!(e.set_instance_size(25, 30), Ok(0));
    assert_eq!(e.scroll_offset(), 220);

    assert_eq!(e.reset_instance_size(5), Ok(-20));
    assert_eq!(e.scroll_offset(), 200);
    assert!(!e.is_size_overridden(5));
    assert_eq!(e.item_size(5), Some(10));
}

#[test]
fn resize_hook_can_veto_compensation() {
    let opts = ListOptions::new(LayoutSettings::new(LayoutKind::Variable, 10))
        .with_initial_rect(Some(Rect::new(50, 0)))
        .with_should_adjust_scroll_position_on_item_size_change(Some(
            |_: &ListEngine<u64>, _item: DisplayedItem, _delta: i64| false,
        ));
    let mut e = ListEngine::with_items(opts, uniform(100, 10));
    e.set_scroll_offset(200);
    assert_eq!(e.set_instance_size(5, 30), Ok(0));
    assert_eq!(e.scroll_offset(), 200);
    assert_eq!(e.item_position(20), Some(220));
}

#[test]
fn fixed_layouts_record_overrides_without_changing_geometry() {
    let mut e = fixed(10, 10, 35);
    assert_eq!(e.set_instance_size(2, 40), Ok(0));
    assert!(e.is_size_overridden(2));
    assert_eq!(e.item_position(3), Some(30));
    assert_eq!(e.list_size(), 100);
}

#[test]
fn overrides_follow_keys_across_resets() {
    let mut e = engine(
        LayoutSettings::new(LayoutKind::Variable, 10),
        uniform(3, 10),
        Rect::new(50, 0),
    );
    e.set_instance_size(1, 40).unwrap();

    e.set_items([(1, 10), (0, 10), (2, 10)]);
    assert_eq!(e.item_size(0), Some(40));
    assert_eq!(e.item_size(1), Some(10));
    assert_eq!(e.list_size(), 60);

    // Removing the last item with key 1 forgets its override.
    e.remove_items(0..1).unwrap();
    assert_eq!(e.size_override_count(), 0);
    e.insert_items(0, [(1, 10)]).unwrap();
    assert_eq!(e.item_size(0), Some(10));
}

#[test]
fn replace_item_picks_up_the_new_key_override() {
    let mut e = engine(
        LayoutSettings::new(LayoutKind::Variable, 10),
        uniform(3, 10),
        Rect::new(50, 0),
    );
    e.set_instance_size(0, 25).unwrap();
    e.replace_item(2, 0, 10).unwrap();
    assert_eq!(e.item_size(2), Some(25));
    assert_eq!(e.list_size(), 60);

    e.set_default_size(1, 15).unwrap();
    assert_eq!(e.item_size(1), Some(15));
    assert_eq!(e.default_size(1), Some(15));
}

#[test]
fn export_and_import_size_overrides() {
    let mut e = engine(
        LayoutSettings::new(LayoutKind::Variable, 10),
        uniform(5, 10),
        Rect::new(50, 0),
    );
    e.set_instance_size(1, 20).unwrap();
    e.set_instance_size(3, 30).unwrap();
    let mut saved = e.export_size_overrides();
    saved.sort();
    assert_eq!(saved, [(1, 20), (3, 30)]);

    e.clear_size_overrides();
    assert_eq!(e.list_size(), 50);

    e.import_size_overrides(saved);
    assert_eq!(e.item_size(3), Some(30));
    assert_eq!(e.list_size(), 80);
}

#[test]
fn setters_report_out_of_range_indexes() {
    let mut e = fixed(3, 10, 35);
    assert_eq!(
        e.set_instance_size(100, 5),
        Err(Error::IndexOutOfRange {
            index: 100,
            count: 3
        })
    );
    assert_eq!(
        e.reset_instance_size(3),
        Err(Error::IndexOutOfRange { index: 3, count: 3 })
    );
    assert_eq!(
        e.insert_items(4, [(9, 10)]),
        Err(Error::IndexOutOfRange { index: 4, count: 3 })
    );
    assert_eq!(
        e.remove_items(2..5),
        Err(Error::IndexOutOfRange { index: 5, count: 3 })
    );
    assert_eq!(e.count(), 3);

    let msg = std::format!("{}", Error::IndexOutOfRange { index: 7, count: 3 });
    assert_eq!(msg, "index 7 is out of range for a list of 3 items");
}

#[test]
fn wrap_index_maps_virtual_indexes() {
    assert_eq!(wrap_index(-1, 5), Some(4));
    assert_eq!(wrap_index(5, 5), Some(0));
    assert_eq!(wrap_index(12, 5), Some(2));
    assert_eq!(wrap_index(-11, 5), Some(4));
    assert_eq!(wrap_index(0, 0), None);

    let e = fixed(5, 10, 10);
    assert_eq!(e.wrap_index(-2), Some(3));
}

#[test]
fn window_tracker_reports_changes_once() {
    let mut t = WindowTracker::new();
    let w = VisibleWindow {
        first: 3,
        count: 4,
        total: 10,
    };
    assert!(t.update(w));
    assert!(!t.update(w));
    assert_eq!(t.current(), Some(w));

    t.invalidate();
    assert!(t.update(w));
    assert!(t.update(VisibleWindow { first: 4, ..w }));
}

#[test]
fn batch_update_notifies_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let opts = ListOptions::fixed(10).with_on_change(Some(move |_: &ListEngine<u64>, _: bool| {
        c.fetch_add(1, Ordering::Relaxed);
    }));
    let mut e = ListEngine::with_items(opts, uniform(100, 10));

    e.batch_update(|e| {
        e.set_viewport_size(30);
        e.set_scroll_offset(50);
        e.batch_update(|e| e.set_scroll_offset(60));
    });
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    e.set_scroll_offset(60);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    e.set_scroll_offset(70);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn scrolling_state_resets_after_delay() {
    let mut e = fixed(100, 10, 30);
    e.apply_scroll_offset_event(100, 0);
    assert!(e.is_scrolling());
    assert_eq!(e.scroll_direction(), Some(ScrollDirection::Forward));

    e.update_scrolling(100);
    assert!(e.is_scrolling());
    e.update_scrolling(150);
    assert!(!e.is_scrolling());
    assert_eq!(e.scroll_direction(), None);

    e.apply_scroll_offset_event(40, 200);
    assert_eq!(e.scroll_direction(), Some(ScrollDirection::Backward));
}

#[test]
fn scroll_to_index_offset_aligns() {
    let mut e = fixed(100, 10, 35);
    assert_eq!(e.scroll_to_index_offset(10, Align::Start), 100);
    assert_eq!(e.scroll_to_index_offset(10, Align::End), 75);
    assert_eq!(e.scroll_to_index_offset(10, Align::Center), 88);
    assert_eq!(e.scroll_to_index_offset(2, Align::Auto), 0);
    assert_eq!(e.scroll_to_index_offset(10, Align::Auto), 75);
    assert_eq!(e.scroll_to_index_offset(99, Align::Start), 965);
    assert_eq!(e.scroll_to_index_offset(99, Align::End), 965);
    assert_eq!(e.scroll_to_index_offset(1_000, Align::End), 965);

    e.set_scroll_offset(200);
    assert_eq!(e.scroll_to_index_offset(10, Align::Auto), 100);
    assert_eq!(e.scroll_to_index_offset(21, Align::Auto), 200);
    assert_eq!(e.scroll_to_index(50, Align::Start), 500);
}

#[test]
fn looped_scroll_to_index_picks_the_closest_cycle() {
    let settings = LayoutSettings::new(LayoutKind::Fixed, 10).with_looped(true);
    let mut e = engine(settings, uniform(10, 10), Rect::new(25, 0));
    e.set_scroll_offset(95);
    // Item 0 right after item 9 is closer than going back to the start.
    assert_eq!(e.scroll_to_index_offset(0, Align::Start), 0);
    assert_eq!(e.scroll_to_index_offset(1, Align::End), 95);
    assert_eq!(e.scroll_to_index_offset(9, Align::Auto), 90);
}

#[test]
fn frame_state_round_trips() {
    let mut e = fixed(100, 10, 35);
    e.apply_scroll_frame(Rect::new(40, 10), 120, 5);
    let frame = e.frame_state();
    assert_eq!(frame.scroll.offset, 120);
    assert!(frame.scroll.is_scrolling);
    assert_eq!(frame.scroll.direction, Some(ScrollDirection::Forward));
    assert_eq!(frame.window, e.visible_window());

    let mut other = fixed(100, 10, 1);
    other.set_scroll_offset(500);
    other.restore_frame_state(frame, 10);
    assert_eq!(other.frame_state(), frame);
}

#[test]
fn initial_offset_is_validated_against_initial_items() {
    let opts = ListOptions::fixed(10)
        .with_initial_rect(Some(Rect::new(30, 0)))
        .with_initial_offset(5_000);
    let e = ListEngine::with_items(opts, uniform(100, 10));
    assert_eq!(e.scroll_offset(), 970);
}

#[test]
fn ellipse_places_items_along_the_arc() {
    let settings = LayoutSettings::new(LayoutKind::Ellipse(EllipseSettings::default()), 10);
    let e = engine(settings, uniform(20, 10), Rect::new(100, 0));
    assert_eq!(e.list_size(), 200);
    let w = e.visible_window();
    assert_eq!((w.first, w.count), (0, 10));

    #[cfg(feature = "std")]
    {
        let p = e.item_placement(0).unwrap();
        assert!((p.angle - 49.5).abs() < 1e-3);
        let r2 = p.x * p.x + p.y * p.y;
        assert!((r2 - 10_000.0).abs() < 1.0);
        assert!(e.item_placement(-1).unwrap().angle < 45.0);
    }
}

#[test]
fn sanitize_size_rejects_unusable_measurements() {
    assert_eq!(sanitize_size(f32::NAN), 1);
    assert_eq!(sanitize_size(f32::INFINITY), 1);
    assert_eq!(sanitize_size(f32::NEG_INFINITY), 1);
    assert_eq!(sanitize_size(-3.0), 1);
    assert_eq!(sanitize_size(0.4), 1);
    assert_eq!(sanitize_size(10.4), 10);
    assert_eq!(sanitize_size(10.5), 11);
}

#[test]
fn line_metrics_agree_between_fixed_and_variable() {
    let mut rng = Lcg::new(11);
    for _ in 0..20 {
        let count = rng.gen_range_usize(1, 30);
        let size = rng.gen_range_u32(1, 20);
        let spacing = rng.gen_range_u32(0, 4);
        let f = FixedLines::new(count, size, spacing);
        let v = VariableLines::new(alloc::vec![size; count], spacing);
        assert_eq!(f.content_size(), v.content_size());
        for line in 0..count {
            assert_eq!(f.line_start(line), v.line_start(line));
        }
        for _ in 0..20 {
            let off = rng.gen_range_u64(0, f.content_size() + 10);
            assert_eq!(f.line_at(off), v.line_at(off));
        }
    }
}

#[test]
fn variable_lines_track_their_smallest_line() {
    let mut lines = VariableLines::new(alloc::vec![5, 3, 3, 8], 0);
    assert_eq!(lines.min_line_size(), 3);
    lines.set_line_size(1, 6);
    assert_eq!(lines.min_line_size(), 3);
    lines.set_line_size(2, 4);
    assert_eq!(lines.min_line_size(), 4);
    lines.set_line_size(0, 2);
    assert_eq!(lines.min_line_size(), 2);
    lines.set_line_size(0, 9);
    assert_eq!(lines.min_line_size(), 4);
    assert_eq!(VariableLines::new(Vec::new(), 0).min_line_size(), 1);
    assert_eq!(VariableLines::default().min_line_size(), 1);

    let mut rng = Lcg::new(5);
    let sizes: Vec<u32> = (0..64).map(|_| rng.gen_range_u32(1, 12)).collect();
    let mut lines = VariableLines::new(sizes.clone(), 1);
    let mut sizes = sizes;
    for _ in 0..500 {
        let line = rng.gen_range_usize(0, sizes.len());
        let size = rng.gen_range_u32(1, 12);
        lines.set_line_size(line, size);
        sizes[line] = size;
        assert_eq!(lines.min_line_size(), sizes.iter().copied().min().unwrap());
    }
}

#[test]
fn random_edits_keep_geometry_consistent() {
    let mut rng = Lcg::new(42);
    let settings = LayoutSettings::new(LayoutKind::Variable, 10).with_spacing(1);
    let mut e = engine(settings, uniform(40, 10), Rect::new(60, 0));
    let mut next_key = 40u64;

    for _ in 0..300 {
        match rng.gen_range_u32(0, 5) {
            0 if e.count() > 0 => {
                let i = rng.gen_range_usize(0, e.count());
                e.set_instance_size(i, rng.gen_range_u32(1, 50)).unwrap();
            }
            1 if e.count() > 0 => {
                let i = rng.gen_range_usize(0, e.count());
                e.reset_instance_size(i).unwrap();
            }
            2 => {
                let at = rng.gen_range_usize(0, e.count() + 1);
                e.insert_items(at, [(next_key, rng.gen_range_u32(1, 30))])
                    .unwrap();
                next_key += 1;
            }
            3 if e.count() > 1 => {
                let i = rng.gen_range_usize(0, e.count());
                e.remove_items(i..i + 1).unwrap();
            }
            _ => {
                let off = rng.gen_range_u64(0, e.list_size() + 1);
                if rng.gen_bool() {
                    e.set_scroll_offset(off);
                } else {
                    e.scroll_by(off as i64 - e.scroll_offset() as i64);
                }
            }
        }

        let sizes: Vec<u32> = (0..e.count()).filter_map(|i| e.item_size(i)).collect();
        assert_eq!(e.list_size(), expected_list_size(&sizes, 1, 0, 0));
        assert!(e.scroll_offset() <= e.max_scroll_offset());
        let w = e.visible_window();
        assert!(w.first >= 0);
        assert!(w.first as usize + w.count <= e.count());
        assert!(w.count <= e.max_visible_items());
    }
}

#[test]
fn index_at_offset_with_spacing_maps_into_previous_item() {
    let settings = LayoutSettings::new(LayoutKind::Variable, 2).with_spacing(1);
    // item0(0..2), spacing(2..3), item1(3..5)
    let e = engine(settings, uniform(2, 2), Rect::new(1, 0));
    assert_eq!(e.index_at_offset(0), Some(0));
    assert_eq!(e.index_at_offset(1), Some(0));
    assert_eq!(e.index_at_offset(2), Some(0));
    assert_eq!(e.index_at_offset(3), Some(1));
    assert_eq!(e.index_at_offset(4), Some(1));
    assert_eq!(e.index_at_offset(100), Some(1));
    assert_eq!(fixed(0, 10, 10).index_at_offset(0), None);
}

#[test]
fn sync_keys_moves_overrides_with_their_keys() {
    let mut e = engine(
        LayoutSettings::new(LayoutKind::Variable, 10),
        uniform(3, 10),
        Rect::new(50, 0),
    );
    e.set_instance_size(0, 30).unwrap();
    assert_eq!(e.item_size(0), Some(30));

    // Swap the first two items.
    e.sync_keys([1, 0, 2]);
    assert_eq!(e.item_size(0), Some(10));
    assert_eq!(e.item_size(1), Some(30));
    assert_eq!(e.index_of_key(&0), Some(1));
    assert_eq!(e.key_for(0), Some(&1));
    assert_eq!(e.item_position(2), Some(40));
}
