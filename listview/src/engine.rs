use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;
use core::ops::Range;

use crate::renderer::{AnyRenderer, Renderer};
use crate::sizes::{KeyCacheKey, SizeChange, SizeTable};
use crate::window::{compute_window, max_window_len};
use crate::{
    Align, DisplayedItem, Error, FrameState, ItemKey, LayoutSettings, ListOptions, Rect, Result,
    ScrollDirection, ScrollState, ViewportState, VisibleWindow, wrap_index,
};

/// A headless virtualized list engine.
///
/// The engine holds no UI objects. The host drives it with viewport geometry and scroll offsets
/// and reads back which items to display and where. Items are described by a key (their
/// identity) and a default main-axis size; per-item overrides follow keys across resets.
///
/// The scroll offset is always valid: clamped to `[0, list_size - viewport]`, or wrapped modulo
/// the loop size while looping is active.
#[derive(Clone, Debug)]
pub struct ListEngine<K = ItemKey> {
    options: ListOptions<K>,
    rect: Rect,
    scroll_offset: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    sizes: SizeTable<K>,
    renderer: AnyRenderer,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K: KeyCacheKey + Clone> ListEngine<K> {
    /// Creates an empty engine. Items are added with [`Self::set_items`].
    pub fn new(options: ListOptions<K>) -> Self {
        Self::with_items(options, core::iter::empty())
    }

    /// Creates an engine from `(key, default_size)` entries and applies the initial offset.
    pub fn with_items(options: ListOptions<K>, items: impl IntoIterator<Item = (K, u32)>) -> Self {
        let rect = options.initial_rect.unwrap_or_default();
        let mut sizes = SizeTable::new();
        sizes.reset(items);
        let renderer = AnyRenderer::build(&options.settings, sizes.sizes(), rect);
        vdebug!(
            count = sizes.len(),
            layout = ?options.settings.layout,
            looped = options.settings.looped,
            "ListEngine::new"
        );
        let mut engine = Self {
            rect,
            scroll_offset: 0,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            sizes,
            renderer,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        engine.scroll_offset = engine.validate_position(engine.options.initial_offset);
        engine
    }

    pub fn options(&self) -> &ListOptions<K> {
        &self.options
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.options.settings
    }

    pub fn set_options(&mut self, options: ListOptions<K>) {
        let rebuild = self.options.settings != options.settings;
        self.options = options;
        vtrace!(settings = ?self.options.settings, rebuild, "ListEngine::set_options");
        if rebuild {
            self.rebuild();
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&ListEngine<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| alloc::sync::Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_renderer()
    }

    fn rebuild(&mut self) {
        self.renderer = AnyRenderer::build(&self.options.settings, self.sizes.sizes(), self.rect);
        self.scroll_offset = self.validate_position(self.scroll_offset);
    }

    // Items.

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn key_for(&self, index: usize) -> Option<&K> {
        self.sizes.keys().get(index)
    }

    pub fn keys(&self) -> &[K] {
        self.sizes.keys()
    }

    pub fn index_of_key(&self, key: &K) -> Option<usize> {
        self.sizes.index_of(key)
    }

    /// Replaces all items. Size overrides of keys that are still present are kept.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = (K, u32)>) {
        self.sizes.reset(items);
        vdebug!(count = self.sizes.len(), "ListEngine::set_items");
        self.rebuild();
        self.notify();
    }

    pub fn insert_items(
        &mut self,
        at: usize,
        items: impl IntoIterator<Item = (K, u32)>,
    ) -> Result<()> {
        let count = self.count();
        if at > count {
            vwarn!(at, count, "ListEngine::insert_items: out of range");
            return Err(Error::IndexOutOfRange { index: at, count });
        }
        self.sizes.insert(at, items);
        vtrace!(at, count = self.count(), "ListEngine::insert_items");
        self.rebuild();
        self.notify();
        Ok(())
    }

    pub fn remove_items(&mut self, range: Range<usize>) -> Result<()> {
        let count = self.count();
        if range.start > range.end || range.end > count {
            vwarn!(
                start = range.start,
                end = range.end,
                count,
                "ListEngine::remove_items: out of range"
            );
            return Err(Error::IndexOutOfRange {
                index: range.end.max(range.start),
                count,
            });
        }
        self.sizes.remove(range);
        vtrace!(count = self.count(), "ListEngine::remove_items");
        self.rebuild();
        self.notify();
        Ok(())
    }

    /// Replaces the item at `index`. The new key's override (if any) applies.
    pub fn replace_item(&mut self, index: usize, key: K, default_size: u32) -> Result<()> {
        let change = self
            .sizes
            .replace(index, key, default_size)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.count(),
            })?;
        self.apply_size_change(index, change, false);
        self.notify();
        Ok(())
    }

    /// Reassigns the keys of the current items in index order; sizes measured for a key move with
    /// it. Extra keys are ignored and missing ones leave the tail unchanged.
    pub fn sync_keys(&mut self, keys: impl IntoIterator<Item = K>) {
        self.sizes.sync_keys(keys);
        vtrace!(
            overrides = self.sizes.override_count(),
            "ListEngine::sync_keys"
        );
        self.rebuild();
        self.notify();
    }

    /// Updates the default size of `index`. An override stays in effect.
    pub fn set_default_size(&mut self, index: usize, default_size: u32) -> Result<()> {
        let change = self
            .sizes
            .set_default(index, default_size)
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.count(),
            })?;
        self.apply_size_change(index, change, false);
        self.notify();
        Ok(())
    }

    // Viewport and scrolling.

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn viewport_size(&self) -> u32 {
        self.rect.main
    }

    pub fn set_rect(&mut self, rect: Rect) {
        if self.rect == rect {
            return;
        }
        let relayout = self.rect.cross != rect.cross && self.options.settings.layout.is_tiled();
        self.rect = rect;
        if relayout {
            self.rebuild();
        } else {
            self.scroll_offset = self.validate_position(self.scroll_offset);
        }
        self.notify();
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        self.set_rect(Rect {
            main: size,
            cross: self.rect.cross,
        });
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Sets the scroll offset after clamping or wrapping it.
    pub fn set_scroll_offset(&mut self, offset: u64) {
        let offset = self.validate_position(offset);
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    /// Moves the scroll offset by `delta`, wrapping around in looped lists.
    pub fn scroll_by(&mut self, delta: i64) {
        if delta == 0 {
            return;
        }
        let target = self.offset_moved_by(self.scroll_offset, delta);
        let prev = self.scroll_offset;
        self.set_scroll_offset(target);
        if self.scroll_offset != prev {
            self.scroll_direction = Some(if delta > 0 {
                ScrollDirection::Forward
            } else {
                ScrollDirection::Backward
            });
        }
    }

    /// `offset + delta`, wrapped into the loop or clamped at zero. Not validated against the
    /// list end.
    fn offset_moved_by(&self, offset: u64, delta: i64) -> u64 {
        let moved = offset as i128 + delta as i128;
        if self.is_looped() {
            let period = self.loop_size().max(1) as i128;
            moved.rem_euclid(period) as u64
        } else {
            moved.clamp(0, u64::MAX as i128) as u64
        }
    }

    /// Applies a scroll offset coming from the host and marks the engine as scrolling.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        vtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|e| {
            e.set_scroll_offset(offset);
            e.notify_scroll_event(now_ms);
        });
    }

    /// Applies viewport geometry and scroll offset in a single notification.
    pub fn apply_scroll_frame(&mut self, rect: Rect, offset: u64, now_ms: u64) {
        self.batch_update(|e| {
            e.set_rect(rect);
            e.set_scroll_offset(offset);
            e.notify_scroll_event(now_ms);
        });
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
        self.notify();
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Resets `is_scrolling` once no scroll event arrived for the configured delay.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        self.scroll_offset
    }

    /// Offset that brings `index` into view with the given alignment (already validated).
    ///
    /// In looped lists `Align::Auto` picks the closest loop cycle.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        let count = self.count();
        if count == 0 {
            return 0;
        }
        let index = index.min(count - 1);
        let r = self.renderer();
        let (Some(start), Some(size)) = (r.item_position(index), r.item_extent(index)) else {
            return self.scroll_offset;
        };
        let view = self.viewport_size() as i64;
        let cur = self.scroll_offset as i64;

        let mut start = start as i64;
        if self.is_looped() {
            let period = self.loop_size() as i64;
            let candidates = [start - period, start, start + period];
            start = candidates
                .into_iter()
                .min_by_key(|s| (s - cur).abs())
                .unwrap_or(start);
        }
        let end = start + size as i64;

        let target = match align {
            Align::Start => start,
            Align::End => end - view,
            Align::Center => start + size as i64 / 2 - view / 2,
            Align::Auto => {
                if start >= cur && end <= cur + view {
                    cur
                } else if start < cur {
                    start
                } else {
                    end - view
                }
            }
        };

        if self.is_looped() {
            let period = self.loop_size().max(1) as i64;
            return target.rem_euclid(period) as u64;
        }
        self.validate_position(target.max(0) as u64)
    }

    // Geometry.

    pub fn item_position(&self, index: usize) -> Option<u64> {
        self.renderer().item_position(index)
    }

    pub fn item_position_end(&self, index: usize) -> Option<u64> {
        self.renderer().item_position_end(index)
    }

    /// Effective main-axis size of `index` (override or default).
    pub fn item_size(&self, index: usize) -> Option<u32> {
        self.sizes.size(index)
    }

    pub fn default_size(&self, index: usize) -> Option<u32> {
        self.sizes.default_size(index)
    }

    pub fn is_size_overridden(&self, index: usize) -> bool {
        self.sizes.is_overridden(index)
    }

    /// The item at `offset` (the first item of its line for tiles). Offsets inside spacing
    /// resolve to the preceding item; offsets past the end to the last one.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let r = self.renderer();
        let offset = if self.is_looped() {
            offset % self.loop_size().max(1)
        } else {
            offset.min(self.list_size().saturating_sub(1))
        };
        r.first_visible_index(offset, 1, false)
    }

    pub fn first_visible_index(&self, strict: bool) -> Option<usize> {
        let viewport = self.viewport_size();
        self.renderer().first_visible_index(self.scroll_offset, viewport, strict)
    }

    pub fn last_visible_index(&self, strict: bool) -> Option<usize> {
        let viewport = self.viewport_size();
        self.renderer().last_visible_index(self.scroll_offset, viewport, strict)
    }

    /// Upper bound of simultaneously displayed items (overscan and minimum included).
    pub fn max_visible_items(&self) -> usize {
        max_window_len(self.renderer(), self.viewport_size(), &self.options.settings)
    }

    pub fn items_per_line(&self) -> usize {
        self.renderer().items_per_line()
    }

    pub fn list_size(&self) -> u64 {
        self.renderer().list_size()
    }

    pub fn loop_size(&self) -> u64 {
        self.renderer().loop_size()
    }

    /// Whether looping is configured and currently engaged.
    pub fn is_looped(&self) -> bool {
        self.renderer().is_looped(self.viewport_size())
    }

    pub fn validate_position(&self, position: u64) -> u64 {
        self.renderer().validate_position(position, self.viewport_size())
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if self.is_looped() {
            return self.loop_size().saturating_sub(1);
        }
        self.list_size().saturating_sub(self.viewport_size() as u64)
    }

    pub fn wrap_index(&self, virtual_index: isize) -> Option<usize> {
        wrap_index(virtual_index, self.count())
    }

    /// Position of an item on the ellipse for [`crate::LayoutKind::Ellipse`] layouts.
    #[cfg(feature = "std")]
    pub fn item_placement(&self, virtual_index: isize) -> Option<crate::Placement> {
        self.renderer
            .ellipse()?
            .placement(virtual_index, self.scroll_offset, self.viewport_size())
    }

    // Visible window.

    pub fn visible_window(&self) -> VisibleWindow {
        compute_window(
            self.renderer(),
            self.scroll_offset,
            self.viewport_size(),
            &self.options.settings,
        )
    }

    pub fn is_displayed(&self, index: usize) -> bool {
        self.visible_window().contains(index)
    }

    fn displayed_item(&self, window: &VisibleWindow, slot: usize) -> Option<DisplayedItem> {
        let virtual_index = window.first + slot as isize;
        let index = window.item_index(slot)?;
        let r = self.renderer();
        Some(DisplayedItem {
            slot,
            virtual_index,
            index,
            start: r.virtual_item_start(virtual_index)?,
            size: r.item_extent(index)?,
        })
    }

    pub fn for_each_displayed_item(&self, mut f: impl FnMut(DisplayedItem)) {
        let window = self.visible_window();
        for slot in 0..window.count {
            if let Some(item) = self.displayed_item(&window, slot) {
                f(item);
            }
        }
    }

    /// Collects displayed items into `out` (clears `out` first).
    pub fn collect_displayed_items(&self, out: &mut Vec<DisplayedItem>) {
        out.clear();
        self.for_each_displayed_item(|it| out.push(it));
    }

    // Sizes.

    /// Overrides the size of `index` and returns the applied scroll compensation.
    ///
    /// When the item starts above the viewport top the scroll offset moves with the size delta,
    /// so the displayed content does not jump.
    pub fn set_instance_size(&mut self, index: usize, size: u32) -> Result<i64> {
        let count = self.count();
        let change = self
            .sizes
            .set_override(index, size)
            .ok_or(Error::IndexOutOfRange { index, count })?;
        vtrace!(index, old = change.old, new = change.new, "set_instance_size");
        let applied = self.apply_size_change(index, change, true);
        self.notify();
        Ok(applied)
    }

    /// Restores the default size of `index`; returns the applied scroll compensation.
    pub fn reset_instance_size(&mut self, index: usize) -> Result<i64> {
        let count = self.count();
        let change = self
            .sizes
            .reset_override(index)
            .ok_or(Error::IndexOutOfRange { index, count })?;
        vtrace!(index, old = change.old, new = change.new, "reset_instance_size");
        let applied = self.apply_size_change(index, change, true);
        self.notify();
        Ok(applied)
    }

    /// Applies many overrides with one notification. Out-of-range entries are skipped.
    ///
    /// Returns the summed scroll compensation.
    pub fn set_instance_sizes(&mut self, sizes: impl IntoIterator<Item = (usize, u32)>) -> i64 {
        let mut applied = 0i64;
        self.batch_update(|e| {
            for (index, size) in sizes {
                match e.set_instance_size(index, size) {
                    Ok(delta) => applied = applied.saturating_add(delta),
                    Err(_) => {
                        vwarn!(index, "set_instance_sizes: skipping out-of-range index");
                    }
                }
            }
        });
        applied
    }

    fn apply_size_change(&mut self, index: usize, change: SizeChange, adjust: bool) -> i64 {
        if change.delta() == 0 {
            return 0;
        }
        let before = self.line_item(index);
        let line_delta = self.renderer.refresh_item(index, self.sizes.sizes());
        if line_delta == 0 || !adjust {
            self.scroll_offset = self.validate_position(self.scroll_offset);
            return 0;
        }
        let Some(before) = before else {
            return 0;
        };

        let should_adjust = match &self
            .options
            .should_adjust_scroll_position_on_item_size_change
        {
            Some(f) => f(self, before, line_delta),
            None => before.start < self.scroll_offset as i64,
        };

        if !should_adjust {
            self.scroll_offset = self.validate_position(self.scroll_offset);
            return 0;
        }

        let prev = self.scroll_offset;
        let target = self.offset_moved_by(prev, line_delta);
        self.scroll_offset = self.validate_position(target);
        let applied = self.scroll_offset as i64 - prev as i64;
        vtrace!(index, line_delta, applied, "scroll compensation");
        applied
    }

    /// The item as laid out now, positioned in the current loop cycle.
    fn line_item(&self, index: usize) -> Option<DisplayedItem> {
        let r = self.renderer();
        Some(DisplayedItem {
            slot: 0,
            virtual_index: index as isize,
            index,
            start: r.item_position(index)? as i64,
            size: r.item_extent(index)?,
        })
    }

    pub fn size_override_count(&self) -> usize {
        self.sizes.override_count()
    }

    pub fn for_each_size_override(&self, f: impl FnMut(&K, u32)) {
        self.sizes.for_each_override(f);
    }

    /// Exports the overrides (key → size), e.g. to persist them across sessions.
    pub fn export_size_overrides(&self) -> Vec<(K, u32)> {
        let mut out = Vec::with_capacity(self.sizes.override_count());
        self.sizes.for_each_override(|k, v| out.push((k.clone(), v)));
        out
    }

    pub fn import_size_overrides(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.sizes.import_overrides(entries);
        vdebug!(
            overrides = self.sizes.override_count(),
            "import_size_overrides"
        );
        self.rebuild();
        self.notify();
    }

    pub fn clear_size_overrides(&mut self) {
        self.sizes.clear_overrides();
        self.rebuild();
        self.notify();
    }

    // Snapshots.

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState { rect: self.rect }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset,
            is_scrolling: self.is_scrolling,
            direction: self.scroll_direction,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
            window: self.visible_window(),
        }
    }

    /// Restores viewport and scroll state. A snapshot taken mid-scroll counts as a scroll event
    /// at `now_ms`.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|e| {
            e.set_rect(frame.viewport.rect);
            e.set_scroll_offset(frame.scroll.offset);
            if frame.scroll.is_scrolling {
                e.notify_scroll_event(now_ms);
                e.scroll_direction = frame.scroll.direction;
            } else {
                e.set_is_scrolling(false);
            }
        });
    }
}
