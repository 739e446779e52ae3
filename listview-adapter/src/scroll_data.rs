use alloc::vec::Vec;

use listview::{KeyCacheKey, ListEngine};

/// Where the displayed items sat in the viewport, by key.
///
/// Captured before a data change and restored after it, so the content the user was looking at
/// stays in place when items are inserted, removed or reordered around it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollData<K> {
    /// `(key, item start - scroll offset)` for every displayed item. Items inside the viewport
    /// come first, in display order, followed by the overscan ones.
    pub entries: Vec<(K, i64)>,
}

impl<K> Default for ScrollData<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: KeyCacheKey + Clone> ScrollData<K> {
    pub fn capture(engine: &ListEngine<K>) -> Self {
        let scroll = engine.scroll_offset() as i64;
        let viewport_end = scroll.saturating_add(engine.viewport_size() as i64);
        let mut entries = Vec::new();
        let mut overscan = Vec::new();
        engine.for_each_displayed_item(|it| {
            let Some(key) = engine.key_for(it.index) else {
                return;
            };
            let entry = (key.clone(), it.start - scroll);
            if it.end() > scroll && it.start < viewport_end {
                entries.push(entry);
            } else {
                overscan.push(entry);
            }
        });
        entries.append(&mut overscan);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scrolls so the first captured item that still exists sits where it was.
    ///
    /// Returns `false` when no captured key survived; the offset is left alone then.
    pub fn restore(&self, engine: &mut ListEngine<K>) -> bool {
        for (key, delta) in &self.entries {
            let Some(index) = engine.index_of_key(key) else {
                continue;
            };
            let Some(start) = engine.item_position(index) else {
                continue;
            };
            let target = (start as i64).saturating_sub(*delta);
            let target = if engine.is_looped() {
                target.rem_euclid(engine.loop_size().max(1) as i64) as u64
            } else {
                target.max(0) as u64
            };
            vtrace!(index, target, "ScrollData::restore");
            engine.set_scroll_offset(target);
            return true;
        }
        vdebug!(entries = self.entries.len(), "ScrollData::restore: no key survived");
        false
    }
}
