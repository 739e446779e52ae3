use alloc::vec::Vec;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Map keyed by item identity.
///
/// `HashMap` with `std`, `BTreeMap` otherwise; [`KeyCacheKey`] carries the matching bound.
#[cfg(feature = "std")]
pub type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait KeyCacheKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> KeyCacheKey for K {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait KeyCacheKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> KeyCacheKey for K {}

/// Per-item main-axis sizes.
///
/// Each item has a default size (what the layout would compute) and optionally an override.
/// Overrides are remembered by key, so they follow items across reorders and resets and are
/// dropped once the last item with that key is removed.
#[derive(Clone, Debug)]
pub(crate) struct SizeTable<K> {
    keys: Vec<K>,
    defaults: Vec<u32>,
    sizes: Vec<u32>,
    overridden: Vec<bool>,
    overrides: KeyMap<K, u32>,
}

/// Size of one item before and after a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SizeChange {
    pub(crate) old: u32,
    pub(crate) new: u32,
}

impl SizeChange {
    pub(crate) fn delta(&self) -> i64 {
        self.new as i64 - self.old as i64
    }
}

impl<K: KeyCacheKey + Clone> SizeTable<K> {
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            defaults: Vec::new(),
            sizes: Vec::new(),
            overridden: Vec::new(),
            overrides: KeyMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    pub(crate) fn size(&self, index: usize) -> Option<u32> {
        self.sizes.get(index).copied()
    }

    pub(crate) fn default_size(&self, index: usize) -> Option<u32> {
        self.defaults.get(index).copied()
    }

    pub(crate) fn is_overridden(&self, index: usize) -> bool {
        self.overridden.get(index).copied().unwrap_or(false)
    }

    /// Replaces every item; overrides of keys that reappear are applied again.
    pub(crate) fn reset(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.keys.clear();
        self.defaults.clear();
        self.sizes.clear();
        self.overridden.clear();
        self.insert(0, entries);
        self.retain_live_overrides();
    }

    pub(crate) fn insert(&mut self, at: usize, entries: impl IntoIterator<Item = (K, u32)>) {
        let at = at.min(self.len());
        let mut keys = Vec::new();
        let mut defaults = Vec::new();
        let mut sizes = Vec::new();
        let mut overridden = Vec::new();
        for (key, default) in entries {
            let default = default.max(1);
            let cached = self.overrides.get(&key).copied();
            keys.push(key);
            defaults.push(default);
            sizes.push(cached.unwrap_or(default));
            overridden.push(cached.is_some());
        }
        self.keys.splice(at..at, keys);
        self.defaults.splice(at..at, defaults);
        self.sizes.splice(at..at, sizes);
        self.overridden.splice(at..at, overridden);
    }

    /// Removes `range` and forgets overrides of keys no longer present.
    pub(crate) fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let had_override = self.overridden[start..end].iter().any(|&o| o);
        self.keys.drain(start..end);
        self.defaults.drain(start..end);
        self.sizes.drain(start..end);
        self.overridden.drain(start..end);
        if had_override {
            self.retain_live_overrides();
        }
    }

    pub(crate) fn replace(&mut self, index: usize, key: K, default: u32) -> Option<SizeChange> {
        let old = self.size(index)?;
        let old_key = core::mem::replace(&mut self.keys[index], key.clone());
        if old_key != key && !self.keys.contains(&old_key) {
            self.overrides.remove(&old_key);
        }
        let default = default.max(1);
        let cached = self.overrides.get(&key).copied();
        self.defaults[index] = default;
        self.sizes[index] = cached.unwrap_or(default);
        self.overridden[index] = cached.is_some();
        Some(SizeChange {
            old,
            new: self.sizes[index],
        })
    }

    /// Reassigns keys in place (e.g. after the host reordered its data). Default sizes stay with
    /// their index; overrides follow the keys.
    pub(crate) fn sync_keys(&mut self, keys: impl IntoIterator<Item = K>) {
        for (slot, key) in self.keys.iter_mut().zip(keys) {
            *slot = key;
        }
        self.reapply_overrides();
        self.retain_live_overrides();
    }

    pub(crate) fn set_override(&mut self, index: usize, size: u32) -> Option<SizeChange> {
        let old = self.size(index)?;
        let size = size.max(1);
        self.sizes[index] = size;
        self.overridden[index] = true;
        self.overrides.insert(self.keys[index].clone(), size);
        Some(SizeChange { old, new: size })
    }

    /// Drops the override of `index`. Keys are expected to be unique.
    pub(crate) fn reset_override(&mut self, index: usize) -> Option<SizeChange> {
        let old = self.size(index)?;
        self.overrides.remove(&self.keys[index]);
        self.overridden[index] = false;
        self.sizes[index] = self.defaults[index];
        Some(SizeChange {
            old,
            new: self.sizes[index],
        })
    }

    /// Changes the default size; keeps an existing override in effect.
    pub(crate) fn set_default(&mut self, index: usize, default: u32) -> Option<SizeChange> {
        let old = self.size(index)?;
        self.defaults[index] = default.max(1);
        if !self.overridden[index] {
            self.sizes[index] = self.defaults[index];
        }
        Some(SizeChange {
            old,
            new: self.sizes[index],
        })
    }

    pub(crate) fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub(crate) fn for_each_override(&self, mut f: impl FnMut(&K, u32)) {
        for (k, v) in self.overrides.iter() {
            f(k, *v);
        }
    }

    /// Replaces the override cache and reapplies it to the current items.
    pub(crate) fn import_overrides(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.overrides.clear();
        for (key, size) in entries {
            self.overrides.insert(key, size.max(1));
        }
        self.reapply_overrides();
    }

    pub(crate) fn clear_overrides(&mut self) {
        self.overrides.clear();
        self.reapply_overrides();
    }

    pub(crate) fn index_of(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    fn reapply_overrides(&mut self) {
        for i in 0..self.keys.len() {
            let cached = self.overrides.get(&self.keys[i]).copied();
            self.sizes[i] = cached.unwrap_or(self.defaults[i]);
            self.overridden[i] = cached.is_some();
        }
    }

    fn retain_live_overrides(&mut self) {
        if self.overrides.is_empty() {
            return;
        }
        let present: KeyMap<&K, ()> = self.keys.iter().map(|k| (k, ())).collect();
        self.overrides.retain(|k, _| present.contains_key(k));
    }
}
