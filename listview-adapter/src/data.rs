use alloc::vec::Vec;
use core::ops::Deref;

use crate::error::{Error, Result, check_index};

/// One recorded mutation of an [`ObservableList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Insert { index: usize, count: usize },
    Remove { index: usize, count: usize },
    Replace { index: usize },
    /// The whole content changed (cleared, sorted, filtered or replaced).
    Reset,
}

/// A `Vec` that records its mutations.
///
/// The list view drains the change log on its next update, so mutations made in between are
/// applied together. Reads go through `Deref<Target = [T]>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservableList<T> {
    items: Vec<T>,
    changes: Vec<Change>,
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            changes: Vec::new(),
        }
    }
}

impl<T> Deref for ObservableList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn push(&mut self, item: T) {
        let index = self.items.len();
        self.items.push(item);
        self.record(Change::Insert { index, count: 1 });
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        check_insert(index, self.items.len())?;
        self.items.insert(index, item);
        self.record(Change::Insert { index, count: 1 });
        Ok(())
    }

    /// Inserts `items` at `index` as a single change.
    pub fn insert_many(&mut self, index: usize, items: impl IntoIterator<Item = T>) -> Result<()> {
        check_insert(index, self.items.len())?;
        let before = self.items.len();
        self.items.splice(index..index, items);
        let count = self.items.len() - before;
        if count > 0 {
            self.record(Change::Insert { index, count });
        }
        Ok(())
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        let index = self.items.len();
        self.items.extend(items);
        let count = self.items.len() - index;
        if count > 0 {
            self.record(Change::Insert { index, count });
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        check_index(index, self.items.len())?;
        let item = self.items.remove(index);
        self.record(Change::Remove { index, count: 1 });
        Ok(item)
    }

    pub fn replace(&mut self, index: usize, item: T) -> Result<T> {
        check_index(index, self.items.len())?;
        let old = core::mem::replace(&mut self.items[index], item);
        self.record(Change::Replace { index });
        Ok(old)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.record(Change::Reset);
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> core::cmp::Ordering) {
        self.items.sort_by(compare);
        self.record(Change::Reset);
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        let before = self.items.len();
        self.items.retain(keep);
        if self.items.len() != before {
            self.record(Change::Reset);
        }
    }

    /// Replaces the whole content.
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
        self.record(Change::Reset);
    }

    /// Gives mutable access to every item; recorded as a reset.
    pub fn modify(&mut self, f: impl FnOnce(&mut Vec<T>)) {
        f(&mut self.items);
        self.record(Change::Reset);
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        core::mem::take(&mut self.changes)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    fn record(&mut self, change: Change) {
        // Anything after a reset is subsumed by it.
        if self.changes.last() == Some(&Change::Reset) {
            return;
        }
        if change == Change::Reset {
            self.changes.clear();
        }
        self.changes.push(change);
    }
}

impl<T: Ord> ObservableList<T> {
    pub fn sort(&mut self) {
        self.items.sort();
        self.record(Change::Reset);
    }
}

fn check_insert(index: usize, count: usize) -> Result<()> {
    if index > count {
        return Err(Error::IndexOutOfRange { index, count });
    }
    Ok(())
}
