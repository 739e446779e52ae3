use alloc::collections::BTreeSet;

use crate::Change;

/// Selected item indexes.
///
/// Indexes follow their items through inserts and removes; a reset of the data clears the
/// selection. In single mode at most one index is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
    last: Option<usize>,
    multiple: bool,
}

impl Selection {
    pub fn new(multiple: bool) -> Self {
        Self {
            multiple,
            ..Self::default()
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Switching to single mode keeps only the most recently selected index.
    pub fn set_multiple(&mut self, multiple: bool) {
        self.multiple = multiple;
        if !multiple && self.indices.len() > 1 {
            let keep = self.last.or_else(|| self.indices.last().copied());
            self.indices.clear();
            self.indices.extend(keep);
        }
    }

    /// Returns `false` when `index` was already selected.
    pub fn select(&mut self, index: usize) -> bool {
        if !self.multiple {
            if self.indices.len() == 1 && self.indices.contains(&index) {
                return false;
            }
            self.indices.clear();
        }
        self.last = Some(index);
        self.indices.insert(index)
    }

    pub fn deselect(&mut self, index: usize) -> bool {
        if self.last == Some(index) {
            self.last = None;
        }
        self.indices.remove(&index)
    }

    /// Flips the state of `index` and returns whether it is selected now.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.is_selected(index) {
            self.deselect(index);
            false
        } else {
            self.select(index);
            true
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Selected indexes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
        self.last = None;
    }

    /// Shifts indexes after a data change.
    pub fn apply(&mut self, change: &Change) {
        match *change {
            Change::Insert { index, count } => {
                let shift = |i: usize| if i >= index { i + count } else { i };
                self.indices = self.indices.iter().map(|&i| shift(i)).collect();
                self.last = self.last.map(shift);
            }
            Change::Remove { index, count } => {
                let end = index + count;
                let shift = |i: usize| match i {
                    i if i < index => Some(i),
                    i if i < end => None,
                    i => Some(i - count),
                };
                self.indices = self.indices.iter().filter_map(|&i| shift(i)).collect();
                self.last = self.last.and_then(shift);
            }
            Change::Replace { .. } => {}
            Change::Reset => self.clear(),
        }
    }
}
