#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Keep the current offset when the item is fully visible, otherwise scroll the least.
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Viewport geometry in layout axes.
///
/// `main` is the scrolled axis (height for vertical lists), `cross` the other one. Tile layouts
/// use `cross` to derive how many items fit in a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub main: u32,
    pub cross: u32,
}

impl Rect {
    pub fn new(main: u32, cross: u32) -> Self {
        Self { main, cross }
    }
}

/// A span of virtual lines (rows for vertical lists), inclusive on both ends.
///
/// Lines are virtual: in looped lists `first` may be negative and `last` may exceed the line
/// count. Line `l` maps to the physical line `l.rem_euclid(line_count)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSpan {
    pub first: i64,
    pub last: i64,
}

/// The contiguous range of displayed slots bound to instances.
///
/// Slot `k` (for `k < count`) displays virtual index `first + k`, which is item
/// `wrap_index(first + k, total)`. Non-looped windows always satisfy
/// `0 <= first && first + count <= total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleWindow {
    pub first: isize,
    pub count: usize,
    /// Item count the window was computed for.
    pub total: usize,
}

impl VisibleWindow {
    pub const EMPTY: Self = Self {
        first: 0,
        count: 0,
        total: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.total == 0
    }

    /// Item index displayed in `slot`, or `None` for slots outside the window.
    pub fn item_index(&self, slot: usize) -> Option<usize> {
        if slot >= self.count {
            return None;
        }
        wrap_index(self.first + slot as isize, self.total)
    }

    /// Whether item `index` is bound to one of the window slots.
    pub fn contains(&self, index: usize) -> bool {
        if self.is_empty() || index >= self.total {
            return false;
        }
        let diff = (index as isize - self.first).rem_euclid(self.total as isize);
        (diff as usize) < self.count
    }

    /// Displayed item indexes in slot order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter_map(|slot| self.item_index(slot))
    }
}

/// Maps a virtual index to an item index of a list with `count` items.
///
/// `count` wraps to `0` and `-1` wraps to `count - 1`. Returns `None` for empty lists.
pub fn wrap_index(virtual_index: isize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    Some(virtual_index.rem_euclid(count as isize) as usize)
}

/// A displayed item: one window slot with its geometry in the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayedItem {
    pub slot: usize,
    pub virtual_index: isize,
    pub index: usize,
    /// Start offset in the scroll axis. Negative or past the loop size only in looped lists.
    pub start: i64,
    /// Extent in the scroll axis (the line size for tiles, excludes spacing).
    pub size: u32,
}

impl DisplayedItem {
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.size as i64)
    }
}

/// Position of an item on an ellipse, relative to the ellipse center.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Angle in degrees.
    pub angle: f32,
    pub x: f32,
    pub y: f32,
}

pub type ItemKey = u64;

/// Clamps a measured size into a usable item extent.
///
/// NaN, infinities and anything below one collapse to `1`.
pub fn sanitize_size(size: f32) -> u32 {
    if !size.is_finite() || size < 1.0 {
        return 1;
    }
    if size >= u32::MAX as f32 {
        return u32::MAX;
    }
    // Round half up without `f32::round`, which needs `std`.
    let rounded = (size + 0.5) as u32;
    rounded.max(1)
}
