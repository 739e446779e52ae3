//! Layout strategies mapping scroll offsets to item indexes.
//!
//! Every renderer works in one scroll axis. Positions are offsets from the start of the list
//! (padding included); the viewport is given by its main-axis extent.

mod ellipse;
mod lines;

pub use ellipse::EllipseRenderer;
pub use lines::{
    FixedLines, FixedList, FixedTiles, LineMetrics, LinesRenderer, VariableLines, VariableList,
    VariableTiles, tiles_per_line,
};

use crate::{LayoutKind, LayoutSettings, LineSpan, Rect};

pub trait Renderer {
    fn count(&self) -> usize;

    fn items_per_line(&self) -> usize;

    fn line_count(&self) -> usize;

    /// Start of item `index` in the scroll axis.
    fn item_position(&self, index: usize) -> Option<u64>;

    /// End of item `index` in the scroll axis (start + line extent).
    fn item_position_end(&self, index: usize) -> Option<u64>;

    /// Extent of the line holding `index`.
    fn item_extent(&self, index: usize) -> Option<u32>;

    /// First item intersecting the viewport; with `strict`, the first fully visible one (when
    /// any item is fully visible).
    fn first_visible_index(&self, scroll_offset: u64, viewport: u32, strict: bool) -> Option<usize>;

    /// Last item intersecting the viewport; with `strict`, the last fully visible one.
    fn last_visible_index(&self, scroll_offset: u64, viewport: u32, strict: bool) -> Option<usize>;

    /// Upper bound of simultaneously visible items, used to size instance pools.
    fn max_visible_items(&self, viewport: u32) -> usize;

    /// Total extent of the list: padding plus content.
    fn list_size(&self) -> u64;

    /// Period of a looped list: the list size plus the spacing between the last and first item.
    fn loop_size(&self) -> u64;

    /// Looping only engages when the list does not fit into the viewport.
    fn is_looped(&self, viewport: u32) -> bool;

    /// Clamps `position` to `[0, list_size - viewport]`, or wraps it modulo the loop size.
    fn validate_position(&self, position: u64, viewport: u32) -> u64;

    /// Virtual lines intersecting the viewport.
    fn visible_lines(&self, scroll_offset: u64, viewport: u32) -> Option<LineSpan>;

    /// Start of a virtual index; indexes outside `[0, count)` belong to neighbouring loop cycles.
    fn virtual_item_start(&self, virtual_index: isize) -> Option<i64>;
}

/// The renderer selected by [`LayoutKind`].
#[derive(Clone, Debug)]
pub enum AnyRenderer {
    FixedList(FixedList),
    VariableList(VariableList),
    FixedTiles(FixedTiles),
    VariableTiles(VariableTiles),
    Ellipse(EllipseRenderer),
}

impl AnyRenderer {
    /// Builds the renderer for `settings` from per-item main-axis sizes.
    pub fn build(settings: &LayoutSettings, item_sizes: &[u32], viewport: Rect) -> Self {
        let count = item_sizes.len();
        match settings.layout {
            LayoutKind::Fixed => {
                Self::FixedList(FixedList::fixed(count, 1, settings.default_size, settings))
            }
            LayoutKind::Variable => {
                Self::VariableList(VariableList::variable(item_sizes, 1, settings))
            }
            LayoutKind::FixedTiles => {
                let per_line = settings.tiles_per_line(viewport.cross);
                Self::FixedTiles(FixedTiles::fixed(
                    count,
                    per_line,
                    settings.default_size,
                    settings,
                ))
            }
            LayoutKind::VariableTiles => {
                let per_line = settings.tiles_per_line(viewport.cross);
                Self::VariableTiles(VariableTiles::variable(item_sizes, per_line, settings))
            }
            LayoutKind::Ellipse(ellipse) => {
                Self::Ellipse(EllipseRenderer::new(count, settings, ellipse))
            }
        }
    }

    /// Applies a changed item size. Returns the extent delta of the affected line.
    ///
    /// Fixed layouts ignore per-item sizes and always return `0`.
    pub fn refresh_item(&mut self, index: usize, item_sizes: &[u32]) -> i64 {
        match self {
            Self::VariableList(r) | Self::VariableTiles(r) => r.refresh_line(index, item_sizes),
            Self::FixedList(_) | Self::FixedTiles(_) | Self::Ellipse(_) => 0,
        }
    }

    pub fn as_renderer(&self) -> &dyn Renderer {
        match self {
            Self::FixedList(r) | Self::FixedTiles(r) => r as &dyn Renderer,
            Self::VariableList(r) | Self::VariableTiles(r) => r as &dyn Renderer,
            Self::Ellipse(r) => r as &dyn Renderer,
        }
    }

    pub fn ellipse(&self) -> Option<&EllipseRenderer> {
        match self {
            Self::Ellipse(r) => Some(r),
            _ => None,
        }
    }
}

impl Default for AnyRenderer {
    fn default() -> Self {
        Self::FixedList(FixedList::fixed(0, 1, 1, &LayoutSettings::default()))
    }
}
