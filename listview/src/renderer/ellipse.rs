use crate::renderer::{FixedList, Renderer};
use crate::{EllipseSettings, LayoutSettings, LineSpan};

/// Items distributed along an elliptic arc.
///
/// Scrolling stays one-dimensional: each item occupies `default_size + spacing` units of the
/// scroll axis, and the viewport's main extent is stretched over `settings.arc` degrees. Index
/// math is therefore identical to a fixed-size list; only placement differs.
#[derive(Clone, Debug)]
pub struct EllipseRenderer {
    inner: FixedList,
    settings: EllipseSettings,
    item_size: u32,
}

impl EllipseRenderer {
    pub fn new(count: usize, layout: &LayoutSettings, settings: EllipseSettings) -> Self {
        Self {
            inner: FixedList::fixed(count, 1, layout.default_size, layout),
            settings,
            item_size: layout.default_size.max(1),
        }
    }

    pub fn settings(&self) -> EllipseSettings {
        self.settings
    }

    /// Angle in degrees of the center of `virtual_index` for the given scroll state.
    pub fn angle(&self, virtual_index: isize, scroll_offset: u64, viewport: u32) -> Option<f32> {
        let start = self.inner.virtual_item_start(virtual_index)?;
        let scroll = self.inner.validate_position(scroll_offset, viewport) as i64;
        let center = start - scroll + (self.item_size / 2) as i64;
        let t = center as f32 / viewport.max(1) as f32;
        Some(self.settings.angle_start + t * self.settings.arc)
    }

    /// Position of `virtual_index` relative to the ellipse center.
    #[cfg(feature = "std")]
    pub fn placement(
        &self,
        virtual_index: isize,
        scroll_offset: u64,
        viewport: u32,
    ) -> Option<crate::Placement> {
        let angle = self.angle(virtual_index, scroll_offset, viewport)?;
        let rad = angle.to_radians();
        Some(crate::Placement {
            angle,
            x: self.settings.radius_x * rad.cos(),
            y: self.settings.radius_y * rad.sin(),
        })
    }
}

impl Renderer for EllipseRenderer {
    fn count(&self) -> usize {
        self.inner.count()
    }

    fn items_per_line(&self) -> usize {
        1
    }

    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    fn item_position(&self, index: usize) -> Option<u64> {
        self.inner.item_position(index)
    }

    fn item_position_end(&self, index: usize) -> Option<u64> {
        self.inner.item_position_end(index)
    }

    fn item_extent(&self, index: usize) -> Option<u32> {
        self.inner.item_extent(index)
    }

    fn first_visible_index(
        &self,
        scroll_offset: u64,
        viewport: u32,
        strict: bool,
    ) -> Option<usize> {
        self.inner.first_visible_index(scroll_offset, viewport, strict)
    }

    fn last_visible_index(&self, scroll_offset: u64, viewport: u32, strict: bool) -> Option<usize> {
        self.inner.last_visible_index(scroll_offset, viewport, strict)
    }

    fn max_visible_items(&self, viewport: u32) -> usize {
        self.inner.max_visible_items(viewport)
    }

    fn list_size(&self) -> u64 {
        self.inner.list_size()
    }

    fn loop_size(&self) -> u64 {
        self.inner.loop_size()
    }

    fn is_looped(&self, viewport: u32) -> bool {
        self.inner.is_looped(viewport)
    }

    fn validate_position(&self, position: u64, viewport: u32) -> u64 {
        self.inner.validate_position(position, viewport)
    }

    fn visible_lines(&self, scroll_offset: u64, viewport: u32) -> Option<LineSpan> {
        self.inner.visible_lines(scroll_offset, viewport)
    }

    fn virtual_item_start(&self, virtual_index: isize) -> Option<i64> {
        self.inner.virtual_item_start(virtual_index)
    }
}
