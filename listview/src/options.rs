use alloc::sync::Arc;

use crate::engine::ListEngine;
use crate::renderer::tiles_per_line;
use crate::{DisplayedItem, ItemKey, Rect};

/// A callback fired when the engine state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback<K> = Arc<dyn Fn(&ListEngine<K>, bool) + Send + Sync>;

/// Decides whether a size change of an item should shift the scroll offset.
///
/// Receives the item before the change and the size delta of its line. Without a hook the
/// offset is compensated when the item starts above the viewport top.
pub type ShouldAdjustScrollPositionOnItemSizeChangeCallback<K> =
    Arc<dyn Fn(&ListEngine<K>, DisplayedItem, i64) -> bool + Send + Sync>;

/// How items are arranged along the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutKind {
    /// One item per line, every item `default_size` long.
    #[default]
    Fixed,
    /// One item per line with per-item sizes.
    Variable,
    /// Grid of `tile_cross_size` wide tiles, every line `default_size` long.
    FixedTiles,
    /// Grid where each line is as long as its largest tile.
    VariableTiles,
    /// Fixed-size items distributed along an elliptic arc.
    Ellipse(EllipseSettings),
}

impl LayoutKind {
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable | Self::VariableTiles)
    }

    pub fn is_tiled(&self) -> bool {
        matches!(self, Self::FixedTiles | Self::VariableTiles)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipseSettings {
    pub radius_x: f32,
    pub radius_y: f32,
    /// Degrees covered by the viewport.
    pub arc: f32,
    /// Angle in degrees of the viewport start.
    pub angle_start: f32,
}

impl Default for EllipseSettings {
    fn default() -> Self {
        Self {
            radius_x: 100.0,
            radius_y: 100.0,
            arc: 90.0,
            angle_start: 45.0,
        }
    }
}

/// Plain layout configuration.
///
/// Contains no callbacks, so hosts can keep it in their own config files (with
/// `feature = "serde"`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutSettings {
    pub layout: LayoutKind,
    /// Main-axis size of items without an explicit size.
    pub default_size: u32,
    /// Cross-axis size of a tile.
    pub tile_cross_size: u32,
    /// Space between lines.
    pub spacing: u32,
    /// Space between tiles of one line.
    pub cross_spacing: u32,
    pub padding_start: u32,
    pub padding_end: u32,
    /// Wrap around at the list end. Only engages while the list is larger than the viewport.
    pub looped: bool,
    /// Lower bound of the displayed window size.
    pub min_visible: usize,
    /// Extra lines displayed before and after the visible ones.
    pub overscan: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Fixed,
            default_size: 1,
            tile_cross_size: 1,
            spacing: 0,
            cross_spacing: 0,
            padding_start: 0,
            padding_end: 0,
            looped: false,
            min_visible: 2,
            overscan: 0,
        }
    }
}

impl LayoutSettings {
    pub fn new(layout: LayoutKind, default_size: u32) -> Self {
        Self {
            layout,
            default_size: default_size.max(1),
            ..Self::default()
        }
    }

    pub fn tiles_per_line(&self, viewport_cross: u32) -> usize {
        if !self.layout.is_tiled() {
            return 1;
        }
        tiles_per_line(viewport_cross, self.tile_cross_size, self.cross_spacing)
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_cross_spacing(mut self, cross_spacing: u32) -> Self {
        self.cross_spacing = cross_spacing;
        self
    }

    pub fn with_tile_cross_size(mut self, tile_cross_size: u32) -> Self {
        self.tile_cross_size = tile_cross_size.max(1);
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn with_min_visible(mut self, min_visible: usize) -> Self {
        self.min_visible = min_visible;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }
}

/// Configuration for [`crate::ListEngine`].
///
/// Cheap to clone: callbacks live in `Arc`s so adapters can tweak a field and call
/// `ListEngine::set_options` without reallocating closures.
pub struct ListOptions<K = ItemKey> {
    pub settings: LayoutSettings,
    /// Viewport the engine starts with.
    pub initial_rect: Option<Rect>,
    pub initial_offset: u64,
    pub on_change: Option<OnChangeCallback<K>>,
    pub should_adjust_scroll_position_on_item_size_change:
        Option<ShouldAdjustScrollPositionOnItemSizeChangeCallback<K>>,
    /// Delay after the last scroll event before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,
}

impl<K> Clone for ListOptions<K> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings,
            initial_rect: self.initial_rect,
            initial_offset: self.initial_offset,
            on_change: self.on_change.clone(),
            should_adjust_scroll_position_on_item_size_change: self
                .should_adjust_scroll_position_on_item_size_change
                .clone(),
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl<K> Default for ListOptions<K> {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl ListOptions<ItemKey> {
    /// Options for a fixed-size list keyed by `ItemKey`.
    pub fn fixed(default_size: u32) -> Self {
        Self::new(LayoutSettings::new(LayoutKind::Fixed, default_size))
    }

    /// Options for a variable-size list keyed by `ItemKey`.
    pub fn variable(default_size: u32) -> Self {
        Self::new(LayoutSettings::new(LayoutKind::Variable, default_size))
    }
}

impl<K> ListOptions<K> {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            initial_rect: None,
            initial_offset: 0,
            on_change: None,
            should_adjust_scroll_position_on_item_size_change: None,
            is_scrolling_reset_delay_ms: 150,
        }
    }

    pub fn with_settings(mut self, settings: LayoutSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.settings.layout = layout;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.settings.spacing = spacing;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.settings = self.settings.with_padding(padding_start, padding_end);
        self
    }

    pub fn with_looped(mut self, looped: bool) -> Self {
        self.settings.looped = looped;
        self
    }

    pub fn with_min_visible(mut self, min_visible: usize) -> Self {
        self.settings.min_visible = min_visible;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.settings.overscan = overscan;
        self
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&ListEngine<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_should_adjust_scroll_position_on_item_size_change(
        mut self,
        f: Option<impl Fn(&ListEngine<K>, DisplayedItem, i64) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.should_adjust_scroll_position_on_item_size_change = f.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl<K> core::fmt::Debug for ListOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("settings", &self.settings)
            .field("initial_rect", &self.initial_rect)
            .field("initial_offset", &self.initial_offset)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
