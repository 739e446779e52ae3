use crate::{Rect, ScrollDirection, VisibleWindow};

/// Viewport geometry captured from a [`crate::ListEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub rect: Rect,
}

/// Scroll offset (already validated) and the gesture in progress, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
    pub direction: Option<ScrollDirection>,
}

/// Everything a host needs to restore a list between frames or sessions.
///
/// `window` is informational: restoring recomputes it from the viewport and offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
    pub window: VisibleWindow,
}
