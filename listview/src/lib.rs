//! A headless virtualized list and tile engine.
//!
//! For data binding, instance pooling and animated scrolling, see the `listview-adapter` crate.
//!
//! This crate holds the layout math needed to display huge collections through a handful of
//! reusable item instances: per-layout renderers (fixed and variable lists, tiles, an elliptic
//! arc), prefix sums over item sizes, looped scrolling, and the window of items to display.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - viewport geometry (main and cross axis)
//! - scroll offset
//! - item default sizes and (optionally) measured sizes
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod error;
mod fenwick;
mod options;
pub mod renderer;
mod sizes;
mod state;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use engine::ListEngine;
pub use error::{Error, Result};
pub use options::{
    EllipseSettings, LayoutKind, LayoutSettings, ListOptions, OnChangeCallback,
    ShouldAdjustScrollPositionOnItemSizeChangeCallback,
};
pub use state::{FrameState, ScrollState, ViewportState};
pub use types::{
    Align, DisplayedItem, ItemKey, LineSpan, Placement, Rect, ScrollDirection, VisibleWindow,
    sanitize_size, wrap_index,
};
pub use window::WindowTracker;

#[doc(hidden)]
pub use sizes::{KeyCacheKey, KeyMap};
